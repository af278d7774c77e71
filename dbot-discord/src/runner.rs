//! Gateway loop: converts each MessageCreate into a core Message, records it in event order and
//! runs the command phase in its own task. Stops on Ctrl-C or when the shard closes.

use anyhow::Result;
use dbot_core::{Message, MessageDispatcher, ToCoreMessage};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use twilight_gateway::{
    CloseFrame, Event, EventTypeFlags, Intents, Shard, ShardId, StreamExt as _,
};

use super::adapters::DiscordMessageWrapper;

/// Gateway intents: guild and DM messages with their content.
pub fn intents() -> Intents {
    Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::DIRECT_MESSAGES
        | Intents::MESSAGE_CONTENT
}

/// Records `message` before returning, then spawns its command phase.
pub async fn accept_message(
    dispatcher: &Arc<dyn MessageDispatcher>,
    message: Message,
) -> JoinHandle<()> {
    dispatcher.record(&message).await;
    let dispatcher = dispatcher.clone();
    tokio::spawn(async move {
        if let Err(e) = dispatcher.handle(&message).await {
            error!(
                error = %e,
                user_id = message.author.id,
                channel_id = message.channel_id,
                "Handler chain failed"
            );
        }
    })
}

/// Connects one shard with `token` and feeds messages to `dispatcher` until Ctrl-C.
#[instrument(skip(token, dispatcher))]
pub async fn run_gateway(token: String, dispatcher: Arc<dyn MessageDispatcher>) -> Result<()> {
    let mut shard = Shard::new(ShardId::ONE, token, intents());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    info!("step: connecting to Discord gateway");

    loop {
        let item = tokio::select! {
            _ = &mut shutdown => {
                info!("Ctrl-C received, closing gateway");
                let _ = shard.sender().close(CloseFrame::NORMAL);
                break;
            }
            item = shard.next_event(EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE) => item,
        };

        let event = match item {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                warn!(error = ?e, "error receiving gateway event");
                continue;
            }
            None => {
                error!("gateway stream ended");
                break;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(
                    bot_id = ready.user.id.get(),
                    username = %ready.user.name,
                    guilds = ready.guilds.len(),
                    "Logged in to Discord"
                );
            }
            Event::MessageCreate(msg) => {
                let core_msg = DiscordMessageWrapper(&msg.0).to_core();
                debug!(
                    user_id = core_msg.author.id,
                    channel_id = core_msg.channel_id,
                    message_content = %core_msg.content,
                    "Received message"
                );
                accept_message(&dispatcher, core_msg).await;
            }
            _ => {}
        }
    }

    info!("step: gateway loop finished");
    Ok(())
}

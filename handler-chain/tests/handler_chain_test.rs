//! Integration tests for [`handler_chain::HandlerChain`]: phase order, `before` vetoes, prefix
//! handlers that all run, and early stops.

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{DbotError, Handler, HandlerResponse, Message, Result, User};
use handler_chain::HandlerChain;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn message(content: &str, is_bot: bool) -> Message {
    Message {
        id: 1001,
        channel_id: 456,
        author: User {
            id: 123,
            username: "alice".to_string(),
            is_bot,
        },
        content: content.to_string(),
        mentions: vec![],
        attachments: vec![],
        created_at: Utc::now(),
    }
}

/// Records every phase it sees as `<name>.<phase>` into a shared log.
struct Probe {
    name: &'static str,
    log: Log,
    /// Only handles messages starting with this prefix (None: handles everything).
    prefix: Option<&'static str>,
    veto_bots: bool,
    response: HandlerResponse,
    fail: bool,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            prefix: None,
            veto_bots: false,
            response: HandlerResponse::Continue,
            fail: false,
        }
    }

    fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    fn veto_bots(mut self) -> Self {
        self.veto_bots = true;
        self
    }

    fn responding(mut self, response: HandlerResponse) -> Self {
        self.response = response;
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn push(&self, phase: &str) {
        self.log.lock().unwrap().push(format!("{}.{}", self.name, phase));
    }
}

#[async_trait]
impl Handler for Probe {
    async fn before(&self, message: &Message) -> Result<bool> {
        self.push("before");
        Ok(!(self.veto_bots && message.author.is_bot))
    }

    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if let Some(prefix) = self.prefix {
            if !message.content.starts_with(prefix) {
                return Ok(HandlerResponse::Continue);
            }
        }
        self.push("handle");
        if self.fail {
            return Err(DbotError::Bot("send failed".to_string()));
        }
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> Result<()> {
        self.push(&format!("after({:?})", response));
        Ok(())
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// **Test: before runs first→last, handle first→last, after last→first.**
#[tokio::test]
async fn test_phase_order() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Probe::new("a", &log)))
        .add_handler(Arc::new(Probe::new("b", &log)));

    let response = chain.handle(&message("hello", false)).await.unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert_eq!(
        entries(&log),
        vec![
            "a.before",
            "b.before",
            "a.handle",
            "b.handle",
            "b.after(Continue)",
            "a.after(Continue)",
        ]
    );
}

/// **Test: A `before` returning false stops the chain with Stop; no handle or after runs.**
#[tokio::test]
async fn test_before_veto_stops_chain() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Probe::new("recorder", &log)))
        .add_handler(Arc::new(Probe::new("bot_filter", &log).veto_bots()))
        .add_handler(Arc::new(Probe::new("help", &log).prefix("!help")));

    let response = chain.handle(&message("!help", true)).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(entries(&log), vec!["recorder.before", "bot_filter.before"]);
}

/// **Test: Handlers returning Continue let every matching prefix handler run, in order.**
#[tokio::test]
async fn test_continue_lets_all_matching_handlers_run() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Probe::new("summarize", &log).prefix("!summarize")))
        .add_handler(Arc::new(Probe::new("summarize_all", &log).prefix("!sum")))
        .add_handler(Arc::new(Probe::new("ask", &log).prefix("!ask")));

    chain.handle(&message("!summarize 20", false)).await.unwrap();

    let handled: Vec<String> = entries(&log)
        .into_iter()
        .filter(|e| e.ends_with(".handle"))
        .collect();
    assert_eq!(handled, vec!["summarize.handle", "summarize_all.handle"]);
}

/// **Test: Reply ends the handle phase and is passed to every after.**
#[tokio::test]
async fn test_reply_stops_handle_phase() {
    let log: Log = Arc::default();
    let reply = HandlerResponse::Reply("done".to_string());
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Probe::new("first", &log).responding(reply.clone())))
        .add_handler(Arc::new(Probe::new("second", &log)));

    let response = chain.handle(&message("hi", false)).await.unwrap();

    assert_eq!(response, reply);
    let log = entries(&log);
    assert!(!log.contains(&"second.handle".to_string()));
    assert!(log.contains(&"second.after(Reply(\"done\"))".to_string()));
    assert!(log.contains(&"first.after(Reply(\"done\"))".to_string()));
}

/// **Test: Ignore behaves like Continue.**
#[tokio::test]
async fn test_ignore_continues() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Probe::new("skip", &log).responding(HandlerResponse::Ignore)))
        .add_handler(Arc::new(Probe::new("next", &log)));

    let response = chain.handle(&message("hi", false)).await.unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert!(entries(&log).contains(&"next.handle".to_string()));
}

/// **Test: A handler error is returned to the caller.**
#[tokio::test]
async fn test_handler_error_propagates() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new().add_handler(Arc::new(Probe::new("broken", &log).failing()));

    let err = chain.handle(&message("hi", false)).await.unwrap_err();
    assert!(matches!(err, DbotError::Bot(_)));
}

/// **Test: An empty chain continues.**
#[tokio::test]
async fn test_empty_chain() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.len(), 0);
    assert_eq!(
        chain.handle(&message("hi", false)).await.unwrap(),
        HandlerResponse::Continue
    );
}

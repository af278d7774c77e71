//! Command handlers. Each one matches its prefix in `handle`, reports its own failures to the user,
//! and returns `Continue` so later prefixes are still tested.

mod ask;
mod file;
mod help;
mod recorder;
mod suggest_role;
mod summarize;
mod user_summary;
mod write;

pub use ask::{AskHandler, ASK_PREFIX};
pub use file::{FileHandler, FILE_PREFIX};
pub use help::{HelpHandler, HELP_PREFIX, HELP_TEXT};
pub use recorder::{BotFilter, SessionRouter};
pub use suggest_role::{SuggestRoleHandler, SUGGEST_ROLE_PREFIX};
pub use summarize::{parse_limit, SummarizeHandler, DEFAULT_SUMMARY_LIMIT, MAX_SUMMARY_LIMIT, SUMMARIZE_PREFIX};
pub use user_summary::{UserSummaryHandler, USER_SUMMARY_PREFIX};
pub use write::{WriteHandler, PROMPT_ECHO_CHARS, WRITE_CONTENT_CHUNK_SIZE, WRITE_PREFIX};

use dbot_core::{Message, User};

/// Messages fetched from history for per-user commands.
pub const USER_HISTORY_LIMIT: usize = 100;

pub(crate) const MSG_USER_NOT_FOUND: &str =
    "Could not find the specified user. Please mention them with @.";

/// The mentioned user of a `<command> @user` message, or the reply to send instead.
pub(crate) fn target_user<'a>(message: &'a Message, usage: &'static str) -> Result<&'a User, &'static str> {
    if message.content.split_whitespace().count() < 2 {
        return Err(usage);
    }
    message.first_mention().ok_or(MSG_USER_NOT_FOUND)
}

//! Webhook event handlers.

pub mod comment;
pub mod pull_request;

pub use comment::{handle_issue_comment, CommentOutcome};
pub use pull_request::{handle_label_event, Outcome};

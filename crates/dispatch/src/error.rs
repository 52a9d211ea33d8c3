//! Service error taxonomy.

use axum::http::StatusCode;
use github::ApiError;
use thiserror::Error;

/// Fatal failures of one webhook invocation.
///
/// These are reported through the failure channel: logged at error level
/// and answered with HTTP 500. A transport error from the comment call
/// inside the dispatch block is deliberately not here; that path logs the
/// error and lets the invocation complete.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("cluster label for PR author '{author}' not found")]
    AuthorClusterLabelMissing { author: String },

    #[error("PR has multiple user labels: {}", .labels.join(", "))]
    MultipleUserLabels { labels: Vec<String> },

    #[error("commenting on PR#{number} failed with status {status}: {body}")]
    CommentNotCreated {
        number: u64,
        status: StatusCode,
        body: String,
    },

    #[error("adding label '{label}' to PR#{number} failed with status {status}: {body}")]
    LabelNotAdded {
        label: String,
        number: u64,
        status: StatusCode,
        body: String,
    },

    #[error("workflow_dispatch for '{workflow_id}' failed with status {status}: {body}")]
    DispatchFailed {
        workflow_id: String,
        status: StatusCode,
        body: String,
    },

    #[error("commit status for {sha} was not created, status {status}: {body}")]
    StatusNotCreated {
        sha: String,
        status: StatusCode,
        body: String,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

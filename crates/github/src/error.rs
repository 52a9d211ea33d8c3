//! Error type for GitHub API calls.

use thiserror::Error;

/// Transport-level failure talking to the GitHub API.
///
/// Responses that arrive with an unexpected status code are not errors at
/// this level; [`crate::ApiResponse`] carries the status so each caller owns
/// its own status-code policy.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: {0}")]
    Failed(String),
}

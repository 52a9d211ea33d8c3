//! The capability trait the dispatch handlers call GitHub through.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ApiError;
use crate::events::RepoId;

/// Status and raw body of a completed API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Reaction kinds GitHub accepts on issue comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    PlusOne,
    MinusOne,
    Laugh,
    Confused,
    Heart,
    Hooray,
    Rocket,
    Eyes,
}

impl ReactionKind {
    /// The `content` string the reactions endpoint expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlusOne => "+1",
            Self::MinusOne => "-1",
            Self::Laugh => "laugh",
            Self::Confused => "confused",
            Self::Heart => "heart",
            Self::Hooray => "hooray",
            Self::Rocket => "rocket",
            Self::Eyes => "eyes",
        }
    }
}

/// Commit status states GitHub accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Error,
    Failure,
    Pending,
    Success,
}

impl CommitState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Failure => "failure",
            Self::Pending => "pending",
            Self::Success => "success",
        }
    }
}

/// A commit status to attach to a SHA.
#[derive(Debug, Clone)]
pub struct CommitStatus {
    pub state: CommitState,
    pub context: String,
    pub description: String,
}

/// The GitHub calls the dispatch service performs.
///
/// Every method returns the raw [`ApiResponse`] for any HTTP outcome; only
/// transport failures surface as [`ApiError`]. Callers check the status
/// codes they care about (201 for comments, 204 for dispatches, ...).
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Attach a reaction to an issue comment.
    async fn create_reaction(
        &self,
        repo: &RepoId,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<ApiResponse, ApiError>;

    /// Post a comment on an issue or pull request.
    async fn create_issue_comment(
        &self,
        repo: &RepoId,
        issue_number: u64,
        body: &str,
    ) -> Result<ApiResponse, ApiError>;

    /// Add labels to an issue or pull request.
    async fn add_labels(
        &self,
        repo: &RepoId,
        issue_number: u64,
        labels: &[String],
    ) -> Result<ApiResponse, ApiError>;

    /// Trigger a `workflow_dispatch` event for a workflow file.
    async fn create_workflow_dispatch(
        &self,
        repo: &RepoId,
        workflow_id: &str,
        git_ref: &str,
        inputs: &Value,
    ) -> Result<ApiResponse, ApiError>;

    /// Create a commit status on a SHA.
    async fn create_commit_status(
        &self,
        repo: &RepoId,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<ApiResponse, ApiError>;
}

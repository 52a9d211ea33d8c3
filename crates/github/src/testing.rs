//! Recording test double for [`GitHubApi`].
//!
//! Handler and server tests inject a [`RecordingApi`] instead of the real
//! client: every call is recorded in order, and individual endpoints can be
//! scripted to answer with a chosen status or a transport error.

#![allow(clippy::missing_panics_doc)] // Test double, lock poisoning is a test bug

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::api::{ApiResponse, CommitStatus, GitHubApi, ReactionKind};
use crate::error::ApiError;
use crate::events::RepoId;

/// One recorded API call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Reaction {
        repo: String,
        comment_id: u64,
        reaction: &'static str,
    },
    IssueComment {
        repo: String,
        issue_number: u64,
        body: String,
    },
    AddLabels {
        repo: String,
        issue_number: u64,
        labels: Vec<String>,
    },
    WorkflowDispatch {
        repo: String,
        workflow_id: String,
        git_ref: String,
        inputs: Value,
    },
    CommitStatus {
        repo: String,
        sha: String,
        state: &'static str,
        context: String,
        description: String,
    },
}

#[derive(Clone)]
enum Scripted {
    Response(ApiResponse),
    TransportError(String),
}

/// [`GitHubApi`] implementation that records calls instead of making them.
///
/// Defaults mimic the happy path: 201 for reactions, comments and statuses,
/// 200 for labels, 204 for dispatches.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<RecordedCall>>,
    reaction: Mutex<Option<Scripted>>,
    comment: Mutex<Option<Scripted>>,
    labels: Mutex<Option<Scripted>>,
    dispatch: Mutex<Option<Scripted>>,
    status: Mutex<Option<Scripted>>,
}

impl RecordingApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn respond_to_comment(&self, status: StatusCode, body: &str) {
        *self.comment.lock().unwrap() = Some(Scripted::Response(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Make the next comment calls fail at the transport level.
    pub fn fail_comment_transport(&self, message: &str) {
        *self.comment.lock().unwrap() = Some(Scripted::TransportError(message.to_string()));
    }

    pub fn respond_to_dispatch(&self, status: StatusCode, body: &str) {
        *self.dispatch.lock().unwrap() = Some(Scripted::Response(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail_dispatch_transport(&self, message: &str) {
        *self.dispatch.lock().unwrap() = Some(Scripted::TransportError(message.to_string()));
    }

    pub fn respond_to_status(&self, status: StatusCode, body: &str) {
        *self.status.lock().unwrap() = Some(Scripted::Response(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn respond_to_labels(&self, status: StatusCode, body: &str) {
        *self.labels.lock().unwrap() = Some(Scripted::Response(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail_reaction_transport(&self, message: &str) {
        *self.reaction.lock().unwrap() = Some(Scripted::TransportError(message.to_string()));
    }

    fn resolve(
        slot: &Mutex<Option<Scripted>>,
        default_status: StatusCode,
    ) -> Result<ApiResponse, ApiError> {
        match slot.lock().unwrap().clone() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::TransportError(message)) => Err(ApiError::Failed(message)),
            None => Ok(ApiResponse {
                status: default_status,
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl GitHubApi for RecordingApi {
    async fn create_reaction(
        &self,
        repo: &RepoId,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::Reaction {
            repo: repo.to_string(),
            comment_id,
            reaction: reaction.as_str(),
        });
        Self::resolve(&self.reaction, StatusCode::CREATED)
    }

    async fn create_issue_comment(
        &self,
        repo: &RepoId,
        issue_number: u64,
        body: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::IssueComment {
            repo: repo.to_string(),
            issue_number,
            body: body.to_string(),
        });
        Self::resolve(&self.comment, StatusCode::CREATED)
    }

    async fn add_labels(
        &self,
        repo: &RepoId,
        issue_number: u64,
        labels: &[String],
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::AddLabels {
            repo: repo.to_string(),
            issue_number,
            labels: labels.to_vec(),
        });
        Self::resolve(&self.labels, StatusCode::OK)
    }

    async fn create_workflow_dispatch(
        &self,
        repo: &RepoId,
        workflow_id: &str,
        git_ref: &str,
        inputs: &Value,
    ) -> Result<ApiResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::WorkflowDispatch {
                repo: repo.to_string(),
                workflow_id: workflow_id.to_string(),
                git_ref: git_ref.to_string(),
                inputs: inputs.clone(),
            });
        Self::resolve(&self.dispatch, StatusCode::NO_CONTENT)
    }

    async fn create_commit_status(
        &self,
        repo: &RepoId,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall::CommitStatus {
            repo: repo.to_string(),
            sha: sha.to_string(),
            state: status.state.as_str(),
            context: status.context.clone(),
            description: status.description.clone(),
        });
        Self::resolve(&self.status, StatusCode::CREATED)
    }
}

//! Commit status updates for the skip-e2e label.

use axum::http::StatusCode;
use github::{CommitState, CommitStatus, GitHubApi, RepoId};
use tracing::info;

use crate::error::HandlerError;

/// Context the e2e gate status is reported under.
pub const E2E_STATUS_CONTEXT: &str = "e2e: required";

/// Reflects the skip/e2e label on the PR head commit.
///
/// Adding the label marks the gate successful; removing it puts the gate
/// back into pending until a real run reports.
pub async fn set_skip_status(
    api: &dyn GitHubApi,
    repo: &RepoId,
    sha: &str,
    labeled: bool,
) -> Result<(), HandlerError> {
    let status = if labeled {
        CommitStatus {
            state: CommitState::Success,
            context: E2E_STATUS_CONTEXT.to_string(),
            description: "e2e runs are skipped for this pull request".to_string(),
        }
    } else {
        CommitStatus {
            state: CommitState::Pending,
            context: E2E_STATUS_CONTEXT.to_string(),
            description: "waiting for e2e results".to_string(),
        }
    };

    info!(%sha, state = status.state.as_str(), "Setting e2e commit status");
    let response = api.create_commit_status(repo, sha, &status).await?;
    if response.status != StatusCode::CREATED {
        return Err(HandlerError::StatusNotCreated {
            sha: sha.to_string(),
            status: response.status,
            body: response.body,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use github::testing::{RecordedCall, RecordingApi};

    use super::*;

    fn repo() -> RepoId {
        RepoId::parse("acme/website").unwrap()
    }

    #[tokio::test]
    async fn test_labeled_marks_gate_successful() {
        let api = RecordingApi::new();
        set_skip_status(&api, &repo(), "6dcb09b", true).await.unwrap();
        match &api.calls()[0] {
            RecordedCall::CommitStatus {
                sha,
                state,
                context,
                ..
            } => {
                assert_eq!(sha, "6dcb09b");
                assert_eq!(*state, "success");
                assert_eq!(context, E2E_STATUS_CONTEXT);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unlabeled_returns_gate_to_pending() {
        let api = RecordingApi::new();
        set_skip_status(&api, &repo(), "6dcb09b", false).await.unwrap();
        match &api.calls()[0] {
            RecordedCall::CommitStatus { state, .. } => assert_eq!(*state, "pending"),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_created_response_is_fatal() {
        let api = RecordingApi::new();
        api.respond_to_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let err = set_skip_status(&api, &repo(), "6dcb09b", true)
            .await
            .unwrap_err();
        match err {
            HandlerError::StatusNotCreated { status, body, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

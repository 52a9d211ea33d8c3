//! Workflow dispatch calls.

use axum::http::StatusCode;
use github::{GitHubApi, RepoId};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::HandlerError;

/// Ref the dispatched workflow definition is read from.
pub const MAIN_REF: &str = "refs/heads/main";

/// Triggers a `workflow_dispatch` run and insists on 204.
///
/// GitHub acknowledges a dispatch with 204 No Content; any other status
/// means no run was queued and is reported as a fatal failure together
/// with the response body.
pub async fn start_workflow(
    api: &dyn GitHubApi,
    repo: &RepoId,
    workflow_id: &str,
    git_ref: &str,
    inputs: &Value,
) -> Result<(), HandlerError> {
    info!(%workflow_id, %git_ref, %inputs, "Starting workflow");
    let response = api
        .create_workflow_dispatch(repo, workflow_id, git_ref, inputs)
        .await?;
    debug!(status = %response.status, "Workflow dispatch call completed");

    if response.status != StatusCode::NO_CONTENT {
        return Err(HandlerError::DispatchFailed {
            workflow_id: workflow_id.to_string(),
            status: response.status,
            body: response.body,
        });
    }

    info!(%workflow_id, "Workflow started successfully");
    Ok(())
}

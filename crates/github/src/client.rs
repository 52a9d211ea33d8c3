//! reqwest-backed implementation of [`GitHubApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::{ApiResponse, CommitStatus, GitHubApi, ReactionKind};
use crate::error::ApiError;
use crate::events::RepoId;

const GITHUB_API_URL: &str = "https://api.github.com";

/// Authenticated GitHub REST client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client pointed at `api.github.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = reqwest::Client::builder()
            .user_agent("label-dispatch/0.1")
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
            token: token.to_string(),
        })
    }

    /// Point the client at a different API base (tests, GitHub Enterprise).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(%url, %status, "GitHub API call completed");

        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn create_reaction(
        &self,
        repo: &RepoId,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!(
            "/repos/{}/{}/issues/comments/{comment_id}/reactions",
            repo.owner, repo.name
        );
        self.post(&path, &json!({ "content": reaction.as_str() }))
            .await
    }

    async fn create_issue_comment(
        &self,
        repo: &RepoId,
        issue_number: u64,
        body: &str,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!(
            "/repos/{}/{}/issues/{issue_number}/comments",
            repo.owner, repo.name
        );
        self.post(&path, &json!({ "body": body })).await
    }

    async fn add_labels(
        &self,
        repo: &RepoId,
        issue_number: u64,
        labels: &[String],
    ) -> Result<ApiResponse, ApiError> {
        let path = format!(
            "/repos/{}/{}/issues/{issue_number}/labels",
            repo.owner, repo.name
        );
        self.post(&path, &json!({ "labels": labels })).await
    }

    async fn create_workflow_dispatch(
        &self,
        repo: &RepoId,
        workflow_id: &str,
        git_ref: &str,
        inputs: &Value,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!(
            "/repos/{}/{}/actions/workflows/{workflow_id}/dispatches",
            repo.owner, repo.name
        );
        self.post(&path, &json!({ "ref": git_ref, "inputs": inputs }))
            .await
    }

    async fn create_commit_status(
        &self,
        repo: &RepoId,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!("/repos/{}/{}/statuses/{sha}", repo.owner, repo.name);
        self.post(
            &path,
            &json!({
                "state": status.state.as_str(),
                "context": status.context,
                "description": status.description,
            }),
        )
        .await
    }
}

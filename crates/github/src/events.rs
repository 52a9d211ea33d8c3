//! Typed webhook payloads for the events the service handles.
//!
//! Only the fields the handlers read are modeled; GitHub sends far more.

use std::fmt;

use serde::Deserialize;

/// `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Parse a `full_name` such as `acme/website`.
    #[must_use]
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// `pull_request` webhook payload for the `labeled`/`unlabeled` actions.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLabelEvent {
    pub action: LabelAction,
    pub label: Label,
    pub pull_request: PullRequest,
    pub sender: User,
    pub repository: Repository,
}

/// The two label actions the service reacts to. Other `pull_request`
/// actions are filtered out before deserializing the full event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    Labeled,
    Unlabeled,
}

impl LabelAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
        }
    }
}

impl fmt::Display for LabelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label on a pull request or issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub user: User,
    pub head: HeadRef,
}

/// Head ref data of a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    pub sha: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// `owner:branch` form, e.g. `octocat:feature`.
    pub label: String,
    pub repo: HeadRepo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRepo {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// `issue_comment` webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub comment: Comment,
    pub issue: Issue,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    /// Present when the issue is a pull request.
    #[serde(default)]
    pub pull_request: Option<PullRequestLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLink {
    pub url: String,
}

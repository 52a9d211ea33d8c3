//! GitHub REST access and webhook payload types for the dispatch service.
//!
//! This crate provides:
//! - Typed payload models for the `pull_request` label events and
//!   `issue_comment` events the service consumes
//! - The [`GitHubApi`] capability trait the handlers call GitHub through
//! - The reqwest-backed [`GitHubClient`] used in production
//! - A recording test double ([`testing::RecordingApi`]) for handler tests

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API method can fail the same way

pub mod api;
pub mod client;
pub mod error;
pub mod events;
pub mod testing;

pub use api::{ApiResponse, CommitState, CommitStatus, GitHubApi, ReactionKind};
pub use client::GitHubClient;
pub use error::ApiError;
pub use events::{
    Comment, HeadRef, HeadRepo, Issue, IssueCommentEvent, Label, LabelAction, PullRequest,
    PullRequestLabelEvent, PullRequestLink, RepoId, Repository, User,
};

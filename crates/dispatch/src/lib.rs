//! Label-driven GitHub workflow dispatch service.
//!
//! This crate provides:
//! - Slash-command extraction from PR comments
//! - The known-labels table and user-cluster label resolution
//! - The pull-request label event orchestrator (skip status, workflow
//!   dispatch, or no-op)
//! - The comment command handler that applies labels from slash commands
//! - The axum webhook server with delivery signature verification

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Fatal paths share one taxonomy, documented on HandlerError

pub mod command;
pub mod comments;
pub mod config;
pub mod e2e_status;
pub mod error;
pub mod handlers;
pub mod labels;
pub mod server;
pub mod workflow;

pub use config::Config;
pub use error::HandlerError;
pub use server::AppState;

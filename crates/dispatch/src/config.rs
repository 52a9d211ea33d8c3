//! Service configuration from the environment.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token the GitHub API client authenticates with.
    pub github_token: String,
    /// Shared secret for webhook signature verification. Unset disables
    /// verification.
    pub webhook_secret: Option<String>,
    pub port: u16,
    /// Logins with a personal e2e cluster, in roster order.
    pub cluster_users: Vec<String>,
    /// Override of the GitHub API base URL, for GHES and tests.
    pub github_api_url: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `GITHUB_TOKEN` is unset or `PORT` is not a number.
    pub fn from_env() -> anyhow::Result<Self> {
        let github_token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is required")?;
        let webhook_secret = std::env::var("GITHUB_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        let port: u16 = match std::env::var("PORT") {
            Ok(value) => value.parse().context("PORT must be a port number")?,
            Err(_) => 8080,
        };
        let cluster_users = std::env::var("E2E_CLUSTER_USERS")
            .map(|value| parse_user_list(&value))
            .unwrap_or_default();
        let github_api_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            github_token,
            webhook_secret,
            port,
            cluster_users,
            github_api_url,
        })
    }
}

fn parse_user_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(ToString::to_string)
        .collect()
}

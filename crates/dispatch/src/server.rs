//! Webhook server wiring.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use github::{GitHubApi, IssueCommentEvent, PullRequestLabelEvent, RepoId};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::error::HandlerError;
use crate::handlers::{handle_issue_comment, handle_label_event, CommentOutcome, Outcome};
use crate::labels::UserClusterLabels;

type HmacSha256 = Hmac<Sha256>;

/// State shared by all webhook invocations.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GitHubApi>,
    pub users: Arc<UserClusterLabels>,
    pub webhook_secret: Option<String>,
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/github", post(github_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// First pass over a payload, just enough to route it.
#[derive(Deserialize)]
struct ActionProbe {
    #[serde(default)]
    action: String,
}

async fn github_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event_type = header_str(&headers, "X-GitHub-Event").unwrap_or("unknown");
    let delivery_id = header_str(&headers, "X-GitHub-Delivery").unwrap_or("unknown");
    info!(
        event_type = %event_type,
        delivery_id = %delivery_id,
        "Received webhook delivery"
    );

    if !verify_signature(
        state.webhook_secret.as_deref(),
        &body,
        header_str(&headers, "X-Hub-Signature-256"),
    ) {
        warn!(delivery_id = %delivery_id, "Rejecting delivery with a bad signature");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "error": "invalid signature"})),
        )
            .into_response();
    }

    match event_type {
        "pull_request" => handle_pull_request_delivery(&state, &body).await,
        "issue_comment" => handle_issue_comment_delivery(&state, &body).await,
        _ => {
            debug!(event_type = %event_type, "Ignoring event type");
            ignored("unhandled event type")
        }
    }
}

async fn handle_pull_request_delivery(state: &AppState, body: &[u8]) -> Response {
    let Ok(probe) = serde_json::from_slice::<ActionProbe>(body) else {
        return bad_payload("malformed payload");
    };
    if probe.action != "labeled" && probe.action != "unlabeled" {
        debug!(action = %probe.action, "Ignoring PR action");
        return ignored("unhandled action");
    }

    let event: PullRequestLabelEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(error) => {
            warn!(%error, "Rejecting malformed pull_request payload");
            return bad_payload("malformed payload");
        }
    };
    let Some(repo) = RepoId::parse(&event.repository.full_name) else {
        return bad_payload("malformed repository name");
    };

    // GitHub keeps this ref pointing at the PR head, fork or not.
    let workflow_ref = format!("refs/pull/{}/head", event.pull_request.number);

    match handle_label_event(state.api.as_ref(), &state.users, &repo, &event, &workflow_ref).await
    {
        Ok(outcome) => label_outcome_response(&outcome),
        Err(error) => {
            error!(%error, "Handling the label event failed");
            failure(&error)
        }
    }
}

async fn handle_issue_comment_delivery(state: &AppState, body: &[u8]) -> Response {
    let Ok(probe) = serde_json::from_slice::<ActionProbe>(body) else {
        return bad_payload("malformed payload");
    };
    if probe.action != "created" {
        debug!(action = %probe.action, "Ignoring comment action");
        return ignored("unhandled action");
    }

    let event: IssueCommentEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(error) => {
            warn!(%error, "Rejecting malformed issue_comment payload");
            return bad_payload("malformed payload");
        }
    };
    let Some(repo) = RepoId::parse(&event.repository.full_name) else {
        return bad_payload("malformed repository name");
    };

    match handle_issue_comment(state.api.as_ref(), &repo, &event).await {
        Ok(CommentOutcome::Ignored) => ignored("no command"),
        Ok(CommentOutcome::LabelApplied { label }) => (
            StatusCode::OK,
            Json(json!({"status": "label-applied", "label": label})),
        )
            .into_response(),
        Err(error) => {
            error!(%error, "Handling the comment failed");
            failure(&error)
        }
    }
}

fn label_outcome_response(outcome: &Outcome) -> Response {
    let body = match outcome {
        Outcome::Ignored => json!({"status": "ignored", "reason": "no workflow for label"}),
        Outcome::SkipStatusUpdated { labeled } => {
            json!({"status": "skip-status-updated", "labeled": labeled})
        }
        Outcome::WorkflowDispatched { workflow_id } => {
            json!({"status": "dispatched", "workflow": workflow_id})
        }
        Outcome::DispatchAbandoned => json!({"status": "dispatch-abandoned"}),
    };
    (StatusCode::OK, Json(body)).into_response()
}

fn ignored(reason: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({"status": "ignored", "reason": reason})),
    )
        .into_response()
}

fn bad_payload(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "error": reason})),
    )
        .into_response()
}

fn failure(error: &HandlerError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "error": error.to_string()})),
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Checks the `X-Hub-Signature-256` header against the shared secret.
///
/// Verification is skipped when no secret is configured.
fn verify_signature(secret: Option<&str>, body: &[u8], signature: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    let Some(signature) = signature else {
        return false;
    };
    let Some(hex_digest) = signature.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(digest) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&digest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_no_secret_accepts_everything() {
        assert!(verify_signature(None, b"payload", None));
        assert!(verify_signature(None, b"payload", Some("sha256=junk")));
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let signature = sign("s3cret", b"payload");
        assert!(verify_signature(Some("s3cret"), b"payload", Some(&signature)));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign("s3cret", b"payload");
        assert!(!verify_signature(
            Some("s3cret"),
            b"other payload",
            Some(&signature)
        ));
    }

    #[test]
    fn test_missing_or_malformed_signature_is_rejected() {
        assert!(!verify_signature(Some("s3cret"), b"payload", None));
        assert!(!verify_signature(Some("s3cret"), b"payload", Some("junk")));
        assert!(!verify_signature(
            Some("s3cret"),
            b"payload",
            Some("sha256=nothex")
        ));
    }
}

//! Handler for `issue_comment` deliveries carrying slash commands.

use github::{GitHubApi, IssueCommentEvent, ReactionKind, RepoId};
use tracing::{debug, info};

use crate::command::{extract_command, CommandParseError};
use crate::error::HandlerError;
use crate::labels::{classify_label, SKIP_E2E_LABEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Ignored,
    /// The command's label was applied to the PR. The labeled delivery
    /// that GitHub sends in response drives the actual dispatch.
    LabelApplied { label: String },
}

/// Turns a slash command in a PR comment into the matching label.
///
/// `/e2e/run/aws` applies the `e2e/run/aws` label and so on. Commands are
/// acknowledged with a +1 reaction, rejected ones with a confused face.
/// Comments without a slash command are ignored without a reply.
pub async fn handle_issue_comment(
    api: &dyn GitHubApi,
    repo: &RepoId,
    event: &IssueCommentEvent,
) -> Result<CommentOutcome, HandlerError> {
    if event.issue.pull_request.is_none() {
        debug!(issue = event.issue.number, "Comment is not on a PR, ignoring");
        return Ok(CommentOutcome::Ignored);
    }

    let command = match extract_command(&event.comment.body) {
        Ok(command) => command,
        Err(CommandParseError::NoSlashCommand) => {
            debug!(comment_id = event.comment.id, "Comment carries no command, ignoring");
            return Ok(CommentOutcome::Ignored);
        }
        Err(error @ CommandParseError::InvalidSyntax { .. }) => {
            info!(%error, "Rejecting malformed command");
            api.create_reaction(repo, event.comment.id, ReactionKind::Confused)
                .await?;
            return Ok(CommentOutcome::Ignored);
        }
    };

    let label = command.argv[0][1..].to_string();
    if classify_label(&label).is_none() && label != SKIP_E2E_LABEL {
        info!(%label, "Command names no known label, rejecting");
        api.create_reaction(repo, event.comment.id, ReactionKind::Confused)
            .await?;
        return Ok(CommentOutcome::Ignored);
    }

    api.create_reaction(repo, event.comment.id, ReactionKind::PlusOne)
        .await?;

    let response = api
        .add_labels(repo, event.issue.number, &[label.clone()])
        .await?;
    if !response.status.is_success() {
        return Err(HandlerError::LabelNotAdded {
            label,
            number: event.issue.number,
            status: response.status,
            body: response.body,
        });
    }

    info!(%label, issue = event.issue.number, "Label applied");
    Ok(CommentOutcome::LabelApplied { label })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use github::testing::{RecordedCall, RecordingApi};
    use github::{Comment, Issue, PullRequestLink, Repository, User};

    use super::*;

    fn repo() -> RepoId {
        RepoId::parse("acme/website").unwrap()
    }

    fn event(body: &str, on_pr: bool) -> IssueCommentEvent {
        IssueCommentEvent {
            action: "created".to_string(),
            comment: Comment {
                id: 42,
                body: body.to_string(),
                user: User {
                    login: "alice".to_string(),
                },
            },
            issue: Issue {
                number: 133,
                pull_request: on_pr.then(|| PullRequestLink {
                    url: "https://api.github.com/repos/acme/website/pulls/133".to_string(),
                }),
            },
            repository: Repository {
                full_name: "acme/website".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_ignores_comments_outside_prs() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("/e2e/run/aws", false))
            .await
            .unwrap();
        assert_eq!(outcome, CommentOutcome::Ignored);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ignores_plain_conversation() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("nice work!", true))
            .await
            .unwrap();
        assert_eq!(outcome, CommentOutcome::Ignored);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_command_gets_a_confused_reaction() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("/Deploy now", true))
            .await
            .unwrap();
        assert_eq!(outcome, CommentOutcome::Ignored);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::Reaction {
                repo: "acme/website".to_string(),
                comment_id: 42,
                reaction: "confused",
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_command_gets_a_confused_reaction() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("/e2e/run/digitalocean", true))
            .await
            .unwrap();
        assert_eq!(outcome, CommentOutcome::Ignored);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::Reaction {
                repo: "acme/website".to_string(),
                comment_id: 42,
                reaction: "confused",
            }]
        );
    }

    #[tokio::test]
    async fn test_known_command_applies_the_label() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("/e2e/run/aws", true))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CommentOutcome::LabelApplied {
                label: "e2e/run/aws".to_string()
            }
        );
        assert_eq!(
            api.calls(),
            vec![
                RecordedCall::Reaction {
                    repo: "acme/website".to_string(),
                    comment_id: 42,
                    reaction: "+1",
                },
                RecordedCall::AddLabels {
                    repo: "acme/website".to_string(),
                    issue_number: 133,
                    labels: vec!["e2e/run/aws".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_skip_command_applies_the_skip_label() {
        let api = RecordingApi::new();
        let outcome = handle_issue_comment(&api, &repo(), &event("LGTM\n\n/skip/e2e", true))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CommentOutcome::LabelApplied {
                label: "skip/e2e".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_label_rejection_is_fatal() {
        let api = RecordingApi::new();
        api.respond_to_labels(StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed");
        let err = handle_issue_comment(&api, &repo(), &event("/deploy/web/test", true))
            .await
            .unwrap_err();
        match err {
            HandlerError::LabelNotAdded { label, status, .. } => {
                assert_eq!(label, "deploy/web/test");
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reaction_transport_error_is_fatal() {
        let api = RecordingApi::new();
        api.fail_reaction_transport("connection reset");
        let err = handle_issue_comment(&api, &repo(), &event("/e2e/run/gcp", true))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Api(_)));
    }
}

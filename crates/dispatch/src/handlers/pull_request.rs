//! Handler for `pull_request` labeled/unlabeled deliveries.

use axum::http::StatusCode;
use github::{GitHubApi, LabelAction, PullRequest, PullRequestLabelEvent, RepoId};
use serde_json::json;
use tracing::{debug, info};

use crate::comments::label_recognition_comment;
use crate::e2e_status::set_skip_status;
use crate::error::HandlerError;
use crate::labels::{
    classify_label, known_label_names, UserClusterLabels, E2E_USER_LABEL_PREFIX, SKIP_E2E_LABEL,
};
use crate::workflow::{start_workflow, MAIN_REF};

/// What one label delivery amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to run for this label and action.
    Ignored,
    /// The e2e gate status on the head commit was updated.
    SkipStatusUpdated { labeled: bool },
    /// A workflow run was triggered.
    WorkflowDispatched { workflow_id: String },
    /// The announcement comment could not be delivered, so no run was
    /// started. Not a failure of the invocation.
    DispatchAbandoned,
}

/// What the label asks the service to do.
#[derive(Debug, Default)]
struct Command {
    set_e2e_should_skipped: Option<bool>,
    // Nothing sets this anymore; carried for the command dump only.
    rerun_workflow: bool,
    trigger_workflow_dispatch: bool,
    workflows: Vec<String>,
}

fn detect_command(event: &PullRequestLabelEvent) -> Command {
    let mut command = Command::default();
    let label = event.label.name.as_str();

    if label == SKIP_E2E_LABEL {
        command.set_e2e_should_skipped = Some(event.action == LabelAction::Labeled);
    }

    if let Some(kind) = classify_label(label) {
        if event.action == LabelAction::Labeled {
            command.trigger_workflow_dispatch = true;
            command.workflows.push(kind.workflow_id());
        }
    }

    command
}

/// Where the run will take its sources from.
#[derive(Debug)]
struct PrInfo {
    number: u64,
    ref_name: String,
    head_sha: String,
    head_label: String,
    from_fork: bool,
}

fn pr_info(pr: &PullRequest, target_repo: &RepoId) -> PrInfo {
    let from_fork = pr.head.repo.full_name != target_repo.to_string();
    // Fork branches are not fetchable by name from the target repo, so
    // runs against forks use a synthetic pr<N> name instead.
    let ref_name = if from_fork {
        format!("pr{}", pr.number)
    } else {
        pr.head.ref_name.clone()
    };
    PrInfo {
        number: pr.number,
        ref_name,
        head_sha: pr.head.sha.clone(),
        head_label: pr.head.label.clone(),
        from_fork,
    }
}

/// Reacts to one labeled/unlabeled delivery.
///
/// The skip/e2e label only moves the commit status gate. Trigger labels
/// announce the run with a PR comment and then dispatch the workflow
/// mapped to the label, passing the cluster user as input. A transport
/// error on the announcement comment abandons the dispatch without
/// failing the invocation; every other failure is fatal.
pub async fn handle_label_event(
    api: &dyn GitHubApi,
    users: &UserClusterLabels,
    repo: &RepoId,
    event: &PullRequestLabelEvent,
    workflow_ref: &str,
) -> Result<Outcome, HandlerError> {
    let pr = &event.pull_request;

    let mut cluster_users = users.resolve(&pr.labels);
    if cluster_users.is_empty() {
        let author = &pr.user.login;
        let author_label = format!("{E2E_USER_LABEL_PREFIX}{author}");
        info!(%author, %author_label, "No user labels found in PR, using the author's cluster");
        match users.get(&author_label) {
            Some(entry) => cluster_users.push(entry),
            None => {
                return Err(HandlerError::AuthorClusterLabelMissing {
                    author: author.clone(),
                });
            }
        }
    }
    if cluster_users.len() > 1 {
        return Err(HandlerError::MultipleUserLabels {
            labels: cluster_users
                .iter()
                .map(|entry| entry.label.clone())
                .collect(),
        });
    }
    let cluster_user = cluster_users[0];

    debug!(
        action = event.action.as_str(),
        label = %event.label.name,
        sender = %event.sender.login,
        pr_number = pr.number,
        %workflow_ref,
        pr_labels = ?pr.labels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        known_labels = ?known_label_names(),
        "Handling PR label event"
    );

    let command = detect_command(event);
    debug!(
        set_e2e_should_skipped = ?command.set_e2e_should_skipped,
        rerun_workflow = command.rerun_workflow,
        trigger_workflow_dispatch = command.trigger_workflow_dispatch,
        workflows = ?command.workflows,
        "Detected command"
    );

    if let Some(labeled) = command.set_e2e_should_skipped {
        set_skip_status(api, repo, &pr.head.sha, labeled).await?;
        return Ok(Outcome::SkipStatusUpdated { labeled });
    }

    if command.workflows.is_empty() {
        info!(
            action = event.action.as_str(),
            label = %event.label.name,
            "No workflow to run for this label, ignoring"
        );
        return Ok(Outcome::Ignored);
    }
    if !command.trigger_workflow_dispatch {
        return Ok(Outcome::Ignored);
    }

    // A run is announced with a single PR comment, so only one workflow
    // can be triggered per event.
    let workflow_id = command.workflows[0].clone();
    info!(
        workflows = ?command.workflows,
        label = %event.label.name,
        "Running workflow for label"
    );

    info!(pr_number = pr.number, "Commenting on PR");
    let body = label_recognition_comment(&event.label.name, &event.sender.login);
    match api.create_issue_comment(repo, pr.number, &body).await {
        Ok(response) if response.status != StatusCode::CREATED => {
            return Err(HandlerError::CommentNotCreated {
                number: pr.number,
                status: response.status,
                body: response.body,
            });
        }
        Ok(_) => {}
        Err(error) => {
            info!(%error, "GitHub API call error, abandoning dispatch");
            return Ok(Outcome::DispatchAbandoned);
        }
    }

    let info = pr_info(pr, repo);
    debug!(
        pr_number = info.number,
        pr_ref = %info.ref_name,
        head_sha = %info.head_sha,
        head_label = %info.head_label,
        from_fork = info.from_fork,
        %workflow_ref,
        "Resolved PR execution details"
    );

    info!(username = %cluster_user.user, "Dispatching for cluster user");
    start_workflow(
        api,
        repo,
        &workflow_id,
        MAIN_REF,
        &json!({ "username": cluster_user.user }),
    )
    .await?;

    Ok(Outcome::WorkflowDispatched { workflow_id })
}

#[cfg(test)]
mod tests {
    use github::{HeadRef, HeadRepo, Label, Repository, User};

    use super::*;

    fn event(action: LabelAction, label: &str) -> PullRequestLabelEvent {
        PullRequestLabelEvent {
            action,
            label: Label {
                name: label.to_string(),
            },
            pull_request: PullRequest {
                number: 133,
                labels: vec![],
                user: User {
                    login: "alice".to_string(),
                },
                head: HeadRef {
                    sha: "6dcb09b".to_string(),
                    ref_name: "feature-1".to_string(),
                    label: "acme:feature-1".to_string(),
                    repo: HeadRepo {
                        full_name: "acme/website".to_string(),
                    },
                },
            },
            sender: User {
                login: "bob".to_string(),
            },
            repository: Repository {
                full_name: "acme/website".to_string(),
            },
        }
    }

    #[test]
    fn test_skip_label_sets_the_skip_flag() {
        let command = detect_command(&event(LabelAction::Labeled, "skip/e2e"));
        assert_eq!(command.set_e2e_should_skipped, Some(true));
        assert!(!command.trigger_workflow_dispatch);
        assert!(command.workflows.is_empty());
    }

    #[test]
    fn test_removing_the_skip_label_clears_the_flag() {
        let command = detect_command(&event(LabelAction::Unlabeled, "skip/e2e"));
        assert_eq!(command.set_e2e_should_skipped, Some(false));
    }

    #[test]
    fn test_trigger_label_maps_to_its_workflow() {
        let command = detect_command(&event(LabelAction::Labeled, "deploy/web/staging"));
        assert!(command.trigger_workflow_dispatch);
        assert_eq!(command.workflows, vec!["deploy-web-staging.yml"]);
        assert_eq!(command.set_e2e_should_skipped, None);
    }

    #[test]
    fn test_removing_a_trigger_label_does_nothing() {
        let command = detect_command(&event(LabelAction::Unlabeled, "e2e/run/aws"));
        assert!(!command.trigger_workflow_dispatch);
        assert!(command.workflows.is_empty());
    }

    #[test]
    fn test_unknown_label_does_nothing() {
        let command = detect_command(&event(LabelAction::Labeled, "needs/review"));
        assert!(!command.trigger_workflow_dispatch);
        assert!(command.workflows.is_empty());
        assert_eq!(command.set_e2e_should_skipped, None);
    }

    #[test]
    fn test_same_repo_pr_runs_on_its_branch() {
        let event = event(LabelAction::Labeled, "e2e/run/aws");
        let repo = RepoId::parse("acme/website").unwrap();
        let info = pr_info(&event.pull_request, &repo);
        assert_eq!(info.ref_name, "feature-1");
        assert!(!info.from_fork);
    }

    #[test]
    fn test_fork_pr_gets_a_synthetic_ref_name() {
        let mut event = event(LabelAction::Labeled, "e2e/run/aws");
        event.pull_request.head.repo.full_name = "mallory/website".to_string();
        let repo = RepoId::parse("acme/website").unwrap();
        let info = pr_info(&event.pull_request, &repo);
        assert_eq!(info.ref_name, "pr133");
        assert!(info.from_fork);
    }
}

//! Label vocabulary and the user cluster roster.

use github::Label;

/// Label that suppresses e2e runs for a PR.
pub const SKIP_E2E_LABEL: &str = "skip/e2e";

/// Prefix of the per-user cluster labels, `e2e/user/<login>`.
pub const E2E_USER_LABEL_PREFIX: &str = "e2e/user/";

/// Workflow that runs e2e on a user cluster.
pub const E2E_CLUSTER_WORKFLOW: &str = "run-e2e-on-user-cluster.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployEnv {
    Test,
    Staging,
    Prod,
}

impl DeployEnv {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeployEnv::Test => "test",
            DeployEnv::Staging => "staging",
            DeployEnv::Prod => "prod",
        }
    }
}

/// What a recognized trigger label asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    E2eRun,
    DeployWeb(DeployEnv),
}

impl LabelKind {
    /// Workflow file dispatched for this label.
    #[must_use]
    pub fn workflow_id(self) -> String {
        match self {
            LabelKind::E2eRun => E2E_CLUSTER_WORKFLOW.to_string(),
            LabelKind::DeployWeb(env) => format!("deploy-web-{}.yml", env.as_str()),
        }
    }
}

/// Trigger labels the service reacts to, in documentation order.
pub const KNOWN_LABELS: &[(&str, LabelKind)] = &[
    ("e2e/run/aws", LabelKind::E2eRun),
    ("e2e/run/azure", LabelKind::E2eRun),
    ("e2e/run/gcp", LabelKind::E2eRun),
    ("e2e/run/openstack", LabelKind::E2eRun),
    ("e2e/run/vsphere", LabelKind::E2eRun),
    ("e2e/run/static", LabelKind::E2eRun),
    ("deploy/web/test", LabelKind::DeployWeb(DeployEnv::Test)),
    ("deploy/web/staging", LabelKind::DeployWeb(DeployEnv::Staging)),
    ("deploy/web/prod", LabelKind::DeployWeb(DeployEnv::Prod)),
];

#[must_use]
pub fn classify_label(name: &str) -> Option<LabelKind> {
    KNOWN_LABELS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, kind)| *kind)
}

#[must_use]
pub fn known_label_names() -> Vec<&'static str> {
    KNOWN_LABELS.iter().map(|(name, _)| *name).collect()
}

/// One roster entry: the label that selects a user's cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterUser {
    pub label: String,
    pub user: String,
}

/// Roster of user clusters, ordered as configured.
#[derive(Debug, Default)]
pub struct UserClusterLabels {
    entries: Vec<ClusterUser>,
}

impl UserClusterLabels {
    pub fn from_logins<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = logins
            .into_iter()
            .map(|login| ClusterUser {
                label: format!("{}{}", E2E_USER_LABEL_PREFIX, login.as_ref()),
                user: login.as_ref().to_string(),
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ClusterUser> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Roster entries whose labels are present on the PR, in PR label order.
    #[must_use]
    pub fn resolve(&self, labels: &[Label]) -> Vec<&ClusterUser> {
        labels
            .iter()
            .filter_map(|label| self.get(&label.name))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

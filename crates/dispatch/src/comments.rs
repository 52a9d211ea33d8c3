//! Bodies of the comments the service posts.

/// Comment announcing that a recognized label is about to start a run.
#[must_use]
pub fn label_recognition_comment(label: &str, user: &str) -> String {
    format!(
        "Recognized the `{label}` label set by @{user}. A workflow run is starting for this pull request."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_label_and_user() {
        let body = label_recognition_comment("e2e/run/aws", "alice");
        assert_eq!(
            body,
            "Recognized the `e2e/run/aws` label set by @alice. A workflow run is starting for this pull request."
        );
    }
}

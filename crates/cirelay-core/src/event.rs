//! Canonical inbound CI event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Repository short name used when the payload names no repository.
pub const UNKNOWN_REPO: &str = "unknown-repo";

/// Rendered in place of a missing pull request number.
pub const NO_PR_LABEL: &str = "N/A";

/// Job names the relay knows about, in display priority order.
pub const KNOWN_JOBS: [&str; 2] = ["backend", "frontend"];

/// Literal job outcome that counts as a pass.
pub const JOB_SUCCESS: &str = "success";

/// A CI completion event, normalized from the webhook payload.
///
/// All fields are optional because the sending workflow is free to omit any
/// of them; fallbacks are applied by the accessor methods, never by failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// `owner/name`, or an already-bare name.
    pub repository_full_name: Option<String>,

    /// Workflow run id, kept opaque.
    pub run_id: Option<String>,

    /// Pull request number, kept opaque.
    pub pull_request_number: Option<String>,

    /// Reported outcome per job name (e.g. `backend` -> `success`).
    pub job_statuses: BTreeMap<String, String>,

    /// Raw CI log text, possibly carrying terminal escape sequences.
    pub raw_log: Option<String>,
}

impl InboundEvent {
    /// Short repository name, used both for the summary header and for
    /// the destination lookup.
    pub fn repo_short_name(&self) -> &str {
        repo_short_name(self.repository_full_name.as_deref())
    }

    /// PR number, or `N/A`.
    pub fn pr_label(&self) -> &str {
        self.pull_request_number.as_deref().unwrap_or(NO_PR_LABEL)
    }

    /// Link to the run's logs on GitHub Actions.
    ///
    /// A missing run id leaves the final path segment empty.
    pub fn run_url(&self) -> String {
        let repo = self
            .repository_full_name
            .as_deref()
            .unwrap_or(UNKNOWN_REPO);
        format!(
            "https://github.com/{}/actions/runs/{}",
            repo,
            self.run_id.as_deref().unwrap_or_default()
        )
    }

    /// Reported outcome of `job`, if any.
    pub fn job_status(&self, job: &str) -> Option<&str> {
        self.job_statuses.get(job).map(String::as_str)
    }

    /// True only when the backend job reported the success literal.
    pub fn backend_reported_success(&self) -> bool {
        self.job_status("backend") == Some(JOB_SUCCESS)
    }
}

/// Derive the repository short name from an optional full name.
///
/// Takes the text after the last `/`, the whole value when there is no `/`,
/// and [`UNKNOWN_REPO`] when the value is absent or empty.
pub fn repo_short_name(full_name: Option<&str>) -> &str {
    match full_name {
        Some(name) if !name.is_empty() => match name.rfind('/') {
            Some(idx) => &name[idx + 1..],
            None => name,
        },
        _ => UNKNOWN_REPO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_from_owner_path() {
        assert_eq!(repo_short_name(Some("octo/repoX")), "repoX");
    }

    #[test]
    fn test_short_name_bare() {
        assert_eq!(repo_short_name(Some("bareRepo")), "bareRepo");
    }

    #[test]
    fn test_short_name_absent() {
        assert_eq!(repo_short_name(None), UNKNOWN_REPO);
        assert_eq!(repo_short_name(Some("")), UNKNOWN_REPO);
    }

    #[test]
    fn test_short_name_uses_last_segment() {
        assert_eq!(repo_short_name(Some("org/group/tool")), "tool");
    }

    #[test]
    fn test_run_url_with_and_without_id() {
        let mut event = InboundEvent {
            repository_full_name: Some("octo/widget".to_string()),
            run_id: Some("42".to_string()),
            ..Default::default()
        };
        assert_eq!(
            event.run_url(),
            "https://github.com/octo/widget/actions/runs/42"
        );

        event.run_id = None;
        assert_eq!(event.run_url(), "https://github.com/octo/widget/actions/runs/");
    }

    #[test]
    fn test_pr_label_fallback() {
        let event = InboundEvent::default();
        assert_eq!(event.pr_label(), "N/A");
    }

    #[test]
    fn test_backend_success_requires_literal() {
        let mut event = InboundEvent::default();
        assert!(!event.backend_reported_success());

        event
            .job_statuses
            .insert("backend".to_string(), "Success".to_string());
        assert!(!event.backend_reported_success());

        event
            .job_statuses
            .insert("backend".to_string(), "success".to_string());
        assert!(event.backend_reported_success());
    }
}

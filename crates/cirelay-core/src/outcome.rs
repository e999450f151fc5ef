//! Job status aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::{JOB_SUCCESS, KNOWN_JOBS};

pub const SUCCESS_ICON: &str = "✅";
pub const FAILURE_ICON: &str = "❌";

/// Line emitted when neither known job reported an outcome.
pub const NO_JOBS_LINE: &str = "No jobs reported";

/// Icon for a pass/fail flag.
pub fn status_icon(success: bool) -> &'static str {
    if success {
        SUCCESS_ICON
    } else {
        FAILURE_ICON
    }
}

/// Outcome of a single reported job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub name: String,
    pub success: bool,
}

impl JobOutcome {
    /// `Backend: ✅` style line.
    pub fn line(&self) -> String {
        format!("{}: {}", capitalize(&self.name), status_icon(self.success))
    }
}

/// Aggregated outcome of a run, computed from reported job statuses only.
///
/// This never looks at log text, so its icon may disagree with the one in
/// the log summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// True only if at least one job reported and every report is `success`.
    pub overall_success: bool,

    /// Reported jobs in priority order (backend before frontend).
    pub jobs: Vec<JobOutcome>,
}

impl RunOutcome {
    /// Aggregate the known jobs present in `statuses`.
    pub fn aggregate(statuses: &BTreeMap<String, String>) -> Self {
        let jobs: Vec<JobOutcome> = KNOWN_JOBS
            .iter()
            .filter_map(|job| {
                statuses.get(*job).map(|status| JobOutcome {
                    name: job.to_string(),
                    success: status == JOB_SUCCESS,
                })
            })
            .collect();

        let overall_success = !jobs.is_empty() && jobs.iter().all(|job| job.success);

        RunOutcome {
            overall_success,
            jobs,
        }
    }

    pub fn overall_icon(&self) -> &'static str {
        status_icon(self.overall_success)
    }

    /// One line per reported job, or the single "No jobs reported" line.
    pub fn job_lines(&self) -> Vec<String> {
        if self.jobs.is_empty() {
            return vec![NO_JOBS_LINE.to_string()];
        }
        self.jobs.iter().map(JobOutcome::line).collect()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_jobs_is_failure() {
        let outcome = RunOutcome::aggregate(&BTreeMap::new());
        assert!(!outcome.overall_success);
        assert_eq!(outcome.overall_icon(), FAILURE_ICON);
        assert_eq!(outcome.job_lines(), vec!["No jobs reported".to_string()]);
    }

    #[test]
    fn test_single_success() {
        let outcome = RunOutcome::aggregate(&statuses(&[("backend", "success")]));
        assert!(outcome.overall_success);
        assert_eq!(outcome.overall_icon(), SUCCESS_ICON);
        assert_eq!(outcome.job_lines(), vec!["Backend: ✅".to_string()]);
    }

    #[test]
    fn test_mixed_outcomes_in_priority_order() {
        let outcome = RunOutcome::aggregate(&statuses(&[
            ("frontend", "failure"),
            ("backend", "success"),
        ]));
        assert!(!outcome.overall_success);
        assert_eq!(
            outcome.job_lines(),
            vec!["Backend: ✅".to_string(), "Frontend: ❌".to_string()]
        );
    }

    #[test]
    fn test_unknown_jobs_ignored() {
        let outcome = RunOutcome::aggregate(&statuses(&[("docs", "success")]));
        assert!(!outcome.overall_success);
        assert_eq!(outcome.job_lines(), vec![NO_JOBS_LINE.to_string()]);
    }

    #[test]
    fn test_non_literal_status_fails() {
        let outcome = RunOutcome::aggregate(&statuses(&[("backend", "cancelled")]));
        assert!(!outcome.overall_success);
        assert_eq!(outcome.job_lines(), vec!["Backend: ❌".to_string()]);
    }
}

//! Per-step results and the aggregate verdict of a run.

use crate::error::CheckFailure;
use crate::step::Step;
use serde::{Deserialize, Serialize};

/// What happened to a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed(CheckFailure),
    /// Disabled in config, or not reached under fail-fast.
    Skipped,
}

/// Record of one step of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub step: Step,

    pub step_name: String,

    pub status: StepStatus,

    /// Exit code of the step's main command (-1 if it could not run).
    pub exit_code: Option<i32>,

    pub stdout: String,

    pub stderr: String,

    pub duration_ms: u64,
}

impl RunResult {
    pub fn passed(step: Step) -> Self {
        Self::with_status(step, StepStatus::Passed)
    }

    pub fn failed(step: Step, failure: CheckFailure) -> Self {
        Self::with_status(step, StepStatus::Failed(failure))
    }

    pub fn skipped(step: Step) -> Self {
        Self::with_status(step, StepStatus::Skipped)
    }

    fn with_status(step: Step, status: StepStatus) -> Self {
        Self {
            step,
            step_name: step.name().to_string(),
            status,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 0,
        }
    }

    /// Whether the step did not fail. Skipped steps count as succeeded.
    pub fn succeeded(&self) -> bool {
        !matches!(self.status, StepStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<&CheckFailure> {
        match &self.status {
            StepStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Which failure an aggregate [`Outcome`] reports when several steps fail.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReasonPolicy {
    /// The last failing step in execution order masks earlier ones.
    #[default]
    LastFailure,

    /// The first failing step is reported.
    FirstFailure,
}

/// Aggregate verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure { step: Step, reason: String },
}

impl Outcome {
    /// Fold ordered step results into a single verdict.
    ///
    /// A run succeeds only if no step failed; a later passing step never
    /// clears an earlier failure.
    pub fn from_results(results: &[RunResult], policy: ReasonPolicy) -> Self {
        let mut failures = results
            .iter()
            .filter_map(|r| r.failure().map(|failure| (r.step, failure)));

        let chosen = match policy {
            ReasonPolicy::FirstFailure => failures.next(),
            ReasonPolicy::LastFailure => failures.last(),
        };

        match chosen {
            Some((step, failure)) => Outcome::Failure {
                step,
                reason: failure.to_string(),
            },
            None => Outcome::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Text printed as the final summary line: `0` on success, otherwise
    /// the failing step and its message.
    pub fn reason(&self) -> String {
        match self {
            Outcome::Success => "0".to_string(),
            Outcome::Failure { step, reason } => format!("{step}: {reason}"),
        }
    }

    /// Process exit code for this verdict.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure { .. } => 1,
        }
    }
}

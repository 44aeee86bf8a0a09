//! Pre-commit pipeline orchestration.

use crate::config::HookConfig;
use crate::error::CheckFailure;
use crate::outcome::{Outcome, RunResult, StepStatus};
use crate::runner::{CommandExecutor, CommandOutput};
use crate::snapshot::Snapshot;
use crate::step::Step;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a complete pre-commit run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Unique ID of this run.
    pub run_id: String,

    pub started_at: DateTime<Utc>,

    /// Whether no step failed.
    pub success: bool,

    /// Aggregate verdict under the configured reason policy.
    pub outcome: Outcome,

    /// Results of individual steps, in execution order.
    pub results: Vec<RunResult>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Number of steps that passed.
    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Passed)
            .count()
    }

    /// Number of steps that failed.
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.succeeded()).count()
    }

    /// Number of steps that were not executed.
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .count()
    }

    /// Write this run as pretty-printed JSON.
    pub fn write_report(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Pre-commit pipeline orchestrator.
pub struct HookPipeline;

impl HookPipeline {
    /// Run format-drift-check, build, doc-build and test in that order.
    ///
    /// Unless `fail_fast` is set, every enabled step runs regardless of
    /// earlier failures. Snapshot files live until this function returns
    /// and are removed on every path out of it.
    pub async fn run(
        executor: Arc<dyn CommandExecutor>,
        config: &HookConfig,
    ) -> anyhow::Result<PipelineResult> {
        config.validate()?;

        let start = Instant::now();
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();

        info!(run_id = %run_id, workdir = %config.workdir.display(), "Starting pre-commit run");

        let mut snapshots: Vec<Snapshot> = Vec::with_capacity(2);
        let mut results: Vec<RunResult> = Vec::with_capacity(Step::ORDER.len());

        for step in Step::ORDER {
            let step_config = config.step(step);

            if !step_config.enabled {
                info!(step = %step, "Skipping disabled step");
                results.push(RunResult::skipped(step));
                continue;
            }

            if config.fail_fast && results.iter().any(|r| !r.succeeded()) {
                info!(step = %step, "Skipping step after earlier failure");
                results.push(RunResult::skipped(step));
                continue;
            }

            info!(step = %step, "Executing step");

            let result = match step {
                Step::FormatDriftCheck => {
                    format_drift_check(executor.as_ref(), config, &mut snapshots).await
                }
                _ => command_check(executor.as_ref(), config, step).await,
            };

            match result.failure() {
                Some(failure) => warn!(step = %step, reason = %failure, "Step failed"),
                None => info!(step = %step, duration_ms = result.duration_ms, "Step passed"),
            }

            results.push(result);
        }

        debug!(count = snapshots.len(), "Removing snapshot files");
        drop(snapshots);

        let outcome = Outcome::from_results(&results, config.reason_policy);
        let duration_ms = start.elapsed().as_millis() as u64;

        if outcome.is_success() {
            info!(run_id = %run_id, duration_ms, "Pre-commit run passed");
        } else {
            info!(run_id = %run_id, duration_ms, "Pre-commit run failed");
        }

        Ok(PipelineResult {
            run_id,
            started_at,
            success: outcome.is_success(),
            outcome,
            results,
            duration_ms,
        })
    }
}

/// Snapshot, format, snapshot again, compare.
///
/// Snapshots are handed to `keep` so they outlive this step.
async fn format_drift_check(
    executor: &dyn CommandExecutor,
    config: &HookConfig,
    keep: &mut Vec<Snapshot>,
) -> RunResult {
    let step = Step::FormatDriftCheck;

    let before = match Snapshot::capture(executor, &config.diff, &config.workdir).await {
        Ok(snapshot) => snapshot,
        Err(e) => return snapshot_failure(e),
    };
    let before_digest = before.digest().to_string();
    let before_index = keep.len();
    keep.push(before);

    let mut result = command_check(executor, config, step).await;
    if !result.succeeded() {
        return result;
    }

    let after = match Snapshot::capture(executor, &config.diff, &config.workdir).await {
        Ok(snapshot) => snapshot,
        Err(e) => return snapshot_failure(e),
    };
    debug!(before = %before_digest, after = %after.digest(), "Comparing snapshots");

    let drifted = keep[before_index].differs_from(&after);
    keep.push(after);

    match drifted {
        Ok(true) => result.status = StepStatus::Failed(CheckFailure::FormatDrift),
        Ok(false) => {}
        Err(e) => return snapshot_failure(e.into()),
    }
    result
}

fn snapshot_failure(error: anyhow::Error) -> RunResult {
    let mut result = RunResult::failed(
        Step::FormatDriftCheck,
        CheckFailure::Snapshot {
            detail: error.to_string(),
        },
    );
    result.stderr = error.to_string();
    result
}

/// Run a step's command and map a non-zero exit to the step's failure.
async fn command_check(
    executor: &dyn CommandExecutor,
    config: &HookConfig,
    step: Step,
) -> RunResult {
    let step_config = config.step(step);
    let start = Instant::now();

    let output = match executor.execute(step_config, &config.workdir).await {
        Ok(output) => output,
        // Spawn errors and timeouts count as a failed run of the step.
        Err(e) => CommandOutput {
            exit_code: -1,
            stdout: String::new(),
            stderr: e.to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            success: false,
        },
    };

    let mut result = if output.passed() {
        RunResult::passed(step)
    } else {
        RunResult::failed(step, step.failure(output.exit_code))
    };
    result.exit_code = Some(output.exit_code);
    result.stdout = output.stdout;
    result.stderr = output.stderr;
    result.duration_ms = output.duration_ms;
    result
}

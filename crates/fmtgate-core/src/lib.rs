//! fmtgate - drift-checked pre-commit runner
//!
//! Runs a project's formatter and fails if it touched files with
//! uncommitted edits, then runs the build, documentation build and test
//! suite:
//! - Captures `git diff` snapshots before and after formatting
//! - Executes each step as an external command
//! - Folds per-step results into a single verdict and exit code

pub mod config;
pub mod error;
pub mod fakes;
pub mod outcome;
pub mod pipeline;
pub mod runner;
pub mod snapshot;
pub mod step;
pub mod telemetry;

// Re-export key types
pub use config::{HookConfig, CONFIG_FILE_NAME};
pub use error::{CheckFailure, FmtgateError, Result};
pub use outcome::{Outcome, ReasonPolicy, RunResult, StepStatus};
pub use pipeline::{HookPipeline, PipelineResult};
pub use runner::{CommandExecutor, CommandOutput, ProcessExecutor};
pub use snapshot::Snapshot;
pub use step::{Step, StepConfig};
pub use telemetry::init_tracing;

//! fmtgate - drift-checked pre-commit runner
//!
//! Meant to be invoked from a git `pre-commit` hook with no arguments:
//!
//! 1. snapshot `git diff`, run `cargo fmt`, snapshot again; differing
//!    snapshots mean the formatter touched files with uncommitted edits
//! 2. `cargo build`
//! 3. `cargo doc`
//! 4. `cargo test`
//!
//! The last line on stdout is the failure reason (`0` on success) and the
//! exit code is non-zero if any step failed.

use anyhow::{Context, Result};
use clap::Parser;
use fmtgate_core::{
    HookConfig, HookPipeline, PipelineResult, ProcessExecutor, ReasonPolicy, StepStatus,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "fmtgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Format, build, document and test before committing", long_about = None)]
struct Cli {
    /// Working directory (default: current directory)
    #[arg(short = 'C', long, default_value = ".")]
    workdir: PathBuf,

    /// Config file (default: fmtgate.toml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after the first failing step
    #[arg(long)]
    fail_fast: bool,

    /// Report the first failing step instead of the last
    #[arg(long)]
    first_failure: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    fn hook_config(&self) -> Result<HookConfig> {
        let mut config = HookConfig::load(&self.workdir, self.config.as_deref())
            .context("Failed to load fmtgate configuration")?;
        if self.fail_fast {
            config.fail_fast = true;
        }
        if self.first_failure {
            config.reason_policy = ReasonPolicy::FirstFailure;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    fmtgate_core::init_tracing(cli.json, level);

    let config = cli.hook_config()?;
    let result = HookPipeline::run(Arc::new(ProcessExecutor), &config)
        .await
        .context("Pre-commit run failed to execute")?;

    if let Some(path) = &cli.report {
        write_report(&result, path)?;
    }

    print_summary(&result);

    Ok(ExitCode::from(result.outcome.exit_code() as u8))
}

fn write_report(result: &PipelineResult, path: &Path) -> Result<()> {
    result
        .write_report(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Wrote run report");
    Ok(())
}

/// Per-step lines followed by the reason line.
fn summary_lines(result: &PipelineResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.results.len() + 1);
    for step in &result.results {
        let line = match &step.status {
            StepStatus::Passed => format!("  ✓ {} ({}ms)", step.step_name, step.duration_ms),
            StepStatus::Failed(failure) => format!("  ✗ {}: {}", step.step_name, failure),
            StepStatus::Skipped => format!("  - {} (skipped)", step.step_name),
        };
        lines.push(line);
    }
    lines.push(result.outcome.reason());
    lines
}

fn print_summary(result: &PipelineResult) {
    for line in summary_lines(result) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmtgate_core::fakes::ScriptedExecutor;
    use fmtgate_core::{CheckFailure, Step};

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["fmtgate"]);
        assert_eq!(cli.workdir, PathBuf::from("."));
        assert!(cli.config.is_none());
        assert!(!cli.fail_fast);
        assert!(!cli.first_failure);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from([
            "fmtgate",
            "-C",
            workdir.as_str(),
            "--fail-fast",
            "--first-failure",
        ]);

        let config = cli.hook_config().unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.reason_policy, ReasonPolicy::FirstFailure);
        assert_eq!(config.workdir, dir.path());
    }

    #[test]
    fn test_cli_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hook.toml");
        std::fs::write(&path, "reason_policy = \"first_failure\"\n").unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let cli = Cli::parse_from(["fmtgate", "--config", path_arg.as_str()]);
        let config = cli.hook_config().unwrap();
        assert_eq!(config.reason_policy, ReasonPolicy::FirstFailure);
    }

    #[tokio::test]
    async fn test_summary_ends_with_zero_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let result = HookPipeline::run(
            Arc::new(ScriptedExecutor::new()),
            &HookConfig::new(dir.path()),
        )
        .await
        .unwrap();

        let lines = summary_lines(&result);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.last().map(String::as_str), Some("0"));
        assert_eq!(result.outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_summary_names_failure() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new().failing(Step::Test, 101);
        let result = HookPipeline::run(Arc::new(executor), &HookConfig::new(dir.path()))
            .await
            .unwrap();

        let lines = summary_lines(&result);
        let expected = format!("test: {}", CheckFailure::Test { exit_code: 101 });
        assert_eq!(lines.last(), Some(&expected));
        assert!(lines[3].starts_with("  ✗ test"));
        assert_eq!(result.outcome.exit_code(), 1);
    }
}

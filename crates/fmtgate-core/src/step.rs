//! Pipeline step definitions and command configuration.

use crate::error::CheckFailure;
use serde::{Deserialize, Serialize};

/// The fixed, ordered steps of a pre-commit run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// git diff, cargo fmt, git diff, compare
    FormatDriftCheck,

    /// cargo build
    Build,

    /// cargo doc
    DocBuild,

    /// cargo test
    Test,
}

impl Step {
    /// All steps in execution order.
    pub const ORDER: [Step; 4] = [Step::FormatDriftCheck, Step::Build, Step::DocBuild, Step::Test];

    /// Get the step name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Step::FormatDriftCheck => "format-drift-check",
            Step::Build => "build",
            Step::DocBuild => "doc-build",
            Step::Test => "test",
        }
    }

    /// Failure recorded when this step's command exits with `exit_code`.
    ///
    /// For the drift check the command in question is the formatter.
    pub fn failure(&self, exit_code: i32) -> CheckFailure {
        match self {
            Step::FormatDriftCheck => CheckFailure::Formatter { exit_code },
            Step::Build => CheckFailure::Build { exit_code },
            Step::DocBuild => CheckFailure::Doc { exit_code },
            Step::Test => CheckFailure::Test { exit_code },
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Default commands for each external collaborator.
pub(crate) fn default_command(program: &str, subcommand: &str) -> Vec<String> {
    vec![program.to_string(), subcommand.to_string()]
}

/// Configuration for one external command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepConfig {
    /// Human-readable name used in logs. Empty in a config file means the
    /// step's default name.
    #[serde(default)]
    pub name: String,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Timeout in seconds (0 = wait forever).
    #[serde(default)]
    pub timeout_secs: u64,

    /// Whether this step is enabled.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl StepConfig {
    /// Create a command configuration with no timeout.
    pub fn new(name: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            name: name.into(),
            command,
            timeout_secs: 0,
            enabled: true,
        }
    }

    /// Default configuration for a pipeline step.
    pub fn for_step(step: Step) -> Self {
        let command = match step {
            Step::FormatDriftCheck => default_command("cargo", "fmt"),
            Step::Build => default_command("cargo", "build"),
            Step::DocBuild => default_command("cargo", "doc"),
            Step::Test => default_command("cargo", "test"),
        };
        Self::new(step.name(), command)
    }

    /// Set a timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Disable this step.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        assert_eq!(Step::FormatDriftCheck.name(), "format-drift-check");
        assert_eq!(Step::Build.name(), "build");
        assert_eq!(Step::DocBuild.name(), "doc-build");
        assert_eq!(Step::Test.name(), "test");
    }

    #[test]
    fn test_step_order_is_fixed() {
        assert_eq!(
            Step::ORDER,
            [Step::FormatDriftCheck, Step::Build, Step::DocBuild, Step::Test]
        );
        assert!(Step::FormatDriftCheck < Step::Test);
    }

    #[test]
    fn test_step_failure_mapping() {
        assert_eq!(
            Step::FormatDriftCheck.failure(2),
            CheckFailure::Formatter { exit_code: 2 }
        );
        assert_eq!(Step::Build.failure(101), CheckFailure::Build { exit_code: 101 });
        assert_eq!(Step::DocBuild.failure(1), CheckFailure::Doc { exit_code: 1 });
        assert_eq!(Step::Test.failure(101), CheckFailure::Test { exit_code: 101 });
    }

    #[test]
    fn test_default_step_commands() {
        let fmt = StepConfig::for_step(Step::FormatDriftCheck);
        assert_eq!(fmt.command, vec!["cargo", "fmt"]);
        assert_eq!(fmt.timeout_secs, 0);
        assert!(fmt.enabled);

        let doc = StepConfig::for_step(Step::DocBuild);
        assert_eq!(doc.name, "doc-build");
        assert_eq!(doc.command, vec!["cargo", "doc"]);
    }

    #[test]
    fn test_step_config_builders() {
        let config = StepConfig::new("echo", vec!["echo".to_string()])
            .with_timeout(30)
            .disabled();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.enabled);
    }

    #[test]
    fn test_step_config_toml_without_name() {
        let config: StepConfig = toml::from_str("command = [\"make\"]").unwrap();
        assert!(config.name.is_empty());
        assert_eq!(config.command, vec!["make"]);
    }

    #[test]
    fn test_step_config_toml_defaults() {
        let config: StepConfig = toml::from_str(
            r#"
            name = "build"
            command = ["make"]
            "#,
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.timeout_secs, 0);
    }
}

//! Hook configuration.
//!
//! Every field has a default, so a missing `fmtgate.toml` yields the stock
//! `git diff` / `cargo fmt` / `cargo build` / `cargo doc` / `cargo test`
//! pipeline.

use crate::error::{FmtgateError, Result};
use crate::outcome::ReasonPolicy;
use crate::step::{default_command, Step, StepConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "fmtgate.toml";

/// Name of the diff command in logs and results.
pub const DIFF_NAME: &str = "snapshot";

/// Full configuration of a pre-commit run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HookConfig {
    /// Directory the commands run in.
    #[serde(skip)]
    pub workdir: PathBuf,

    /// Command whose stdout is the working-tree snapshot.
    pub diff: StepConfig,

    /// Formatter, run in place.
    pub format: StepConfig,

    pub build: StepConfig,

    pub doc: StepConfig,

    pub test: StepConfig,

    /// Stop running steps after the first failure.
    pub fail_fast: bool,

    /// Which failure the summary reports when several steps fail.
    pub reason_policy: ReasonPolicy,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            diff: StepConfig::new(DIFF_NAME, default_command("git", "diff")),
            format: StepConfig::for_step(Step::FormatDriftCheck),
            build: StepConfig::for_step(Step::Build),
            doc: StepConfig::for_step(Step::DocBuild),
            test: StepConfig::for_step(Step::Test),
            fail_fast: false,
            reason_policy: ReasonPolicy::default(),
        }
    }
}

impl HookConfig {
    /// Default configuration rooted at `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(source).map_err(|source| FmtgateError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.fill_default_names();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration for `workdir`.
    ///
    /// An explicit `path` must exist. Without one, `<workdir>/fmtgate.toml`
    /// is used when present and defaults otherwise.
    pub fn load(workdir: &Path, path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = workdir.join(CONFIG_FILE_NAME);
                default.is_file().then_some(default)
            }
        };

        let mut config = match candidate {
            Some(path) => {
                let source =
                    std::fs::read_to_string(&path).map_err(|source| FmtgateError::ConfigRead {
                        path: path.clone(),
                        source,
                    })?;
                Self::from_toml(&source, &path)?
            }
            None => Self::default(),
        };
        config.workdir = workdir.to_path_buf();
        Ok(config)
    }

    /// Command configuration for a pipeline step.
    pub fn step(&self, step: Step) -> &StepConfig {
        match step {
            Step::FormatDriftCheck => &self.format,
            Step::Build => &self.build,
            Step::DocBuild => &self.doc,
            Step::Test => &self.test,
        }
    }

    /// Give tables that omit `name` the default name of their command.
    fn fill_default_names(&mut self) {
        if self.diff.name.is_empty() {
            self.diff.name = DIFF_NAME.to_string();
        }
        for (config, step) in [
            (&mut self.format, Step::FormatDriftCheck),
            (&mut self.build, Step::Build),
            (&mut self.doc, Step::DocBuild),
            (&mut self.test, Step::Test),
        ] {
            if config.name.is_empty() {
                config.name = step.name().to_string();
            }
        }
    }

    /// Reject enabled commands with nothing to execute, and a disabled
    /// diff command: the drift check cannot run without snapshots.
    pub fn validate(&self) -> Result<()> {
        if !self.diff.enabled {
            return Err(FmtgateError::InvalidStep(format!(
                "{} cannot be disabled; disable the format step instead",
                self.diff.name
            )));
        }
        let commands =
            std::iter::once(&self.diff).chain(Step::ORDER.iter().map(|s| self.step(*s)));
        for config in commands {
            if config.enabled && config.command.is_empty() {
                return Err(FmtgateError::InvalidStep(format!(
                    "{} has an empty command",
                    config.name
                )));
            }
        }
        Ok(())
    }
}

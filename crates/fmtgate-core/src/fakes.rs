//! In-memory fakes for the command executor (testing only)
//!
//! `ScriptedExecutor` simulates a working tree as a string: the diff
//! command prints it, and the formatter may append to it. Every other
//! command exits with a scripted code.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::DIFF_NAME;
use crate::runner::{CommandExecutor, CommandOutput};
use crate::step::{Step, StepConfig};

#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    tree: Mutex<String>,
    formatter_edit: Option<String>,
    exit_codes: HashMap<String, i32>,
    spawn_errors: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    /// Every command succeeds and the formatter changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a tree with pending (uncommitted) changes.
    pub fn with_pending_changes(self, diff: &str) -> Self {
        *self.tree.lock().unwrap() = diff.to_string();
        self
    }

    /// Make the formatter append `edit` to the tree when it runs.
    pub fn formatter_edits(mut self, edit: &str) -> Self {
        self.formatter_edit = Some(edit.to_string());
        self
    }

    /// Make the command named `name` exit with `code`.
    pub fn exit_code(mut self, name: &str, code: i32) -> Self {
        self.exit_codes.insert(name.to_string(), code);
        self
    }

    /// Make `step`'s default command exit with `code`.
    pub fn failing(self, step: Step, code: i32) -> Self {
        self.exit_code(step.name(), code)
    }

    /// Make the command named `name` fail to spawn.
    pub fn spawn_error(mut self, name: &str) -> Self {
        self.spawn_errors.insert(name.to_string());
        self
    }

    /// Names of the commands executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, config: &StepConfig, _cwd: &Path) -> anyhow::Result<CommandOutput> {
        self.calls.lock().unwrap().push(config.name.clone());

        if self.spawn_errors.contains(&config.name) {
            anyhow::bail!("Failed to spawn command for step {}", config.name);
        }

        let mut stdout = String::new();
        if config.name == DIFF_NAME {
            stdout = self.tree.lock().unwrap().clone();
        } else if config.name == Step::FormatDriftCheck.name() {
            if let Some(edit) = &self.formatter_edit {
                self.tree.lock().unwrap().push_str(edit);
            }
        }

        let exit_code = self.exit_codes.get(&config.name).copied().unwrap_or(0);
        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr: String::new(),
            duration_ms: 0,
            success: exit_code == 0,
        })
    }
}

//! Working-tree snapshots used to detect formatter drift.
//!
//! A snapshot is the stdout of the diff command (`git diff` by default),
//! persisted to a transient file in the working directory. The file is
//! removed when the [`Snapshot`] is dropped, so every exit path of the
//! pipeline cleans up after itself.

use crate::runner::CommandExecutor;
use crate::step::StepConfig;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// File name prefix for snapshot files.
pub const SNAPSHOT_PREFIX: &str = ".fmtgate-snapshot-";

/// A captured diff of uncommitted changes.
#[derive(Debug)]
pub struct Snapshot {
    file: NamedTempFile,
    digest: String,
}

impl Snapshot {
    /// Run the diff command in `workdir` and persist its stdout.
    ///
    /// Fails if the diff command cannot be run or exits non-zero.
    pub async fn capture(
        executor: &dyn CommandExecutor,
        diff: &StepConfig,
        workdir: &Path,
    ) -> anyhow::Result<Self> {
        let output = executor.execute(diff, workdir).await?;
        if !output.passed() {
            anyhow::bail!(
                "`{}` exited with code {}: {}",
                diff.command.join(" "),
                output.exit_code,
                output.stderr.trim()
            );
        }

        let mut file = tempfile::Builder::new()
            .prefix(SNAPSHOT_PREFIX)
            .tempfile_in(workdir)?;
        file.write_all(output.stdout.as_bytes())?;
        file.flush()?;

        let digest = hex::encode(Sha256::digest(output.stdout.as_bytes()));
        debug!(path = %file.path().display(), digest = %digest, "Captured snapshot");

        Ok(Self { file, digest })
    }

    /// Path of the backing snapshot file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// SHA-256 of the captured diff text.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Read the captured diff text back from disk.
    pub fn contents(&self) -> std::io::Result<String> {
        std::fs::read_to_string(self.file.path())
    }

    /// Textual comparison of two snapshots.
    pub fn differs_from(&self, other: &Snapshot) -> std::io::Result<bool> {
        Ok(self.contents()? != other.contents()?)
    }
}

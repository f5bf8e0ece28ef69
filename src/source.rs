//! Fetching shards from the dataset hub into the scratch directory.

use crate::error::StageError;
use crate::exec::{self, ExecError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Read-only access to the remote dataset repository.
///
/// Injected so tests can stand in a local double; the production impl shells
/// out to the hub CLI.
pub trait ShardSource {
    /// Retrieve one named shard into `dest_dir`, preserving the filename.
    /// Single attempt; retry policy, if any, lives with the caller.
    fn fetch(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, StageError>;
}

/// Fetches via the hub CLI (`huggingface-cli download --repo-type dataset`).
pub struct HubSource {
    repo_id: String,
    bin: String,
}

impl HubSource {
    pub fn new(repo_id: &str, bin: &str) -> Self {
        Self {
            repo_id: repo_id.to_string(),
            bin: bin.to_string(),
        }
    }
}

impl ShardSource for HubSource {
    fn fetch(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, StageError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("download")
            .arg(&self.repo_id)
            .arg(filename)
            .args(["--repo-type", "dataset"])
            .arg("--local-dir")
            .arg(dest_dir);
        match exec::run_quiet(&mut cmd) {
            Ok(()) => {}
            Err(ExecError::Spawn(e)) => return Err(StageError::Io(e)),
            Err(err @ ExecError::Exit { .. }) => {
                return Err(StageError::Fetch {
                    filename: filename.to_string(),
                    reason: err.to_string(),
                })
            }
        }

        let local = dest_dir.join(filename);
        if !local.is_file() {
            return Err(StageError::Fetch {
                filename: filename.to_string(),
                reason: "hub CLI reported success but the file is missing".to_string(),
            });
        }
        Ok(local)
    }
}

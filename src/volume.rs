//! Destination volume access.
//!
//! The volume is an injected capability with `put`/`get` so tests can
//! simulate upload failures and corruption without spawning any process.
//! The production impl drives the Modal CLI.

use crate::error::StageError;
use crate::exec::{self, ExecError};
use std::path::Path;
use std::process::Command;

/// Durable destination store for staged shards.
pub trait VolumeStore {
    /// Pre-flight probe that the backing CLI is usable at all.
    fn check_available(&self) -> Result<(), StageError>;

    /// Copy `local` to `remote` on the volume. Overwrite is idempotent;
    /// success is process exit code 0.
    fn put(&self, local: &Path, remote: &str) -> Result<(), StageError>;

    /// Copy `remote` from the volume back to `local`. Success is exit code 0
    /// and a file present at `local`.
    fn get(&self, remote: &str, local: &Path) -> Result<(), StageError>;
}

/// Talks to a Modal volume through `modal volume put|get`.
pub struct ModalVolume {
    bin: String,
    volume: String,
}

impl ModalVolume {
    pub fn new(bin: &str, volume: &str) -> Self {
        Self {
            bin: bin.to_string(),
            volume: volume.to_string(),
        }
    }

    // Shards live at the volume root, addressed with a leading slash.
    fn remote_path(remote: &str) -> String {
        format!("/{remote}")
    }
}

impl VolumeStore for ModalVolume {
    fn check_available(&self) -> Result<(), StageError> {
        exec::run_quiet(Command::new(&self.bin).arg("--version")).map_err(|err| {
            StageError::CapabilityMissing {
                tool: self.bin.clone(),
                reason: err.to_string(),
            }
        })
    }

    fn put(&self, local: &Path, remote: &str) -> Result<(), StageError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["volume", "put", "--force"])
            .arg(&self.volume)
            .arg(local)
            .arg(Self::remote_path(remote));
        match exec::run_quiet(&mut cmd) {
            Ok(()) => Ok(()),
            Err(ExecError::Spawn(e)) => Err(StageError::Io(e)),
            Err(err @ ExecError::Exit { .. }) => Err(StageError::Upload {
                remote: remote.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn get(&self, remote: &str, local: &Path) -> Result<(), StageError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["volume", "get"])
            .arg(&self.volume)
            .arg(Self::remote_path(remote))
            .arg(local);
        match exec::run_quiet(&mut cmd) {
            Ok(()) => {}
            Err(ExecError::Spawn(e)) => return Err(StageError::Io(e)),
            Err(err @ ExecError::Exit { .. }) => {
                return Err(StageError::VerifyDownload {
                    remote: remote.to_string(),
                    reason: err.to_string(),
                })
            }
        }
        if !local.is_file() {
            return Err(StageError::VerifyDownload {
                remote: remote.to_string(),
                reason: "CLI reported success but no file was written".to_string(),
            });
        }
        Ok(())
    }
}

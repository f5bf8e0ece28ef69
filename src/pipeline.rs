//! The transfer-and-verify pipeline for one shard.
//!
//! Per job: fetch into scratch, digest, upload, re-download to a distinct
//! scratch path, compare digests, clean up. Each shard is all-or-nothing;
//! there is no mid-file resume.

use crate::digest;
use crate::error::StageError;
use crate::job::ShardJob;
use crate::preview;
use crate::retry::{self, RetryPolicy};
use crate::source::ShardSource;
use crate::volume::VolumeStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Removes the fetched shard when dropped, success or failure. Failed jobs
/// surface their detail through the recorded result rather than through
/// leftover files.
struct FetchedGuard {
    path: PathBuf,
}

impl Drop for FetchedGuard {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), "could not remove fetched shard: {}", e);
            }
        }
    }
}

/// Upload `local` to the volume as `remote_name` and, when `expected_digest`
/// is given, pull it back and compare digests.
///
/// `None` for `expected_digest` is the best-effort path: the upload is
/// trusted as-is. The re-downloaded copy is deleted unconditionally once its
/// digest is taken; the local source file is never deleted here, and a
/// mismatched remote copy is left in place, untrusted.
pub fn upload_and_verify(
    volume: &dyn VolumeStore,
    local: &Path,
    remote_name: &str,
    expected_digest: Option<&str>,
    scratch: &Path,
    policy: &RetryPolicy,
) -> Result<(), StageError> {
    retry::run_with_retry(policy, || volume.put(local, remote_name))?;

    let Some(expected) = expected_digest else {
        tracing::debug!(shard = remote_name, "upload not verified (skip requested)");
        return Ok(());
    };

    println!("Verifying upload...");
    let verify_path = scratch.join(format!("verify_{remote_name}"));
    retry::run_with_retry(policy, || volume.get(remote_name, &verify_path))?;

    let round_trip = digest::sha256_path(&verify_path);
    if let Err(e) = fs::remove_file(&verify_path) {
        tracing::warn!(path = %verify_path.display(), "could not remove verification copy: {}", e);
    }
    let round_trip = round_trip?;

    if round_trip == expected {
        println!("  Digest verification passed: {}...", digest::short(expected));
        Ok(())
    } else {
        Err(StageError::DigestMismatch {
            remote: remote_name.to_string(),
            local_prefix: digest::short(expected).to_string(),
            remote_prefix: digest::short(&round_trip).to_string(),
        })
    }
}

/// Run the full pipeline for one job. The fetched file is removed before
/// returning, whatever the outcome.
pub fn stage_one(
    job: &ShardJob,
    source: &dyn ShardSource,
    volume: &dyn VolumeStore,
    scratch: &Path,
    verify: bool,
    policy: &RetryPolicy,
) -> Result<(), StageError> {
    let local = retry::run_with_retry(policy, || source.fetch(&job.filename, scratch))?;
    println!("Downloaded {} to {}", job.filename, local.display());
    let _guard = FetchedGuard {
        path: local.clone(),
    };

    match preview::peek(&local, 10) {
        Ok(p) => {
            println!("  First tokens: {:?}", p.tokens);
            println!("  File size: {:.1} MiB", p.size_mib());
        }
        Err(e) => tracing::debug!("no preview for {}: {}", local.display(), e),
    }

    let expected = if verify {
        let d = digest::sha256_path(&local)?;
        println!("  Local digest: {}...", digest::short(&d));
        Some(d)
    } else {
        None
    };

    upload_and_verify(
        volume,
        &local,
        &job.filename,
        expected.as_deref(),
        scratch,
        policy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// File-backed volume double: `put` copies into a directory, `get` copies
    /// back out, optionally failing or corrupting on the way.
    struct StubVolume {
        dir: PathBuf,
        fail_put: bool,
        corrupt: bool,
        puts: Cell<u32>,
        gets: Cell<u32>,
    }

    impl StubVolume {
        fn new(dir: &Path) -> Self {
            Self {
                dir: dir.to_path_buf(),
                fail_put: false,
                corrupt: false,
                puts: Cell::new(0),
                gets: Cell::new(0),
            }
        }
    }

    impl VolumeStore for StubVolume {
        fn check_available(&self) -> Result<(), StageError> {
            Ok(())
        }

        fn put(&self, local: &Path, remote: &str) -> Result<(), StageError> {
            self.puts.set(self.puts.get() + 1);
            if self.fail_put {
                return Err(StageError::Upload {
                    remote: remote.to_string(),
                    reason: "exit code 1: quota exceeded".to_string(),
                });
            }
            fs::copy(local, self.dir.join(remote))?;
            Ok(())
        }

        fn get(&self, remote: &str, local: &Path) -> Result<(), StageError> {
            self.gets.set(self.gets.get() + 1);
            if self.corrupt {
                fs::write(local, b"corrupted bytes")?;
            } else {
                fs::copy(self.dir.join(remote), local)?;
            }
            Ok(())
        }
    }

    fn setup() -> (tempfile::TempDir, tempfile::TempDir, PathBuf, String) {
        let scratch = tempfile::tempdir().unwrap();
        let remote = tempfile::tempdir().unwrap();
        let local = scratch.path().join("shard.bin");
        fs::write(&local, b"shard contents").unwrap();
        let expected = digest::sha256_path(&local).unwrap();
        (scratch, remote, local, expected)
    }

    #[test]
    fn matching_round_trip_succeeds_and_keeps_local_file() {
        let (scratch, remote, local, expected) = setup();
        let vol = StubVolume::new(remote.path());
        let policy = RetryPolicy::single_attempt();
        upload_and_verify(
            &vol,
            &local,
            "shard.bin",
            Some(&expected),
            scratch.path(),
            &policy,
        )
        .unwrap();
        assert!(local.exists(), "local source must not be deleted here");
        assert!(!scratch.path().join("verify_shard.bin").exists());
    }

    #[test]
    fn put_failure_never_invokes_get() {
        let (scratch, remote, local, expected) = setup();
        let mut vol = StubVolume::new(remote.path());
        vol.fail_put = true;
        let policy = RetryPolicy::single_attempt();
        let err = upload_and_verify(
            &vol,
            &local,
            "shard.bin",
            Some(&expected),
            scratch.path(),
            &policy,
        )
        .unwrap_err();
        assert!(matches!(err, StageError::Upload { .. }));
        assert_eq!(vol.gets.get(), 0, "no wasted round trip after put failure");
    }

    #[test]
    fn corrupted_remote_fails_verification_and_keeps_local_file() {
        let (scratch, remote, local, expected) = setup();
        let mut vol = StubVolume::new(remote.path());
        vol.corrupt = true;
        let policy = RetryPolicy::single_attempt();
        let err = upload_and_verify(
            &vol,
            &local,
            "shard.bin",
            Some(&expected),
            scratch.path(),
            &policy,
        )
        .unwrap_err();
        match err {
            StageError::DigestMismatch { local_prefix, .. } => {
                assert_eq!(local_prefix, digest::short(&expected));
            }
            other => panic!("expected DigestMismatch, got {:?}", other),
        }
        assert!(local.exists(), "deletion policy lives with the orchestrator");
        assert!(
            !scratch.path().join("verify_shard.bin").exists(),
            "verification copy is removed win or lose"
        );
    }

    #[test]
    fn skip_verification_returns_after_put() {
        let (scratch, remote, local, _) = setup();
        let vol = StubVolume::new(remote.path());
        let policy = RetryPolicy::single_attempt();
        upload_and_verify(&vol, &local, "shard.bin", None, scratch.path(), &policy).unwrap();
        assert_eq!(vol.puts.get(), 1);
        assert_eq!(vol.gets.get(), 0);
    }

    #[test]
    fn transient_put_failure_is_retried_when_configured() {
        let (scratch, remote, local, _) = setup();
        let mut vol = StubVolume::new(remote.path());
        vol.fail_put = true;
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: std::time::Duration::ZERO,
            max_delay: std::time::Duration::ZERO,
        };
        let err =
            upload_and_verify(&vol, &local, "shard.bin", None, scratch.path(), &policy).unwrap_err();
        assert!(matches!(err, StageError::Upload { .. }));
        assert_eq!(vol.puts.get(), 3);
    }

    #[test]
    fn fetched_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetched.bin");
        fs::write(&path, b"x").unwrap();
        {
            let _guard = FetchedGuard { path: path.clone() };
        }
        assert!(!path.exists());
    }
}

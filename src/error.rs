//! Failure taxonomy for a staging run.
//!
//! Per-job variants are caught at the job boundary and recorded as a
//! `TransferResult`; only `CapabilityMissing` (and any failure on the
//! validation shard) aborts the whole run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    /// Destination CLI is not installed or not runnable. Checked pre-flight,
    /// before any transfer is attempted.
    #[error("{tool} CLI not available: {reason}")]
    CapabilityMissing { tool: String, reason: String },

    /// Source repository fetch failed: unknown shard name, network failure,
    /// or local write failure.
    #[error("fetch {filename}: {reason}")]
    Fetch { filename: String, reason: String },

    /// Destination volume rejected the upload.
    #[error("upload {remote}: {reason}")]
    Upload { remote: String, reason: String },

    /// Could not re-download the uploaded shard for verification.
    #[error("could not re-download {remote}: {reason}")]
    VerifyDownload { remote: String, reason: String },

    /// Round-trip digest does not match the local digest. The remote copy
    /// is left in place, untrusted.
    #[error("digest mismatch for {remote}: local {local_prefix}.., remote {remote_prefix}..")]
    DigestMismatch {
        remote: String,
        local_prefix: String,
        remote_prefix: String,
    },

    /// Local filesystem failure while reading a file for hashing.
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// Whether a configured retry policy may re-attempt this failure.
    /// Only external CLI transfers count as transient; a missing binary or a
    /// local IO problem will not get better on a second try.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Upload { .. } | Self::VerifyDownload { .. }
        )
    }
}

//! Shard job list and per-job results.
//!
//! Shard names must stay bit-exact: the training job on the other side of
//! the volume expects them verbatim.

use crate::error::StageError;

/// The validation shard's literal name.
pub const VALIDATION_SHARD: &str = "finewebedu_val_000000.bin";

/// Name of training shard `index` (1-based), zero-padded to six digits.
pub fn train_shard_name(index: u32) -> String {
    format!("finewebedu_train_{index:06}.bin")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardRole {
    Validation,
    Training,
}

/// One unit of work. Immutable once the job list is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardJob {
    pub filename: String,
    pub role: ShardRole,
    /// 1-based training shard index; `None` for the validation shard.
    pub index: Option<u32>,
}

impl ShardJob {
    pub fn validation() -> Self {
        Self {
            filename: VALIDATION_SHARD.to_string(),
            role: ShardRole::Validation,
            index: None,
        }
    }

    pub fn training(index: u32) -> Self {
        Self {
            filename: train_shard_name(index),
            role: ShardRole::Training,
            index: Some(index),
        }
    }
}

/// The fixed job list: one validation shard, then `chunks` training shards.
pub fn build_jobs(chunks: u32) -> Vec<ShardJob> {
    let mut jobs = Vec::with_capacity(chunks as usize + 1);
    jobs.push(ShardJob::validation());
    for i in 1..=chunks {
        jobs.push(ShardJob::training(i));
    }
    jobs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    FetchFailed,
    UploadFailed,
    VerifyFailed,
    /// Local IO or any other failure that is not one of the transfer stages.
    Error,
}

/// Produced once per job; consumed by the orchestrator's tally.
#[derive(Debug)]
pub struct TransferResult {
    pub job: ShardJob,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl TransferResult {
    /// Fold a pipeline result into a recorded outcome.
    pub fn record(job: ShardJob, res: Result<(), StageError>) -> Self {
        match res {
            Ok(()) => Self {
                job,
                outcome: Outcome::Success,
                detail: None,
            },
            Err(err) => {
                let outcome = match &err {
                    StageError::Fetch { .. } => Outcome::FetchFailed,
                    StageError::Upload { .. } => Outcome::UploadFailed,
                    StageError::VerifyDownload { .. } | StageError::DigestMismatch { .. } => {
                        Outcome::VerifyFailed
                    }
                    _ => Outcome::Error,
                };
                Self {
                    job,
                    outcome,
                    detail: Some(err.to_string()),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

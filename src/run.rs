//! Sequential orchestration of a staging run.
//!
//! One job fully completes or fails before the next begins. Each step shells
//! out to an external CLI and streams large files, so there is nothing to
//! gain from intra-job parallelism here.

use crate::error::StageError;
use crate::job::{self, ShardRole, TransferResult};
use crate::pipeline;
use crate::retry::RetryPolicy;
use crate::source::ShardSource;
use crate::volume::VolumeStore;

pub struct StageOptions {
    /// Number of training shards (the validation shard is always staged).
    pub chunks: u32,
    /// Pull each upload back and compare digests.
    pub verify: bool,
}

/// Tally of one run, folded over the job list.
#[derive(Debug)]
pub struct RunReport {
    /// Successful transfers, validation shard included.
    pub successful: u32,
    /// Failed training transfers.
    pub failed: u32,
    /// False when the validation shard failed and the run was aborted
    /// before any training shard.
    pub validation_ok: bool,
    pub results: Vec<TransferResult>,
}

impl RunReport {
    pub fn is_failure(&self) -> bool {
        !self.validation_ok || self.failed > 0
    }
}

/// Stage the whole shard list: pre-flight check, then one job at a time,
/// strictly in order. Per-job errors become recorded results; only a missing
/// destination CLI or a validation-shard failure stops the run.
///
/// The scratch directory lives exactly as long as this call and is removed
/// recursively on every exit path.
pub fn run_stage(
    source: &dyn ShardSource,
    volume: &dyn VolumeStore,
    opts: &StageOptions,
    policy: &RetryPolicy,
) -> Result<RunReport, StageError> {
    volume.check_available()?;

    let scratch = tempfile::tempdir()?;
    println!("Using scratch directory: {}", scratch.path().display());
    tracing::info!(path = %scratch.path().display(), chunks = opts.chunks, verify = opts.verify, "staging run started");

    let mut report = RunReport {
        successful: 0,
        failed: 0,
        validation_ok: true,
        results: Vec::new(),
    };

    for shard_job in job::build_jobs(opts.chunks) {
        println!("\n--- Processing {} ---", shard_job.filename);
        let outcome = pipeline::stage_one(
            &shard_job,
            source,
            volume,
            scratch.path(),
            opts.verify,
            policy,
        );
        let result = TransferResult::record(shard_job, outcome);

        if result.is_success() {
            println!("Uploaded {}", result.job.filename);
            report.successful += 1;
        } else {
            let detail = result.detail.as_deref().unwrap_or("unknown error");
            println!("Failed to process {}: {}", result.job.filename, detail);
            tracing::warn!(shard = %result.job.filename, outcome = ?result.outcome, "transfer failed");
            match result.job.role {
                // Training shards are meaningless without the validation
                // shard, so its failure ends the run here.
                ShardRole::Validation => {
                    report.validation_ok = false;
                    report.results.push(result);
                    break;
                }
                ShardRole::Training => report.failed += 1,
            }
        }
        report.results.push(result);
    }

    println!("\n=== Summary ===");
    println!("Successfully uploaded: {} files", report.successful);
    println!("Failed uploads: {}", report.failed);
    if !report.validation_ok {
        println!("Validation shard failed; no training shard was attempted.");
    }
    tracing::info!(
        successful = report.successful,
        failed = report.failed,
        validation_ok = report.validation_ok,
        "staging run finished"
    );
    Ok(report)
}

//! Command-line surface for a staging run.

use anyhow::Result;
use clap::Parser;

use crate::config;
use crate::retry::RetryPolicy;
use crate::run::{self, RunReport, StageOptions};
use crate::source::HubSource;
use crate::volume::ModalVolume;

/// Stage dataset shards from the hub into a training volume, verifying each
/// transfer with a round-trip SHA-256 comparison.
#[derive(Debug, Parser)]
#[command(name = "shardstage")]
#[command(about = "Stage dataset shards into a training volume", long_about = None)]
pub struct Cli {
    /// Skip digest verification (faster but less safe).
    #[arg(long)]
    pub skip_verification: bool,

    /// Destination volume name.
    #[arg(long, default_value = "fineweb-volume")]
    pub volume: String,

    /// Number of training shards to stage.
    #[arg(long, default_value_t = 8)]
    pub chunks: u32,
}

/// Parse arguments, load config, and run the staging pipeline.
/// The caller turns the report into a process exit code.
pub fn run_from_args() -> Result<RunReport> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    if cli.skip_verification {
        println!("Digest verification is DISABLED - uploads will not be verified");
    }

    let source = HubSource::new(&cfg.dataset_repo, &cfg.hub_bin);
    let volume = ModalVolume::new(&cfg.volume_bin, &cli.volume);
    let policy = RetryPolicy::from_config(cfg.retry.as_ref());
    let opts = StageOptions {
        chunks: cli.chunks,
        verify: !cli.skip_verification,
    };

    let report = run::run_stage(&source, &volume, &opts, &policy)?;
    Ok(report)
}

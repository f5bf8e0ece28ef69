//! Global configuration loaded from `~/.config/shardstage/config.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Retry parameters (optional `[retry]` section in config.toml).
///
/// Absent means a single attempt per external call, matching the historical
/// behavior of the staging script this tool replaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per external call (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Dataset repository the shards are fetched from.
    pub dataset_repo: String,
    /// Hub CLI binary used to fetch shards.
    pub hub_bin: String,
    /// Volume CLI binary used for put/get against the destination volume.
    pub volume_bin: String,
    /// Optional retry policy for external CLI calls; absent = one attempt.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            dataset_repo: "kjj0/finewebedu10B-gpt2".to_string(),
            hub_bin: "huggingface-cli".to_string(),
            volume_bin: "modal".to_string(),
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shardstage")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<StageConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = StageConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: StageConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = StageConfig::default();
        assert_eq!(cfg.dataset_repo, "kjj0/finewebedu10B-gpt2");
        assert_eq!(cfg.hub_bin, "huggingface-cli");
        assert_eq!(cfg.volume_bin, "modal");
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = StageConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: StageConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.dataset_repo, cfg.dataset_repo);
        assert_eq!(parsed.hub_bin, cfg.hub_bin);
        assert_eq!(parsed.volume_bin, cfg.volume_bin);
        assert!(parsed.retry.is_none());
    }

    #[test]
    fn config_toml_with_retry_section() {
        let toml = r#"
            dataset_repo = "org/other-dataset"
            hub_bin = "hf"
            volume_bin = "modal"

            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: StageConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.dataset_repo, "org/other-dataset");
        assert_eq!(cfg.hub_bin, "hf");
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 3);
        assert!((retry.base_delay_secs - 0.5).abs() < 1e-9);
        assert_eq!(retry.max_delay_secs, 15);
    }
}

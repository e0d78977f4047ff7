use crate::error::{Result, StreamClusterError};
use crate::kmer::MAX_KMER_LENGTH;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Settings for one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// K-mer length; profiles have `4^kmer` dimensions.
    #[serde(default = "default_kmer")]
    pub kmer: usize,
    /// Number of clusters.
    #[serde(default = "default_nclust")]
    pub nclust: usize,
    /// Seeds are picked after skipping between `skip` and `2 * skip - 1` records.
    #[serde(default = "default_skip")]
    pub skip: usize,
    /// L1-normalize every k-mer profile.
    #[serde(default)]
    pub normalize: bool,
    /// Maximum number of sequences in flight between the reader and the aggregator.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Worker threads computing assignments.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Seed for the seed-sampling RNG. Drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_kmer() -> usize {
    3
}

fn default_nclust() -> usize {
    100
}

fn default_skip() -> usize {
    100
}

fn default_concurrency() -> usize {
    500
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kmer: default_kmer(),
            nclust: default_nclust(),
            skip: default_skip(),
            normalize: false,
            concurrency: default_concurrency(),
            threads: default_threads(),
            seed: None,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(StreamClusterError::InvalidConfig(msg));

        if self.kmer == 0 || self.kmer > MAX_KMER_LENGTH {
            return invalid(format!(
                "kmer must be between 1 and {}, got {}",
                MAX_KMER_LENGTH, self.kmer
            ));
        }
        if self.nclust == 0 {
            return invalid("nclust must be at least 1".to_string());
        }
        if self.skip == 0 {
            return invalid("skip must be at least 1".to_string());
        }
        if self.concurrency == 0 {
            return invalid("concurrency must be at least 1".to_string());
        }
        if self.threads == 0 {
            return invalid("threads must be at least 1".to_string());
        }
        Ok(())
    }

    /// Worker thread count actually used: never more than the concurrency bound.
    pub fn worker_threads(&self) -> usize {
        self.threads.min(self.concurrency).max(1)
    }
}

/// Contents of the user's `config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("org", "streamclust", "streamclust")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the config file, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::path() {
            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(&config_path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!(
                            path = %config_path.display(),
                            error = %e,
                            "ignoring unparseable config file"
                        ),
                    }
                }
            }
        }
        Config::default()
    }
}

use crate::clustering::ClusterOutcome;
use crate::config::ClusterConfig;
use serde::{Deserialize, Serialize};

/// Human-readable record of a run, written next to the gzip outputs.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool_version: String,
    pub input: String,
    pub parameters: ClusterParameters,
    pub statistics: ClusterStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterParameters {
    pub kmer: usize,
    pub nclust: usize,
    pub skip: usize,
    pub normalize: bool,
    pub concurrency: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterStatistics {
    pub sequences: usize,
    pub sequences_without_kmers: u64,
    pub empty_clusters: usize,
    pub cluster_sizes: Vec<u64>,
}

impl RunSummary {
    pub fn new(input: &str, config: &ClusterConfig, outcome: &ClusterOutcome) -> Self {
        RunSummary {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            input: input.to_string(),
            parameters: ClusterParameters {
                kmer: config.kmer,
                nclust: config.nclust,
                skip: config.skip,
                normalize: config.normalize,
                concurrency: config.concurrency,
                seed: config.seed,
            },
            statistics: ClusterStatistics {
                sequences: outcome.sequences(),
                sequences_without_kmers: outcome.stats.no_kmers,
                empty_clusters: outcome.sizes.iter().filter(|&&s| s == 0).count(),
                cluster_sizes: outcome.sizes.clone(),
            },
        }
    }
}

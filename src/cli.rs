use crate::config::ClusterConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide progress spinners
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster the sequences of a FASTA file with single-pass streaming k-means
    Cluster {
        /// Input FASTA file, plain or compressed
        fasta: PathBuf,

        /// Stem for output files (<stem>_clusters.json.gz, <stem>_centers.json.gz)
        #[arg(short = 'o', long = "stem")]
        stem: PathBuf,

        #[command(flatten)]
        options: ClusterOptions,
    },

    /// Generate a two-group synthetic FASTA file for testing
    Simulate {
        /// Stem for the output file (<outstem>.fasta.gz)
        outstem: PathBuf,
        /// Number of sequences to generate
        #[arg(long, default_value = "20")]
        nseq: usize,
        /// Length of each sequence
        #[arg(long, default_value = "1000")]
        slen: usize,
        /// Per-base mutation probability for the first group
        #[arg(long, default_value = "0")]
        p1: f64,
        /// Per-base mutation probability for the second group
        #[arg(long, default_value = "0")]
        p2: f64,
        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score cluster quality with global alignments of member sequences
    Check {
        /// FASTA file that was clustered
        fasta: PathBuf,
        /// Output stem used for the clustering run
        #[arg(short = 'o', long = "stem")]
        stem: PathBuf,
        /// Maximum number of sequence records to read
        #[arg(long, default_value = "10000")]
        readmax: usize,
        /// Maximum number of pairs scored within and between clusters
        #[arg(long, default_value = "11")]
        max_pairs: usize,
    },
}

/// Clustering flags. Anything left unset keeps the value from the config file,
/// or the built-in default.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ClusterOptions {
    /// K-mer length (default: 3)
    #[arg(long)]
    pub kmer: Option<usize>,
    /// Number of clusters (default: 100)
    #[arg(long)]
    pub nclust: Option<usize>,
    /// Skip between skip and 2*skip-1 sequences before each seed (default: 100)
    #[arg(long)]
    pub skip: Option<usize>,
    /// Normalize k-mer profiles to frequencies; `--normalize=false` turns off a
    /// config file setting
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub normalize: Option<bool>,
    /// Maximum sequences in flight at once (default: 500)
    #[arg(long)]
    pub concurrency: Option<usize>,
    /// Worker threads (default: available CPUs)
    #[arg(long)]
    pub threads: Option<usize>,
    /// RNG seed for seed selection
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ClusterOptions {
    pub fn apply(&self, config: &mut ClusterConfig) {
        if let Some(kmer) = self.kmer {
            config.kmer = kmer;
        }
        if let Some(nclust) = self.nclust {
            config.nclust = nclust;
        }
        if let Some(skip) = self.skip {
            config.skip = skip;
        }
        if let Some(normalize) = self.normalize {
            config.normalize = normalize;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

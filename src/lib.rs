pub mod cli;
pub mod clustering;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod kmer;
pub mod sequence_processor;
pub mod simulate;
pub mod utils;
pub mod validation;

// Re-export main API
pub use clustering::{ClusterOutcome, Orchestrator};
pub use config::ClusterConfig;
pub use error::{Result, StreamClusterError};
pub use kmer::{FeatureVector, KmerHasher};
pub use sequence_processor::{FastaFile, FastaStream, Sequence, SequenceSource};

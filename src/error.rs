use thiserror::Error;

/// Errors raised by the clustering library. The binary turns any of these into a
/// single fatal abort; nothing in the library exits the process.
#[derive(Error, Debug)]
pub enum StreamClusterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open compressed stream: {0}")]
    Decompression(#[from] niffler::Error),

    #[error("invalid FASTA at line {line}: sequence data before any '>' header")]
    InvalidFormat { line: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("stream ended after {found} of {requested} seed sequences")]
    InsufficientSeeds { found: usize, requested: usize },

    #[error("pipeline stage failed: {0}")]
    WorkerFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamClusterError>;

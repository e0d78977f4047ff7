pub mod core;
pub mod readers;

// Re-export commonly used items
pub use core::{ProcessingStats, Sequence};
pub use readers::{FastaFile, FastaStream, SequenceSource};

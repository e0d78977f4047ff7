mod fasta;

pub use fasta::{FastaFile, FastaStream, SequenceSource};

pub(crate) mod sequence;
pub(crate) mod stats;

pub use sequence::Sequence;
pub use stats::ProcessingStats;

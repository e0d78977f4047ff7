#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Sequences read from the stream and handed to the workers.
    pub processed: u64,
    /// Sequences that produced no complete k-mer window.
    pub no_kmers: u64,
    /// Results that could not be delivered to the aggregator.
    pub errors: u64,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.processed += other.processed;
        self.no_kmers += other.no_kmers;
        self.errors += other.errors;
    }
}

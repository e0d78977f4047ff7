use super::aggregator::{AggregatorOutput, CentroidAggregator};
use super::centroids::CentroidSet;
use super::seeds::SeedSampler;
use super::threading::{Assignment, AssignmentWorkerPool};
use crate::config::ClusterConfig;
use crate::error::{Result, StreamClusterError};
use crate::kmer::KmerHasher;
use crate::sequence_processor::core::ProcessingStats;
use crate::sequence_processor::readers::{FastaStream, SequenceSource};
use crossbeam_channel::bounded;
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tracing::info;

/// Everything a finished run hands to persistence.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    pub centroids: Vec<Vec<f64>>,
    pub sizes: Vec<u64>,
    /// Cluster of each sequence in input order. `None` only for a slot no result
    /// was delivered for.
    pub assignments: Vec<Option<usize>>,
    pub stats: ProcessingStats,
}

impl ClusterOutcome {
    pub fn sequences(&self) -> usize {
        self.assignments.len()
    }

    /// Plain label list, or `None` if any sequence is unassigned.
    pub fn labels(&self) -> Option<Vec<usize>> {
        self.assignments.iter().copied().collect()
    }
}

/// State of one clustering run: the hasher and the shared centroids seeded for it.
struct ClusterSession<'a> {
    config: &'a ClusterConfig,
    hasher: KmerHasher,
    centroids: Arc<CentroidSet>,
}

impl ClusterSession<'_> {
    fn cluster<S: SequenceSource>(
        &self,
        source: &S,
        progress: &ProgressBar,
    ) -> Result<ClusterOutcome> {
        let stream = source.open()?;

        progress.set_position(0);
        progress.set_message("Clustering...");

        let (results_tx, results_rx) = bounded::<Assignment>(0);
        let aggregator = CentroidAggregator::new(Arc::clone(&self.centroids), progress.clone());
        let aggregator_handle = thread::Builder::new()
            .name("aggregator".to_string())
            .spawn(move || aggregator.run(results_rx))?;

        let mut pool = AssignmentWorkerPool::new(
            self.hasher,
            Arc::clone(&self.centroids),
            &results_tx,
            self.config.concurrency,
            self.config.worker_threads(),
        )?;

        let produced = produce(stream, &mut pool);

        // Shutdown runs in this order even when reading failed: all workers
        // finish, then the result channel closes, then the aggregator drains.
        let pool_stats = pool.finish();
        drop(results_tx);
        let AggregatorOutput { sizes, table } = aggregator_handle.join().map_err(|_| {
            StreamClusterError::WorkerFailed("centroid aggregator panicked".to_string())
        })?;

        let read = produced?;
        let stats = pool_stats?;
        if stats.errors > 0 {
            return Err(StreamClusterError::WorkerFailed(format!(
                "{} assignments were not delivered to the aggregator",
                stats.errors
            )));
        }
        debug_assert_eq!(sizes.iter().sum::<u64>(), read);

        info!(
            sequences = read,
            clusters = sizes.len(),
            without_kmers = stats.no_kmers,
            "clustering finished"
        );

        Ok(ClusterOutcome {
            centroids: self.centroids.snapshot(),
            sizes,
            assignments: table.into_labels(),
            stats,
        })
    }
}

fn produce<R: BufRead>(stream: FastaStream<R>, pool: &mut AssignmentWorkerPool) -> Result<u64> {
    let mut read = 0;
    for record in stream {
        pool.submit(record?)?;
        read += 1;
    }
    Ok(read)
}

/// Runs streaming k-means: one pass to pick seeds, one pass to cluster.
pub struct Orchestrator {
    config: ClusterConfig,
}

impl Orchestrator {
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Runs with an RNG seeded from `config.seed`, or from entropy when unset.
    pub fn run<S: SequenceSource>(
        &self,
        source: &S,
        progress: &ProgressBar,
    ) -> Result<ClusterOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(source, &mut rng, progress)
    }

    pub fn run_with_rng<S, R>(
        &self,
        source: &S,
        rng: &mut R,
        progress: &ProgressBar,
    ) -> Result<ClusterOutcome>
    where
        S: SequenceSource,
        R: Rng + ?Sized,
    {
        let hasher = KmerHasher::new(self.config.kmer, self.config.normalize)?;
        let sampler = SeedSampler::new(hasher, self.config.skip)?;

        info!(
            kmer = self.config.kmer,
            nclust = self.config.nclust,
            skip = self.config.skip,
            normalize = self.config.normalize,
            "sampling seed centroids"
        );
        progress.set_message("Getting seeds...");
        let seeds = sampler.sample(source.open()?, self.config.nclust, rng, progress)?;

        let session = ClusterSession {
            config: &self.config,
            hasher,
            centroids: Arc::new(CentroidSet::from_seeds(seeds)?),
        };

        info!(
            concurrency = self.config.concurrency,
            threads = self.config.worker_threads(),
            "streaming sequences"
        );
        session.cluster(source, progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::io::Cursor;

    struct MemorySource(String);

    impl SequenceSource for MemorySource {
        type Reader = Cursor<Vec<u8>>;

        fn open(&self) -> Result<FastaStream<Self::Reader>> {
            Ok(FastaStream::new(Cursor::new(self.0.clone().into_bytes())))
        }
    }

    fn config(nclust: usize, skip: usize, concurrency: usize) -> ClusterConfig {
        ClusterConfig {
            kmer: 2,
            nclust,
            skip,
            normalize: false,
            concurrency,
            threads: 4,
            seed: None,
        }
    }

    #[test]
    fn test_two_obvious_groups() {
        let source = MemorySource(
            ">a0\nAAAAAAAAAA\n>c0\nCCCCCCCCCC\n>a1\nAAAAATAAAA\n>c1\nCCCCGCCCCC\n>a2\nAAAAAAAAAT\n"
                .to_string(),
        );
        let orchestrator = Orchestrator::new(config(2, 1, 3)).unwrap();
        let outcome = orchestrator
            .run_with_rng(&source, &mut StepRng::new(0, 0), &ProgressBar::hidden())
            .unwrap();

        assert_eq!(outcome.labels(), Some(vec![0, 1, 0, 1, 0]));
        assert_eq!(outcome.sizes, vec![3, 2]);
        assert_eq!(outcome.stats.processed, 5);
        assert!(outcome.centroids.iter().all(|c| c.len() == 16));
    }

    #[test]
    fn test_format_error_aborts_run() {
        let source = MemorySource("ACGT\n>a\nACGT\n".to_string());
        let orchestrator = Orchestrator::new(config(1, 1, 2)).unwrap();
        let err = orchestrator
            .run_with_rng(&source, &mut StepRng::new(0, 0), &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(err, StreamClusterError::InvalidFormat { line: 1 }));
    }

    #[test]
    fn test_insufficient_seeds() {
        let source = MemorySource(">a\nACGT\n".to_string());
        let orchestrator = Orchestrator::new(config(2, 1, 2)).unwrap();
        let err = orchestrator
            .run_with_rng(&source, &mut StepRng::new(0, 0), &ProgressBar::hidden())
            .unwrap_err();
        assert!(matches!(
            err,
            StreamClusterError::InsufficientSeeds {
                found: 1,
                requested: 2
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Orchestrator::new(config(0, 1, 1)).is_err());
    }
}

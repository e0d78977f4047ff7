use super::centroids::CentroidSet;
use crate::error::{Result, StreamClusterError};
use crate::kmer::{FeatureVector, KmerHasher};
use crate::sequence_processor::core::{ProcessingStats, Sequence};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use crossbeam_utils::sync::WaitGroup;
use std::sync::Arc;
use std::thread;
use tracing::warn;

/// Nearest-centroid decision for one sequence, produced by a worker and folded
/// by the aggregator.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub index: usize,
    pub cluster: usize,
    pub features: FeatureVector,
}

struct Job {
    sequence: Sequence,
    // Dropped once the assignment has been handed to the aggregator.
    _pending: WaitGroup,
}

/// Bounded fan-out stage of the clustering pipeline.
///
/// At most `concurrency` sequences are in flight at once: `submit` takes an
/// admission slot and blocks while none is free, and a worker returns the slot
/// after its result has been received by the aggregator. A [`WaitGroup`] counts
/// the sequences still in flight so `finish` can wait for all of them.
pub struct AssignmentWorkerPool {
    handles: Vec<thread::JoinHandle<ProcessingStats>>,
    jobs: Sender<Job>,
    admission: Sender<()>,
    pending: WaitGroup,
    submitted: u64,
}

impl AssignmentWorkerPool {
    pub fn new(
        hasher: KmerHasher,
        centroids: Arc<CentroidSet>,
        results: &Sender<Assignment>,
        concurrency: usize,
        num_threads: usize,
    ) -> Result<Self> {
        if concurrency == 0 || num_threads == 0 {
            return Err(StreamClusterError::InvalidConfig(
                "worker pool needs at least one thread and one admission slot".to_string(),
            ));
        }

        let (admission, slots) = bounded::<()>(concurrency);
        let (jobs, rx) = unbounded::<Job>();
        let mut handles = Vec::with_capacity(num_threads);

        for worker in 0..num_threads {
            let rx = rx.clone();
            let slots = slots.clone();
            let results = results.clone();
            let centroids = Arc::clone(&centroids);
            let handle = thread::Builder::new()
                .name(format!("assign-{}", worker))
                .spawn(move || run_worker(hasher, &centroids, rx, slots, results))?;
            handles.push(handle);
        }

        Ok(AssignmentWorkerPool {
            handles,
            jobs,
            admission,
            pending: WaitGroup::new(),
            submitted: 0,
        })
    }

    /// Hands a sequence to the workers, blocking while the pool is saturated.
    pub fn submit(&mut self, sequence: Sequence) -> Result<()> {
        self.admission.send(()).map_err(|_| {
            StreamClusterError::WorkerFailed("all assignment workers have stopped".to_string())
        })?;
        self.jobs
            .send(Job {
                sequence,
                _pending: self.pending.clone(),
            })
            .map_err(|_| {
                StreamClusterError::WorkerFailed("all assignment workers have stopped".to_string())
            })?;
        self.submitted += 1;
        Ok(())
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Waits until every submitted sequence has been assigned, then stops the
    /// workers. No worker holds a result sender once this returns.
    pub fn finish(self) -> Result<ProcessingStats> {
        let AssignmentWorkerPool {
            handles,
            jobs,
            admission,
            pending,
            submitted,
        } = self;

        pending.wait();
        drop(jobs);
        drop(admission);

        let mut stats = ProcessingStats::default();
        for handle in handles {
            let worker_stats = handle.join().map_err(|_| {
                StreamClusterError::WorkerFailed("assignment worker panicked".to_string())
            })?;
            stats.merge(&worker_stats);
        }

        debug_assert_eq!(stats.processed + stats.errors, submitted);
        Ok(stats)
    }
}

fn run_worker(
    hasher: KmerHasher,
    centroids: &CentroidSet,
    rx: Receiver<Job>,
    slots: Receiver<()>,
    results: Sender<Assignment>,
) -> ProcessingStats {
    let mut local_stats = ProcessingStats::default();

    while let Ok(job) = rx.recv() {
        let features = hasher.hash(&job.sequence.data);
        if features.is_zero() {
            warn!(
                index = job.sequence.index,
                id = %job.sequence.id,
                length = job.sequence.len(),
                "sequence has no complete k-mer window"
            );
            local_stats.no_kmers += 1;
        }

        let assignment = Assignment {
            index: job.sequence.index,
            cluster: centroids.nearest(&features),
            features,
        };
        if results.send(assignment).is_err() {
            local_stats.errors += 1;
        } else {
            local_stats.processed += 1;
        }

        drop(job);
        let _ = slots.recv();
    }

    local_stats
}

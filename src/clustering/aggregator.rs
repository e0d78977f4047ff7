use super::centroids::CentroidSet;
use super::threading::Assignment;
use crossbeam_channel::Receiver;
use indicatif::ProgressBar;
use std::sync::Arc;

/// Cluster label per sequence, indexed by arrival order.
///
/// Grows on demand. Slots below the highest index seen that have not been
/// written yet hold `None` rather than a cluster number.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssignmentTable {
    labels: Vec<Option<usize>>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, index: usize, cluster: usize) {
        if index >= self.labels.len() {
            self.labels.resize(index + 1, None);
        }
        self.labels[index] = Some(cluster);
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.labels.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of slots not yet written.
    pub fn unassigned(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<Option<usize>> {
        self.labels
    }
}

/// Final state handed back by the aggregator thread.
#[derive(Debug)]
pub struct AggregatorOutput {
    pub sizes: Vec<u64>,
    pub table: AssignmentTable,
}

/// Single writer of the cluster state: folds each assignment into its centroid,
/// bumps the cluster size and records the label.
pub struct CentroidAggregator {
    centroids: Arc<CentroidSet>,
    sizes: Vec<u64>,
    table: AssignmentTable,
    progress: ProgressBar,
}

impl CentroidAggregator {
    pub fn new(centroids: Arc<CentroidSet>, progress: ProgressBar) -> Self {
        let sizes = vec![0; centroids.len()];
        Self {
            centroids,
            sizes,
            table: AssignmentTable::new(),
            progress,
        }
    }

    pub fn fold(&mut self, assignment: Assignment) {
        let cluster = assignment.cluster;
        self.centroids
            .fold(cluster, &assignment.features, self.sizes[cluster]);
        self.sizes[cluster] += 1;
        self.table.record(assignment.index, cluster);
        self.progress.inc(1);
    }

    /// Drains `results` until every sender is gone.
    pub fn run(mut self, results: Receiver<Assignment>) -> AggregatorOutput {
        for assignment in results.iter() {
            self.fold(assignment);
        }
        self.into_output()
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn table(&self) -> &AssignmentTable {
        &self.table
    }

    pub fn into_output(self) -> AggregatorOutput {
        AggregatorOutput {
            sizes: self.sizes,
            table: self.table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::FeatureVector;
    use crossbeam_channel::unbounded;

    fn aggregator() -> CentroidAggregator {
        let seeds = vec![
            FeatureVector::from(vec![0.0, 0.0]),
            FeatureVector::from(vec![10.0, 10.0]),
        ];
        let centroids = Arc::new(CentroidSet::from_seeds(seeds).unwrap());
        CentroidAggregator::new(centroids, ProgressBar::hidden())
    }

    fn assignment(index: usize, cluster: usize, features: Vec<f64>) -> Assignment {
        Assignment {
            index,
            cluster,
            features: FeatureVector::from(features),
        }
    }

    #[test]
    fn test_out_of_order_indices_leave_unassigned_gaps() {
        let mut agg = aggregator();
        agg.fold(assignment(3, 1, vec![10.0, 10.0]));

        assert_eq!(agg.table().len(), 4);
        assert_eq!(agg.table().unassigned(), 3);
        assert_eq!(agg.table().get(0), None);
        assert_eq!(agg.table().get(3), Some(1));

        agg.fold(assignment(0, 0, vec![0.0, 0.0]));
        assert_eq!(agg.table().get(0), Some(0));
        assert_eq!(agg.table().unassigned(), 2);
    }

    #[test]
    fn test_first_member_replaces_seed() {
        let mut agg = aggregator();
        agg.fold(assignment(0, 1, vec![4.0, 6.0]));
        agg.fold(assignment(1, 1, vec![8.0, 2.0]));

        assert_eq!(agg.sizes(), &[0, 2]);
        assert_eq!(agg.centroids.snapshot()[1], vec![6.0, 4.0]);
        assert_eq!(agg.centroids.snapshot()[0], vec![0.0, 0.0]);
    }

    #[test]
    fn test_run_drains_channel() {
        let agg = aggregator();
        let (tx, rx) = unbounded();
        for index in 0..5 {
            tx.send(assignment(index, index % 2, vec![1.0, 1.0])).unwrap();
        }
        drop(tx);

        let output = agg.run(rx);
        assert_eq!(output.sizes.iter().sum::<u64>(), 5);
        assert_eq!(output.sizes, vec![3, 2]);
        assert_eq!(output.table.unassigned(), 0);
        assert_eq!(output.table.len(), 5);
    }
}

use crate::error::{Result, StreamClusterError};
use crate::kmer::FeatureVector;
use parking_lot::RwLock;

pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Cluster centres shared between the assignment workers and the aggregator.
///
/// Each centroid sits behind its own read/write lock. A distance is always
/// computed against a consistent copy of one centroid, but two centroids read by
/// the same worker may straddle an aggregator update. Only the aggregator calls
/// [`CentroidSet::fold`].
#[derive(Debug)]
pub struct CentroidSet {
    centroids: Vec<RwLock<Vec<f64>>>,
    dimension: usize,
}

impl CentroidSet {
    pub fn from_seeds(seeds: Vec<FeatureVector>) -> Result<Self> {
        let dimension = match seeds.first() {
            Some(seed) => seed.len(),
            None => {
                return Err(StreamClusterError::InvalidConfig(
                    "at least one seed centroid is required".to_string(),
                ))
            }
        };
        if seeds.iter().any(|seed| seed.len() != dimension) {
            return Err(StreamClusterError::InvalidConfig(
                "seed centroids differ in dimension".to_string(),
            ));
        }

        Ok(Self {
            centroids: seeds
                .into_iter()
                .map(|seed| RwLock::new(seed.into_inner()))
                .collect(),
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn distance(&self, cluster: usize, features: &FeatureVector) -> f64 {
        let centroid = self.centroids[cluster].read();
        squared_distance(features.as_slice(), &centroid)
    }

    /// Index of the closest centroid. Ties go to the lowest index.
    pub fn nearest(&self, features: &FeatureVector) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for cluster in 0..self.len() {
            let distance = self.distance(cluster, features);
            if distance < best_distance {
                best = cluster;
                best_distance = distance;
            }
        }
        best
    }

    /// Moves centroid `cluster` to the mean of its `size` previous members and `features`.
    pub(crate) fn fold(&self, cluster: usize, features: &FeatureVector, size: u64) {
        debug_assert_eq!(features.len(), self.dimension);
        let n = size as f64;
        let mut centroid = self.centroids[cluster].write();
        for (c, &f) in centroid.iter_mut().zip(features.as_slice()) {
            *c = (*c * n + f) / (n + 1.0);
        }
    }

    pub fn snapshot(&self) -> Vec<Vec<f64>> {
        self.centroids.iter().map(|c| c.read().clone()).collect()
    }
}

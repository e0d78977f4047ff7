pub mod aggregator;
pub mod centroids;
pub mod orchestrator;
pub mod seeds;
pub mod threading;

// Re-export commonly used items
pub use aggregator::{AggregatorOutput, AssignmentTable, CentroidAggregator};
pub use centroids::{squared_distance, CentroidSet};
pub use orchestrator::{ClusterOutcome, Orchestrator};
pub use seeds::SeedSampler;
pub use threading::{Assignment, AssignmentWorkerPool};

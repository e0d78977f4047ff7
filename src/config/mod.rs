mod config;

pub use config::{ClusterConfig, Config};

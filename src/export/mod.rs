pub mod formats;

use crate::clustering::ClusterOutcome;
use crate::config::ClusterConfig;
use crate::error::Result;
use crate::export::formats::summary::RunSummary;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Files produced by one clustering run, all sharing an output stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub clusters: PathBuf,
    pub centers: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    pub fn from_stem(stem: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut name = stem.as_os_str().to_owned();
            name.push(suffix);
            PathBuf::from(name)
        };
        OutputPaths {
            clusters: with_suffix("_clusters.json.gz"),
            centers: with_suffix("_centers.json.gz"),
            summary: with_suffix("_summary.json"),
        }
    }
}

/// Writes `value` as gzip-compressed JSON.
pub fn write_json_gz<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::new(6));
    serde_json::to_writer(&mut encoder, value)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    Ok(())
}

/// Reads JSON from a plain or compressed file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let (reader, _compression) = niffler::get_reader(Box::new(file))?;
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Persists assignments, centroids and a run summary under `stem`.
pub fn write_outcome(
    stem: &Path,
    input: &str,
    config: &ClusterConfig,
    outcome: &ClusterOutcome,
) -> Result<OutputPaths> {
    let paths = OutputPaths::from_stem(stem);

    write_json_gz(&paths.clusters, &outcome.assignments)?;
    write_json_gz(&paths.centers, &outcome.centroids)?;

    let summary = RunSummary::new(input, config, outcome);
    let mut writer = BufWriter::new(File::create(&paths.summary)?);
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writer.flush()?;

    Ok(paths)
}

/// Loads a cluster assignment list written by [`write_outcome`].
pub fn load_assignments(path: &Path) -> Result<Vec<Option<usize>>> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::core::ProcessingStats;

    #[test]
    fn test_output_paths_append_suffixes() {
        let paths = OutputPaths::from_stem(Path::new("/tmp/run1"));
        assert_eq!(paths.clusters, PathBuf::from("/tmp/run1_clusters.json.gz"));
        assert_eq!(paths.centers, PathBuf::from("/tmp/run1_centers.json.gz"));
        assert_eq!(paths.summary, PathBuf::from("/tmp/run1_summary.json"));
    }

    fn small_outcome() -> ClusterOutcome {
        ClusterOutcome {
            centroids: vec![vec![0.5, 0.5], vec![1.0, 0.0]],
            sizes: vec![2, 1],
            assignments: vec![Some(0), Some(1), Some(0)],
            stats: ProcessingStats {
                processed: 3,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_outcome_written_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("out");
        let outcome = small_outcome();

        let paths = write_outcome(&stem, "in.fa", &ClusterConfig::default(), &outcome).unwrap();

        assert_eq!(load_assignments(&paths.clusters).unwrap(), outcome.assignments);
        let centers: Vec<Vec<f64>> = read_json(&paths.centers).unwrap();
        assert_eq!(centers, outcome.centroids);
        let summary: RunSummary = read_json(&paths.summary).unwrap();
        assert_eq!(summary.statistics.sequences, 3);
        assert_eq!(summary.statistics.cluster_sizes, vec![2, 1]);
        assert_eq!(summary.statistics.empty_clusters, 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_disk_fails_each_output() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        for target in ["_clusters.json.gz", "_centers.json.gz", "_summary.json"] {
            let dir = tempfile::tempdir().unwrap();
            let stem = dir.path().join("out");
            let mut name = stem.as_os_str().to_owned();
            name.push(target);
            std::os::unix::fs::symlink(full, PathBuf::from(name)).unwrap();

            let result = write_outcome(&stem, "in.fa", &ClusterConfig::default(), &small_outcome());
            assert!(result.is_err(), "write to full {} reported success", target);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_disk_fails_gzip_writer() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        assert!(write_json_gz(full, &vec![1u32, 2, 3]).is_err());
    }
}

use indicatif::ProgressBar;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use streamclust::export::{load_assignments, write_outcome};
use streamclust::simulate::{write_fasta_gz, SimulationConfig};
use streamclust::{ClusterConfig, ClusterOutcome, FastaFile, Orchestrator, StreamClusterError};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/alternating.fasta");
const FIXTURE_CLUSTERS: &str = "[0,1,0,1,0,1,0,1,0,1,0,1,0,1,0,1,0,1,0,1,1,1,1,1,1]";

fn config(kmer: usize, nclust: usize, skip: usize, concurrency: usize, threads: usize) -> ClusterConfig {
    ClusterConfig {
        kmer,
        nclust,
        skip,
        normalize: false,
        concurrency,
        threads,
        seed: Some(1),
    }
}

/// Two groups of ten length-1000 sequences, 1% per-base mutation within each group.
fn two_group_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("simdat.fasta.gz");
    let sim = SimulationConfig {
        nseq: 20,
        slen: 1000,
        p1: 0.01,
        p2: 0.01,
    };
    write_fasta_gz(&path, &sim, &mut StdRng::seed_from_u64(2016)).unwrap();
    path
}

// Skip of 6 with a zero-valued RNG seeds from records 5 and 11, one per group.
fn cluster_two_groups(path: &Path, concurrency: usize, threads: usize) -> ClusterOutcome {
    let orchestrator = Orchestrator::new(config(3, 2, 6, concurrency, threads)).unwrap();
    orchestrator
        .run_with_rng(&FastaFile::new(path), &mut StepRng::new(0, 0), &ProgressBar::hidden())
        .unwrap()
}

fn assert_run_invariants(outcome: &ClusterOutcome, kmer: usize, sequences: usize) {
    assert_eq!(outcome.sizes.iter().sum::<u64>(), sequences as u64);
    assert_eq!(outcome.stats.processed, sequences as u64);
    assert!(outcome.assignments.len() >= sequences);
    assert!(outcome.assignments.iter().all(Option::is_some));
    for centroid in &outcome.centroids {
        assert_eq!(centroid.len(), 4usize.pow(kmer as u32));
    }
}

#[test]
fn test_fixture_reproduces_expected_clusters() {
    let orchestrator = Orchestrator::new(config(3, 2, 1, 500, 4)).unwrap();
    let outcome = orchestrator
        .run(&FastaFile::new(FIXTURE), &ProgressBar::hidden())
        .unwrap();

    let expected: Vec<usize> = serde_json::from_str(FIXTURE_CLUSTERS).unwrap();
    assert_eq!(outcome.labels(), Some(expected));
    assert_eq!(outcome.sizes, vec![10, 15]);
    assert_run_invariants(&outcome, 3, 25);
}

#[test]
fn test_fixture_output_files_match_expected() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("test1");
    let orchestrator = Orchestrator::new(config(3, 2, 1, 500, 4)).unwrap();
    let outcome = orchestrator
        .run(&FastaFile::new(FIXTURE), &ProgressBar::hidden())
        .unwrap();

    let paths = write_outcome(&stem, FIXTURE, orchestrator.config(), &outcome).unwrap();

    let written = load_assignments(&paths.clusters).unwrap();
    let expected: Vec<Option<usize>> = serde_json::from_str(FIXTURE_CLUSTERS).unwrap();
    assert_eq!(written, expected);

    let centers: Vec<Vec<f64>> = streamclust::export::read_json(&paths.centers).unwrap();
    assert_eq!(centers.len(), 2);
    assert!(centers.iter().all(|c| c.len() == 64));
}

#[test]
fn test_synthetic_groups_separate() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_group_fixture(dir.path());

    let outcome = cluster_two_groups(&path, 500, 4);
    let labels = outcome.labels().unwrap();

    assert_run_invariants(&outcome, 3, 20);
    assert!(labels[..10].iter().all(|&l| l == labels[0]), "{:?}", labels);
    assert!(labels[10..].iter().all(|&l| l == labels[10]), "{:?}", labels);
    assert_ne!(labels[0], labels[10]);
    assert_eq!(outcome.sizes, vec![10, 10]);
}

#[test]
fn test_concurrency_bound_does_not_change_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_group_fixture(dir.path());

    let serial = cluster_two_groups(&path, 1, 1);
    let parallel = cluster_two_groups(&path, 500, 8);

    assert_eq!(serial.sizes, parallel.sizes);
    assert_eq!(serial.assignments, parallel.assignments);
}

#[test]
fn test_serial_run_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_group_fixture(dir.path());

    let first = cluster_two_groups(&path, 1, 1);
    let second = cluster_two_groups(&path, 1, 1);
    assert_eq!(first.centroids, second.centroids);
    assert_eq!(first.assignments, second.assignments);
}

#[test]
fn test_normalized_centroids_are_distributions() {
    let mut cfg = config(2, 3, 2, 16, 2);
    cfg.normalize = true;
    let outcome = Orchestrator::new(cfg)
        .unwrap()
        .run(&FastaFile::new(FIXTURE), &ProgressBar::hidden())
        .unwrap();

    assert_run_invariants(&outcome, 2, 25);
    for centroid in &outcome.centroids {
        let total: f64 = centroid.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "centroid sums to {}", total);
    }
}

#[test]
fn test_too_few_records_for_seeds() {
    // Jumps of exactly 20 records: one seed at record 19, then the file runs out.
    let orchestrator = Orchestrator::new(config(3, 2, 20, 10, 2)).unwrap();
    let err = orchestrator
        .run_with_rng(&FastaFile::new(FIXTURE), &mut StepRng::new(0, 0), &ProgressBar::hidden())
        .unwrap_err();
    assert!(matches!(err, StreamClusterError::InsufficientSeeds { found: 1, .. }));
}

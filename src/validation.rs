use crate::error::Result;
use crate::sequence_processor::readers::SequenceSource;
use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;
use indicatif::ProgressBar;
use std::collections::BTreeMap;

/// Linear gap penalty per aligned gap column.
pub const GAP_SCORE: i32 = -5;

/// Pairs scored per comparison class unless told otherwise.
pub const DEFAULT_MAX_PAIRS: usize = 11;

// Rows and columns in A, C, G, T order.
const SUBSTITUTION: [[i32; 4]; 4] = [
    [10, -3, -1, -4],
    [-3, 9, -5, 0],
    [-1, -5, 7, -3],
    [-4, 0, -3, 8],
];

fn matrix_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

pub fn substitution_score(a: u8, b: u8) -> i32 {
    match (matrix_index(a), matrix_index(b)) {
        (Some(i), Some(j)) => SUBSTITUTION[i][j],
        _ => GAP_SCORE,
    }
}

/// Fraction of columns in the global alignment of `x` and `y` that are not
/// exact matches (substitutions and gaps).
pub fn edit_fraction(x: &[u8], y: &[u8]) -> f64 {
    if x.is_empty() && y.is_empty() {
        return 0.0;
    }

    let mut aligner = Aligner::with_capacity(x.len(), y.len(), 0, GAP_SCORE, substitution_score);
    let alignment = aligner.global(x, y);

    let columns = alignment.operations.len();
    let edits = alignment
        .operations
        .iter()
        .filter(|op| !matches!(op, AlignmentOperation::Match))
        .count();
    edits as f64 / columns as f64
}

/// Edit fractions for sequence pairs sharing a cluster and pairs from different clusters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QualityReport {
    pub within: Vec<f64>,
    pub between: Vec<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl QualityReport {
    pub fn mean_within(&self) -> Option<f64> {
        mean(&self.within)
    }

    pub fn mean_between(&self) -> Option<f64> {
        mean(&self.between)
    }
}

/// Reads the bases of at most `limit` records from the start of `source`.
pub fn load_sequences<S: SequenceSource>(source: &S, limit: usize) -> Result<Vec<Vec<u8>>> {
    source
        .open()?
        .take(limit)
        .map(|record| record.map(|s| s.data))
        .collect()
}

/// Scores up to `max_pairs` within-cluster pairs and up to `max_pairs`
/// between-cluster pairs. Between clusters, the first member of each cluster
/// stands in for it. Sequences past the end of `sequences` are ignored.
pub fn assess(
    sequences: &[Vec<u8>],
    assignments: &[Option<usize>],
    max_pairs: usize,
    progress: &ProgressBar,
) -> QualityReport {
    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, cluster) in assignments.iter().enumerate().take(sequences.len()) {
        if let Some(cluster) = cluster {
            members.entry(*cluster).or_default().push(index);
        }
    }

    let mut report = QualityReport::default();

    progress.set_message("Scoring within-cluster pairs");
    'within: for indices in members.values() {
        for i in 0..indices.len() {
            for j in 0..i {
                if report.within.len() >= max_pairs {
                    break 'within;
                }
                report
                    .within
                    .push(edit_fraction(&sequences[indices[i]], &sequences[indices[j]]));
                progress.inc(1);
            }
        }
    }

    progress.set_message("Scoring between-cluster pairs");
    let representatives: Vec<usize> = members.values().map(|indices| indices[0]).collect();
    'between: for i in 0..representatives.len() {
        for j in (i + 1)..representatives.len() {
            if report.between.len() >= max_pairs {
                break 'between;
            }
            report.between.push(edit_fraction(
                &sequences[representatives[i]],
                &sequences[representatives[j]],
            ));
            progress.inc(1);
        }
    }

    report
}

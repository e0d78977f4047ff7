use crate::export::{load_assignments, OutputPaths};
use crate::sequence_processor::readers::FastaFile;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crate::validation::{assess, load_sequences};
use anyhow::{Context, Result};
use std::path::PathBuf;

fn format_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "n/a".to_string(), |m| format!("{:.4}", m))
}

pub fn run(
    fasta: PathBuf,
    stem: PathBuf,
    readmax: usize,
    max_pairs: usize,
    quiet: bool,
) -> Result<()> {
    let paths = OutputPaths::from_stem(&stem);
    let assignments = load_assignments(&paths.clusters)
        .with_context(|| format!("Failed to load {}", paths.clusters.display()))?;

    let sequences = load_sequences(&FastaFile::new(&fasta), readmax)
        .with_context(|| format!("Failed to read {}", fasta.display()))?;

    let progress = ProgressBarBuilder::new("Aligning...")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} pairs)")
        .with_tick()
        .hidden(quiet)
        .build()?;
    let report = assess(&sequences, &assignments, max_pairs, &progress);
    progress.finish_and_clear();

    println!("Within-cluster scores:");
    for score in &report.within {
        println!("{}", score);
    }
    println!("  {}", format_mean(report.mean_within()));

    println!("Between-cluster scores:");
    for score in &report.between {
        println!("{}", score);
    }
    println!("  {}", format_mean(report.mean_between()));

    Ok(())
}

use crate::cli::ClusterOptions;
use crate::clustering::Orchestrator;
use crate::config::Config;
use crate::export;
use crate::sequence_processor::readers::FastaFile;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub fn run(fasta: PathBuf, stem: PathBuf, options: ClusterOptions, quiet: bool) -> Result<()> {
    let mut config = Config::load().cluster;
    options.apply(&mut config);
    let orchestrator = Orchestrator::new(config).context("Invalid clustering parameters")?;

    let progress = ProgressBarBuilder::new("Getting seeds...")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg} {pos} sequences ({per_sec})")
        .with_tick()
        .hidden(quiet)
        .build()?;

    let source = FastaFile::new(&fasta);
    let outcome = orchestrator
        .run(&source, &progress)
        .with_context(|| format!("Failed to cluster {}", fasta.display()))?;
    progress.finish_with_message(format!(
        "Clustered {} sequences into {} clusters",
        outcome.sequences(),
        outcome.sizes.len()
    ));

    let paths = export::write_outcome(
        &stem,
        &fasta.display().to_string(),
        orchestrator.config(),
        &outcome,
    )
    .context("Failed to write clustering results")?;

    info!(
        clusters = %paths.clusters.display(),
        centers = %paths.centers.display(),
        summary = %paths.summary.display(),
        "results written"
    );
    println!("Assignments: {}", paths.clusters.display());
    println!("Centroids:   {}", paths.centers.display());
    println!("Summary:     {}", paths.summary.display());

    Ok(())
}

use crate::simulate::{write_fasta_gz, SimulationConfig};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

pub fn run(
    outstem: PathBuf,
    nseq: usize,
    slen: usize,
    p1: f64,
    p2: f64,
    seed: Option<u64>,
) -> Result<()> {
    let config = SimulationConfig { nseq, slen, p1, p2 };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut name = outstem.into_os_string();
    name.push(".fasta.gz");
    let output_path = PathBuf::from(name);

    write_fasta_gz(&output_path, &config, &mut rng)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!(
        "Wrote {} simulated sequences of length {} to {}",
        nseq,
        slen,
        output_path.display()
    );
    Ok(())
}

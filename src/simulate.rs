use crate::error::{Result, StreamClusterError};
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Width of sequence lines in generated FASTA.
pub const LINE_WIDTH: usize = 70;

const BASES: [u8; 4] = *b"ATGC";

/// Two-group synthetic data set. The first `nseq / 2` records are copies of one
/// random center mutated with per-base probability `p1`; the rest copy a second
/// center with probability `p2`. A mutated base is redrawn uniformly from ATGC.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub nseq: usize,
    pub slen: usize,
    pub p1: f64,
    pub p2: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nseq: 20,
            slen: 1000,
            p1: 0.0,
            p2: 0.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("p1", self.p1), ("p2", self.p2)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(StreamClusterError::InvalidConfig(format!(
                    "{} must be a probability, got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

fn random_base<R: Rng>(rng: &mut R) -> u8 {
    BASES[rng.gen_range(0..BASES.len())]
}

fn random_sequence<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| random_base(rng)).collect()
}

fn mutate<R: Rng>(rng: &mut R, center: &[u8], pmiss: f64) -> Vec<u8> {
    center
        .iter()
        .map(|&base| {
            if rng.gen::<f64>() < pmiss {
                random_base(rng)
            } else {
                base
            }
        })
        .collect()
}

/// Writes the synthetic records as FASTA named `S000`, `S001`, ...
pub fn simulate<R: Rng, W: Write>(
    config: &SimulationConfig,
    rng: &mut R,
    writer: &mut W,
) -> Result<()> {
    config.validate()?;

    let center1 = random_sequence(rng, config.slen);
    let center2 = random_sequence(rng, config.slen);

    for k in 0..config.nseq {
        let (center, pmiss) = if k < config.nseq / 2 {
            (&center1, config.p1)
        } else {
            (&center2, config.p2)
        };
        let sequence = mutate(rng, center, pmiss);

        writeln!(writer, ">S{:03}", k)?;
        for line in sequence.chunks(LINE_WIDTH) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Writes a gzip-compressed synthetic FASTA file.
pub fn write_fasta_gz<R: Rng>(path: &Path, config: &SimulationConfig, rng: &mut R) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::new(6));
    simulate(config, rng, &mut encoder)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    Ok(())
}

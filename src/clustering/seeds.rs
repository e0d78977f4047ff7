use crate::error::{Result, StreamClusterError};
use crate::kmer::{FeatureVector, KmerHasher};
use crate::sequence_processor::core::Sequence;
use indicatif::ProgressBar;
use rand::Rng;
use tracing::debug;

/// Picks initial centroids spread through the file.
///
/// Before each seed a random number of records in `[skip, 2 * skip)` is consumed,
/// and the last record consumed becomes the seed. Spacing the seeds out keeps them
/// from all coming from one locally correlated stretch of the input.
#[derive(Debug, Clone, Copy)]
pub struct SeedSampler {
    hasher: KmerHasher,
    skip: usize,
}

impl SeedSampler {
    pub fn new(hasher: KmerHasher, skip: usize) -> Result<Self> {
        if skip == 0 {
            return Err(StreamClusterError::InvalidConfig(
                "seed skip must be at least 1".to_string(),
            ));
        }
        Ok(Self { hasher, skip })
    }

    pub fn sample<I, R>(
        &self,
        stream: I,
        count: usize,
        rng: &mut R,
        progress: &ProgressBar,
    ) -> Result<Vec<FeatureVector>>
    where
        I: IntoIterator<Item = Result<Sequence>>,
        R: Rng + ?Sized,
    {
        let mut stream = stream.into_iter();
        let mut seeds = Vec::with_capacity(count);

        let mut next_record = |found: usize| -> Result<Sequence> {
            match stream.next() {
                Some(record) => record,
                None => Err(StreamClusterError::InsufficientSeeds {
                    found,
                    requested: count,
                }),
            }
        };

        while seeds.len() < count {
            let jump = rng.gen_range(self.skip..2 * self.skip);
            for _ in 1..jump {
                next_record(seeds.len())?;
            }
            let sequence = next_record(seeds.len())?;

            debug!(
                seed = seeds.len(),
                index = sequence.index,
                id = %sequence.id,
                "selected seed sequence"
            );
            seeds.push(self.hasher.hash(&sequence.data));
            progress.inc(1);
        }

        Ok(seeds)
    }
}

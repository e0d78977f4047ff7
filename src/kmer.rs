use crate::error::{Result, StreamClusterError};

/// Largest supported k-mer length; profiles have `4^k` dimensions.
pub const MAX_KMER_LENGTH: usize = 12;

/// K-mer count (or frequency) profile of a single sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// True when no k-mer window contributed to the profile.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }
}

/// Two-bit code of a nucleotide: A=0, T=1, G=2, C=3. Lowercase is accepted.
/// Anything else has no code.
pub fn base_code(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'T' | b't' => Some(1),
        b'G' | b'g' => Some(2),
        b'C' | b'c' => Some(3),
        _ => None,
    }
}

/// Builds k-mer profiles with a rolling base-4 code.
///
/// The code of a window weights its i-th base by `4^i`, so the oldest base is the
/// least significant digit. Sliding one base divides the code by 4 and adds the
/// incoming base times `4^(k-1)`.
///
/// A window containing a base outside `ACGT` is skipped and the rolling code
/// restarts after that base. A sequence with no complete window yields the
/// all-zero profile, with or without normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerHasher {
    k: usize,
    normalize: bool,
}

impl KmerHasher {
    pub fn new(k: usize, normalize: bool) -> Result<Self> {
        if k == 0 || k > MAX_KMER_LENGTH {
            return Err(StreamClusterError::InvalidConfig(format!(
                "k-mer length must be between 1 and {}, got {}",
                MAX_KMER_LENGTH, k
            )));
        }
        Ok(Self { k, normalize })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Length of every profile this hasher produces: `4^k`.
    pub fn dimension(&self) -> usize {
        1 << (2 * self.k)
    }

    pub fn hash(&self, sequence: &[u8]) -> FeatureVector {
        let mut counts = vec![0.0; self.dimension()];
        let top_digit = 1usize << (2 * (self.k - 1));

        let mut code = 0usize;
        let mut run = 0usize;
        for &base in sequence {
            match base_code(base) {
                Some(c) => {
                    code = code / 4 + c * top_digit;
                    run += 1;
                    if run >= self.k {
                        counts[code] += 1.0;
                    }
                }
                None => {
                    code = 0;
                    run = 0;
                }
            }
        }

        if self.normalize {
            let total: f64 = counts.iter().sum();
            if total > 0.0 {
                for x in counts.iter_mut() {
                    *x /= total;
                }
            }
        }

        FeatureVector(counts)
    }
}

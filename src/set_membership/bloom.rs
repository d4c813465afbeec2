use std::f64::consts::LN_2;
use std::fmt::{Debug, Formatter};

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::error::{ConfigError, ValidationError};
use crate::hash::{iter_indices, Hash32, Murmur3};
use crate::set_membership::{Alphabet, SetMembership};

/// Largest filter size; bit indices are reduced from 32-bit hashes.
pub const MAX_SIZE: usize = u32::MAX as usize;

/// Bloom filter over text items drawn from a fixed [`Alphabet`].
///
/// Bits are only ever set, so there is no false negative and no removal.
/// A filter has no internal locking; concurrent writers must be serialized
/// by the caller.
#[derive(Clone)]
pub struct BloomFilter<H = Murmur3> {
    bits: FixedBitSet,
    num_hashes: usize,
    alphabet: Alphabet,
    hasher: H,
}

impl BloomFilter {
    /// Creates a filter of `size` bits probed by `num_hashes` seeded hashes,
    /// accepting the default alphabet.
    pub fn new(size: usize, num_hashes: usize) -> Result<Self, ConfigError> {
        Self::with_alphabet(size, num_hashes, Alphabet::default())
    }

    pub fn with_alphabet(
        size: usize,
        num_hashes: usize,
        alphabet: Alphabet,
    ) -> Result<Self, ConfigError> {
        Self::with_hasher(size, num_hashes, alphabet, Murmur3)
    }

    /// Sizes the filter so that `num_items` insertions give roughly the
    /// requested false positive `probability`.
    pub fn with_probability(num_items: usize, probability: f64) -> Result<Self, ConfigError> {
        if num_items == 0 {
            return Err(ConfigError::ZeroItems);
        }
        if !(0. < probability && probability < 1.) {
            return Err(ConfigError::InvalidProbability(probability));
        }
        let n = num_items as f64;
        let bits = (-n * probability.ln() / (LN_2 * LN_2)).ceil();
        if bits > MAX_SIZE as f64 {
            return Err(ConfigError::SizeTooLarge {
                size: bits,
                max: MAX_SIZE,
            });
        }
        let num_hashes = (bits / n * LN_2).round().max(1.);
        Self::new(bits as usize, num_hashes as usize)
    }
}

impl<H> BloomFilter<H> {
    pub fn with_hasher(
        size: usize,
        num_hashes: usize,
        alphabet: Alphabet,
        hasher: H,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if size > MAX_SIZE {
            return Err(ConfigError::SizeTooLarge {
                size: size as f64,
                max: MAX_SIZE,
            });
        }
        if num_hashes == 0 {
            return Err(ConfigError::ZeroHashes);
        }
        debug!(size, num_hashes, "created bloom filter");
        Ok(Self {
            bits: FixedBitSet::with_capacity(size),
            num_hashes,
            alphabet,
            hasher,
        })
    }

    /// Number of bits (`m`).
    pub fn bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of probes per item (`k`).
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Estimates the number of distinct items inserted from the fill ratio.
    ///
    /// Saturates once every bit is set.
    pub fn approximate_len(&self) -> usize {
        let m = self.bits.len() as f64;
        let k = self.num_hashes as f64;
        let ones = self.count_ones() as f64;
        (-m / k * (1. - ones / m).ln()) as usize
    }

    /// Expected false positive rate `(1 - e^(-kn/m))^k` after `num_items`
    /// distinct insertions.
    pub fn false_positive_rate(&self, num_items: usize) -> f64 {
        let m = self.bits.len() as f64;
        let k = self.num_hashes as f64;
        let n = num_items as f64;
        (1. - (-k * n / m).exp()).powf(k)
    }
}

impl<H: Hash32> BloomFilter<H> {
    /// Inserts `item`. Adding the same item again changes nothing.
    pub fn add(&mut self, item: &str) -> Result<(), ValidationError> {
        self.alphabet.validate(item)?;
        let size = self.bits.len();
        for index in iter_indices(item.as_bytes(), self.num_hashes, size, &self.hasher) {
            self.bits.insert(index);
        }
        Ok(())
    }

    /// Returns `false` if `item` was definitely never added, `true` if it
    /// possibly was.
    pub fn check(&self, item: &str) -> Result<bool, ValidationError> {
        self.alphabet.validate(item)?;
        Ok(
            iter_indices(item.as_bytes(), self.num_hashes, self.bits.len(), &self.hasher)
                .all(|index| self.bits.contains(index)),
        )
    }

    /// Like [`add`](Self::add), for raw input that must first be valid UTF-8.
    pub fn add_bytes(&mut self, item: &[u8]) -> Result<(), ValidationError> {
        self.add(as_text(item)?)
    }

    /// Like [`check`](Self::check), for raw input that must first be valid UTF-8.
    pub fn check_bytes(&self, item: &[u8]) -> Result<bool, ValidationError> {
        self.check(as_text(item)?)
    }
}

fn as_text(item: &[u8]) -> Result<&str, ValidationError> {
    std::str::from_utf8(item).map_err(|_| ValidationError::NotText)
}

impl<H: Hash32> SetMembership<str> for BloomFilter<H> {
    type Error = ValidationError;

    fn contains(&self, item: &str) -> Result<bool, Self::Error> {
        self.check(item)
    }

    fn insert(&mut self, item: &str) -> Result<(), Self::Error> {
        self.add(item)
    }
}

impl<H> Debug for BloomFilter<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ num_bits: {}, num_hashes: {} }}",
            self.bits.len(),
            self.num_hashes
        )
    }
}

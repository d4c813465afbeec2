//! HyperLogLog over 32-bit hashes.
//!
//! Every item is hashed once. The low `precision` bits of the hash select a
//! register, and the rank is taken from the same hash read from its most
//! significant bit. Index and rank bits are not kept disjoint: for hashes with
//! more than `32 - precision` leading zeros the rank also observes index bits,
//! which slightly widens the error over the textbook bound of `1.04 / sqrt(m)`.

use std::fmt::{Debug, Formatter};
use std::mem::size_of_val;

use tracing::debug;

use crate::cardinality::Cardinality;
use crate::error::ConfigError;
use crate::hash::{Hash32, Murmur3};
use crate::packed::PackedArray;

pub const MIN_PRECISION: u8 = 4;
pub const MAX_PRECISION: u8 = 18;

/// Bits per register; ranks of a 32-bit hash never exceed 32.
const REGISTER_WIDTH: usize = 6;

/// Cardinality estimator with `2^precision` registers.
///
/// Not internally synchronized; a shared instance needs an external lock.
#[derive(Clone)]
pub struct HyperLogLog<H = Murmur3> {
    registers: PackedArray<u32, REGISTER_WIDTH>,
    precision: u8,
    alpha: f64,
    hasher: H,
}

impl HyperLogLog {
    pub fn new(precision: u8) -> Result<Self, ConfigError> {
        Self::with_hasher(precision, Murmur3)
    }

    /// Picks the smallest precision whose standard error `1.04 / sqrt(m)`
    /// does not exceed `epsilon`.
    pub fn with_error(epsilon: f64) -> Result<Self, ConfigError> {
        if !(0.0 < epsilon && epsilon < 1.0) {
            return Err(ConfigError::InvalidErrorRate(epsilon));
        }
        let m = (1.04 / epsilon).powi(2);
        let precision = m.log2().ceil().min(f64::from(u8::MAX));
        Self::new(precision as u8)
    }
}

impl<H> HyperLogLog<H> {
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(ConfigError::PrecisionOutOfRange {
                precision,
                min: MIN_PRECISION,
                max: MAX_PRECISION,
            });
        }
        let num_registers = 1usize << precision;
        debug!(precision, num_registers, "created hyperloglog");
        Ok(Self {
            registers: PackedArray::new(num_registers),
            precision,
            alpha: alpha(precision),
            hasher,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn registers(&self) -> impl Iterator<Item = u8> + '_ {
        self.registers.iter().map(|rank| rank as u8)
    }

    /// Cardinality estimate. Reads the registers only.
    pub fn count(&self) -> usize {
        let m = self.registers.len() as f64;
        let (zeros, sum) = self
            .registers
            .iter()
            .fold((0usize, 0f64), |(zeros, sum), rank| {
                (zeros + usize::from(rank == 0), sum + 2f64.powi(-(rank as i32)))
            });

        let mut estimate = self.alpha * m * m / sum;
        if estimate < 2.5 * m && zeros > 0 {
            // Linear counting over the empty registers.
            estimate = m * (m / zeros as f64).ln();
        }
        estimate as usize
    }

    /// Approximate bytes held by the estimator, registers included.
    pub fn memory_footprint(&self) -> usize {
        size_of_val(self) + self.registers.size_in_bytes()
    }

    fn register_index(&self, hash: u32) -> usize {
        (hash as usize) & (self.registers.len() - 1)
    }
}

impl<H: Hash32> HyperLogLog<H> {
    /// Records `item`. Any text is accepted, the empty string included.
    pub fn add(&mut self, item: &str) {
        let hash = self.hasher.hash32(item.as_bytes(), 0);
        let index = self.register_index(hash);
        self.registers.update_max(index, rank(hash));
    }
}

impl<H: Hash32> Cardinality<str> for HyperLogLog<H> {
    fn count(&self) -> usize {
        HyperLogLog::count(self)
    }

    fn insert(&mut self, item: &str) {
        self.add(item)
    }
}

impl<H> Debug for HyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HyperLogLog {{ precision: {} }}", self.precision)
    }
}

/// One plus the number of leading zeros of the 32-bit hash, or 0 when no
/// bit is set.
fn rank(hash: u32) -> u32 {
    if hash == 0 {
        0
    } else {
        hash.leading_zeros() + 1
    }
}

/// Parameter for bias correction
fn alpha(precision: u8) -> f64 {
    match precision {
        4 => 0.673,
        5 => 0.697,
        6 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (1u64 << precision) as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// Hashes an item to the bytes it was given, read little-endian.
    struct Identity;

    impl Hash32 for Identity {
        fn hash32(&self, bytes: &[u8], _seed: u32) -> u32 {
            let mut word = [0u8; 4];
            word[..bytes.len().min(4)].copy_from_slice(&bytes[..bytes.len().min(4)]);
            u32::from_le_bytes(word)
        }
    }

    #[test_case(0 => 0; "zero hash")]
    #[test_case(1 => 32; "lowest bit")]
    #[test_case(0x8000_0000 => 1; "highest bit")]
    #[test_case(0x0001_0000 => 16; "middle bit")]
    #[test_case(u32::MAX => 1; "all bits")]
    fn test_rank(hash: u32) -> u32 {
        rank(hash)
    }

    #[test_case(4 => 0.673)]
    #[test_case(5 => 0.697)]
    #[test_case(6 => 0.709)]
    fn test_alpha_small_precisions(precision: u8) -> f64 {
        alpha(precision)
    }

    #[test]
    fn test_alpha_asymptotic() {
        let expected = 0.7213 / (1.0 + 1.079 / 1024.0);
        assert!((alpha(10) - expected).abs() < 1e-12);
    }

    #[test_case(3; "below range")]
    #[test_case(19; "above range")]
    #[test_case(0; "zero")]
    #[test_case(64; "far above range")]
    fn test_rejects_precision(precision: u8) {
        assert_eq!(
            HyperLogLog::new(precision).unwrap_err(),
            ConfigError::PrecisionOutOfRange {
                precision,
                min: MIN_PRECISION,
                max: MAX_PRECISION,
            }
        );
    }

    #[test]
    fn test_empty_estimator_counts_zero() {
        let hll = HyperLogLog::new(10).unwrap();

        assert_eq!(hll.num_registers(), 1024);
        assert!(hll.registers().all(|rank| rank == 0));
        // Raw estimate is alpha * m, below 2.5 * m, so linear counting applies.
        assert!(hll.alpha() * 1024.0 < 2.5 * 1024.0);
        assert_eq!(hll.count(), 0);
    }

    #[test]
    fn test_index_and_rank_share_one_hash() {
        let mut hll = HyperLogLog::with_hasher(4, Identity).unwrap();
        // 0x0000_0013: index 0b0011, rank 28.
        hll.add("\u{13}");

        let registers: Vec<u8> = hll.registers().collect();
        assert_eq!(registers[3], 28);
        assert_eq!(registers.iter().filter(|&&rank| rank != 0).count(), 1);
    }

    #[test]
    fn test_zero_hash_leaves_registers_untouched() {
        let mut hll = HyperLogLog::with_hasher(4, Identity).unwrap();
        hll.add("");

        assert!(hll.registers().all(|rank| rank == 0));
        assert_eq!(hll.count(), 0);
    }

    #[test]
    fn test_registers_keep_maximum() {
        let mut hll = HyperLogLog::with_hasher(4, Identity).unwrap();
        // Both hash to register 1; ranks 4 and 28.
        hll.add("\u{1}\u{0}\u{0}\u{10}");
        hll.add("\u{11}");
        hll.add("\u{1}\u{0}\u{0}\u{10}");

        assert_eq!(hll.registers().nth(1), Some(28));
    }

    #[test]
    fn test_small_counts_are_exactish() {
        let mut hll = HyperLogLog::new(14).unwrap();
        for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.1"] {
            hll.add(ip);
        }
        assert_eq!(hll.count(), 3);
    }

    #[test]
    fn test_count_is_repeatable() {
        let mut hll = HyperLogLog::new(10).unwrap();
        for i in 0..5_000 {
            hll.add(&format!("user{i}"));
        }
        assert_eq!(hll.count(), hll.count());
    }

    #[test]
    fn test_ten_thousand_distinct() {
        let mut hll = HyperLogLog::new(10).unwrap();
        for i in 0..10_000 {
            hll.add(&format!("item-{i}"));
        }

        let count = hll.count() as f64;
        let error = (count - 10_000.0).abs() / 10_000.0;
        assert!(error < 0.1, "count = {count}, error = {error}");
    }

    #[test_case(0.05 => 9)]
    #[test_case(0.02 => 12)]
    #[test_case(0.01 => 14)]
    fn test_with_error(epsilon: f64) -> u8 {
        HyperLogLog::with_error(epsilon).unwrap().precision()
    }

    #[test]
    fn test_with_error_rejects() {
        assert_eq!(
            HyperLogLog::with_error(0.0).unwrap_err(),
            ConfigError::InvalidErrorRate(0.0)
        );
        assert!(matches!(
            HyperLogLog::with_error(0.5).unwrap_err(),
            ConfigError::PrecisionOutOfRange { precision: 3, .. }
        ));
    }

    #[test]
    fn test_memory_footprint() {
        let hll = HyperLogLog::new(10).unwrap();
        // 1024 six-bit registers plus one spare word.
        assert!(hll.memory_footprint() >= 193 * 4);
        assert!(hll.memory_footprint() < 193 * 4 + 128);
    }

    #[test]
    fn test_debug() {
        let hll = HyperLogLog::new(12).unwrap();
        assert_eq!(format!("{hll:?}"), "HyperLogLog { precision: 12 }");
    }
}

//! Bounded-memory answers to "has this value been seen before?" and "how many
//! distinct values have been seen?".
//!
//! - [`BloomFilter`]: membership over text from a fixed alphabet, no false negatives.
//! - [`HyperLogLog`]: distinct-count estimate over `2^precision` registers.
//!
//! Both are plain single-threaded values with no shared state. The [`logs`]
//! and [`compare`] modules drive them over access logs.
//!
//! ```
//! use uniqueness::{BloomFilter, HyperLogLog};
//!
//! let mut filter = BloomFilter::new(1000, 3)?;
//! filter.add("password123")?;
//! assert!(filter.check("password123")?);
//!
//! let mut hll = HyperLogLog::new(10)?;
//! hll.add("10.0.0.1");
//! hll.add("10.0.0.1");
//! assert_eq!(hll.count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cardinality;
pub mod compare;
pub mod error;
pub mod hash;
pub mod logs;
mod packed;
pub mod set_membership;

pub use cardinality::{Cardinality, HyperLogLog};
pub use error::{ConfigError, LogError, ValidationError};
pub use hash::{Hash32, Murmur3};
pub use set_membership::{check_uniqueness, Alphabet, BloomFilter, SetMembership, Uniqueness};

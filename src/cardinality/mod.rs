pub mod hash_set;
pub mod hll;

pub use hll::HyperLogLog;

/// Distinct-count estimation over values of type `T`.
pub trait Cardinality<T: ?Sized> {
    fn count(&self) -> usize;
    fn insert(&mut self, item: &T);
}

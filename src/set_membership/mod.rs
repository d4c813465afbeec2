pub mod alphabet;
pub mod bloom;
pub mod hash_set;
pub mod passwords;

pub use alphabet::Alphabet;
pub use bloom::BloomFilter;
pub use passwords::{check_uniqueness, Uniqueness};

/// Approximate or exact set membership over values of type `T`.
pub trait SetMembership<T: ?Sized> {
    type Error;

    fn contains(&self, item: &T) -> Result<bool, Self::Error>;
    fn insert(&mut self, item: &T) -> Result<(), Self::Error>;
}

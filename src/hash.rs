use std::io::Cursor;

/// A seeded 32-bit hash family.
///
/// Filters and estimators only require the same family to be used for every
/// insertion and lookup on one instance; there is no cross-process contract.
pub trait Hash32 {
    fn hash32(&self, bytes: &[u8], seed: u32) -> u32;
}

/// MurmurHash3 (x86, 32-bit) with the seed as salt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Murmur3;

impl Hash32 for Murmur3 {
    fn hash32(&self, bytes: &[u8], seed: u32) -> u32 {
        // Reading from an in-memory cursor cannot fail.
        murmur3::murmur3_32(&mut Cursor::new(bytes), seed).unwrap_or(0)
    }
}

/// Yields one bit index in `[0, size)` per seed in `[0, num_hashes)`.
pub(crate) fn iter_indices<'a, H>(
    item: &'a [u8],
    num_hashes: usize,
    size: usize,
    hasher: &'a H,
) -> impl Iterator<Item = usize> + 'a
where
    H: Hash32,
{
    (0..num_hashes).map(move |seed| hasher.hash32(item, seed as u32) as usize % size)
}

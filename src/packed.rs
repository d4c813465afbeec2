use std::mem::size_of;

use num_traits::{CheckedShl, CheckedShr, PrimInt, Unsigned};

/// Fixed-length array of `N`-bit unsigned values packed into words of type `T`.
///
/// Values may straddle two adjacent words.
#[derive(Clone)]
pub(crate) struct PackedArray<T, const N: usize> {
    buf: Vec<T>,
    len: usize,
}

impl<T, const N: usize> PackedArray<T, N>
where
    T: PrimInt + Unsigned + CheckedShl + CheckedShr,
{
    const WORD_SIZE: usize = 8 * size_of::<T>();
    const PACKED_LENGTH_OK: () = assert!(0 < N && N <= Self::WORD_SIZE);

    pub fn new(len: usize) -> Self {
        // Add a binding to enforce a compile-time assertion.
        #[allow(clippy::let_unit_value)]
        let _ = Self::PACKED_LENGTH_OK;

        // Allocate 1 extra word for safe indexing word pairs.
        let num_words = (N * len).div_ceil(Self::WORD_SIZE) + 1;

        Self {
            buf: vec![T::zero(); num_words],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Bytes held by the backing buffer.
    pub fn size_in_bytes(&self) -> usize {
        self.buf.len() * size_of::<T>()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }

    pub fn get(&self, index: usize) -> T {
        assert!(index < self.len, "index out of bounds");
        let (word_index, offset) = Self::index_and_offset(index);
        let (first, second) = (self.buf[word_index], self.buf[word_index + 1]);
        let first_shifted = first >> offset;
        let second_shifted = shl_or_zero(second, Self::WORD_SIZE - offset);
        (first_shifted | second_shifted) & Self::lsb_mask()
    }

    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < self.len, "index out of bounds");
        let (word_index, offset) = Self::index_and_offset(index);
        let value_masked = value & Self::lsb_mask();
        {
            let first = &mut self.buf[word_index];
            let first_cleared = *first & !(Self::lsb_mask() << offset);
            *first = first_cleared | (value_masked << offset);
        }
        let spill = Self::WORD_SIZE - offset;
        let second = &mut self.buf[word_index + 1];
        let second_cleared = *second & !shr_or_zero(Self::lsb_mask(), spill);
        *second = second_cleared | shr_or_zero(value_masked, spill);
    }

    /// Stores `max(current, value)` at `index` and returns the previous value.
    pub fn update_max(&mut self, index: usize, value: T) -> T {
        let current = self.get(index);
        if value > current {
            self.set(index, value);
        }
        current
    }

    fn lsb_mask() -> T {
        shl_or_zero(T::one(), N)
            .checked_sub(&T::one())
            .unwrap_or_else(T::max_value)
    }

    fn index_and_offset(index: usize) -> (usize, usize) {
        (N * index / Self::WORD_SIZE, N * index % Self::WORD_SIZE)
    }
}

fn shl_or_zero<T: PrimInt + CheckedShl>(value: T, rhs: usize) -> T {
    value.checked_shl(rhs as u32).unwrap_or_else(T::zero)
}

fn shr_or_zero<T: PrimInt + CheckedShr>(value: T, rhs: usize) -> T {
    value.checked_shr(rhs as u32).unwrap_or_else(T::zero)
}

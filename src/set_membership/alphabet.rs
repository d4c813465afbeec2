use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;

use crate::error::ValidationError;

/// Punctuation accepted by [`Alphabet::default`] in addition to ASCII letters and digits.
pub const DEFAULT_PUNCTUATION: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const ASCII_RANGE: usize = 128;

/// Set of characters a filter accepts. Only ASCII characters can be members.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    allowed: FixedBitSet,
}

impl Alphabet {
    /// Builds an alphabet from the given characters; non-ASCII ones are ignored.
    pub fn new(chars: &str) -> Self {
        let mut allowed = FixedBitSet::with_capacity(ASCII_RANGE);
        for c in chars.chars().filter(char::is_ascii) {
            allowed.insert(c as usize);
        }
        Self { allowed }
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.allowed.contains(c as usize)
    }

    pub fn len(&self) -> usize {
        self.allowed.count_ones(..)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rejects `item` if any of its characters is outside the alphabet,
    /// reporting every offending character.
    pub fn validate(&self, item: &str) -> Result<(), ValidationError> {
        let unexpected: BTreeSet<char> = item.chars().filter(|&c| !self.contains(c)).collect();
        if unexpected.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidCharacters { chars: unexpected })
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let letters_and_digits = ('a'..='z').chain('A'..='Z').chain('0'..='9');
        let chars: String = letters_and_digits
            .chain(DEFAULT_PUNCTUATION.chars())
            .collect();
        Self::new(&chars)
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chars: String = self.allowed.ones().map(|i| i as u8 as char).collect();
        f.debug_tuple("Alphabet").field(&chars).finish()
    }
}

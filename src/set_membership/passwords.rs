use std::fmt::{Display, Formatter};

use crate::set_membership::SetMembership;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    AlreadyUsed,
}

impl Display for Uniqueness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Uniqueness::Unique => f.write_str("unique"),
            Uniqueness::AlreadyUsed => f.write_str("already used"),
        }
    }
}

/// Classifies each candidate against the known set, preserving input order.
///
/// Stops at the first candidate the set refuses to look up.
pub fn check_uniqueness<S, I>(known: &S, candidates: I) -> Result<Vec<(String, Uniqueness)>, S::Error>
where
    S: SetMembership<str> + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|candidate| {
            let candidate = candidate.as_ref();
            let status = if known.contains(candidate)? {
                Uniqueness::AlreadyUsed
            } else {
                Uniqueness::Unique
            };
            Ok((candidate.to_owned(), status))
        })
        .collect()
}

use crate::set_membership::SetMembership;
use std::collections::HashSet;
use std::convert::Infallible;

/// Exact membership, for comparing against approximate filters.
impl SetMembership<str> for HashSet<String> {
    type Error = Infallible;

    fn contains(&self, item: &str) -> Result<bool, Self::Error> {
        Ok(HashSet::contains(self, item))
    }

    fn insert(&mut self, item: &str) -> Result<(), Self::Error> {
        if !HashSet::contains(self, item) {
            HashSet::insert(self, item.to_owned());
        }
        Ok(())
    }
}

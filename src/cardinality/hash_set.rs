use crate::cardinality::Cardinality;
use std::collections::HashSet;

/// Exact distinct count, the reference the estimators are compared against.
impl Cardinality<str> for HashSet<String> {
    fn count(&self) -> usize {
        self.len()
    }

    fn insert(&mut self, item: &str) {
        if !self.contains(item) {
            HashSet::insert(self, item.to_owned());
        }
    }
}

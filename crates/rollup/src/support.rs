use crate::example::Example;
use std::collections::HashMap;

/// Number of examples currently tagged with each category.
///
/// Always rebuilt from a snapshot of the example set; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportIndex {
    counts: HashMap<String, usize>,
    total: usize,
}

impl SupportIndex {
    pub fn compute(examples: &[Example]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for example in examples {
            *counts.entry(example.category().to_string()).or_default() += 1;
        }
        Self {
            counts,
            total: examples.len(),
        }
    }

    /// Support for a category; zero when absent
    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Present categories with fewer than `min_support` examples, sorted by id
    pub fn deficient(&self, min_support: usize) -> Vec<(&str, usize)> {
        let mut below: Vec<(&str, usize)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count < min_support)
            .map(|(id, &count)| (id.as_str(), count))
            .collect();
        below.sort_unstable_by(|a, b| a.0.cmp(b.0));
        below
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(id, &count)| (id.as_str(), count))
    }

    /// Number of distinct categories
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of examples counted
    pub fn total(&self) -> usize {
        self.total
    }
}

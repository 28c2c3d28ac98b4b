//! Insertion-ordered frequency counting.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences while remembering the order keys were first seen.
///
/// `most_common` sorts by descending count with ties broken by that order,
/// which keeps rankings stable across runs.
#[derive(Debug, Clone)]
pub struct FrequencyCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> FrequencyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// The `n` most frequent keys, highest first.
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        // Stable sort keeps first-insertion order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let counter: FrequencyCounter<&str> = ["a", "b", "a", "c", "a", "b"].into_iter().collect();
        assert_eq!(counter.len(), 3);
        assert_eq!(counter.total(), 6);
        assert_eq!(counter.get(&"a"), 3);
        assert_eq!(counter.get(&"z"), 0);
    }

    #[test]
    fn test_most_common_ties_keep_insertion_order() {
        let counter: FrequencyCounter<&str> =
            ["set", "get", "run", "get", "set"].into_iter().collect();
        assert_eq!(
            counter.most_common(10),
            vec![("set", 2), ("get", 2), ("run", 1)]
        );
    }

    #[test]
    fn test_most_common_truncates() {
        let counter: FrequencyCounter<&str> = ["x", "y", "y", "z"].into_iter().collect();
        assert_eq!(counter.most_common(1), vec![("y", 2)]);
        assert!(counter.most_common(0).is_empty());
    }

    #[test]
    fn test_empty() {
        let counter: FrequencyCounter<String> = FrequencyCounter::new();
        assert!(counter.is_empty());
        assert!(counter.most_common(5).is_empty());
    }
}

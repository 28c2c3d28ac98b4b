//! Part-of-speech filtering and word counting.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::classify::{TagSet, WordClassifier};

use super::ranking::FrequencyCounter;
use super::types::{Identifier, Ranking};

/// Split identifiers into words, keep those tagged with a tag in `target`,
/// and return the `top_size` most frequent.
///
/// Each distinct word is classified once. Words the classifier fails on are
/// logged and left out.
pub fn aggregate(
    identifiers: &[Identifier],
    target: &TagSet,
    classifier: &dyn WordClassifier,
    top_size: usize,
) -> Ranking {
    let words: Vec<&str> = identifiers
        .iter()
        .flat_map(|id| id.words())
        .filter(|w| !w.is_empty())
        .collect();

    let mut seen = HashSet::new();
    let distinct: Vec<&str> = words.iter().copied().filter(|w| seen.insert(*w)).collect();
    if distinct.is_empty() {
        return Vec::new();
    }

    let tags = classifier.classify_batch(&distinct);
    let mut matching: HashMap<&str, bool> = HashMap::with_capacity(distinct.len());
    for (word, result) in distinct.iter().zip(tags) {
        let keep = match result {
            Ok(tag) => target.contains(tag),
            Err(e) => {
                warn!("could not classify {:?} with {}: {}", word, classifier.name(), e);
                false
            }
        };
        matching.insert(*word, keep);
    }
    debug!(
        "{} of {} distinct words are {}",
        matching.values().filter(|k| **k).count(),
        distinct.len(),
        target.name()
    );

    let counter: FrequencyCounter<String> = words
        .into_iter()
        .filter(|w| matching.get(w).copied().unwrap_or(false))
        .map(str::to_string)
        .collect();

    counter.most_common(top_size)
}

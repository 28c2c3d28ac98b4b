//! Part-of-speech classification of single words.
//!
//! Provides the `WordClassifier` interface and two implementations:
//! - `LexiconClassifier`: in-process lexicon and suffix rules (default)
//! - `RemoteClassifier`: batches words to an HTTP tagging service, with a
//!   file-backed tag cache

mod cache;
mod lexicon;
mod remote;
mod tags;

pub use cache::TagCache;
pub use lexicon::LexiconClassifier;
pub use remote::{RemoteClassifier, RemoteSettings};
pub use tags::{Tag, TagSet, ALL_TAGS};

use thiserror::Error;

/// Errors a classifier can report for a word.
///
/// These are recovered by the aggregator: the word is treated as untagged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Assigns a part-of-speech tag to a single word.
///
/// Classification must be a pure function of the word. Callers never pass
/// an empty word.
pub trait WordClassifier: Send + Sync {
    /// Short name for logging (e.g., "lexicon").
    fn name(&self) -> &str;

    /// Classify one word.
    fn classify(&self, word: &str) -> Result<Tag, ClassifierError>;

    /// Classify several words, returning one result per input in order.
    ///
    /// Implementations backed by a remote service override this to send
    /// fewer, larger requests.
    fn classify_batch(&self, words: &[&str]) -> Vec<Result<Tag, ClassifierError>> {
        words.iter().map(|w| self.classify(w)).collect()
    }
}

//! HTTP batch tagging client.
//!
//! Sends `POST <endpoint>` with `{"words": [...]}` and expects
//! `{"tags": [...]}` with one Penn Treebank tag per word, in order.

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Runtime;

use super::{ClassifierError, Tag, TagCache, WordClassifier};

/// Connection settings for a remote tagger.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub endpoint: String,
    /// Words per request
    pub batch_size: usize,
    /// Requests in flight at once
    pub concurrency: usize,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    words: &'a [String],
}

#[derive(Deserialize)]
struct BatchResponse {
    tags: Vec<String>,
}

/// Classifier that delegates to a remote tagging service.
pub struct RemoteClassifier {
    http: Client,
    runtime: Runtime,
    settings: RemoteSettings,
    cache: TagCache,
}

impl RemoteClassifier {
    /// Create a client for `settings`, caching results in `cache`.
    pub fn new(settings: RemoteSettings, cache: TagCache) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("namestat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let runtime = Runtime::new()?;

        Ok(Self {
            http,
            runtime,
            settings: RemoteSettings {
                batch_size: settings.batch_size.max(1),
                concurrency: settings.concurrency.max(1),
                ..settings
            },
            cache,
        })
    }

    /// Tag every word of `words` not already in the cache.
    fn fetch(&self, words: Vec<String>) -> HashMap<String, Result<Tag, ClassifierError>> {
        let batches: Vec<Vec<String>> = words
            .chunks(self.settings.batch_size)
            .map(|c| c.to_vec())
            .collect();
        debug!(
            "classifying {} words in {} batches via {}",
            words.len(),
            batches.len(),
            self.settings.endpoint
        );

        let results: Vec<_> = self.runtime.block_on(async {
            stream::iter(batches)
                .map(|batch| async move {
                    let tags = self.post_batch(&batch).await;
                    (batch, tags)
                })
                .buffer_unordered(self.settings.concurrency)
                .collect()
                .await
        });

        let mut tagged = HashMap::new();
        for (batch, outcome) in results {
            match outcome {
                Ok(tags) => {
                    for (word, tag) in batch.into_iter().zip(tags) {
                        if let Ok(t) = tag {
                            self.cache.set(&word, t);
                        }
                        tagged.insert(word, tag);
                    }
                }
                Err(e) => {
                    warn!("tagging batch of {} words failed: {}", batch.len(), e);
                    for word in batch {
                        tagged.insert(word, Err(e.clone()));
                    }
                }
            }
        }
        tagged
    }

    /// Send one batch and map the response to per-word tags.
    async fn post_batch(
        &self,
        words: &[String],
    ) -> Result<Vec<Result<Tag, ClassifierError>>, ClassifierError> {
        let response = self
            .http
            .post(&self.settings.endpoint)
            .timeout(self.settings.timeout)
            .json(&BatchRequest { words })
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ClassifierError::Unavailable(format!("HTTP {}", status)));
        }

        let body: BatchResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout
            } else {
                ClassifierError::MalformedResponse(e.to_string())
            }
        })?;

        parse_tags(words, body.tags)
    }
}

fn map_request_error(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else {
        ClassifierError::Network(e.to_string())
    }
}

/// Check the response shape and parse each tag.
fn parse_tags(
    words: &[String],
    tags: Vec<String>,
) -> Result<Vec<Result<Tag, ClassifierError>>, ClassifierError> {
    if tags.len() != words.len() {
        return Err(ClassifierError::MalformedResponse(format!(
            "expected {} tags, got {}",
            words.len(),
            tags.len()
        )));
    }

    Ok(tags
        .into_iter()
        .map(|t| {
            Tag::parse(&t)
                .ok_or_else(|| ClassifierError::MalformedResponse(format!("unknown tag {:?}", t)))
        })
        .collect())
}

impl WordClassifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    fn classify(&self, word: &str) -> Result<Tag, ClassifierError> {
        self.classify_batch(&[word])
            .pop()
            .unwrap_or_else(|| Err(ClassifierError::Unavailable("empty response".to_string())))
    }

    fn classify_batch(&self, words: &[&str]) -> Vec<Result<Tag, ClassifierError>> {
        let mut known: HashMap<String, Result<Tag, ClassifierError>> = HashMap::new();
        let mut missing = Vec::new();

        for word in words {
            if known.contains_key(*word) {
                continue;
            }
            match self.cache.get(word) {
                Some(tag) => {
                    known.insert(word.to_string(), Ok(tag));
                }
                None => {
                    known.insert(
                        word.to_string(),
                        Err(ClassifierError::Unavailable("not fetched".to_string())),
                    );
                    missing.push(word.to_string());
                }
            }
        }

        if !missing.is_empty() {
            known.extend(self.fetch(missing));
        }

        let (hits, misses) = self.cache.stats();
        debug!("tag cache: {} hits, {} misses", hits, misses);

        words
            .iter()
            .map(|w| {
                known
                    .get(*w)
                    .cloned()
                    .unwrap_or_else(|| Err(ClassifierError::Unavailable("not fetched".to_string())))
            })
            .collect()
    }
}

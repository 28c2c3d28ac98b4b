//! Configuration file schema for namestat.
//!
//! Every field is optional; accessors supply the defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::{DEFAULT_TOP_GLOBAL, DEFAULT_TOP_PER_PROJECT};
use crate::classify::{Tag, TagSet};

/// File names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["namestat.yaml", ".namestat.yaml"];

/// Repositories cloned by `--clone` when the config lists none.
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "https://github.com/VladimirFilonov/wsdl2soaplib.git",
    "https://github.com/VladimirFilonov/discogs_client.git",
    "https://github.com/Nicolache/goipsend.git",
];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Directory holding one checkout per project (default: ./repos/)
    #[serde(default)]
    pub repos_dir: Option<PathBuf>,
    /// Explicit project roots; when empty every directory in repos_dir is used
    #[serde(default)]
    pub projects: Vec<PathBuf>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub top_per_project: Option<usize>,
    #[serde(default)]
    pub top_global: Option<usize>,
    /// Glob patterns relative to each project root
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Word to tag overrides for the lexicon classifier
    #[serde(default)]
    pub lexicon: BTreeMap<String, String>,
    /// Extra named tag sets selectable with --part
    #[serde(default)]
    pub tag_sets: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// A repository to clone into repos_dir.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Repository {
    pub url: String,
}

impl Repository {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Checkout directory name: the last path segment of the URL.
    pub fn name(&self) -> &str {
        let url = self.url.trim_end_matches('/');
        url.rsplit_once('/').map_or(url, |(_, last)| last)
    }
}

/// Which classifier implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    #[default]
    Lexicon,
    Remote,
}

/// Classifier settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub kind: ClassifierKind,
    /// Tagging service URL, required for `kind: remote`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub cache_ttl_hours: Option<u32>,
}

impl ClassifierConfig {
    /// Words per request (defaults to 64).
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(64)
    }

    /// Concurrent requests (defaults to 4).
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(4)
    }

    /// Per-request timeout (defaults to 5 seconds).
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(5000))
    }

    /// Tag cache TTL (defaults to one week).
    pub fn cache_ttl_hours(&self) -> u32 {
        self.cache_ttl_hours.unwrap_or(168)
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else the first default config file found
    /// in `dir`, else the built-in defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        let config = match explicit {
            Some(path) => Self::parse_file(path)?,
            None => match discover(dir) {
                Some(path) => Self::parse_file(path)?,
                None => Self::default(),
            },
        };
        validate(&config)?;
        Ok(config)
    }

    /// Returns the repos directory (defaults to "./repos/").
    pub fn repos_dir(&self) -> PathBuf {
        self.repos_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./repos/"))
    }

    /// Returns the repositories to clone, falling back to the built-in list.
    pub fn repositories(&self) -> Vec<Repository> {
        if self.repositories.is_empty() {
            DEFAULT_REPOSITORIES.iter().map(|u| Repository::new(*u)).collect()
        } else {
            self.repositories.clone()
        }
    }

    pub fn top_per_project(&self) -> usize {
        self.top_per_project.unwrap_or(DEFAULT_TOP_PER_PROJECT)
    }

    pub fn top_global(&self) -> usize {
        self.top_global.unwrap_or(DEFAULT_TOP_GLOBAL)
    }

    /// Lexicon overrides as typed tags. Unknown tags are skipped; `validate`
    /// rejects them up front.
    pub fn lexicon_overrides(&self) -> HashMap<String, Tag> {
        self.lexicon
            .iter()
            .filter_map(|(word, tag)| Some((word.to_lowercase(), Tag::parse(tag)?)))
            .collect()
    }

    /// Resolve a tag set by name: the built-in presets first, then `tag_sets`.
    pub fn tag_set(&self, name: &str) -> anyhow::Result<TagSet> {
        if let Some(preset) = TagSet::preset(name) {
            return Ok(preset);
        }
        let Some(tags) = self.tag_sets.get(name) else {
            let mut known = vec!["nouns".to_string(), "verbs".to_string()];
            known.extend(self.tag_sets.keys().cloned());
            anyhow::bail!(
                "invalid part {:?}, must be one of: {}",
                name,
                known.join(", ")
            );
        };
        let tags = tags
            .iter()
            .map(|t| t.parse::<Tag>().map_err(anyhow::Error::msg))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(TagSet::new(name, tags))
    }
}

/// Find the first default config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a config.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.top_per_project == Some(0) {
        anyhow::bail!("top_per_project must be at least 1");
    }
    if config.top_global == Some(0) {
        anyhow::bail!("top_global must be at least 1");
    }

    for (word, tag) in &config.lexicon {
        if Tag::parse(tag).is_none() {
            anyhow::bail!("invalid tag {:?} for lexicon word {:?}", tag, word);
        }
    }

    for (name, tags) in &config.tag_sets {
        if tags.is_empty() {
            anyhow::bail!("tag set {:?} is empty", name);
        }
        for tag in tags {
            if Tag::parse(tag).is_none() {
                anyhow::bail!("invalid tag {:?} in tag set {:?}", tag, name);
            }
        }
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    if config.classifier.kind == ClassifierKind::Remote && config.classifier.endpoint.is_none() {
        anyhow::bail!("classifier kind 'remote' requires an endpoint");
    }

    Ok(())
}

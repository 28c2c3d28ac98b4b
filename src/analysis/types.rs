//! Core types for identifier statistics.

use serde::Serialize;
use std::path::PathBuf;

/// Which identifiers to collect from a syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// Names of function definitions
    Functions,
    /// Names at every variable reference site
    Variables,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Functions => "functions",
            IdentifierKind::Variables => "variables",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IdentifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "functions" => Ok(IdentifierKind::Functions),
            "variables" => Ok(IdentifierKind::Variables),
            _ => Err(format!(
                "invalid search target {:?}, must be 'functions' or 'variables'",
                s
            )),
        }
    }
}

/// A lower-cased identifier name and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub kind: IdentifierKind,
}

impl Identifier {
    pub fn new(name: impl Into<String>, kind: IdentifierKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Underscore-delimited words, empty segments included.
    pub fn words(&self) -> std::str::Split<'_, char> {
        self.name.split('_')
    }
}

/// Ranked (word, count) pairs, highest count first.
pub type Ranking = Vec<(String, usize)>;

/// Statistics for one scanned project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScan {
    pub root: PathBuf,
    /// Files located, including those that failed to parse
    pub files_scanned: usize,
    pub parse_failures: usize,
    /// Identifiers extracted before word splitting
    pub identifiers: usize,
    /// Local ranking, already truncated to the per-project limit
    pub ranking: Ranking,
}

/// One row of the corpus-wide ranking.
///
/// `local_count` is the count a project reported for the word;
/// `global_count` is how many times that exact (word, local_count) pair
/// occurred across the per-project rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedEntry {
    pub word: String,
    pub local_count: usize,
    pub global_count: usize,
}

/// Result of a corpus run, handed to reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusReport {
    pub projects: Vec<ProjectScan>,
    /// Number of (word, local_count) pairs fed into the merge
    pub total_words: usize,
    /// Number of distinct (word, local_count) pairs
    pub unique_words: usize,
    pub ranking: Vec<MergedEntry>,
}

impl CorpusReport {
    /// Files located across all projects.
    pub fn files_scanned(&self) -> usize {
        self.projects.iter().map(|p| p.files_scanned).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

//! namestat - part-of-speech statistics for identifier names.
//!
//! namestat walks Python projects, collects function or variable names,
//! splits them on `_` into words, and counts the words that belong to a
//! part of speech (verbs by default). Each project yields a top-N ranking;
//! those rankings are merged into one corpus ranking.
//!
//! # Architecture
//!
//! - `parser`: source to `SyntaxTree` (tree-sitter, Python grammar)
//! - `analysis`: file location, identifier extraction, ranking, the runner
//! - `classify`: word to Penn Treebank tag (built-in lexicon or remote tagger)
//! - `config`: YAML configuration
//! - `report`: console, JSON and CSV output
//! - `repos`: local checkouts (list, clear, clone)

pub mod analysis;
pub mod classify;
pub mod cli;
pub mod config;
pub mod parser;
pub mod report;
pub mod repos;

pub use analysis::{
    aggregate, extract, merge_rankings, CorpusReport, Identifier, IdentifierKind, Locator,
    MergedEntry, ProjectScan, Runner,
};
pub use classify::{ClassifierError, LexiconClassifier, Tag, TagSet, WordClassifier};
pub use config::Config;
pub use parser::{ParseFailure, PythonTreeBuilder, SyntaxTree, SyntaxTreeBuilder};
pub use report::ReportFormat;

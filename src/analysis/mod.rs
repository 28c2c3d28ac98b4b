//! Identifier statistics pipeline.
//!
//! ```text
//! project root ──▶ Locator ──▶ SyntaxTreeBuilder ──▶ extract ──▶ aggregate
//!                                                                   │
//!                                   per-project Ranking (top N) ◀───┘
//!                                                │
//!                                                ▼
//!                                  merge_rankings ──▶ CorpusReport
//! ```
//!
//! Each stage is usable on its own; `Runner` wires them together.

mod aggregate;
mod extract;
mod locate;
mod ranking;
mod runner;
mod types;

pub use aggregate::aggregate;
pub use extract::extract;
pub use locate::{Locator, MAX_FILES};
pub use ranking::FrequencyCounter;
pub use runner::{merge_rankings, Runner, DEFAULT_TOP_GLOBAL, DEFAULT_TOP_PER_PROJECT};
pub use types::{
    CorpusReport, Identifier, IdentifierKind, MergedEntry, ProjectScan, Ranking,
};

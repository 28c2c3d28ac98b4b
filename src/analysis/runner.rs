//! Corpus runner: locate, parse, extract and rank across project roots.

use anyhow::Context;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::classify::{TagSet, WordClassifier};
use crate::parser::{BuildError, PythonTreeBuilder, SyntaxTreeBuilder};

use super::aggregate::aggregate;
use super::extract::extract;
use super::locate::Locator;
use super::ranking::FrequencyCounter;
use super::types::{CorpusReport, IdentifierKind, MergedEntry, ProjectScan, Ranking};

/// Default number of words kept per project.
pub const DEFAULT_TOP_PER_PROJECT: usize = 10;

/// Default number of entries in the corpus ranking.
pub const DEFAULT_TOP_GLOBAL: usize = 200;

/// Runs the statistics pipeline over a list of project roots.
pub struct Runner {
    classifier: Box<dyn WordClassifier>,
    builder: Box<dyn SyntaxTreeBuilder>,
    locator: Locator,
    kind: IdentifierKind,
    tag_set: TagSet,
    top_per_project: usize,
    top_global: usize,
    parallel: bool,
}

impl Runner {
    /// Create a runner counting verbs in function names with `classifier`.
    pub fn new(classifier: Box<dyn WordClassifier>) -> Self {
        let builder = PythonTreeBuilder::new();
        let locator = Locator::new(builder.file_extensions());
        Self {
            classifier,
            builder: Box::new(builder),
            locator,
            kind: IdentifierKind::Functions,
            tag_set: TagSet::verbs(),
            top_per_project: DEFAULT_TOP_PER_PROJECT,
            top_global: DEFAULT_TOP_GLOBAL,
            parallel: false,
        }
    }

    /// Set which identifiers are collected.
    pub fn kind(mut self, kind: IdentifierKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the tags a word must carry to be counted.
    pub fn tag_set(mut self, tag_set: TagSet) -> Self {
        self.tag_set = tag_set;
        self
    }

    pub fn top_per_project(mut self, n: usize) -> Self {
        self.top_per_project = n;
        self
    }

    pub fn top_global(mut self, n: usize) -> Self {
        self.top_global = n;
        self
    }

    /// Replace the file locator, e.g. to add excluded paths.
    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// Scan project roots concurrently.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Scan every root and merge the per-project rankings.
    ///
    /// Project results are merged in the order the roots were given,
    /// whether or not they were scanned in parallel.
    pub fn run(&self, project_roots: &[PathBuf]) -> anyhow::Result<CorpusReport> {
        let projects: Vec<ProjectScan> = if self.parallel {
            project_roots
                .par_iter()
                .map(|root| self.scan_project(root))
                .collect::<anyhow::Result<_>>()?
        } else {
            project_roots
                .iter()
                .map(|root| self.scan_project(root))
                .collect::<anyhow::Result<_>>()?
        };

        let mut report = merge_rankings(projects.iter().map(|p| &p.ranking), self.top_global);
        report.projects = projects;
        Ok(report)
    }

    /// Build the local ranking for a single project root.
    pub fn scan_project(&self, root: &Path) -> anyhow::Result<ProjectScan> {
        info!("{}", root.display());
        let files = self
            .locator
            .locate(root)
            .with_context(|| format!("scanning project {}", root.display()))?;
        info!("total {} files", files.len());

        let mut trees = Vec::with_capacity(files.len());
        let mut parse_failures = 0;
        for file in &files {
            match self.builder.build(file) {
                Ok(tree) => {
                    debug!("{}: {} nodes", file.display(), tree.len());
                    trees.push(tree);
                }
                Err(BuildError::Parse(failure)) => {
                    warn!("skipping unparsable file: {}", failure);
                    parse_failures += 1;
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("scanning project {}", root.display())));
                }
            }
        }
        info!("trees generated");

        let identifiers: Vec<_> = trees
            .iter()
            .flat_map(|tree| extract(Some(tree), self.kind))
            .collect();
        info!("{} {} extracted", identifiers.len(), self.kind);

        let ranking = aggregate(
            &identifiers,
            &self.tag_set,
            self.classifier.as_ref(),
            self.top_per_project,
        );

        Ok(ProjectScan {
            root: root.to_path_buf(),
            files_scanned: files.len(),
            parse_failures,
            identifiers: identifiers.len(),
            ranking,
        })
    }
}

/// Merge per-project rankings into a corpus ranking.
///
/// Every (word, local_count) pair is one element of a multiset; the
/// global count of an entry is the multiplicity of its pair. The result
/// holds the `top_global` most frequent pairs, ties in first-seen order.
pub fn merge_rankings<'a, I>(rankings: I, top_global: usize) -> CorpusReport
where
    I: IntoIterator<Item = &'a Ranking>,
{
    let pairs: FrequencyCounter<(String, usize)> =
        rankings.into_iter().flatten().cloned().collect();

    let ranking = pairs
        .most_common(top_global)
        .into_iter()
        .map(|((word, local_count), global_count)| MergedEntry {
            word,
            local_count,
            global_count,
        })
        .collect();

    CorpusReport {
        projects: Vec::new(),
        total_words: pairs.total(),
        unique_words: pairs.len(),
        ranking,
    }
}

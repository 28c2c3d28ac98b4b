//! Integration tests for the corpus pipeline.
//!
//! These run the full locate, parse, extract, aggregate and merge chain
//! over the fixtures in testdata/corpus.

use std::collections::HashMap;
use std::path::PathBuf;

use namestat::classify::ClassifierError;
use namestat::{
    IdentifierKind, LexiconClassifier, Locator, MergedEntry, Runner, Tag, TagSet, WordClassifier,
};
use tempfile::TempDir;

fn corpus_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("corpus")
}

fn projects() -> Vec<PathBuf> {
    vec![corpus_path().join("alpha"), corpus_path().join("beta")]
}

/// Deterministic word tags for the fixtures.
struct StubClassifier(HashMap<&'static str, Tag>);

impl WordClassifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn classify(&self, word: &str) -> Result<Tag, ClassifierError> {
        self.0
            .get(word)
            .copied()
            .ok_or_else(|| ClassifierError::Unavailable(word.to_string()))
    }
}

fn stub() -> Box<dyn WordClassifier> {
    Box::new(StubClassifier(HashMap::from([
        ("get", Tag::VB),
        ("set", Tag::VB),
        ("load", Tag::VB),
        ("user", Tag::NN),
        ("users", Tag::NNS),
        ("name", Tag::NN),
        ("config", Tag::NN),
        ("path", Tag::NN),
        ("items", Tag::NNS),
        ("self", Tag::PRP),
        ("id", Tag::NN),
    ])))
}

fn entry(word: &str, local: usize, global: usize) -> MergedEntry {
    MergedEntry {
        word: word.to_string(),
        local_count: local,
        global_count: global,
    }
}

fn ranking(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
    pairs.iter().map(|(w, n)| (w.to_string(), *n)).collect()
}

#[test]
fn test_verbs_in_function_names() {
    let report = Runner::new(stub()).run(&projects()).unwrap();

    let alpha = &report.projects[0];
    assert_eq!(alpha.files_scanned, 3);
    assert_eq!(alpha.parse_failures, 1);
    assert_eq!(
        alpha.ranking,
        ranking(&[("get", 2), ("load", 1), ("set", 1)])
    );

    let beta = &report.projects[1];
    assert_eq!(beta.files_scanned, 1);
    assert_eq!(beta.ranking, ranking(&[("get", 2), ("load", 1)]));

    assert_eq!(report.total_words, 5);
    assert_eq!(report.unique_words, 3);
    assert_eq!(
        report.ranking,
        vec![
            entry("get", 2, 2),
            entry("load", 1, 2),
            entry("set", 1, 1),
        ]
    );
}

#[test]
fn test_nouns_in_variable_names() {
    let report = Runner::new(stub())
        .kind(IdentifierKind::Variables)
        .tag_set(TagSet::nouns())
        .run(&[corpus_path().join("beta")])
        .unwrap();

    assert_eq!(
        report.projects[0].ranking,
        ranking(&[("path", 3), ("config", 2), ("items", 2)])
    );
}

#[test]
fn test_top_global_truncates_merge() {
    let report = Runner::new(stub()).top_global(2).run(&projects()).unwrap();
    assert_eq!(report.ranking, vec![entry("get", 2, 2), entry("load", 1, 2)]);
    // Totals describe the whole multiset, not the truncated ranking
    assert_eq!(report.total_words, 5);
}

#[test]
fn test_top_per_project_truncates_before_merge() {
    let report = Runner::new(stub()).top_per_project(1).run(&projects()).unwrap();
    assert_eq!(report.total_words, 2);
    assert_eq!(report.ranking, vec![entry("get", 2, 2)]);
}

#[test]
fn test_global_count_bounded_by_local_counts() {
    let report = Runner::new(stub()).run(&projects()).unwrap();
    for merged in &report.ranking {
        let local_sum: usize = report
            .projects
            .iter()
            .flat_map(|p| p.ranking.iter())
            .filter(|(w, _)| *w == merged.word)
            .map(|(_, n)| n)
            .sum();
        assert!(merged.global_count <= local_sum, "{:?}", merged);
    }
}

#[test]
fn test_runs_are_idempotent() {
    let first = Runner::new(stub()).run(&projects()).unwrap();
    let second = Runner::new(stub()).run(&projects()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = Runner::new(stub()).run(&projects()).unwrap();
    let parallel = Runner::new(stub()).parallel(true).run(&projects()).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_excluded_paths() {
    let locator = Locator::new(&["py"]).exclude(&["util/**"]).unwrap();
    let report = Runner::new(stub())
        .locator(locator)
        .run(&[corpus_path().join("alpha")])
        .unwrap();

    assert_eq!(report.projects[0].files_scanned, 2);
    assert!(report.ranking.iter().all(|e| e.word != "set"));
}

#[test]
fn test_lexicon_classifier_end_to_end() {
    let report = Runner::new(Box::new(LexiconClassifier::new()))
        .run(&projects())
        .unwrap();
    let words: Vec<_> = report.ranking.iter().map(|e| e.word.as_str()).collect();
    assert_eq!(words, vec!["get", "load", "set"]);
}

#[test]
fn test_project_without_python_files() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("notes.txt"), "def not_python(): pass").unwrap();

    let report = Runner::new(stub()).run(&[temp.path().to_path_buf()]).unwrap();
    assert_eq!(report.projects[0].files_scanned, 0);
    assert_eq!(report.total_words, 0);
    assert_eq!(report.unique_words, 0);
    assert!(report.is_empty());
}

#[test]
fn test_no_projects() {
    let report = Runner::new(stub()).run(&[]).unwrap();
    assert!(report.projects.is_empty());
    assert!(report.is_empty());
}

#[test]
fn test_missing_project_aborts() {
    let err = Runner::new(stub())
        .run(&[corpus_path().join("alpha"), corpus_path().join("gamma")])
        .unwrap_err();
    assert!(format!("{:#}", err).contains("gamma"));
}

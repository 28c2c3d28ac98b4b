//! Tests for report output formats.
//!
//! These run the pipeline over testdata/corpus and check the console,
//! JSON and CSV renderings byte for byte.

use std::path::PathBuf;

use namestat::report::{self, write_console, write_csv, write_json, ReportFormat};
use namestat::{CorpusReport, LexiconClassifier, Runner};
use tempfile::TempDir;

fn corpus_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("corpus")
}

fn run_corpus() -> CorpusReport {
    Runner::new(Box::new(LexiconClassifier::new()))
        .run(&[corpus_path().join("alpha"), corpus_path().join("beta")])
        .expect("corpus run should succeed")
}

#[test]
fn test_console_output() {
    let mut out = Vec::new();
    write_console(&mut out, &run_corpus()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "total 5 words, 3 unique\nget 2 2\nload 1 2\nset 1 1\n"
    );
}

#[test]
fn test_json_output() {
    let mut out = Vec::new();
    write_json(&mut out, &run_corpus()).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let object = value.as_object().expect("top level should be an object");
    let keys: Vec<_> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["get", "load", "set"]);
    assert_eq!(object["get"], serde_json::json!([2, 2]));
    assert_eq!(object["set"], serde_json::json!([1, 1]));
}

#[test]
fn test_csv_output() {
    let mut out = Vec::new();
    write_csv(&mut out, &run_corpus()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "get,2,2\r\nload,1,2\r\nset,1,1\r\n"
    );
}

#[test]
fn test_render_json_to_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.json");
    report::render(ReportFormat::Json, &run_corpus(), Some(&path)).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 3);
}

#[test]
fn test_empty_corpus_outputs() {
    let empty = CorpusReport::default();

    let mut console = Vec::new();
    write_console(&mut console, &empty).unwrap();
    assert_eq!(String::from_utf8(console).unwrap(), "total 0 words, 0 unique\n");

    let mut json = Vec::new();
    write_json(&mut json, &empty).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert!(value.as_object().unwrap().is_empty());

    let mut csv = Vec::new();
    write_csv(&mut csv, &empty).unwrap();
    assert!(csv.is_empty());
}

//! Output formatting for corpus reports.
//!
//! Supports three output formats:
//! - Console: a summary line and one `word local global` line per entry
//! - JSON: an object mapping word to `[local_count, global_count]`
//! - CSV: `word,local_count,global_count` rows without a header

use anyhow::Context;
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::analysis::CorpusReport;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
    Csv,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!(
                "invalid report format {:?}, must be 'console', 'json', or 'csv'",
                s
            )),
        }
    }
}

/// Write `report` in `format`.
///
/// Console output always goes to stdout. JSON and CSV go to `output` when
/// given, else stdout. The output file is created before anything is
/// rendered, and the report is rendered fully before it is written.
pub fn render(
    format: ReportFormat,
    report: &CorpusReport,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let target = match (format, output) {
        (ReportFormat::Console, _) | (_, None) => None,
        (_, Some(path)) => Some((
            path,
            File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?,
        )),
    };

    let mut buf = Vec::new();
    match format {
        ReportFormat::Console => write_console(&mut buf, report)?,
        ReportFormat::Json => write_json(&mut buf, report)?,
        ReportFormat::Csv => write_csv(&mut buf, report)?,
    }

    match target {
        Some((path, file)) => {
            let mut writer = BufWriter::new(file);
            writer
                .write_all(&buf)
                .and_then(|_| writer.flush())
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&buf)?;
            lock.flush()?;
        }
    }
    Ok(())
}

/// Write the console report.
pub fn write_console<W: Write>(out: &mut W, report: &CorpusReport) -> io::Result<()> {
    writeln!(
        out,
        "total {} words, {} unique",
        report.total_words, report.unique_words
    )?;
    for entry in &report.ranking {
        writeln!(
            out,
            "{} {} {}",
            entry.word, entry.local_count, entry.global_count
        )?;
    }
    Ok(())
}

/// Write the JSON report.
///
/// Keys follow ranking order. A word ranked twice (with different local
/// counts) keeps its first position and takes the later entry's value.
pub fn write_json<W: Write>(out: &mut W, report: &CorpusReport) -> anyhow::Result<()> {
    let mut object = Map::new();
    for entry in &report.ranking {
        object.insert(
            entry.word.clone(),
            json!([entry.local_count, entry.global_count]),
        );
    }

    serde_json::to_writer_pretty(&mut *out, &Value::Object(object))?;
    writeln!(out)?;
    Ok(())
}

/// Write the CSV report.
pub fn write_csv<W: Write>(out: &mut W, report: &CorpusReport) -> io::Result<()> {
    for entry in &report.ranking {
        write!(
            out,
            "{},{},{}\r\n",
            csv_field(&entry.word),
            entry.local_count,
            entry.global_count
        )?;
    }
    Ok(())
}

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MergedEntry;
    use tempfile::TempDir;

    fn sample() -> CorpusReport {
        let entries = [("get", 5, 2), ("set", 3, 1), ("get", 2, 1)];
        CorpusReport {
            projects: Vec::new(),
            total_words: 4,
            unique_words: 3,
            ranking: entries
                .iter()
                .map(|(w, l, g)| MergedEntry {
                    word: w.to_string(),
                    local_count: *l,
                    global_count: *g,
                })
                .collect(),
        }
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("json".parse(), Ok(ReportFormat::Json));
        assert_eq!("CSV".parse(), Ok(ReportFormat::Csv));
        assert_eq!("console".parse(), Ok(ReportFormat::Console));
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_write_console() {
        let mut out = Vec::new();
        write_console(&mut out, &sample()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "total 4 words, 3 unique\nget 5 2\nset 3 1\nget 2 1\n"
        );
    }

    #[test]
    fn test_write_console_empty() {
        let mut out = Vec::new();
        write_console(&mut out, &CorpusReport::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "total 0 words, 0 unique\n");
    }

    #[test]
    fn test_write_json_duplicate_word_keeps_first_position() {
        let mut out = Vec::new();
        write_json(&mut out, &sample()).unwrap();

        let value: Value = serde_json::from_slice(&out).unwrap();
        let object = value.as_object().unwrap();
        let keys: Vec<_> = object.keys().cloned().collect();
        assert_eq!(keys, vec!["get", "set"]);
        assert_eq!(object["get"], json!([2, 1]));
        assert_eq!(object["set"], json!([3, 1]));
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &sample()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "get,5,2\r\nset,3,1\r\nget,2,1\r\n"
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.csv");
        render(ReportFormat::Csv, &sample(), Some(&path)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "get,5,2\r\nset,3,1\r\nget,2,1\r\n"
        );
    }

    #[test]
    fn test_render_unwritable_output() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("report.json");
        let err = render(ReportFormat::Json, &sample(), Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("report.json"));
        assert!(!path.exists());
    }
}

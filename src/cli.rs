//! Command-line interface for namestat.

use clap::Parser;
use colored::*;
use std::path::PathBuf;

use crate::analysis::{IdentifierKind, Locator, Runner};
use crate::classify::{
    LexiconClassifier, RemoteClassifier, RemoteSettings, TagCache, WordClassifier,
};
use crate::config::{ClassifierKind, Config};
use crate::parser::{PythonTreeBuilder, SyntaxTreeBuilder};
use crate::repos;
use crate::report::{self, ReportFormat};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Part-of-speech statistics for identifiers in Python projects.
///
/// Splits function or variable names into words, keeps the words of one
/// part of speech, and ranks them per project and across all projects.
#[derive(Parser)]
#[command(name = "namestat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Remove every directory inside the repos directory first
    #[arg(long, visible_alias = "clear-local-repos-directory")]
    pub clear: bool,

    /// Clone the configured repositories into the repos directory
    #[arg(short, long)]
    pub clone: bool,

    /// Do not build statistics
    #[arg(short = 'n', long)]
    pub do_not_count: bool,

    /// Part of speech: verbs, nouns, or a tag set from the config
    #[arg(short, long, default_value = "verbs")]
    pub part: String,

    /// Search in function names or variable names: functions or variables
    #[arg(short, long, visible_alias = "search_in", default_value = "functions")]
    pub search_in: String,

    /// Report format: console, json, or csv
    #[arg(short, long, visible_alias = "report_format", default_value = "console")]
    pub report_format: String,

    /// Write json or csv output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project root to scan (repeatable; default: every directory in the repos directory)
    #[arg(long = "project")]
    pub projects: Vec<PathBuf>,

    /// Scan projects in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Run namestat with parsed arguments.
pub fn run(args: &Cli) -> anyhow::Result<i32> {
    // Validate choices before touching the filesystem
    let kind: IdentifierKind = args.search_in.parse().map_err(anyhow::Error::msg)?;
    let format: ReportFormat = args.report_format.parse().map_err(anyhow::Error::msg)?;

    let cwd = std::env::current_dir()?;
    let config = Config::load(args.config.as_deref(), &cwd)?;
    let tag_set = config.tag_set(&args.part)?;
    let repos_dir = config.repos_dir();

    if args.clear {
        let removed = repos::clear(&repos_dir)?;
        eprintln!(
            "{} {} entries from {}",
            "Cleared".green(),
            removed,
            repos_dir.display()
        );
    }

    if args.clone {
        let cloned = repos::clone_all(&config.repositories(), &repos_dir)?;
        eprintln!("{} {} repositories", "Cloned".green(), cloned.len());
    }

    if args.do_not_count {
        return Ok(EXIT_SUCCESS);
    }

    if format == ReportFormat::Console && args.output.is_some() {
        eprintln!(
            "{} --output is ignored for console reports",
            "Warning:".yellow()
        );
    }

    let projects = if !args.projects.is_empty() {
        args.projects.clone()
    } else if !config.projects.is_empty() {
        config.projects.clone()
    } else {
        repos::list_projects(&repos_dir)?
    };
    if projects.is_empty() {
        eprintln!("{} no projects to scan", "Warning:".yellow());
    }

    let classifier = build_classifier(&config)?;
    let locator = Locator::new(PythonTreeBuilder::new().file_extensions())
        .exclude(config.excluded_paths.as_slice())?;
    let runner = Runner::new(classifier)
        .kind(kind)
        .tag_set(tag_set)
        .top_per_project(config.top_per_project())
        .top_global(config.top_global())
        .locator(locator)
        .parallel(args.parallel);

    let result = runner.run(&projects)?;

    let failures: usize = result.projects.iter().map(|p| p.parse_failures).sum();
    let mut summary = format!(
        "{} {} projects, {} files",
        "Scanned".green(),
        result.projects.len(),
        result.files_scanned()
    );
    if failures > 0 {
        summary.push_str(&format!(" ({} unparsable)", failures).yellow().to_string());
    }
    eprintln!("{}", summary);

    report::render(format, &result, args.output.as_deref())?;
    Ok(EXIT_SUCCESS)
}

/// Build the classifier selected in the config.
fn build_classifier(config: &Config) -> anyhow::Result<Box<dyn WordClassifier>> {
    let settings = &config.classifier;
    match settings.kind {
        ClassifierKind::Lexicon => Ok(Box::new(LexiconClassifier::with_overrides(
            config.lexicon_overrides(),
        ))),
        ClassifierKind::Remote => {
            let endpoint = settings
                .endpoint
                .clone()
                .ok_or_else(|| anyhow::anyhow!("classifier kind 'remote' requires an endpoint"))?;
            let remote = RemoteClassifier::new(
                RemoteSettings {
                    endpoint,
                    batch_size: settings.batch_size(),
                    concurrency: settings.concurrency(),
                    timeout: settings.timeout(),
                },
                TagCache::new(settings.cache_ttl_hours()),
            )?;
            Ok(Box::new(remote))
        }
    }
}

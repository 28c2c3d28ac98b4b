//! Source file discovery under a project root.

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Hard cap on files taken from one project root.
pub const MAX_FILES: usize = 100;

/// Finds source files by extension, skipping excluded paths.
#[derive(Debug, Clone)]
pub struct Locator {
    extensions: Vec<String>,
    excluded: GlobSet,
}

impl Locator {
    /// Create a locator for the given extensions (without dot).
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.as_ref().to_string()).collect(),
            excluded: GlobSet::empty(),
        }
    }

    /// Skip files whose path relative to the root matches any pattern.
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern.as_ref()).with_context(|| {
                format!("invalid excluded_paths pattern {:?}", pattern.as_ref())
            })?;
            builder.add(glob);
        }
        self.excluded = builder.build()?;
        Ok(self)
    }

    /// Enumerate matching files under `root`, top-down, up to `MAX_FILES`.
    ///
    /// Within a directory, files are visited before subdirectories and each
    /// group in file-name order, so the result is the same on every platform.
    /// Walk errors (unreadable root or directory) are returned.
    pub fn locate(&self, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by(files_first) {
            let entry = entry.with_context(|| format!("walking {}", root.display()))?;
            if !is_file(&entry) || !self.has_extension(&entry) {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.excluded.is_match(relative) {
                continue;
            }

            files.push(path.to_path_buf());
            if files.len() == MAX_FILES {
                break;
            }
        }

        Ok(files)
    }

    fn has_extension(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.extensions
            .iter()
            .any(|ext| name.len() > ext.len() + 1 && name.ends_with(&format!(".{}", ext)))
    }
}

/// Regular files, including symlinks that resolve to one.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Files before directories, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

//! Local repository checkouts: listing, clearing and cloning.

use anyhow::Context;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Repository;

/// Every directory directly under `repos_dir`, sorted by name.
pub fn list_projects(repos_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(repos_dir)
        .with_context(|| format!("listing projects in {}", repos_dir.display()))?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing projects in {}", repos_dir.display()))?;
        if entry.file_type()?.is_dir() {
            projects.push(entry.path());
        }
    }
    projects.sort();
    Ok(projects)
}

/// Remove everything inside `repos_dir`, keeping the directory itself.
///
/// Returns the number of entries removed. A missing directory is empty.
pub fn clear(repos_dir: &Path) -> anyhow::Result<usize> {
    if !repos_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(repos_dir)
        .with_context(|| format!("clearing {}", repos_dir.display()))?
    {
        let path = entry?.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.with_context(|| format!("removing {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

/// Clone each repository into `repos_dir/<name>`.
///
/// Existing checkouts are left alone. A failed clone is logged and skipped.
/// Returns the paths of the new checkouts.
pub fn clone_all(repos: &[Repository], repos_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(repos_dir)
        .with_context(|| format!("creating {}", repos_dir.display()))?;

    let mut cloned = Vec::new();
    for repo in repos {
        let target = repos_dir.join(repo.name());
        if target.exists() {
            info!("{} already exists, skipping clone", target.display());
            continue;
        }

        match git_clone(&repo.url, &target) {
            Ok(()) => {
                info!("cloned {} into {}", repo.url, target.display());
                cloned.push(target);
            }
            Err(e) => warn!("could not clone {}: {:#}", repo.url, e),
        }
    }
    Ok(cloned)
}

fn git_clone(url: &str, target: &Path) -> anyhow::Result<()> {
    let output = Command::new("git")
        .arg("clone")
        .arg("--quiet")
        .arg(url)
        .arg(target)
        .output()
        .context("running git")?;

    if !output.status.success() {
        anyhow::bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
    }
    Ok(())
}

//
//  discovery.rs
//  graphgen
//

//! Candidate file discovery.
//!
//! Walks the root with the `ignore` walker, prunes excluded directories
//! before descending into them, and keeps files whose root-relative path
//! matches one of the glob patterns.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, Walk, WalkBuilder};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Directory names skipped unless the caller configures a different list.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    "dist",
    "build",
    "target",
    ".mypy_cache",
    ".pytest_cache",
];

/// Project-local ignore file, read with gitignore syntax.
pub const IGNORE_FILE: &str = ".graphgenignore";

/// Walker behaviour that is not expressed by patterns or excludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub respect_gitignore: bool,
    pub include_hidden: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            include_hidden: false,
        }
    }
}

/// The default exclude list as owned strings.
pub fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

/// True for a directory below the root whose name is excluded. The root
/// itself is never pruned, so a project living under `build/` still walks.
fn is_pruned(entry: &DirEntry, excludes: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && excludes.iter().any(|e| entry.file_name() == e.as_str())
}

/// Regular files, plus symlinks that do not point at a directory. A dangling
/// link is kept so that reading it fails like any other unreadable file.
fn is_candidate(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
        _ => false,
    }
}

fn walker(root: &Path, excludes: &[String], options: DiscoveryOptions) -> Walk {
    let excludes = excludes.to_vec();
    WalkBuilder::new(root)
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .parents(false)
        .add_custom_ignore_filename(IGNORE_FILE)
        .sort_by_file_path(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if is_pruned(entry, &excludes) {
                debug!(dir = %entry.path().display(), "excluded");
                return false;
            }
            true
        })
        .build()
}

/// Root-relative path with forward slashes, as used in node ids.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Find every file under `root` matching one of `patterns`, skipping
/// excluded directories. The result is sorted by path so repeated runs
/// visit files in the same order.
pub fn find_files(
    root: &Path,
    patterns: &[String],
    excludes: &[String],
    options: DiscoveryOptions,
) -> Result<Vec<PathBuf>> {
    let globs = compile_patterns(patterns)?;
    if globs.is_empty() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in walker(root, excludes, options) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "walk error");
                continue;
            }
        };
        if is_candidate(&entry) && globs.is_match(relative_path(root, entry.path())) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "discovered files");
    Ok(files)
}

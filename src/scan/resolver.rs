//! Glob expansion over the filesystem

use crate::error::Result;
use crate::scan::{has_glob, resolve_path};
use globset::GlobBuilder;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Expands glob patterns relative to a working directory.
///
/// Only the pattern's literal base directory is walked. Results are sorted so
/// that files merge in a deterministic order.
#[derive(Debug, Clone)]
pub struct GlobResolver {
    cwd: PathBuf,
    dot: bool,
}

impl GlobResolver {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd, dot: false }
    }

    /// Set whether dotfiles and dot-directories can match
    pub fn dot(mut self, dot: bool) -> Self {
        self.dot = dot;
        self
    }

    /// Resolve `pattern` to the list of matching files.
    ///
    /// A pattern with no matches (or whose base directory is missing) yields an
    /// empty list rather than an error.
    pub fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        let (base, rest) = split_base(pattern);
        let base_dir = if base.is_empty() { self.cwd.clone() } else { resolve_path(Some(&self.cwd), &base) };

        if rest.is_empty() {
            return Ok(if base_dir.is_file() { vec![base_dir] } else { Vec::new() });
        }
        if !base_dir.is_dir() {
            tracing::debug!("glob base {} does not exist", base_dir.display());
            return Ok(Vec::new());
        }

        let matcher = GlobBuilder::new(&rest).literal_separator(true).build()?.compile_matcher();

        let mut walker = WalkDir::new(&base_dir).min_depth(1).follow_links(true);
        if !rest.contains("**") {
            walker = walker.max_depth(rest.split('/').count());
        }

        let dot = self.dot;
        let mut files = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| dot || !is_hidden(e)) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!("skipping unreadable entry while globbing: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&base_dir) {
                Ok(p) => p.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };
            if matcher.is_match(&rel) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!("glob '{}' matched {} file(s)", pattern, files.len());
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// Split a pattern into its literal leading directory and the glob remainder.
fn split_base(pattern: &str) -> (String, String) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let idx = segments.iter().position(|s| has_glob(s)).unwrap_or(segments.len());
    (segments[..idx].join("/"), segments[idx..].join("/"))
}

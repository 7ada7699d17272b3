//! Glob detection and resolution of data file patterns

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

pub mod resolver;

pub use resolver::GlobResolver;

/// Glob metacharacters, brace/bracket sets, extglobs, and leading negation.
static GLOB_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*?\[\]{}]|[@+!]\(|^!").expect("valid regex"));

/// Returns true if `pattern` contains glob syntax.
pub fn has_glob(pattern: &str) -> bool {
    GLOB_CHARS.is_match(pattern)
}

/// Join a relative path onto `cwd`; absolute paths are returned as-is.
pub fn resolve_path(cwd: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match cwd {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

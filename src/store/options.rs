//! Options controlling how loaded files are resolved and namespaced

use crate::error::{DataError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Computes a cache key from a file path.
pub type RenameFn = Arc<dyn Fn(&Path) -> String + Send + Sync>;

/// Option names recognized in a JSON options object.
pub const OPTION_KEYS: &[&str] = &["namespace", "cwd", "dot"];

/// How a loaded file's content is nested in the cache.
#[derive(Clone)]
pub enum Namespace {
    /// Merge directly onto the cache root
    Off,
    /// Nest under the file name without its extension
    Basename,
    Literal(String),
    With(RenameFn),
}

impl Namespace {
    pub fn with<F>(rename: F) -> Self
    where
        F: Fn(&Path) -> String + Send + Sync + 'static,
    {
        Namespace::With(Arc::new(rename))
    }
}

impl From<bool> for Namespace {
    fn from(enabled: bool) -> Self {
        if enabled {
            Namespace::Basename
        } else {
            Namespace::Off
        }
    }
}

impl From<&str> for Namespace {
    fn from(key: &str) -> Self {
        Namespace::Literal(key.to_string())
    }
}

impl From<String> for Namespace {
    fn from(key: String) -> Self {
        Namespace::Literal(key)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Off => f.write_str("Off"),
            Namespace::Basename => f.write_str("Basename"),
            Namespace::Literal(key) => f.debug_tuple("Literal").field(key).finish(),
            Namespace::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

/// File name of `path` without its extension.
pub fn basename(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Options for file loading. Unset fields fall through to the next layer
/// (call site over host over defaults).
#[derive(Clone, Default)]
pub struct Options {
    pub namespace: Option<Namespace>,
    pub rename_key: Option<RenameFn>,
    pub cwd: Option<PathBuf>,
    pub dot: Option<bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn rename_key<F>(mut self, rename: F) -> Self
    where
        F: Fn(&Path) -> String + Send + Sync + 'static,
    {
        self.rename_key = Some(Arc::new(rename));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn dot(mut self, dot: bool) -> Self {
        self.dot = Some(dot);
        self
    }

    /// Layer `other` over `self`; fields set in `other` win.
    pub fn overlay(mut self, other: &Options) -> Options {
        if other.namespace.is_some() {
            self.namespace = other.namespace.clone();
        }
        if other.rename_key.is_some() {
            self.rename_key = other.rename_key.clone();
        }
        if other.cwd.is_some() {
            self.cwd = other.cwd.clone();
        }
        if other.dot.is_some() {
            self.dot = other.dot;
        }
        self
    }

    /// Key to nest a file's content under, or `None` to merge at the root.
    ///
    /// `rename_key` takes precedence over `namespace`.
    pub fn namespace_key(&self, path: &Path) -> Option<String> {
        if let Some(rename) = &self.rename_key {
            return Some(rename(path));
        }
        match self.namespace.as_ref()? {
            Namespace::Off => None,
            Namespace::Basename => Some(basename(path)),
            Namespace::Literal(key) => Some(key.clone()),
            Namespace::With(rename) => Some(rename(path)),
        }
    }

    /// True if `map` is non-empty and holds only recognized option names.
    pub fn is_options_map(map: &Map<String, Value>) -> bool {
        !map.is_empty() && map.keys().all(|k| OPTION_KEYS.contains(&k.as_str()))
    }

    /// Parse call-site options from a JSON object. Unknown keys are ignored.
    pub fn from_json(map: &Map<String, Value>) -> Result<Options> {
        let mut options = Options::new();
        match map.get("namespace") {
            None | Some(Value::Null) => {}
            Some(Value::Bool(enabled)) => options.namespace = Some((*enabled).into()),
            Some(Value::String(key)) => options.namespace = Some(key.as_str().into()),
            Some(other) => {
                return Err(DataError::invalid_option(
                    "namespace",
                    format!("expected a boolean or string, got {}", other),
                ))
            }
        }
        match map.get("cwd") {
            None | Some(Value::Null) => {}
            Some(Value::String(dir)) => options.cwd = Some(PathBuf::from(dir)),
            Some(other) => {
                return Err(DataError::invalid_option("cwd", format!("expected a string, got {}", other)))
            }
        }
        match map.get("dot") {
            None | Some(Value::Null) => {}
            Some(Value::Bool(dot)) => options.dot = Some(*dot),
            Some(other) => {
                return Err(DataError::invalid_option("dot", format!("expected a boolean, got {}", other)))
            }
        }
        Ok(options)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("namespace", &self.namespace)
            .field("rename_key", &self.rename_key.as_ref().map(|_| "<fn>"))
            .field("cwd", &self.cwd)
            .field("dot", &self.dot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_namespace_key_variants() {
        let path = Path::new("fixtures/a.json");
        assert_eq!(Options::new().namespace_key(path), None);
        assert_eq!(Options::new().namespace(false).namespace_key(path), None);
        assert_eq!(Options::new().namespace(true).namespace_key(path), Some("a".to_string()));
        assert_eq!(Options::new().namespace("abc").namespace_key(path), Some("abc".to_string()));

        let custom = Options::new().namespace(Namespace::with(|p| format!("foo-{}", basename(p))));
        assert_eq!(custom.namespace_key(path), Some("foo-a".to_string()));
    }

    #[test]
    fn test_rename_key_takes_precedence() {
        let options = Options::new().namespace("abc").rename_key(|p| format!("renamed-{}", basename(p)));
        assert_eq!(options.namespace_key(Path::new("x/b.yml")), Some("renamed-b".to_string()));
    }

    #[test]
    fn test_overlay_later_fields_win() {
        let defaults = Options::new().namespace(true).cwd("fixtures");
        let call = Options::new().namespace(false);
        let effective = defaults.overlay(&call);
        assert!(matches!(effective.namespace, Some(Namespace::Off)));
        assert_eq!(effective.cwd, Some(PathBuf::from("fixtures")));
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(&map(json!({"namespace": "abc", "cwd": "fixtures", "dot": true})))
            .unwrap();
        assert!(matches!(options.namespace, Some(Namespace::Literal(ref k)) if k == "abc"));
        assert_eq!(options.cwd, Some(PathBuf::from("fixtures")));
        assert_eq!(options.dot, Some(true));
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let err = Options::from_json(&map(json!({"namespace": 3}))).unwrap_err();
        assert!(err.to_string().contains("namespace"));
        assert!(Options::from_json(&map(json!({"cwd": false}))).is_err());
    }

    #[test]
    fn test_is_options_map() {
        assert!(Options::is_options_map(&map(json!({"namespace": true}))));
        assert!(Options::is_options_map(&map(json!({"cwd": "x", "dot": false}))));
        assert!(!Options::is_options_map(&map(json!({"b": "c"}))));
        assert!(!Options::is_options_map(&Map::new()));
    }
}

//! Config file discovery and figment layering

use crate::error::{DataError, Result};
use crate::store::{Namespace, Options, DEFAULT_PROP};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "DATA_CACHE_";

const CANDIDATES: &[&str] =
    &["data-cache.toml", ".data-cache.toml", "data-cache.yaml", "data-cache.yml"];

/// `namespace` as it can be written in a config file: a flag or a fixed key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamespaceSetting {
    Enabled(bool),
    Key(String),
}

impl From<&NamespaceSetting> for Namespace {
    fn from(setting: &NamespaceSetting) -> Self {
        match setting {
            NamespaceSetting::Enabled(enabled) => Namespace::from(*enabled),
            NamespaceSetting::Key(key) => Namespace::Literal(key.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Dot-path of the cache inside the host object
    pub prop: String,
    pub namespace: Option<NamespaceSetting>,
    /// Base directory for globs and relative file paths
    pub cwd: Option<PathBuf>,
    /// Let globs match dotfiles
    pub dot: bool,
    /// Register the YAML and TOML loaders in addition to JSON
    pub builtin_loaders: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prop: DEFAULT_PROP.to_string(),
            namespace: None,
            cwd: None,
            dot: false,
            builtin_loaders: false,
        }
    }
}

impl StoreConfig {
    /// Default-layer options for a store built from this config.
    pub fn options(&self) -> Options {
        Options {
            namespace: self.namespace.as_ref().map(Namespace::from),
            rename_key: None,
            cwd: self.cwd.clone(),
            dot: Some(self.dot),
        }
    }
}

/// Load configuration for a store rooted at `base_dir`.
///
/// An explicit `config_path` must exist and parse. An auto-discovered file
/// that fails to parse is reported and ignored.
pub fn load_config(base_dir: &Path, config_path: Option<&Path>) -> Result<StoreConfig> {
    if let Some(path) = config_path {
        if !path.is_file() {
            let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found");
            return Err(DataError::failed_read(path, missing));
        }
        return extract(Some(path));
    }

    let discovered = discover_config(base_dir);
    match extract(discovered.as_deref()) {
        Ok(config) => Ok(config),
        Err(err) => match discovered {
            Some(path) => {
                tracing::warn!("Failed to parse auto-discovered config {}: {}", path.display(), err);
                extract(None)
            }
            None => Err(err),
        },
    }
}

fn extract(file: Option<&Path>) -> Result<StoreConfig> {
    let mut figment = Figment::from(Serialized::defaults(StoreConfig::default()));

    if let Some(path) = file {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        figment = match ext.as_str() {
            "toml" => figment.merge(Toml::file(path)),
            "yaml" | "yml" => figment.merge(Yaml::file(path)),
            other => {
                return Err(DataError::invalid_option(
                    "config",
                    format!("unsupported config extension '.{}' for file {}", other, path.display()),
                ))
            }
        };
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX)).extract()?)
}

fn discover_config(base_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| base_dir.join(name)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.prop, "cache.data");
        assert!(cfg.namespace.is_none());
        assert!(!cfg.builtin_loaders);
    }

    #[test]
    fn test_discovered_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("data-cache.toml"),
            "prop = \"site.data\"\nnamespace = true\nbuiltin_loaders = true\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.prop, "site.data");
        assert_eq!(cfg.namespace, Some(NamespaceSetting::Enabled(true)));
        assert!(cfg.builtin_loaders);
    }

    #[test]
    fn test_explicit_yaml_with_string_namespace() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.yml");
        fs::write(&path, "namespace: pages\ncwd: content\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.namespace, Some(NamespaceSetting::Key("pages".to_string())));
        assert_eq!(cfg.cwd, Some(PathBuf::from("content")));
        assert!(matches!(cfg.options().namespace, Some(Namespace::Literal(ref k)) if k == "pages"));
    }

    #[test]
    fn test_explicit_missing_is_error() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config(tmp.path(), Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(DataError::FailedRead { .. })));
    }

    #[test]
    fn test_explicit_invalid_type_is_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "dot = \"sometimes\"\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(matches!(result, Err(DataError::Config(_))));
    }

    #[test]
    fn test_auto_discovered_invalid_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("data-cache.toml"), "dot = \"sometimes\"\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, StoreConfig::default());
    }
}

//! Shared CLI utilities: store flags and input parsing.

use anyhow::{Context, Result};
use clap::Args;
use data_cache::config::NamespaceSetting;
use data_cache::scan::has_glob;
use data_cache::{load_config, DataInput, DataStore};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory that globs and relative paths are resolved against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Nest each file under its basename, or under NAME when given
    #[arg(long, value_name = "NAME", num_args = 0..=1, require_equals = true)]
    pub namespace: Option<Option<String>>,

    /// Dot-path of the cache inside the host object
    #[arg(long, value_name = "PATH")]
    pub prop: Option<String>,

    /// Config file (TOML or YAML); defaults to data-cache.toml/.yaml if present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable the YAML and TOML loaders
    #[arg(long)]
    pub all_loaders: bool,

    /// Let globs match dotfiles
    #[arg(long)]
    pub dot: bool,
}

impl StoreArgs {
    /// Build a store from the discovered config with CLI flags applied on top.
    pub fn build_store(&self) -> Result<DataStore> {
        let base_dir = match &self.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let mut config = load_config(&base_dir, self.config.as_deref())
            .context("Failed to load data-cache configuration")?;

        if let Some(cwd) = &self.cwd {
            config.cwd = Some(cwd.clone());
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = Some(match namespace {
                Some(name) => NamespaceSetting::Key(name.clone()),
                None => NamespaceSetting::Enabled(true),
            });
        }
        if let Some(prop) = &self.prop {
            config.prop = prop.clone();
        }
        config.builtin_loaders |= self.all_loaders;
        config.dot |= self.dot;

        tracing::debug!("store config: {:?}", config);
        Ok(DataStore::from_config(&config))
    }
}

/// Parse a command-line input: `key=value` writes a key (value parsed as JSON
/// when possible), anything else is a file path or glob.
pub fn parse_input(raw: &str) -> DataInput {
    if let Some((key, value)) = raw.split_once('=') {
        if !key.is_empty() && !key.contains('/') && !has_glob(key) {
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            return DataInput::set(key, value);
        }
    }
    DataInput::file(raw)
}

pub fn load_inputs(store: &mut DataStore, inputs: &[String]) -> Result<()> {
    for raw in inputs {
        store.data(parse_input(raw)).with_context(|| format!("Failed to load '{}'", raw))?;
    }
    Ok(())
}

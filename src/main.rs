//! data-cache: load data files and literals into a namespaced cache
//!
//! Loads JSON (and optionally YAML/TOML) data files, globs, and key/value
//! pairs into a cache and prints the merged result.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}

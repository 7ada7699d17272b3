//! Error types for the data cache
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow` with context.

use std::path::PathBuf;
use thiserror::Error;

/// Message used when `data()` receives something other than a string, array or object.
pub const INVALID_KEY_MESSAGE: &str = "expected value to be a string, array or object.";

#[derive(Error, Debug)]
pub enum DataError {
    /// The argument shape passed to `data()` is not supported
    #[error("{0}")]
    InvalidKey(String),

    /// A call-site option has the wrong type
    #[error("invalid option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    /// An empty dot-path was used where a key is required
    #[error("empty key path")]
    EmptyKey,

    /// An explicitly named file could not be read
    #[error("failed to read data file: {path}: {source}")]
    FailedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A loader could not parse a file's content
    #[error("failed to parse {format} data in {path}: {message}")]
    Parse { path: PathBuf, format: &'static str, message: String },

    /// Error raised by a user-registered loader
    #[error("loader error: {0}")]
    Loader(String),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    pub fn invalid_key() -> Self {
        Self::InvalidKey(INVALID_KEY_MESSAGE.to_string())
    }

    pub fn invalid_option(name: &str, message: impl ToString) -> Self {
        Self::InvalidOption { name: name.to_string(), message: message.to_string() }
    }

    pub fn failed_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FailedRead { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, format: &'static str, message: impl ToString) -> Self {
        Self::Parse { path: path.into(), format, message: message.to_string() }
    }
}

impl From<figment::Error> for DataError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

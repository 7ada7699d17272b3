//! data-cache: a namespaced data cache filled from literals or data files
//!
//! A [`DataStore`] keeps a nested JSON cache at a dot-path of a host object.
//! Callers populate it with mappings, key/value pairs, or file paths and globs;
//! files are parsed by extension-matched [loaders](loader) and deep-merged in,
//! optionally nested under a namespace key derived from each file.
//!
//! ```no_run
//! use data_cache::{DataInput, DataStore, Options};
//!
//! let mut store = DataStore::new();
//! store
//!     .data(DataInput::set("title", "Docs"))?
//!     .data(DataInput::file_with("data/*.json", Options::new().namespace(true)))?;
//! println!("{:?}", store.get("title"));
//! # Ok::<(), data_cache::DataError>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod scan;
pub mod store;
pub mod utils;

pub use config::{load_config, StoreConfig};
pub use error::{DataError, Result};
pub use loader::{LoaderInput, LoaderRegistry, Matcher};
pub use store::{DataInput, DataStore, Namespace, Options, DEFAULT_PROP};

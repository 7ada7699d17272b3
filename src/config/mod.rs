//! Store configuration
//!
//! Layers defaults, an optional config file, and `DATA_CACHE_*` environment
//! variables (Env > File > Defaults). CLI flags are applied on top by the binary.

pub mod loader;

pub use loader::{load_config, NamespaceSetting, StoreConfig, ENV_PREFIX};

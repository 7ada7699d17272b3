//! Data loaders: extension-matched transforms from file content to values
//!
//! Loaders are kept in registration order. Every loader whose matcher accepts
//! a file's extension runs, each receiving the previous one's output; when
//! none match, the first-registered loader is used.

pub mod builtin;
pub mod registry;

pub use builtin::{json, toml, yaml};
pub use registry::{Loader, LoaderInput, LoaderRegistry, Matcher, TransformFn};

/// Normalize an extension to carry a leading dot.
///
/// ```
/// use data_cache::loader::format_ext;
/// assert_eq!(format_ext("foo"), ".foo");
/// assert_eq!(format_ext(".foo"), ".foo");
/// ```
pub fn format_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Dotted extension of `path` (`".json"`), or an empty string when it has none.
pub fn dotted_extension(path: &std::path::Path) -> String {
    path.extension().and_then(|e| e.to_str()).map(format_ext).unwrap_or_default()
}

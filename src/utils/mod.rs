//! Shared helpers: dot-paths, merging, and file decoding

pub mod encoding;
pub mod merge;
pub mod paths;

pub use encoding::read_text;
pub use merge::{merge_maps, merge_values, union_values};
pub use paths::{delete_path, ensure_object, get_path, set_path, slot_mut, split_key};

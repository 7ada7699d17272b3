//! Dot-path access into nested JSON objects

use crate::error::{DataError, Result};
use serde_json::{Map, Value};

/// Split a dot-path into its segments, dropping empty ones.
///
/// ```
/// use data_cache::utils::split_key;
/// assert_eq!(split_key("a.b.c"), vec!["a", "b", "c"]);
/// ```
pub fn split_key(key: &str) -> Vec<&str> {
    key.split('.').filter(|s| !s.is_empty()).collect()
}

pub fn get_path<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = map.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Walk to the object at `path`, creating (or replacing non-object values with)
/// empty objects along the way.
pub fn ensure_object<'a>(
    map: &'a mut Map<String, Value>,
    path: &[&str],
) -> &'a mut Map<String, Value> {
    let mut current = map;
    for segment in path {
        let slot = current.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(obj) => obj,
            _ => unreachable!("slot was just made an object"),
        };
    }
    current
}

/// Return the slot for the last segment of `path`, creating intermediate objects.
pub fn slot_mut<'a>(map: &'a mut Map<String, Value>, path: &[&str]) -> Result<&'a mut Value> {
    let (last, parents) = path.split_last().ok_or(DataError::EmptyKey)?;
    let parent = ensure_object(map, parents);
    Ok(parent.entry(last.to_string()).or_insert(Value::Null))
}

pub fn set_path(map: &mut Map<String, Value>, path: &[&str], value: Value) -> Result<()> {
    let (last, parents) = path.split_last().ok_or(DataError::EmptyKey)?;
    ensure_object(map, parents).insert(last.to_string(), value);
    Ok(())
}

pub fn delete_path(map: &mut Map<String, Value>, path: &[&str]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for segment in parents {
        current = current.get_mut(*segment)?.as_object_mut()?;
    }
    current.remove(*last)
}

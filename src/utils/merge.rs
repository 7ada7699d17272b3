//! Deep merge and union over JSON values

use serde_json::{Map, Value};

/// Recursively merge `source` into `target`.
///
/// Objects merge key by key; any other pair (arrays and scalars included)
/// replaces the target value.
pub fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_obj), Value::Object(source_obj)) => merge_maps(target_obj, source_obj),
        (target, source) => *target = source,
    }
}

pub fn merge_maps(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Append `source` to the array at `target`, keeping target elements first.
///
/// A non-array source is appended as a single element. A missing (null)
/// target becomes the source array; any other scalar or object target is
/// wrapped into an array first. Duplicates are kept.
pub fn union_values(target: &mut Value, source: Value) {
    let incoming = match source {
        Value::Array(items) => items,
        other => vec![other],
    };
    match target {
        Value::Array(existing) => existing.extend(incoming),
        missing if missing.is_null() => *missing = Value::Array(incoming),
        other => {
            let mut items = vec![std::mem::take(other)];
            items.extend(incoming);
            *other = Value::Array(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_disjoint_keys() {
        let mut target = json!({"a": "b"});
        merge_values(&mut target, json!({"c": "d"}));
        assert_eq!(target, json!({"a": "b", "c": "d"}));
    }

    #[test]
    fn test_merge_is_recursive() {
        let mut target = json!({"a": {"b": {"c": "d"}}});
        merge_values(&mut target, json!({"a": {"b": {"d": "e"}}}));
        merge_values(&mut target, json!({"a": {"b": {"e": "f"}}}));
        assert_eq!(target, json!({"a": {"b": {"c": "d", "d": "e", "e": "f"}}}));
    }

    #[test]
    fn test_merge_replaces_arrays_and_scalars() {
        let mut target = json!({"list": ["b"], "name": "x", "nested": {"k": 1}});
        merge_values(&mut target, json!({"list": ["c"], "name": {"now": "object"}, "nested": 2}));
        assert_eq!(target, json!({"list": ["c"], "name": {"now": "object"}, "nested": 2}));
    }

    #[test]
    fn test_union_appends_without_dedup() {
        let mut target = json!(["b", "c"]);
        union_values(&mut target, json!(["c", "d"]));
        assert_eq!(target, json!(["b", "c", "c", "d"]));
    }

    #[test]
    fn test_union_scalar_source() {
        let mut target = json!(["b"]);
        union_values(&mut target, json!("c"));
        assert_eq!(target, json!(["b", "c"]));
    }

    #[test]
    fn test_union_onto_missing_value() {
        let mut target = Value::Null;
        union_values(&mut target, json!(["a"]));
        assert_eq!(target, json!(["a"]));
    }

    #[test]
    fn test_union_keeps_scalar_target() {
        let mut target = json!("x");
        union_values(&mut target, json!(["y"]));
        assert_eq!(target, json!(["x", "y"]));

        let mut target = json!({"k": 1});
        union_values(&mut target, json!("z"));
        assert_eq!(target, json!([{"k": 1}, "z"]));
    }
}

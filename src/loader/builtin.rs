//! Built-in loaders for JSON, YAML and TOML data files

use crate::error::{DataError, Result};
use crate::loader::LoaderInput;
use serde_json::Value;
use std::path::Path;

/// Parse JSON content. Pre-registered on every store for `.json`.
pub fn json(input: LoaderInput, path: &Path) -> Result<Value> {
    input.parse_with(|text| {
        serde_json::from_str(text).map_err(|e| DataError::parse(path, "JSON", e))
    })
}

/// Parse YAML content; an empty document loads as an empty object.
pub fn yaml(input: LoaderInput, path: &Path) -> Result<Value> {
    input.parse_with(|text| {
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_yaml::from_str(text).map_err(|e| DataError::parse(path, "YAML", e))
    })
}

pub fn toml(input: LoaderInput, path: &Path) -> Result<Value> {
    input.parse_with(|text| {
        let table: ::toml::Table =
            ::toml::from_str(text).map_err(|e| DataError::parse(path, "TOML", e))?;
        serde_json::to_value(table).map_err(|e| DataError::parse(path, "TOML", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(text: &str) -> LoaderInput {
        LoaderInput::Raw(text.to_string())
    }

    #[test]
    fn test_json_parses_object() {
        let value = json(raw(r#"{"a": "b"}"#), Path::new("a.json")).unwrap();
        assert_eq!(value, json!({"a": "b"}));
    }

    #[test]
    fn test_json_passes_parsed_value_through() {
        let value = json(LoaderInput::Parsed(json!({"x": 1})), Path::new("a.json")).unwrap();
        assert_eq!(value, json!({"x": 1}));
    }

    #[test]
    fn test_json_syntax_error_names_file() {
        let err = json(raw("{invalid"), Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, DataError::Parse { format: "JSON", .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_yaml_nested() {
        let value = yaml(raw("site:\n  title: Docs\n  tags: [a, b]\n"), Path::new("s.yml")).unwrap();
        assert_eq!(value, json!({"site": {"title": "Docs", "tags": ["a", "b"]}}));
    }

    #[test]
    fn test_yaml_empty_document() {
        let value = yaml(raw("  \n"), Path::new("empty.yaml")).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_toml_table() {
        let value = toml(raw("name = \"pkg\"\n[deps]\nserde = \"1\"\n"), Path::new("c.toml")).unwrap();
        assert_eq!(value, json!({"name": "pkg", "deps": {"serde": "1"}}));
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = toml(raw("name = "), Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, DataError::Parse { format: "TOML", .. }));
    }
}

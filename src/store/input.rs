//! The argument shapes accepted by `DataStore::data`

use crate::error::{DataError, Result};
use crate::scan::has_glob;
use crate::store::Options;
use serde_json::{Map, Value};

/// A single call to `data()`, classified once at the boundary.
#[derive(Debug, Clone)]
pub enum DataInput {
    /// Deep-merge a mapping onto the cache root
    Literal(Map<String, Value>),
    /// Load files matching a path or glob
    FileRef { pattern: String, options: Options },
    /// Set (or merge, or union) a value at a dot-path key
    KeyValue { key: String, value: Value, union: bool },
    /// A bare string: a data file if one exists there, otherwise a key read
    Key(String),
    Many(Vec<DataInput>),
}

impl DataInput {
    pub fn file(pattern: impl Into<String>) -> Self {
        DataInput::FileRef { pattern: pattern.into(), options: Options::default() }
    }

    pub fn file_with(pattern: impl Into<String>, options: Options) -> Self {
        DataInput::FileRef { pattern: pattern.into(), options }
    }

    pub fn set(key: impl Into<String>, value: impl Into<Value>) -> Self {
        DataInput::KeyValue { key: key.into(), value: value.into(), union: false }
    }

    pub fn union(key: impl Into<String>, value: impl Into<Value>) -> Self {
        DataInput::KeyValue { key: key.into(), value: value.into(), union: true }
    }

    /// Classify a single JSON argument.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(DataInput::Literal(map)),
            Value::Array(items) => {
                Ok(DataInput::Many(items.into_iter().map(DataInput::from_value).collect::<Result<_>>()?))
            }
            Value::String(key) => Ok(DataInput::from(key)),
            _ => Err(DataError::invalid_key()),
        }
    }

    /// Classify a positional argument list the way a dynamic caller passes it:
    ///
    /// - `[object, object, ...]` merges each object
    /// - `[array]` classifies each element
    /// - `[string]` is a glob, or a bare key/file
    /// - `[string, options]` loads files when the string is a glob
    /// - `[string, value]` and `[string, value, union]` write a key
    ///
    /// Whether a non-glob `[string, options]` names a file depends on the
    /// filesystem and the registered loaders, so `DataStore::data_args`
    /// settles that case.
    pub fn from_args(args: Vec<Value>) -> Result<Self> {
        let mut args = args.into_iter();
        let first = args.next().ok_or_else(DataError::invalid_key)?;
        let rest: Vec<Value> = args.collect();

        if rest.is_empty() {
            return DataInput::from_value(first);
        }

        match first {
            Value::Object(map) => {
                let mut inputs = vec![DataInput::Literal(map)];
                for value in rest {
                    match value {
                        Value::Object(map) => inputs.push(DataInput::Literal(map)),
                        _ => return Err(DataError::invalid_key()),
                    }
                }
                Ok(DataInput::Many(inputs))
            }
            Value::String(key) => {
                let mut rest = rest.into_iter();
                let value = rest.next().unwrap_or(Value::Null);
                let union = match rest.next() {
                    None => false,
                    Some(Value::Bool(flag)) => flag,
                    Some(_) => return Err(DataError::invalid_key()),
                };
                if rest.next().is_some() {
                    return Err(DataError::invalid_key());
                }

                if let Value::Object(map) = &value {
                    if !union && has_glob(&key) {
                        let options = Options::from_json(map)?;
                        return Ok(DataInput::FileRef { pattern: key, options });
                    }
                }
                Ok(DataInput::KeyValue { key, value, union })
            }
            _ => Err(DataError::invalid_key()),
        }
    }
}

impl From<Map<String, Value>> for DataInput {
    fn from(map: Map<String, Value>) -> Self {
        DataInput::Literal(map)
    }
}

impl From<String> for DataInput {
    fn from(key: String) -> Self {
        if has_glob(&key) {
            DataInput::file(key)
        } else {
            DataInput::Key(key)
        }
    }
}

impl From<&str> for DataInput {
    fn from(key: &str) -> Self {
        DataInput::from(key.to_string())
    }
}

impl From<Vec<DataInput>> for DataInput {
    fn from(inputs: Vec<DataInput>) -> Self {
        DataInput::Many(inputs)
    }
}

impl TryFrom<Value> for DataInput {
    type Error = DataError;

    fn try_from(value: Value) -> Result<Self> {
        DataInput::from_value(value)
    }
}

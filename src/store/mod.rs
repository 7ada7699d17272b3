//! The data store: a namespaced cache filled from literals and data files

use crate::config::StoreConfig;
use crate::error::{DataError, Result};
use crate::loader::{self, LoaderInput, LoaderRegistry, Matcher};
use crate::scan::{has_glob, resolve_path, GlobResolver};
use crate::utils::{
    delete_path, ensure_object, get_path, merge_maps, merge_values, read_text, set_path, slot_mut,
    split_key, union_values,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod input;
pub mod options;

pub use input::DataInput;
pub use options::{basename, Namespace, Options, RenameFn};

/// Where the cache lives inside the host object unless configured otherwise.
pub const DEFAULT_PROP: &str = "cache.data";

type Listener = Box<dyn FnMut(&DataInput) + Send>;

/// A nested key/value cache stored at a dot-path (`prop`) of a host object.
///
/// The cache is created once and then only mutated in place.
pub struct DataStore {
    host: Map<String, Value>,
    prop: String,
    cache: Map<String, Value>,
    defaults: Options,
    options: Options,
    loaders: LoaderRegistry,
    listeners: Vec<Listener>,
}

impl DataStore {
    /// Empty store at `cache.data` with the JSON loader registered.
    pub fn new() -> Self {
        Self::with_host(Map::new(), DEFAULT_PROP)
    }

    pub fn with_prop(prop: &str) -> Self {
        Self::with_host(Map::new(), prop)
    }

    /// Attach to an existing host object. An object already stored at `prop`
    /// is kept as the initial cache.
    pub fn with_host(mut host: Map<String, Value>, prop: &str) -> Self {
        let path = split_key(prop);
        let cache = if path.is_empty() {
            std::mem::take(&mut host)
        } else {
            match delete_path(&mut host, &path) {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            }
        };

        Self {
            host,
            prop: prop.to_string(),
            cache,
            defaults: Options::default(),
            options: Options::default(),
            loaders: LoaderRegistry::with_defaults(),
            listeners: Vec::new(),
        }
    }

    /// Build a store from layered configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        let store = Self::with_prop(&config.prop).defaults(config.options());
        if config.builtin_loaders {
            store.with_builtin_loaders()
        } else {
            store
        }
    }

    /// Set the lowest-priority option layer.
    pub fn defaults(mut self, defaults: Options) -> Self {
        self.defaults = defaults;
        self
    }

    /// Register the YAML (`.yaml`, `.yml`) and TOML loaders after JSON.
    pub fn with_builtin_loaders(mut self) -> Self {
        self.loaders.register(Regex::new(r"^\.ya?ml$").expect("valid regex"), loader::yaml);
        self.loaders.register("toml", loader::toml);
        self
    }

    pub fn prop(&self) -> &str {
        &self.prop
    }

    pub fn cache(&self) -> &Map<String, Value> {
        &self.cache
    }

    /// Host-level options, layered between defaults and call-site options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    /// Detach and return the host object with the cache placed at `prop`.
    pub fn into_host(self) -> Map<String, Value> {
        let path = split_key(&self.prop);
        let mut host = self.host;
        match path.split_last() {
            Some((last, parents)) => {
                ensure_object(&mut host, parents).insert(last.to_string(), Value::Object(self.cache));
            }
            None => merge_maps(&mut host, self.cache),
        }
        host
    }

    /// Append a loader for files whose extension matches `matcher`.
    pub fn data_loader<F>(&mut self, matcher: impl Into<Matcher>, transform: F) -> &mut Self
    where
        F: Fn(LoaderInput, &Path) -> Result<Value> + Send + Sync + 'static,
    {
        self.loaders.register(matcher, transform);
        self
    }

    /// Register a listener notified with the input of every `data` call.
    pub fn on_data<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&DataInput) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Populate the cache from `input`.
    pub fn data(&mut self, input: impl Into<DataInput>) -> Result<&mut Self> {
        let input = input.into();
        for listener in self.listeners.iter_mut() {
            listener(&input);
        }
        self.apply(input)?;
        Ok(self)
    }

    /// `data` over untyped positional arguments. See [`DataInput::from_args`].
    ///
    /// `[string, options]` loads files when the string is a glob, names an
    /// existing file, or has an extension a registered loader handles;
    /// otherwise the object is merged at the key.
    pub fn data_args(&mut self, args: Vec<Value>) -> Result<&mut Self> {
        let input = self.reclassify(DataInput::from_args(args)?)?;
        self.data(input)
    }

    /// Single-string `data(key)`: loads `key` if it names a data file, then
    /// returns the value stored at `key`.
    pub fn lookup(&mut self, key: &str) -> Result<Option<&Value>> {
        self.data(DataInput::Key(key.to_string()))?;
        Ok(self.get(key))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        get_path(&self.cache, &split_key(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overwrite the value at `key`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        set_path(&mut self.cache, &split_key(key), value.into())?;
        Ok(self)
    }

    /// Deep-merge `map` onto the cache root.
    pub fn merge(&mut self, map: Map<String, Value>) -> &mut Self {
        merge_maps(&mut self.cache, map);
        self
    }

    /// Deep-merge `value` onto whatever is stored at `key`.
    pub fn merge_at(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        merge_values(slot_mut(&mut self.cache, &split_key(key))?, value.into());
        Ok(self)
    }

    /// Append `value` to the array at `key`.
    pub fn union(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        union_values(slot_mut(&mut self.cache, &split_key(key))?, value.into());
        Ok(self)
    }

    pub fn del(&mut self, key: &str) -> Option<Value> {
        delete_path(&mut self.cache, &split_key(key))
    }

    /// Turn a key write whose value is options-shaped into a file load when
    /// the key refers to a loadable file.
    fn reclassify(&self, input: DataInput) -> Result<DataInput> {
        match input {
            DataInput::KeyValue { key, value: Value::Object(map), union: false }
                if Options::is_options_map(&map) =>
            {
                if let Ok(options) = Options::from_json(&map) {
                    if self.is_loadable_file(&key, &options) {
                        return Ok(DataInput::FileRef { pattern: key, options });
                    }
                }
                Ok(DataInput::KeyValue { key, value: Value::Object(map), union: false })
            }
            other => Ok(other),
        }
    }

    fn is_loadable_file(&self, key: &str, call: &Options) -> bool {
        let options = self.effective_options(Some(call));
        if resolve_path(options.cwd.as_deref(), key).is_file() {
            return true;
        }
        let path = Path::new(key);
        path.extension().is_some() && self.loaders.handles(path)
    }

    fn apply(&mut self, input: DataInput) -> Result<()> {
        match input {
            DataInput::Literal(map) => {
                merge_maps(&mut self.cache, map);
                Ok(())
            }
            DataInput::FileRef { pattern, options } => self.load_pattern(&pattern, &options),
            DataInput::KeyValue { key, value, union } => self.write_key(&key, value, union),
            DataInput::Key(key) => self.load_key(&key),
            DataInput::Many(inputs) => inputs.into_iter().try_for_each(|input| self.apply(input)),
        }
    }

    fn write_key(&mut self, key: &str, value: Value, union: bool) -> Result<()> {
        let path = split_key(key);
        if union {
            union_values(slot_mut(&mut self.cache, &path)?, value);
        } else if value.is_object() {
            merge_values(slot_mut(&mut self.cache, &path)?, value);
        } else {
            set_path(&mut self.cache, &path, value)?;
        }
        Ok(())
    }

    /// Options in effect for a call: defaults, then host, then call site.
    fn effective_options(&self, call: Option<&Options>) -> Options {
        let options = self.defaults.clone().overlay(&self.options);
        match call {
            Some(call) => options.overlay(call),
            None => options,
        }
    }

    fn load_key(&mut self, key: &str) -> Result<()> {
        let options = self.effective_options(None);
        let path = resolve_path(options.cwd.as_deref(), key);
        if path.is_file() {
            return self.load_files(vec![path], &options, true);
        }
        if key.contains('/') || key.contains(std::path::MAIN_SEPARATOR) {
            let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
            return Err(DataError::failed_read(path, missing));
        }
        tracing::debug!("'{}' is not a data file; treating it as a key", key);
        Ok(())
    }

    fn load_pattern(&mut self, pattern: &str, call: &Options) -> Result<()> {
        let options = self.effective_options(Some(call));
        if !has_glob(pattern) {
            let path = resolve_path(options.cwd.as_deref(), pattern);
            return self.load_files(vec![path], &options, true);
        }

        let cwd = options.cwd.clone().unwrap_or_else(|| PathBuf::from("."));
        let files = GlobResolver::new(cwd).dot(options.dot.unwrap_or(false)).resolve(pattern)?;
        if files.is_empty() {
            tracing::warn!("no data files matched '{}'", pattern);
        }
        self.load_files(files, &options, false)
    }

    /// Read, parse, and merge each file. When `strict`, an unreadable file is
    /// an error; otherwise it is skipped.
    fn load_files(&mut self, files: Vec<PathBuf>, options: &Options, strict: bool) -> Result<()> {
        for path in files {
            let content = match read_text(&path) {
                Ok(content) => content,
                Err(err) if strict => return Err(DataError::failed_read(path, err)),
                Err(err) => {
                    tracing::warn!("skipping unreadable data file {}: {}", path.display(), err);
                    continue;
                }
            };

            let value = self.loaders.load(&path, content)?;
            if value.is_null() {
                tracing::debug!("{} loaded no data", path.display());
                continue;
            }

            match place(&path, value, options) {
                Value::Object(map) => merge_maps(&mut self.cache, map),
                other => tracing::warn!(
                    "cannot merge non-object data from {} onto the cache root (got {})",
                    path.display(),
                    type_name(&other)
                ),
            }
        }
        Ok(())
    }
}

/// Wrap a loaded value under its namespace key, if any. `data.<ext>` files
/// always merge at the root.
fn place(path: &Path, value: Value, options: &Options) -> Value {
    if is_root_data_file(path) {
        return value;
    }
    match options.namespace_key(path) {
        Some(key) => {
            tracing::debug!("namespacing {} under '{}'", path.display(), key);
            let mut wrapped = Map::new();
            wrapped.insert(key, value);
            Value::Object(wrapped)
        }
        None => value,
    }
}

fn is_root_data_file(path: &Path) -> bool {
    path.extension().is_some() && path.file_stem().and_then(|s| s.to_str()) == Some("data")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("prop", &self.prop)
            .field("cache", &self.cache)
            .field("defaults", &self.defaults)
            .field("options", &self.options)
            .field("loaders", &self.loaders)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_existing_host_object_is_kept() {
        let host = map(json!({"abc": {"x": "y"}, "other": 1}));
        let mut store = DataStore::with_host(host, "abc");
        store.data_args(vec![json!("a"), json!("b")]).unwrap();

        let host = store.into_host();
        assert_eq!(Value::Object(host), json!({"abc": {"x": "y", "a": "b"}, "other": 1}));
    }

    #[test]
    fn test_nested_prop() {
        let mut store = DataStore::with_prop("foo.bar");
        store.data(DataInput::set("a", "b")).unwrap();
        assert_eq!(Value::Object(store.into_host()), json!({"foo": {"bar": {"a": "b"}}}));
    }

    #[test]
    fn test_empty_prop_uses_host_root() {
        let mut store = DataStore::with_host(map(json!({"x": 1})), "");
        store.set("a", "b").unwrap();
        assert_eq!(Value::Object(store.into_host()), json!({"x": 1, "a": "b"}));
    }

    #[test]
    fn test_default_prop_is_cache_data() {
        let mut store = DataStore::new();
        assert_eq!(store.prop(), "cache.data");
        store.set("a", "b").unwrap();
        assert_eq!(Value::Object(store.into_host()), json!({"cache": {"data": {"a": "b"}}}));
    }

    #[test]
    fn test_listeners_see_every_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = DataStore::new();
        store.on_data(move |input| sink.lock().unwrap().push(format!("{:?}", input)));

        store.data(DataInput::set("a", "b")).unwrap();
        store.data(map(json!({"c": "d"}))).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("KeyValue"));
        assert!(seen[1].contains("Literal"));
    }

    #[test]
    fn test_set_get_merge_union_del() {
        let mut store = DataStore::new();
        store.set("a.b.c.d", json!({"e": "f"})).unwrap();
        assert_eq!(store.get("a.b.c"), Some(&json!({"d": {"e": "f"}})));

        store.merge_at("a.b.c.d", json!({"g": "h"})).unwrap();
        assert_eq!(store.get("a.b.c.d"), Some(&json!({"e": "f", "g": "h"})));

        store.merge(map(json!({"list": ["b", "c"]})));
        store.union("list", json!(["d", "e"])).unwrap();
        assert_eq!(store.get("list"), Some(&json!(["b", "c", "d", "e"])));

        assert!(store.has("a.b"));
        assert_eq!(store.del("a.b.c.d.g"), Some(json!("h")));
        assert!(!store.has("a.b.c.d.g"));
    }

    #[test]
    fn test_empty_key_is_error() {
        let mut store = DataStore::new();
        assert!(matches!(store.data(DataInput::set("", "x")), Err(DataError::EmptyKey)));
    }

    #[test]
    fn test_place_rules() {
        let ns = Options::new().namespace(true);
        assert_eq!(place(Path::new("dir/a.json"), json!({"a": 1}), &ns), json!({"a": {"a": 1}}));
        assert_eq!(place(Path::new("dir/data.json"), json!({"me": 1}), &ns), json!({"me": 1}));
        assert_eq!(place(Path::new("dir/data.yml"), json!({"me": 1}), &ns), json!({"me": 1}));
        assert_eq!(
            place(Path::new("dir/metadata.json"), json!({"m": 1}), &ns),
            json!({"metadata": {"m": 1}})
        );
        assert_eq!(place(Path::new("dir/a.json"), json!({"a": 1}), &Options::new()), json!({"a": 1}));
    }

    #[test]
    fn test_glob_skips_non_object_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("list.json"), "[1, 2]").unwrap();
        fs::write(tmp.path().join("obj.json"), r#"{"k": "v"}"#).unwrap();

        let mut store = DataStore::new();
        store.data(DataInput::file_with("*.json", Options::new().cwd(tmp.path()))).unwrap();
        assert_eq!(Value::Object(store.cache().clone()), json!({"k": "v"}));
    }

    #[test]
    fn test_null_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("nothing.json"), "null").unwrap();

        let mut store = DataStore::new();
        store.options_mut().cwd = Some(tmp.path().to_path_buf());
        store.data(DataInput::file("nothing.json")).unwrap();
        assert!(store.cache().is_empty());
    }

    #[test]
    fn test_builtin_loaders() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("site.yml"), "title: Docs\n").unwrap();
        fs::write(tmp.path().join("pkg.toml"), "name = \"pkg\"\n").unwrap();

        let mut store = DataStore::new()
            .with_builtin_loaders()
            .defaults(Options::new().cwd(tmp.path()).namespace(true));
        store.data("*.{yml,toml}").unwrap();

        assert_eq!(store.get("site.title"), Some(&json!("Docs")));
        assert_eq!(store.get("pkg.name"), Some(&json!("pkg")));
    }
}

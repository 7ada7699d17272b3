//! Loader registry and dispatch

use crate::error::{DataError, Result};
use crate::loader::{dotted_extension, format_ext};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// What a loader receives: raw text for the first stage, the previous
/// stage's output for piped stages.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderInput {
    Raw(String),
    Parsed(Value),
}

impl LoaderInput {
    /// Parse raw text with `parse`, or pass an already-parsed value through.
    pub fn parse_with<F>(self, parse: F) -> Result<Value>
    where
        F: FnOnce(&str) -> Result<Value>,
    {
        match self {
            LoaderInput::Raw(text) => parse(&text),
            LoaderInput::Parsed(value) => Ok(value),
        }
    }

    /// Take the input as a value; raw text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            LoaderInput::Raw(text) => Value::String(text),
            LoaderInput::Parsed(value) => value,
        }
    }
}

pub type TransformFn = Box<dyn Fn(LoaderInput, &Path) -> Result<Value> + Send + Sync>;

/// Selects which files a loader applies to, tested against the dotted extension.
#[derive(Debug, Clone)]
pub enum Matcher {
    Extension(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn extension(ext: &str) -> Self {
        Matcher::Extension(format_ext(ext))
    }

    pub fn pattern(re: Regex) -> Self {
        Matcher::Pattern(re)
    }

    pub fn matches(&self, ext: &str) -> bool {
        match self {
            Matcher::Extension(expected) => expected == ext,
            Matcher::Pattern(re) => re.is_match(ext),
        }
    }
}

impl From<&str> for Matcher {
    fn from(ext: &str) -> Self {
        Matcher::extension(ext)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::Pattern(re)
    }
}

pub struct Loader {
    pub matcher: Matcher,
    transform: TransformFn,
}

impl Loader {
    pub fn new<F>(matcher: impl Into<Matcher>, transform: F) -> Self
    where
        F: Fn(LoaderInput, &Path) -> Result<Value> + Send + Sync + 'static,
    {
        Self { matcher: matcher.into(), transform: Box::new(transform) }
    }

    pub fn apply(&self, input: LoaderInput, path: &Path) -> Result<Value> {
        (self.transform)(input, path)
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader").field("matcher", &self.matcher).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct LoaderRegistry {
    loaders: Vec<Loader>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the JSON loader pre-registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("json", crate::loader::json);
        registry
    }

    /// Append a loader at the lowest priority.
    pub fn register<F>(&mut self, matcher: impl Into<Matcher>, transform: F) -> &mut Self
    where
        F: Fn(LoaderInput, &Path) -> Result<Value> + Send + Sync + 'static,
    {
        self.loaders.push(Loader::new(matcher, transform));
        self
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Whether a registered loader explicitly matches `path`, ignoring the
    /// first-loader fallback.
    pub fn handles(&self, path: &Path) -> bool {
        let ext = dotted_extension(path);
        self.loaders.iter().any(|l| l.matcher.matches(&ext))
    }

    /// Loaders that apply to `path`, in registration order.
    pub fn matching(&self, path: &Path) -> Vec<&Loader> {
        let ext = dotted_extension(path);
        let matched: Vec<&Loader> = self.loaders.iter().filter(|l| l.matcher.matches(&ext)).collect();
        if matched.is_empty() {
            tracing::debug!(
                "no loader matches '{}' for {}, falling back to the first loader",
                ext,
                path.display()
            );
            return self.loaders.first().into_iter().collect();
        }
        matched
    }

    /// Run the loader pipeline for `path` over its raw `content`.
    pub fn load(&self, path: &Path, content: String) -> Result<Value> {
        let chain = self.matching(path);
        if chain.is_empty() {
            return Err(DataError::Loader(format!(
                "no data loaders registered to load {}",
                path.display()
            )));
        }

        let mut input = LoaderInput::Raw(content);
        for loader in chain {
            input = LoaderInput::Parsed(loader.apply(input, path)?);
        }
        Ok(input.into_value())
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine::{exclude, project};
use super::tree::{PathTree, parse_index};
use crate::constants::{PATH_SEPARATOR, UNDEFINED_TEXT};

/// Optional include and exclude trees applied before a value is rendered.
///
/// When both are set, the include tree wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilter {
    /// Only these paths are rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<PathTree>,
    /// These paths are removed before rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<PathTree>,
}

impl FieldFilter {
    /// Creates a filter that renders values whole.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter rendering only `paths`.
    pub fn include<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().with_include(paths)
    }

    /// Creates a filter removing `paths`.
    pub fn exclude<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().with_exclude(paths)
    }

    /// Sets the include tree.
    pub fn with_include<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include = Some(PathTree::from_paths(paths));
        self
    }

    /// Sets the exclude tree.
    pub fn with_exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = Some(PathTree::from_paths(paths));
        self
    }

    /// Returns true if neither tree is set.
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Applies the filter to a container value, returning a fresh copy.
    pub fn apply(&self, value: &Value) -> Value {
        if let Some(tree) = &self.include {
            project(value, tree)
        } else if let Some(tree) = &self.exclude {
            exclude(value, tree)
        } else {
            value.clone()
        }
    }
}

/// Renders a value for a log line.
///
/// - absent → `undefined`
/// - `null`, numbers, booleans → their JSON text
/// - strings → the raw text, unquoted
/// - objects and arrays → compact JSON, after applying `filter`
pub fn format_for_log(value: Option<&Value>, filter: Option<&FieldFilter>) -> String {
    let Some(value) = value else {
        return UNDEFINED_TEXT.to_string();
    };

    match value {
        Value::Object(_) | Value::Array(_) => match filter {
            Some(filter) if !filter.is_empty() => filter.apply(value).to_string(),
            _ => value.to_string(),
        },
        Value::String(text) => text.clone(),
        scalar => scalar.to_string(),
    }
}

/// Resolves one dotted path against a value.
///
/// Returns None as soon as a segment is missing or the walk reaches a
/// scalar before the path ends.
pub fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split(PATH_SEPARATOR)
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
            _ => None,
        })
}

//! Per-method logging metadata.
//!
//! [`LoggedMetadata`] is the explicit replacement for decorator metadata:
//! it says which severities the call, return and error lines use, which
//! arguments are rendered (and through which field filters), whether the
//! callable receives a derived scoped logger, and how the return value is
//! rendered. All types use the builder pattern.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::returns::ReturnFormat;
use crate::error::DecorationError;
use crate::projection::FieldFilter;
use crate::types::LogLevel;

// =============================================================================
// LoggedOptions
// =============================================================================

/// Severities of the three lines emitted around a call.
///
/// Any of them may be [`LogLevel::Skip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedOptions {
    /// Level of the `HIT` line.
    pub call_level: LogLevel,
    /// Level of the `RETURNED` line.
    pub return_level: LogLevel,
    /// Level of the `ERROR WHILE` line.
    pub error_level: LogLevel,
}

impl Default for LoggedOptions {
    fn default() -> Self {
        Self {
            call_level: LogLevel::Info,
            return_level: LogLevel::Info,
            error_level: LogLevel::Error,
        }
    }
}

impl LoggedOptions {
    /// Creates options with default levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level of the `HIT` line.
    pub fn with_call_level(mut self, level: LogLevel) -> Self {
        self.call_level = level;
        self
    }

    /// Sets the level of the `RETURNED` line.
    pub fn with_return_level(mut self, level: LogLevel) -> Self {
        self.return_level = level;
        self
    }

    /// Sets the level of the `ERROR WHILE` line.
    pub fn with_error_level(mut self, level: LogLevel) -> Self {
        self.error_level = level;
        self
    }
}

// =============================================================================
// LoggedParam
// =============================================================================

/// An argument rendered in the `HIT` line as `name=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedParam {
    /// Position of the argument.
    pub index: usize,
    /// Name shown in the line.
    pub name: String,
    /// Field filter applied to container values.
    #[serde(default)]
    pub filter: FieldFilter,
}

impl LoggedParam {
    /// Logs argument `index` as `name`, rendered whole.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            filter: FieldFilter::new(),
        }
    }

    /// Renders only `paths` of the argument.
    pub fn include<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = self.filter.with_include(paths);
        self
    }

    /// Removes `paths` from the argument before rendering.
    pub fn exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = self.filter.with_exclude(paths);
        self
    }
}

// =============================================================================
// LoggedMetadata
// =============================================================================

/// Logging configuration of one decorated method.
///
/// # Example
///
/// ```rust
/// use call_logging::{LoggedMetadata, LoggedOptions, LoggedParam, LogLevel, ReturnFormat};
///
/// let metadata = LoggedMetadata::new()
///     .with_options(LoggedOptions::new().with_return_level(LogLevel::Debug))
///     .param(LoggedParam::new(0, "id"))
///     .param(LoggedParam::new(1, "body").exclude(["password"]))
///     .inject_logger()
///     .returns(ReturnFormat::fields([("userId", "id")]));
/// assert_eq!(metadata.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggedMetadata {
    /// Severities; None defers to the owner's defaults.
    pub options: Option<LoggedOptions>,
    /// Arguments rendered in the `HIT` line, in order.
    pub params: Vec<LoggedParam>,
    /// Whether the callable receives a derived scoped logger.
    pub inject_logger: bool,
    /// How the return value is rendered.
    pub returns: ReturnFormat,
}

impl LoggedMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the severities.
    pub fn with_options(mut self, options: LoggedOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Appends a logged argument.
    pub fn param(mut self, param: LoggedParam) -> Self {
        self.params.push(param);
        self
    }

    /// Derives a scoped logger for each call and hands it to the callable.
    pub fn inject_logger(mut self) -> Self {
        self.inject_logger = true;
        self
    }

    /// Sets how the return value is rendered.
    pub fn returns(mut self, returns: ReturnFormat) -> Self {
        self.returns = returns;
        self
    }

    /// Returns the effective severities.
    pub fn effective_options(&self, defaults: LoggedOptions) -> LoggedOptions {
        self.options.unwrap_or(defaults)
    }

    /// Folds a later decoration of the same method into this one.
    ///
    /// Later options win; a param with an index already present replaces
    /// it; logger injection, once requested, stays on; a return format
    /// other than `Nothing` replaces the current one.
    pub fn merge(&mut self, other: LoggedMetadata) {
        if other.options.is_some() {
            self.options = other.options;
        }

        for param in other.params {
            match self.params.iter_mut().find(|p| p.index == param.index) {
                Some(existing) => *existing = param,
                None => self.params.push(param),
            }
        }

        self.inject_logger |= other.inject_logger;

        if !other.returns.is_nothing() {
            self.returns = other.returns;
        }
    }

    /// Drops params that reuse an index or a name, keeping the first, and
    /// reports each dropped one.
    pub fn validate(&mut self) -> Vec<DecorationError> {
        let mut problems = Vec::new();
        let mut by_index: HashMap<usize, String> = HashMap::new();
        let mut names: HashSet<String> = HashSet::new();

        self.params.retain(|param| {
            if let Some(existing) = by_index.get(&param.index) {
                problems.push(DecorationError::DuplicateParamIndex {
                    index: param.index,
                    existing: existing.clone(),
                    duplicate: param.name.clone(),
                });
                return false;
            }
            if !names.insert(param.name.clone()) {
                problems.push(DecorationError::DuplicateParamName {
                    name: param.name.clone(),
                    index: param.index,
                });
                return false;
            }
            by_index.insert(param.index, param.name.clone());
            true
        });

        problems
    }
}

// =============================================================================
// MetadataRegistry
// =============================================================================

/// Identifies a decorated member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    /// Owning type name.
    pub owner: String,
    /// Member name.
    pub member: String,
}

impl MethodKey {
    /// Creates a key.
    pub fn new(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: member.into(),
        }
    }
}

/// One merged [`LoggedMetadata`] per decorated member.
///
/// Applying metadata to a member that already has some merges into the
/// stored value, so repeated decoration converges instead of stacking.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: DashMap<MethodKey, LoggedMetadata>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `metadata` into the entry for `key` and returns the result.
    ///
    /// Both the incoming metadata and the merged entry are validated, so
    /// the stored entry never holds a duplicate param. The returned
    /// problems are new to this decoration; re-applying metadata that was
    /// already reported yields none.
    pub fn apply(&self, key: MethodKey, mut metadata: LoggedMetadata) -> (LoggedMetadata, Vec<DecorationError>) {
        let mut problems = metadata.validate();
        let mut entry = self.entries.entry(key).or_default();
        entry.merge(metadata);
        problems.extend(entry.validate());
        ((*entry).clone(), problems)
    }

    /// Returns the merged metadata of a member.
    pub fn get(&self, owner: &str, member: &str) -> Option<LoggedMetadata> {
        self.entries
            .get(&MethodKey::new(owner, member))
            .map(|entry| entry.value().clone())
    }

    /// Number of decorated members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been decorated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

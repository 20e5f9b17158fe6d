//! Core types shared by the projector, the scoped logger and the interceptor.
//!
//! - [`LogLevel`]: severity of an emitted line, including the `skip` marker
//! - [`CallKind`]: the role of a wrapped callable, rendered in every line
//! - [`CorrelationId`]: short token shared by all lines of one call chain
//! - [`ScopeLabel`]: one step of a scope path

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::CORRELATION_ID_LENGTH;
use crate::error::{ConfigError, InvalidCorrelationId};

/// Severity used for a call, return or error line.
///
/// `Skip` suppresses the line entirely. The remaining variants are ordered
/// from most verbose (`Verbose`) to most severe (`Fatal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most detailed output.
    Verbose,
    /// Debugging detail.
    Debug,
    /// Normal operational messages (the default).
    #[default]
    #[serde(alias = "log")]
    Info,
    /// Something unexpected that did not fail the call.
    Warn,
    /// A failed call.
    Error,
    /// An unrecoverable failure.
    Fatal,
    /// Do not emit the line.
    #[serde(alias = "off")]
    Skip,
}

impl LogLevel {
    /// Returns true when lines at this level are suppressed.
    pub fn is_skip(&self) -> bool {
        matches!(self, LogLevel::Skip)
    }

    /// Returns the lowercase name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Skip => "skip",
        }
    }

    /// Converts this level to a `tracing::Level`.
    ///
    /// Returns None for `Skip`. `Fatal` has no tracing counterpart and maps
    /// to `ERROR`.
    pub fn to_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Verbose => Some(tracing::Level::TRACE),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error | LogLevel::Fatal => Some(tracing::Level::ERROR),
            LogLevel::Skip => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "trace" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" | "log" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "skip" | "off" => Ok(LogLevel::Skip),
            _ => Err(ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

/// The role a wrapped callable plays, rendered as `<KIND>` in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CallKind {
    /// A plain function or a service method.
    #[default]
    Function,
    /// A route handler.
    Endpoint,
    /// An access guard.
    Guard,
    /// A request interceptor.
    Interceptor,
    /// A request middleware.
    Middleware,
    /// An exception filter.
    ExceptionFilter,
}

impl CallKind {
    /// Returns the token used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Function => "FUNCTION",
            CallKind::Endpoint => "ENDPOINT",
            CallKind::Guard => "GUARD",
            CallKind::Interceptor => "INTERCEPTOR",
            CallKind::Middleware => "MIDDLEWARE",
            CallKind::ExceptionFilter => "EXCEPTION FILTER",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short token shared by every log line of one call chain.
///
/// Generated identifiers are the first [`CORRELATION_ID_LENGTH`] hex
/// characters of a v4 UUID. Identifiers supplied by a caller (an incoming
/// request-id header, for example) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let mut buf = uuid::Uuid::encode_buffer();
        let hex = uuid.simple().encode_lower(&mut buf);
        Self(hex[..CORRELATION_ID_LENGTH].to_owned())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = InvalidCorrelationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidCorrelationId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<&str> for CorrelationId {
    type Error = InvalidCorrelationId;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One step of a scope path.
///
/// A composite label groups several names into one step and renders as
/// `[a, b]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeLabel {
    /// A single name.
    Single(String),
    /// Several names forming one step.
    Composite(Vec<String>),
}

impl fmt::Display for ScopeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeLabel::Single(label) => f.write_str(label),
            ScopeLabel::Composite(parts) => write!(f, "[{}]", parts.join(", ")),
        }
    }
}

impl From<&str> for ScopeLabel {
    fn from(label: &str) -> Self {
        ScopeLabel::Single(label.to_string())
    }
}

impl From<String> for ScopeLabel {
    fn from(label: String) -> Self {
        ScopeLabel::Single(label)
    }
}

impl From<Vec<String>> for ScopeLabel {
    fn from(parts: Vec<String>) -> Self {
        ScopeLabel::Composite(parts)
    }
}

impl From<&[&str]> for ScopeLabel {
    fn from(parts: &[&str]) -> Self {
        ScopeLabel::Composite(parts.iter().map(|p| p.to_string()).collect())
    }
}

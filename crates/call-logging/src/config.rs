//! Configuration of decorated owners.
//!
//! [`LoggedConfig`] collects the settings that apply to every member an
//! owner decorates: default severities (globally and per owner), the sink
//! the owner's logger writes to, and whether sink initialization is
//! announced. It can be built in code or read from JSON:
//!
//! ```json
//! {
//!   "options": { "callLevel": "debug", "returnLevel": "debug" },
//!   "ownerOptions": { "AuthGuard": { "callLevel": "skip" } },
//!   "sink": "json",
//!   "announceInitialization": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::interceptor::LoggedOptions;
use crate::logger::SinkCell;
use crate::sink::{JsonSink, SharedSink, TracingSink};

/// Which built-in sink an owner's logger writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Human-readable `tracing` events.
    #[default]
    Tracing,
    /// One JSON document per record.
    Json,
}

impl SinkKind {
    /// Builds a sink of this kind.
    pub fn build(self) -> SharedSink {
        match self {
            SinkKind::Tracing => Arc::new(TracingSink),
            SinkKind::Json => Arc::new(JsonSink),
        }
    }
}

/// Settings shared by the members of decorated owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedConfig {
    /// Severities used when a member does not set its own.
    pub options: LoggedOptions,
    /// Per-owner severities, keyed by owner name.
    pub owner_options: HashMap<String, LoggedOptions>,
    /// Sink the owner's logger writes to.
    pub sink: SinkKind,
    /// Whether `Logger Initialized` is logged when an owner's logger is
    /// first resolved.
    pub announce_initialization: bool,
}

impl Default for LoggedConfig {
    fn default() -> Self {
        Self {
            options: LoggedOptions::default(),
            owner_options: HashMap::new(),
            sink: SinkKind::default(),
            announce_initialization: true,
        }
    }
}

impl LoggedConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the default severities.
    pub fn with_options(mut self, options: LoggedOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the severities of one owner.
    pub fn with_owner_options(mut self, owner: impl Into<String>, options: LoggedOptions) -> Self {
        self.owner_options.insert(owner.into(), options);
        self
    }

    /// Sets the sink kind.
    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = sink;
        self
    }

    /// Sets whether initialization is announced.
    pub fn with_announcement(mut self, enabled: bool) -> Self {
        self.announce_initialization = enabled;
        self
    }

    /// Returns the default severities of `owner`.
    pub fn options_for(&self, owner: &str) -> LoggedOptions {
        self.owner_options.get(owner).copied().unwrap_or(self.options)
    }

    /// Builds the configured sink.
    pub fn build_sink(&self) -> SharedSink {
        self.sink.build()
    }

    /// Creates a lazily resolved logger cell for `owner`.
    pub fn sink_cell(&self, owner: &str) -> SinkCell {
        let kind = self.sink;
        SinkCell::new(move || kind.build())
            .with_context(owner)
            .with_announcement(self.announce_initialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;

    #[test]
    fn test_defaults() {
        let config = LoggedConfig::default();
        assert_eq!(config.sink, SinkKind::Tracing);
        assert!(config.announce_initialization);
        assert_eq!(config.options_for("Anything"), LoggedOptions::default());
    }

    #[test]
    fn test_owner_options_override() {
        let quiet = LoggedOptions::new().with_call_level(LogLevel::Skip);
        let config = LoggedConfig::new().with_owner_options("AuthGuard", quiet);
        assert_eq!(config.options_for("AuthGuard").call_level, LogLevel::Skip);
        assert_eq!(config.options_for("UserService").call_level, LogLevel::Info);
    }

    #[test]
    fn test_sink_cell_uses_owner_context() {
        let cell = LoggedConfig::new().with_announcement(false).sink_cell("Cats");
        assert!(!cell.is_initialized());
        assert_eq!(cell.get().context(), Some("Cats"));
    }
}

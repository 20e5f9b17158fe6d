//! Log sinks: the components that actually surface log lines.
//!
//! Everything the crate logs ends up as a [`LogRecord`] handed to a
//! [`LogSink`]. A record always carries the fully formatted message; when
//! it was produced by a scoped logger it also carries the structured
//! [`ScopeRecord`], so the correlation id and scope path are recoverable
//! either way.
//!
//! Provided sinks:
//!
//! - [`TracingSink`]: structured `tracing` events (the default)
//! - [`JsonSink`]: the whole record serialized as one JSON string

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::constants::{JSON_TARGET, TRACING_TARGET};
use crate::scope::ScopeRecord;
use crate::types::LogLevel;

// =============================================================================
// LogRecord
// =============================================================================

/// One emitted log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Severity of the line. Never `Skip`.
    pub level: LogLevel,
    /// Fully formatted message, including any scope prefix.
    pub message: String,
    /// Name of the owning type, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Correlation id and scope path of the emitting scoped logger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeRecord>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: None,
            scope: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the context string.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches the structured scope.
    pub fn with_scope(mut self, scope: ScopeRecord) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the correlation id text, if the record is scoped.
    pub fn correlation_id(&self) -> Option<&str> {
        self.scope.as_ref().map(|scope| scope.correlation_id.as_str())
    }
}

// =============================================================================
// LogSink Trait
// =============================================================================

/// Destination for log records.
///
/// Implementations must be cheap to call and must not panic; persistence,
/// formatting and transport are entirely their concern.
pub trait LogSink: Send + Sync {
    /// Surfaces one record.
    fn write(&self, record: &LogRecord);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn write(&self, record: &LogRecord) {
        (**self).write(record)
    }
}

/// Shared, type-erased sink.
pub type SharedSink = Arc<dyn LogSink>;

// =============================================================================
// TracingSink
// =============================================================================

/// Default sink that emits `tracing` events with structured fields.
///
/// Fields: `correlation_id`, `scope` (the rendered scope path) and
/// `context`; empty when unknown. `Fatal` records are emitted at `ERROR`
/// with `fatal = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord) {
        let correlation_id = record.correlation_id().unwrap_or_default();
        let scope = record
            .scope
            .as_ref()
            .map(ScopeRecord::path)
            .unwrap_or_default();
        let context = record.context.as_deref().unwrap_or_default();
        let message = &record.message;

        match record.level {
            LogLevel::Verbose => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    "{}",
                    message
                );
            }
            LogLevel::Debug => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    "{}",
                    message
                );
            }
            LogLevel::Info => {
                tracing::info!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    "{}",
                    message
                );
            }
            LogLevel::Warn => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    "{}",
                    message
                );
            }
            LogLevel::Error => {
                tracing::error!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    "{}",
                    message
                );
            }
            LogLevel::Fatal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    correlation_id = %correlation_id,
                    scope = %scope,
                    context = %context,
                    fatal = true,
                    "{}",
                    message
                );
            }
            LogLevel::Skip => {}
        }
    }
}

// =============================================================================
// JsonSink
// =============================================================================

/// A sink that serializes each record to one JSON string.
///
/// Useful for log aggregation systems that expect JSON lines. The JSON is
/// emitted as the message of a `tracing` event under the
/// `call_logging_json` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl JsonSink {
    /// Serializes `record` as the compact JSON line this sink emits.
    pub fn render(record: &LogRecord) -> Option<String> {
        serde_json::to_string(record).ok()
    }
}

impl LogSink for JsonSink {
    fn write(&self, record: &LogRecord) {
        let Some(json) = Self::render(record) else {
            return;
        };

        match record.level {
            LogLevel::Verbose => tracing::trace!(target: JSON_TARGET, "{}", json),
            LogLevel::Debug => tracing::debug!(target: JSON_TARGET, "{}", json),
            LogLevel::Info => tracing::info!(target: JSON_TARGET, "{}", json),
            LogLevel::Warn => tracing::warn!(target: JSON_TARGET, "{}", json),
            LogLevel::Error | LogLevel::Fatal => tracing::error!(target: JSON_TARGET, "{}", json),
            LogLevel::Skip => {}
        }
    }
}

// =============================================================================
// MemorySink (for testing)
// =============================================================================

#[cfg(test)]
use std::sync::Mutex;

/// A sink that captures records in memory for assertions.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

#[cfg(test)]
impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Returns the captured messages in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    /// Returns the messages captured at `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }

    /// Clears all captured records.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Returns the number of captured records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns true if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

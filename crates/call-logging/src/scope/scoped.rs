use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::iter;
use std::sync::Arc;

use crate::constants::SCOPE_SEPARATOR;
use crate::logger::{BaseLogger, Logger};
use crate::types::{CorrelationId, LogLevel, ScopeLabel};

// =============================================================================
// ScopeRecord
// =============================================================================

/// Structured scope attached to every record of a scoped logger.
///
/// Also the carrier for continuing a chain on the far side of a process
/// boundary: [`ScopeRecord::encode`] produces a JSON string suitable for a
/// header or message attribute and [`ScopeRecord::decode`] reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRecord {
    /// Identifier shared by the whole chain.
    pub correlation_id: CorrelationId,
    /// Scope path from the root of the chain.
    #[serde(default)]
    pub labels: Vec<ScopeLabel>,
}

impl ScopeRecord {
    /// Creates a record.
    pub fn new(correlation_id: CorrelationId, labels: Vec<ScopeLabel>) -> Self {
        Self {
            correlation_id,
            labels,
        }
    }

    /// Renders the labels joined by ` -> `.
    pub fn path(&self) -> String {
        render_path(&self.labels)
    }

    /// Serializes the record as compact JSON.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"correlationId":"{}","labels":[]}}"#, self.correlation_id)
        })
    }

    /// Reads a record produced by [`ScopeRecord::encode`].
    ///
    /// Lenient: a missing or malformed label list becomes empty, and
    /// individual malformed labels are dropped. Returns None only when no
    /// usable correlation id is present.
    pub fn decode(encoded: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(encoded).ok()?;
        let correlation_id: CorrelationId = value
            .get("correlationId")
            .and_then(Value::as_str)?
            .parse()
            .ok()?;

        let labels: Vec<ScopeLabel> = value
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|label| serde_json::from_value(label.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            correlation_id,
            labels,
        })
    }
}

fn render_path(labels: &[ScopeLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(SCOPE_SEPARATOR)
}

// =============================================================================
// ScopedLogger
// =============================================================================

/// A logger tagged with a scope path and a correlation id.
///
/// Immutable: deriving a child allocates a new label sequence and copies
/// the parent's identifier. Records always go to the base sink; the scope
/// travels alongside each record instead of wrapping the sink.
///
/// Lines render as `[id] label1 -> label2: message`.
///
/// # Example
///
/// ```rust
/// use call_logging::{BaseLogger, Logger, ScopedLogger};
///
/// let base = BaseLogger::default();
/// let root = ScopedLogger::from_root(base.clone(), "OrderController", None);
/// let child = ScopedLogger::from_parent(base, &root, "OrderService.place");
///
/// assert_eq!(child.correlation_id(), root.correlation_id());
/// assert_eq!(child.path(), "OrderController -> OrderService.place");
/// child.info("reserving stock");
/// ```
#[derive(Debug, Clone)]
pub struct ScopedLogger {
    base: BaseLogger,
    labels: Arc<[ScopeLabel]>,
    correlation_id: CorrelationId,
}

impl ScopedLogger {
    /// Starts a chain with a single label.
    ///
    /// Uses `correlation_id` when given, otherwise generates one.
    pub fn from_root(
        base: BaseLogger,
        label: impl Into<ScopeLabel>,
        correlation_id: Option<CorrelationId>,
    ) -> Self {
        let label: ScopeLabel = label.into();
        Self {
            base,
            labels: Arc::from([label]),
            correlation_id: correlation_id.unwrap_or_default(),
        }
    }

    /// Derives a child of `parent` with `label` appended.
    ///
    /// `base` becomes the forwarding target; the parent is only read for its
    /// labels and identifier.
    pub fn from_parent(base: BaseLogger, parent: &ScopedLogger, label: impl Into<ScopeLabel>) -> Self {
        Self {
            base,
            labels: append(&parent.labels, label.into()),
            correlation_id: parent.correlation_id.clone(),
        }
    }

    /// Continues a chain received from across a process boundary.
    pub fn resume(base: BaseLogger, record: ScopeRecord, label: impl Into<ScopeLabel>) -> Self {
        Self {
            base,
            labels: append(&record.labels, label.into()),
            correlation_id: record.correlation_id,
        }
    }

    /// Returns the scope path.
    pub fn labels(&self) -> &[ScopeLabel] {
        &self.labels
    }

    /// Returns the chain's identifier.
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Returns the base logger records are forwarded to.
    pub fn base(&self) -> &BaseLogger {
        &self.base
    }

    /// Renders the scope path joined by ` -> `.
    pub fn path(&self) -> String {
        render_path(&self.labels)
    }

    /// Returns the structured scope.
    pub fn record(&self) -> ScopeRecord {
        ScopeRecord::new(self.correlation_id.clone(), self.labels.to_vec())
    }

    fn format(&self, message: &str) -> String {
        if self.labels.is_empty() {
            format!("[{}] {}", self.correlation_id, message)
        } else {
            format!("[{}] {}: {}", self.correlation_id, self.path(), message)
        }
    }
}

impl Logger for ScopedLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if level.is_skip() {
            return;
        }
        self.base.emit(level, self.format(message), Some(self.record()));
    }
}

fn append(labels: &[ScopeLabel], label: ScopeLabel) -> Arc<[ScopeLabel]> {
    labels.iter().cloned().chain(iter::once(label)).collect()
}

// =============================================================================
// ActiveLogger
// =============================================================================

/// The logger handed to a wrapped callable.
///
/// Scoped when the call site injects a logger and a scope could be derived,
/// otherwise the owner's base logger.
#[derive(Debug, Clone)]
pub enum ActiveLogger {
    /// The owner's base logger.
    Base(BaseLogger),
    /// A logger derived for this call.
    Scoped(ScopedLogger),
}

impl ActiveLogger {
    /// Returns the scoped logger, if any.
    pub fn scoped(&self) -> Option<&ScopedLogger> {
        match self {
            ActiveLogger::Scoped(logger) => Some(logger),
            ActiveLogger::Base(_) => None,
        }
    }

    /// Returns the base logger behind this logger.
    pub fn base(&self) -> &BaseLogger {
        match self {
            ActiveLogger::Base(logger) => logger,
            ActiveLogger::Scoped(logger) => logger.base(),
        }
    }
}

impl Logger for ActiveLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match self {
            ActiveLogger::Base(logger) => logger.log(level, message),
            ActiveLogger::Scoped(logger) => logger.log(level, message),
        }
    }
}

impl From<ScopedLogger> for ActiveLogger {
    fn from(logger: ScopedLogger) -> Self {
        ActiveLogger::Scoped(logger)
    }
}

impl From<BaseLogger> for ActiveLogger {
    fn from(logger: BaseLogger) -> Self {
        ActiveLogger::Base(logger)
    }
}

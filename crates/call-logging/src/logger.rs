//! The `Logger` trait and the undecorated base logger.
//!
//! [`BaseLogger`] is what an owning type logs through when no scope is
//! involved: a sink plus an optional context string (usually the type's
//! name). [`SinkCell`] resolves that base logger lazily, exactly once per
//! owner, even under concurrent first use.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::constants::LOGGER_INITIALIZED_MESSAGE;
use crate::scope::ScopeRecord;
use crate::sink::{LogRecord, SharedSink, TracingSink};
use crate::types::LogLevel;

// =============================================================================
// Logger Trait
// =============================================================================

/// Per-severity logging methods.
///
/// Implementors provide [`Logger::log`]; the severity helpers forward to it.
/// Logging never fails and never panics, and `Skip` emits nothing.
pub trait Logger {
    /// Logs `message` at `level`.
    fn log(&self, level: LogLevel, message: &str);

    /// Logs at verbose level.
    fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }

    /// Logs at debug level.
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Logs at info level.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Logs at warn level.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Logs at error level.
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Logs at fatal level.
    fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }
}

// =============================================================================
// BaseLogger
// =============================================================================

/// A sink paired with an optional context string.
#[derive(Clone)]
pub struct BaseLogger {
    sink: SharedSink,
    context: Option<Arc<str>>,
}

impl BaseLogger {
    /// Creates a logger writing to `sink` without a context.
    pub fn new(sink: SharedSink) -> Self {
        Self {
            sink,
            context: None,
        }
    }

    /// Sets the context string attached to every record.
    pub fn with_context(mut self, context: impl Into<Arc<str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the context string.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the underlying sink.
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Writes a record, optionally tagged with a scope.
    pub(crate) fn emit(&self, level: LogLevel, message: String, scope: Option<ScopeRecord>) {
        if level.is_skip() {
            return;
        }

        let mut record = LogRecord::new(level, message);
        record.context = self.context.as_deref().map(str::to_string);
        record.scope = scope;
        self.sink.write(&record);
    }
}

impl Default for BaseLogger {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for BaseLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLogger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Logger for BaseLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.emit(level, message.to_string(), None);
    }
}

// =============================================================================
// SinkCell
// =============================================================================

type SinkFactory = Arc<dyn Fn() -> SharedSink + Send + Sync>;

/// Lazily resolved base logger for one owner.
///
/// The factory runs at most once; concurrent first callers all observe the
/// same logger, and `Logger Initialized` is logged once.
pub struct SinkCell {
    factory: SinkFactory,
    context: Option<Arc<str>>,
    announce: bool,
    logger: OnceLock<BaseLogger>,
}

impl SinkCell {
    /// Creates a cell that builds its sink with `factory` on first use.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> SharedSink + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            context: None,
            announce: true,
            logger: OnceLock::new(),
        }
    }

    /// Creates a cell around an existing sink.
    pub fn with_sink(sink: SharedSink) -> Self {
        Self::new(move || Arc::clone(&sink))
    }

    /// Sets the context string of the resolved logger.
    pub fn with_context(mut self, context: impl Into<Arc<str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets whether initialization is announced.
    pub fn with_announcement(mut self, enabled: bool) -> Self {
        self.announce = enabled;
        self
    }

    /// Returns the base logger, building it on first call.
    pub fn get(&self) -> &BaseLogger {
        self.logger.get_or_init(|| {
            let mut logger = BaseLogger::new((self.factory)());
            logger.context = self.context.clone();
            if self.announce {
                logger.debug(LOGGER_INITIALIZED_MESSAGE);
            }
            logger
        })
    }

    /// Returns an unresolved cell sharing this cell's factory, context and
    /// announcement setting.
    pub(crate) fn fresh(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            context: self.context.clone(),
            announce: self.announce,
            logger: OnceLock::new(),
        }
    }

    /// Returns true once the logger has been built.
    pub fn is_initialized(&self) -> bool {
        self.logger.get().is_some()
    }
}

impl Default for SinkCell {
    fn default() -> Self {
        Self::new(|| Arc::new(TracingSink))
    }
}

impl fmt::Debug for SinkCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkCell")
            .field("context", &self.context)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

//! The call-wrapping interceptor.
//!
//! Every wrapped call runs the same steps:
//!
//! 1. resolve the owner's base logger (lazily, once per owner)
//! 2. pick the active logger: a derived scoped logger when the site injects
//!    one, otherwise the base logger
//! 3. render the logged arguments and emit `HIT` at the call level
//! 4. run the original callable
//! 5. emit `RETURNED` at the return level, or `ERROR WHILE` at the error
//!    level before handing the error (or panic) back to the caller
//!
//! A site that injects a logger but is invoked through a non-HTTP context
//! logs one error line and falls back to the base logger; the call itself
//! still runs.

use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::args::{CallArgs, to_log_value};
use super::metadata::{LoggedMetadata, LoggedOptions};
use super::site::CallSite;
use crate::constants::FIELD_SEPARATOR;
use crate::error::ContextError;
use crate::logger::{BaseLogger, Logger, SinkCell};
use crate::projection::format_for_log;
use crate::scope::{ActiveLogger, ScopeSource};

// =============================================================================
// Interceptor
// =============================================================================

/// Logs entry, return and error of calls to one site.
///
/// Cheap to clone; clones share the site, metadata and sink cell.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use call_logging::{CallSite, Interceptor, LoggedMetadata, LoggedParam, ScopeSource, SinkCell};
///
/// let interceptor = Interceptor::new(
///     CallSite::function("add"),
///     LoggedMetadata::new().param(LoggedParam::new(0, "a")).param(LoggedParam::new(1, "b")),
///     Arc::new(SinkCell::default()),
/// );
///
/// let sum = interceptor.call(ScopeSource::Root, (2, 3), |_logger, (a, b): (i32, i32)| {
///     Ok::<_, String>(a + b)
/// });
/// assert_eq!(sum, Ok(5));
/// ```
#[derive(Debug, Clone)]
pub struct Interceptor {
    inner: Arc<InterceptorInner>,
}

#[derive(Debug)]
struct InterceptorInner {
    site: CallSite,
    metadata: LoggedMetadata,
    options: LoggedOptions,
    sink: Arc<SinkCell>,
}

impl Interceptor {
    /// Creates an interceptor.
    ///
    /// Params reusing an index or a name are dropped with a warning.
    pub fn new(site: CallSite, mut metadata: LoggedMetadata, sink: Arc<SinkCell>) -> Self {
        for problem in metadata.validate() {
            sink.get().warn(&problem.to_string());
        }
        Self::from_validated(site, metadata, sink)
    }

    /// Creates an interceptor from metadata whose params were already
    /// validated and reported.
    pub(crate) fn from_validated(site: CallSite, metadata: LoggedMetadata, sink: Arc<SinkCell>) -> Self {
        let options = metadata.effective_options(LoggedOptions::default());
        Self {
            inner: Arc::new(InterceptorInner {
                site,
                metadata,
                options,
                sink,
            }),
        }
    }

    /// Returns the call site.
    pub fn site(&self) -> &CallSite {
        &self.inner.site
    }

    /// Returns the validated metadata.
    pub fn metadata(&self) -> &LoggedMetadata {
        &self.inner.metadata
    }

    /// Returns the effective severities.
    pub fn options(&self) -> LoggedOptions {
        self.inner.options
    }

    /// Returns the owner's base logger, building it on first use.
    pub fn logger(&self) -> &BaseLogger {
        self.inner.sink.get()
    }

    /// Runs `original` with entry, return and error logging.
    ///
    /// Errors and panics are logged and then propagated unchanged.
    pub fn call<'s, A, T, E, F>(&self, source: impl Into<ScopeSource<'s>>, args: A, original: F) -> Result<T, E>
    where
        A: CallArgs,
        T: Serialize,
        E: Display,
        F: FnOnce(ActiveLogger, A) -> Result<T, E>,
    {
        let source = source.into();
        let logger = self.active_logger(&source);
        let route = self.route(&source);
        self.log_hit(&logger, route, &args);

        let active = logger.clone();
        match panic::catch_unwind(AssertUnwindSafe(move || original(active, args))) {
            Ok(result) => self.finish(&logger, route, result),
            Err(payload) => {
                self.log_error(&logger, route, &panic_message(payload.as_ref()));
                panic::resume_unwind(payload)
            }
        }
    }

    /// Async counterpart of [`Interceptor::call`].
    ///
    /// The `HIT` line is emitted before `original` is invoked; the outcome
    /// is logged once the returned future settles.
    pub async fn call_async<'s, A, T, E, F, Fut>(
        &self,
        source: impl Into<ScopeSource<'s>>,
        args: A,
        original: F,
    ) -> Result<T, E>
    where
        A: CallArgs,
        T: Serialize,
        E: Display,
        F: FnOnce(ActiveLogger, A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let source = source.into();
        let logger = self.active_logger(&source);
        let route = self.route(&source).map(str::to_string);
        self.log_hit(&logger, route.as_deref(), &args);

        let active = logger.clone();
        let outcome = AssertUnwindSafe(async move { original(active, args).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => self.finish(&logger, route.as_deref(), result),
            Err(payload) => {
                self.log_error(&logger, route.as_deref(), &panic_message(payload.as_ref()));
                panic::resume_unwind(payload)
            }
        }
    }

    fn active_logger(&self, source: &ScopeSource<'_>) -> ActiveLogger {
        let base = self.logger();
        if !self.inner.metadata.inject_logger {
            return ActiveLogger::Base(base.clone());
        }

        match source.derive(base, self.inner.site.label().clone()) {
            Ok(scoped) => ActiveLogger::Scoped(scoped),
            Err(found) => {
                let problem = ContextError::NotHttp {
                    identity: self.inner.site.identity().to_string(),
                    found,
                };
                base.error(&problem.to_string());
                ActiveLogger::Base(base.clone())
            }
        }
    }

    fn route<'a>(&'a self, source: &'a ScopeSource<'_>) -> Option<&'a str> {
        self.inner.site.route().or_else(|| source.route())
    }

    fn render_params<A: CallArgs>(&self, args: &A) -> Option<String> {
        let params = &self.inner.metadata.params;
        if params.is_empty() {
            return None;
        }

        let rendered: Vec<String> = params
            .iter()
            .map(|param| {
                let value = args.arg(param.index);
                format!("{}={}", param.name, format_for_log(value.as_ref(), Some(&param.filter)))
            })
            .collect();
        Some(rendered.join(FIELD_SEPARATOR))
    }

    fn log_hit<A: CallArgs>(&self, logger: &ActiveLogger, route: Option<&str>, args: &A) {
        let level = self.inner.options.call_level;
        if level.is_skip() {
            return;
        }
        let params = self.render_params(args);
        logger.log(level, &self.inner.site.hit_line(route, params.as_deref()));
    }

    fn finish<T, E>(&self, logger: &ActiveLogger, route: Option<&str>, result: Result<T, E>) -> Result<T, E>
    where
        T: Serialize,
        E: Display,
    {
        match &result {
            Ok(value) => self.log_return(logger, route, value),
            Err(error) => self.log_error(logger, route, &error.to_string()),
        }
        result
    }

    fn log_return<T: Serialize>(&self, logger: &ActiveLogger, route: Option<&str>, value: &T) {
        let level = self.inner.options.return_level;
        if level.is_skip() {
            return;
        }
        let rendered = if self.inner.metadata.returns.is_nothing() {
            None
        } else {
            self.inner.metadata.returns.render(&to_log_value(value))
        };
        logger.log(level, &self.inner.site.returned_line(route, rendered.as_deref()));
    }

    fn log_error(&self, logger: &ActiveLogger, route: Option<&str>, error: &str) {
        let level = self.inner.options.error_level;
        if level.is_skip() {
            return;
        }
        logger.log(level, &self.inner.site.error_line(route, error));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

// =============================================================================
// LoggedFn
// =============================================================================

/// A callable bundled with its interceptor.
///
/// Produced by [`wrap`]. The callable receives the active logger followed
/// by its arguments.
#[derive(Debug, Clone)]
pub struct LoggedFn<F> {
    interceptor: Interceptor,
    original: F,
}

impl<F> LoggedFn<F> {
    /// Returns the interceptor.
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Calls the wrapped function.
    pub fn call<'s, A, T, E>(&self, source: impl Into<ScopeSource<'s>>, args: A) -> Result<T, E>
    where
        F: Fn(ActiveLogger, A) -> Result<T, E>,
        A: CallArgs,
        T: Serialize,
        E: Display,
    {
        self.interceptor.call(source, args, &self.original)
    }

    /// Calls the wrapped async function.
    pub async fn call_async<'s, A, T, E, Fut>(&self, source: impl Into<ScopeSource<'s>>, args: A) -> Result<T, E>
    where
        F: Fn(ActiveLogger, A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: CallArgs,
        T: Serialize,
        E: Display,
    {
        self.interceptor.call_async(source, args, &self.original).await
    }
}

/// Wraps `original` so every call through the result is logged.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use call_logging::{wrap, ActiveLogger, CallSite, LoggedMetadata, ReturnFormat, ScopeSource, SinkCell};
///
/// let double = wrap(
///     |_logger: ActiveLogger, (n,): (u32,)| Ok::<_, String>(n * 2),
///     Arc::new(SinkCell::default()),
///     LoggedMetadata::new().returns(ReturnFormat::whole()),
///     CallSite::function("double"),
/// );
/// assert_eq!(double.call(ScopeSource::Root, (21,)), Ok(42));
/// ```
pub fn wrap<F>(original: F, sink: Arc<SinkCell>, metadata: LoggedMetadata, site: CallSite) -> LoggedFn<F> {
    LoggedFn {
        interceptor: Interceptor::new(site, metadata, sink),
        original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::LoggedParam;
    use crate::sink::MemorySink;
    use crate::types::LogLevel;

    fn cell(sink: &MemorySink) -> Arc<SinkCell> {
        Arc::new(SinkCell::with_sink(Arc::new(sink.clone())).with_announcement(false))
    }

    #[test]
    fn test_call_logs_hit_and_return() {
        let sink = MemorySink::new();
        let interceptor = Interceptor::new(
            CallSite::function("add"),
            LoggedMetadata::new()
                .param(LoggedParam::new(0, "a"))
                .param(LoggedParam::new(1, "b"))
                .returns(crate::interceptor::ReturnFormat::whole()),
            cell(&sink),
        );

        let result = interceptor.call(ScopeSource::Root, (2, 3), |_, (a, b): (i32, i32)| Ok::<_, String>(a + b));
        assert_eq!(result, Ok(5));
        assert_eq!(
            sink.messages(),
            vec!["HIT FUNCTION add WITH a=2, b=3", "RETURNED FUNCTION add WITH 5"]
        );
    }

    #[test]
    fn test_error_logged_and_returned() {
        let sink = MemorySink::new();
        let interceptor = Interceptor::new(CallSite::function("fail"), LoggedMetadata::new(), cell(&sink));

        let result: Result<(), String> = interceptor.call(ScopeSource::Root, (), |_, ()| Err("boom".to_string()));
        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(sink.messages_at(LogLevel::Error), vec!["ERROR WHILE FUNCTION fail: boom"]);
    }

    #[test]
    fn test_panic_logged_then_resumed() {
        let sink = MemorySink::new();
        let interceptor = Interceptor::new(CallSite::function("explode"), LoggedMetadata::new(), cell(&sink));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), String> = interceptor.call(ScopeSource::Root, (), |_, ()| panic!("kaboom"));
        }));
        assert!(outcome.is_err());
        assert_eq!(sink.messages_at(LogLevel::Error), vec!["ERROR WHILE FUNCTION explode: kaboom"]);
    }

    #[test]
    fn test_duplicate_params_warned() {
        let sink = MemorySink::new();
        let interceptor = Interceptor::new(
            CallSite::function("f"),
            LoggedMetadata::new()
                .param(LoggedParam::new(0, "a"))
                .param(LoggedParam::new(0, "b")),
            cell(&sink),
        );

        assert_eq!(interceptor.metadata().params.len(), 1);
        assert_eq!(sink.messages_at(LogLevel::Warn).len(), 1);
    }
}

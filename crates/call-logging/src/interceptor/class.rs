//! Class-level decoration.
//!
//! A [`LoggedClass`] stands for one owning type (a service, controller,
//! guard, interceptor, middleware or exception filter). It owns the lazily
//! resolved logger shared by all of the type's members and the merged
//! metadata of every decorated member, and hands out an [`Interceptor`]
//! per member.

use std::sync::Arc;

use super::metadata::{LoggedMetadata, LoggedOptions, MetadataRegistry, MethodKey};
use super::site::CallSite;
use super::wrap::Interceptor;
use crate::config::LoggedConfig;
use crate::error::DecorationError;
use crate::logger::{BaseLogger, Logger, SinkCell};
use crate::sink::SharedSink;
use crate::types::CallKind;

/// What kind of member is being decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A callable member.
    Method,
    /// A data member; decorating one is rejected with a warning.
    Property,
}

/// An owning type whose members are logged.
///
/// # Example
///
/// ```rust
/// use call_logging::{LoggedClass, LoggedMetadata, LoggedParam, RequestScope};
///
/// let controller = LoggedClass::controller("UserController");
/// let find = controller.route(
///     "find",
///     "GET",
///     "/users/:id",
///     LoggedMetadata::new().param(LoggedParam::new(0, "id")).inject_logger(),
/// );
///
/// let request = RequestScope::new();
/// let user = find.call(&request, (7,), |_logger, (id,): (u64,)| {
///     Ok::<_, String>(format!("user-{id}"))
/// });
/// assert_eq!(user.as_deref(), Ok("user-7"));
/// ```
#[derive(Debug, Clone)]
pub struct LoggedClass {
    name: String,
    kind: CallKind,
    defaults: LoggedOptions,
    announce: bool,
    custom_sink: bool,
    sink: Arc<SinkCell>,
    registry: Arc<MetadataRegistry>,
}

impl LoggedClass {
    /// Creates an owner of `kind` logging through the default sink.
    pub fn new(kind: CallKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            sink: Arc::new(SinkCell::default().with_context(name.as_str())),
            name,
            kind,
            defaults: LoggedOptions::default(),
            announce: true,
            custom_sink: false,
            registry: Arc::new(MetadataRegistry::new()),
        }
    }

    /// A service whose methods log as `FUNCTION`.
    pub fn injectable(name: impl Into<String>) -> Self {
        Self::new(CallKind::Function, name)
    }

    /// A controller; routes log as `ENDPOINT`.
    pub fn controller(name: impl Into<String>) -> Self {
        Self::new(CallKind::Endpoint, name)
    }

    /// An access guard.
    pub fn guard(name: impl Into<String>) -> Self {
        Self::new(CallKind::Guard, name)
    }

    /// A request interceptor.
    pub fn interceptor(name: impl Into<String>) -> Self {
        Self::new(CallKind::Interceptor, name)
    }

    /// A request middleware.
    pub fn middleware(name: impl Into<String>) -> Self {
        Self::new(CallKind::Middleware, name)
    }

    /// An exception filter.
    pub fn exception_filter(name: impl Into<String>) -> Self {
        Self::new(CallKind::ExceptionFilter, name)
    }

    /// Writes through `sink` instead of the default.
    ///
    /// The sink is kept by later calls to [`LoggedClass::with_config`].
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Arc::new(
            SinkCell::with_sink(sink)
                .with_context(self.name.as_str())
                .with_announcement(self.announce),
        );
        self.custom_sink = true;
        self
    }

    /// Applies shared configuration: default severities, announcement and
    /// sink kind. The configured sink kind is ignored once a custom sink
    /// has been set.
    pub fn with_config(mut self, config: &LoggedConfig) -> Self {
        self.defaults = config.options_for(&self.name);
        self.announce = config.announce_initialization;
        let cell = if self.custom_sink {
            self.sink.fresh().with_announcement(self.announce)
        } else {
            config.sink_cell(&self.name)
        };
        self.sink = Arc::new(cell);
        self
    }

    /// Returns the owner's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owner's kind.
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Returns the owner's base logger, building it on first use.
    pub fn logger(&self) -> &BaseLogger {
        self.sink.get()
    }

    /// Returns the merged metadata of a member.
    pub fn metadata(&self, member: &str) -> Option<LoggedMetadata> {
        self.registry.get(&self.name, member)
    }

    /// Decorates a method and returns its interceptor.
    ///
    /// Decorating the same method again merges the metadata.
    pub fn method(&self, member: &str, metadata: LoggedMetadata) -> Interceptor {
        let site = match self.kind {
            CallKind::Function | CallKind::Endpoint => CallSite::method(&self.name, member),
            kind => CallSite::handler(kind, self.name.as_str()),
        };
        self.intercept(site, member, metadata)
    }

    /// Decorates a route handler serving `http_method path`.
    pub fn route(&self, member: &str, http_method: &str, path: &str, metadata: LoggedMetadata) -> Interceptor {
        let site = CallSite::endpoint(&self.name, member, http_method, path);
        self.intercept(site, member, metadata)
    }

    /// Decorates a member of either kind.
    ///
    /// Properties cannot be wrapped: a warning is logged and None returned.
    pub fn decorate(&self, member: &str, kind: MemberKind, metadata: LoggedMetadata) -> Option<Interceptor> {
        match kind {
            MemberKind::Method => Some(self.method(member, metadata)),
            MemberKind::Property => {
                let problem = DecorationError::NotAMethod {
                    owner: self.name.clone(),
                    member: member.to_string(),
                };
                self.logger().warn(&problem.to_string());
                None
            }
        }
    }

    fn intercept(&self, site: CallSite, member: &str, metadata: LoggedMetadata) -> Interceptor {
        let (mut merged, problems) = self.registry.apply(MethodKey::new(self.name.as_str(), member), metadata);
        for problem in problems {
            self.logger().warn(&problem.to_string());
        }
        merged.options.get_or_insert(self.defaults);
        tracing::trace!(owner = %self.name, member = %member, kind = %site.kind(), "Member decorated");
        Interceptor::from_validated(site, merged, Arc::clone(&self.sink))
    }
}

use std::sync::OnceLock;

use super::scoped::{ScopeRecord, ScopedLogger};
use crate::error::ContextKind;
use crate::logger::BaseLogger;
use crate::types::{CorrelationId, ScopeLabel};

// =============================================================================
// RequestScope
// =============================================================================

/// Per-request carrier of the correlation id.
///
/// One value travels with one HTTP request so that its middleware, guards,
/// interceptors and endpoint all log under the same identifier. The id is
/// created on first use; concurrent first callers observe the same id.
#[derive(Debug, Default)]
pub struct RequestScope {
    correlation_id: OnceLock<CorrelationId>,
    route: Option<String>,
}

impl RequestScope {
    /// Creates a scope whose id is generated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope with a known id.
    pub fn with_correlation_id(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id: OnceLock::from(correlation_id),
            route: None,
        }
    }

    /// Creates a scope from an incoming request-id header value.
    ///
    /// An absent or unusable value falls back to a generated id.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.and_then(|value| value.parse().ok()) {
            Some(id) => Self::with_correlation_id(id),
            None => Self::new(),
        }
    }

    /// Sets the route of the request, rendered in log lines of call sites
    /// that have no route of their own.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Returns the request's correlation id, generating it on first call.
    pub fn correlation_id(&self) -> &CorrelationId {
        self.correlation_id.get_or_init(CorrelationId::new)
    }

    /// Returns the request's route.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}

// =============================================================================
// InvocationContext
// =============================================================================

/// Transport a guard, interceptor or filter was invoked through.
#[derive(Debug, Clone, Copy)]
pub enum InvocationContext<'a> {
    /// An HTTP request carrying its scope.
    Http(&'a RequestScope),
    /// A remote procedure call.
    Rpc,
    /// A websocket message.
    Ws,
}

impl InvocationContext<'_> {
    /// Returns the transport kind.
    pub fn kind(&self) -> ContextKind {
        match self {
            InvocationContext::Http(_) => ContextKind::Http,
            InvocationContext::Rpc => ContextKind::Rpc,
            InvocationContext::Ws => ContextKind::Ws,
        }
    }
}

// =============================================================================
// ScopeSource
// =============================================================================

/// Where a call obtains the scope of its logger.
#[derive(Debug, Clone, Default)]
pub enum ScopeSource<'a> {
    /// Start a new chain with a fresh id.
    #[default]
    Root,
    /// Continue the caller's chain.
    Parent(&'a ScopedLogger),
    /// Start a chain under the request's id.
    Request(&'a RequestScope),
    /// Start a chain under the id of an HTTP context; other transports
    /// cannot provide one.
    Context(InvocationContext<'a>),
    /// Continue a chain received from another process.
    Resume(ScopeRecord),
}

impl ScopeSource<'_> {
    /// Derives the scoped logger for a call labelled `label`.
    ///
    /// Returns the offending transport when the source is a non-HTTP
    /// context.
    pub fn derive(&self, base: &BaseLogger, label: ScopeLabel) -> Result<ScopedLogger, ContextKind> {
        match self {
            ScopeSource::Root => Ok(ScopedLogger::from_root(base.clone(), label, None)),
            ScopeSource::Parent(parent) => Ok(ScopedLogger::from_parent(base.clone(), parent, label)),
            ScopeSource::Request(request)
            | ScopeSource::Context(InvocationContext::Http(request)) => Ok(ScopedLogger::from_root(
                base.clone(),
                label,
                Some(request.correlation_id().clone()),
            )),
            ScopeSource::Context(other) => Err(other.kind()),
            ScopeSource::Resume(record) => Ok(ScopedLogger::resume(base.clone(), record.clone(), label)),
        }
    }

    /// Returns the route of the underlying request, if any.
    pub fn route(&self) -> Option<&str> {
        match self {
            ScopeSource::Request(request)
            | ScopeSource::Context(InvocationContext::Http(request)) => request.route(),
            _ => None,
        }
    }
}

impl<'a> From<&'a ScopedLogger> for ScopeSource<'a> {
    fn from(parent: &'a ScopedLogger) -> Self {
        ScopeSource::Parent(parent)
    }
}

impl<'a> From<Option<&'a ScopedLogger>> for ScopeSource<'a> {
    fn from(parent: Option<&'a ScopedLogger>) -> Self {
        parent.map_or(ScopeSource::Root, ScopeSource::Parent)
    }
}

impl<'a> From<&'a RequestScope> for ScopeSource<'a> {
    fn from(request: &'a RequestScope) -> Self {
        ScopeSource::Request(request)
    }
}

impl<'a> From<InvocationContext<'a>> for ScopeSource<'a> {
    fn from(context: InvocationContext<'a>) -> Self {
        ScopeSource::Context(context)
    }
}

impl From<ScopeRecord> for ScopeSource<'_> {
    fn from(record: ScopeRecord) -> Self {
        ScopeSource::Resume(record)
    }
}

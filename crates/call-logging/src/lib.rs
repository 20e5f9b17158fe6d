#![warn(missing_docs)]
//! # Call Logging
//!
//! Declarative logging around function, method and request-handler calls.
//!
//! ## Overview
//!
//! The crate wraps callables so that every call produces a uniform set of
//! log lines, with three cooperating pieces:
//!
//! - **Path-tree projection** renders arguments and return values with only
//!   the selected fields (include) or without the sensitive ones (exclude)
//! - **Scoped loggers** carry a short correlation id and the chain of call
//!   labels, so one request's lines can be grepped together
//! - **Interceptors** emit `HIT`, `RETURNED` and `ERROR WHILE` lines at
//!   configurable levels, derive scoped loggers and resolve each owner's
//!   logger lazily, exactly once
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ LoggedClass (owner)                                          │
//! │  ┌────────────────┐   ┌────────────────┐   ┌──────────────┐  │
//! │  │ MetadataRegistry│  │ SinkCell       │   │ LoggedConfig │  │
//! │  └───────┬────────┘   └───────┬────────┘   └──────┬───────┘  │
//! └──────────┼────────────────────┼───────────────────┼──────────┘
//!            ▼                    ▼                   │
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Interceptor                                                  │
//! │  CallSite ── ScopeSource ──► ActiveLogger (Base | Scoped)    │
//! │  LoggedParam ──► projection::format_for_log                  │
//! │  ReturnFormat ──► RETURNED ... WITH                          │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ LogSink: TracingSink | JsonSink | your own                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use call_logging::prelude::*;
//!
//! let service = LoggedClass::injectable("PaymentService");
//! let charge = service.method(
//!     "charge",
//!     LoggedMetadata::new()
//!         .param(LoggedParam::new(0, "card").exclude(["number", "cvv"]))
//!         .param(LoggedParam::new(1, "amount"))
//!         .inject_logger()
//!         .returns(ReturnFormat::fields([("receipt", "id")])),
//! );
//!
//! let card = serde_json::json!({ "holder": "A. Person", "number": "4111", "cvv": "123" });
//! let receipt = charge.call(ScopeSource::Root, (card, 25), |logger, (_card, amount): (serde_json::Value, u32)| {
//!     logger.debug("contacting processor");
//!     Ok::<_, String>(serde_json::json!({ "id": format!("r-{amount}") }))
//! });
//! assert!(receipt.is_ok());
//! // HIT FUNCTION PaymentService.charge WITH card={"holder":"A. Person"}, amount=25
//! // RETURNED FUNCTION PaymentService.charge WITH receipt=r-25
//! ```
//!
//! ## Correlating a request
//!
//! ```rust
//! use call_logging::prelude::*;
//!
//! let request = RequestScope::from_header(Some("req-42")).with_route("GET /orders");
//! let controller = LoggedClass::controller("OrderController");
//! let service = LoggedClass::injectable("OrderService");
//!
//! let list = controller.route("list", "GET", "/orders", LoggedMetadata::new().inject_logger());
//! let load = service.method("load", LoggedMetadata::new().inject_logger());
//!
//! let orders = list.call(&request, (), |logger, ()| {
//!     // Nested calls continue the chain: [req-42] OrderController::/orders[GET] -> OrderService.load
//!     load.call(logger.scoped(), (), |_, ()| Ok::<_, String>(vec![1, 2, 3]))
//! });
//! assert_eq!(orders, Ok(vec![1, 2, 3]));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod interceptor;
pub mod logger;
pub mod projection;
pub mod scope;
pub mod sink;
pub mod types;

#[cfg(test)]
mod tests;

// Public API
pub use config::{LoggedConfig, SinkKind};
pub use error::{ConfigError, ContextError, ContextKind, DecorationError, InvalidCorrelationId};
pub use interceptor::{
    CallArgs, CallSite, Interceptor, LoggedClass, LoggedFn, LoggedMetadata, LoggedOptions,
    LoggedParam, MemberKind, MetadataRegistry, MethodKey, ReturnField, ReturnFormat, ReturnRule,
    to_log_value, wrap,
};
pub use logger::{BaseLogger, Logger, SinkCell};
pub use projection::{FieldFilter, PathNode, PathTree, exclude, format_for_log, project, resolve_path};
pub use scope::{ActiveLogger, InvocationContext, RequestScope, ScopeRecord, ScopeSource, ScopedLogger};
pub use sink::{JsonSink, LogRecord, LogSink, SharedSink, TracingSink};
pub use types::{CallKind, CorrelationId, LogLevel, ScopeLabel};

/// Prelude for convenient imports
///
/// ```rust
/// use call_logging::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Scope
        ActiveLogger,
        // Logging
        BaseLogger,
        // Interception
        CallSite,
        CorrelationId,
        FieldFilter,
        Interceptor,
        InvocationContext,
        LogLevel,
        LogSink,
        LoggedClass,
        // Configuration
        LoggedConfig,
        LoggedMetadata,
        LoggedOptions,
        LoggedParam,
        Logger,
        MemberKind,
        RequestScope,
        ReturnFormat,
        ReturnRule,
        ScopeSource,
        ScopedLogger,
        SinkCell,
        // Projection
        format_for_log,
        wrap,
    };
}

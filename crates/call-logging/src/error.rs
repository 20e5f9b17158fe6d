//! Error types for call logging.
//!
//! None of these errors ever escape a wrapped call. Errors produced by the
//! wrapped function itself are returned to the caller untouched; the types
//! here describe problems of the logging layer, which are reported through
//! the sink and otherwise contained.
//!
//! - [`DecorationError`]: a method was decorated in a way that cannot apply
//! - [`ContextError`]: a scoped logger was requested from an unusable context
//! - [`ConfigError`]: configuration could not be parsed
//! - [`InvalidCorrelationId`]: a caller-supplied identifier was rejected

use std::fmt;
use thiserror::Error;

/// Misuse detected while decorating a member.
///
/// These are reported as warnings and leave the member undecorated (or drop
/// the offending piece of metadata). They never abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecorationError {
    /// The member is not callable, so there is nothing to wrap.
    #[error("{owner}.{member} is not a method; decoration skipped")]
    NotAMethod {
        /// Owning type name.
        owner: String,
        /// Member name.
        member: String,
    },
    /// Two logged parameters point at the same argument index.
    #[error("argument {index} is already logged as `{existing}`; `{duplicate}` ignored")]
    DuplicateParamIndex {
        /// Argument index.
        index: usize,
        /// Name registered first.
        existing: String,
        /// Name that was dropped.
        duplicate: String,
    },
    /// Two logged parameters share a display name.
    #[error("logged parameter name `{name}` is used twice; argument {index} ignored")]
    DuplicateParamName {
        /// Display name.
        name: String,
        /// Index of the dropped parameter.
        index: usize,
    },
}

/// Kind of invocation context a call arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// An HTTP request.
    Http,
    /// A remote procedure call.
    Rpc,
    /// A websocket message.
    Ws,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Http => write!(f, "http"),
            ContextKind::Rpc => write!(f, "rpc"),
            ContextKind::Ws => write!(f, "ws"),
        }
    }
}

/// A scoped logger could not be derived for a call.
///
/// Reported once at error level on the base sink; the call then proceeds
/// with the base logger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ContextError {
    /// The call site derives its scope from an HTTP request but was invoked
    /// through another transport.
    #[error("cannot derive scoped logger for {identity}: expected http context, got {found}")]
    NotHttp {
        /// Call identity.
        identity: String,
        /// Context actually received.
        found: ContextKind,
    },
}

/// Configuration parsing failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A level name was not recognized.
    #[error("invalid log level `{0}`")]
    InvalidLevel(String),
    /// The configuration document was not valid JSON for [`crate::LoggedConfig`].
    #[error("failed to parse logging config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A caller-supplied correlation identifier was empty or contained
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid correlation id `{0}`")]
pub struct InvalidCorrelationId(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoration_error_messages() {
        let err = DecorationError::NotAMethod {
            owner: "UserService".into(),
            member: "cache".into(),
        };
        assert_eq!(err.to_string(), "UserService.cache is not a method; decoration skipped");

        let err = DecorationError::DuplicateParamIndex {
            index: 1,
            existing: "id".into(),
            duplicate: "userId".into(),
        };
        assert!(err.to_string().contains("argument 1"));
    }

    #[test]
    fn test_context_error_message() {
        let err = ContextError::NotHttp {
            identity: "AuthGuard".into(),
            found: ContextKind::Rpc,
        };
        assert_eq!(
            err.to_string(),
            "cannot derive scoped logger for AuthGuard: expected http context, got rpc"
        );
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(err.to_string().starts_with("failed to parse logging config"));
    }
}

//! Constants and default values for call logging.
//!
//! This module centralizes the literal tokens that appear in emitted log
//! lines and the defaults used when no configuration is supplied, so the
//! line format stays identical across every call site.

/// Length of a generated correlation identifier, in hex characters.
///
/// Twelve hex characters carry 48 random bits, which keeps collisions
/// negligible for grouping the lines of one call chain.
pub const CORRELATION_ID_LENGTH: usize = 12;

/// Separator placed between scope labels in a rendered scope path.
pub const SCOPE_SEPARATOR: &str = " -> ";

/// Separator placed between rendered `name=value` pairs.
pub const FIELD_SEPARATOR: &str = ", ";

/// Separator between path segments in a dotted field path.
pub const PATH_SEPARATOR: char = '.';

/// Text rendered for a value that is absent (an argument index past the
/// call's arity, for instance).
pub const UNDEFINED_TEXT: &str = "undefined";

/// Placeholder rendered when a value cannot be converted to JSON.
pub const SERIALIZATION_ERROR_TEXT: &str = "[serialization error]";

/// Message logged once when an owner's sink is first resolved.
pub const LOGGER_INITIALIZED_MESSAGE: &str = "Logger Initialized";

/// Tracing target used by the JSON sink.
pub const JSON_TARGET: &str = "call_logging_json";

/// Tracing target used by the structured tracing sink.
pub const TRACING_TARGET: &str = "call_logging";

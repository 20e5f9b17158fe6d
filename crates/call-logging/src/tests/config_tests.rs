//! Configuration tests - Property-based tests for LoggedConfig and LogLevel
//!
//! Tests that configuration parses from JSON with sensible defaults and that
//! level names round-trip.

use proptest::prelude::*;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::{LoggedConfig, SinkKind};
use crate::error::ConfigError;
use crate::interceptor::{LoggedClass, LoggedMetadata, LoggedOptions};
use crate::sink::MemorySink;
use crate::types::LogLevel;

const LEVELS: [LogLevel; 7] = [
    LogLevel::Verbose,
    LogLevel::Debug,
    LogLevel::Info,
    LogLevel::Warn,
    LogLevel::Error,
    LogLevel::Fatal,
    LogLevel::Skip,
];

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    /// Property: Level names round-trip through Display and FromStr
    #[test]
    fn prop_level_name_roundtrip(index in 0usize..LEVELS.len()) {
        let level = LEVELS[index];
        prop_assert_eq!(LogLevel::from_str(&level.to_string()).unwrap(), level);
        prop_assert_eq!(LogLevel::from_str(&level.as_str().to_uppercase()).unwrap(), level);
    }

    /// Property: Unknown level names are rejected
    #[test]
    fn prop_unknown_level_rejected(name in "[x-z]{3,8}") {
        prop_assert!(matches!(LogLevel::from_str(&name), Err(ConfigError::InvalidLevel(_))));
    }

    /// Property: Parsed options take the configured levels
    #[test]
    fn prop_options_from_json(call in 0usize..LEVELS.len(), ret in 0usize..LEVELS.len()) {
        let json = format!(
            r#"{{"options": {{"callLevel": "{}", "returnLevel": "{}"}}}}"#,
            LEVELS[call], LEVELS[ret]
        );
        let config = LoggedConfig::from_json(&json).unwrap();
        prop_assert_eq!(config.options.call_level, LEVELS[call]);
        prop_assert_eq!(config.options.return_level, LEVELS[ret]);
        prop_assert_eq!(config.options.error_level, LogLevel::Error);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn test_empty_json_is_default() {
    assert_eq!(LoggedConfig::from_json("{}").unwrap(), LoggedConfig::default());
}

#[test]
fn test_full_json() {
    let config = LoggedConfig::from_json(
        r#"{
            "options": { "callLevel": "debug" },
            "ownerOptions": { "AuthGuard": { "callLevel": "off" } },
            "sink": "json",
            "announceInitialization": false
        }"#,
    )
    .unwrap();

    assert_eq!(config.sink, SinkKind::Json);
    assert!(!config.announce_initialization);
    assert_eq!(config.options_for("UserService").call_level, LogLevel::Debug);
    assert_eq!(config.options_for("AuthGuard").call_level, LogLevel::Skip);
}

#[test]
fn test_log_alias() {
    let options: LoggedOptions = serde_json::from_str(r#"{"returnLevel": "log"}"#).unwrap();
    assert_eq!(options.return_level, LogLevel::Info);
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(LoggedConfig::from_json("{"), Err(ConfigError::Parse(_))));
    assert!(matches!(
        LoggedConfig::from_json(r#"{"sink": "syslog"}"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_owner_options_reach_interceptors() {
    let sink = MemorySink::new();
    let config = LoggedConfig::new()
        .with_owner_options("Noisy", LoggedOptions::new().with_call_level(LogLevel::Skip));
    let owner = LoggedClass::injectable("Noisy")
        .with_config(&config)
        .with_sink(Arc::new(sink.clone()));

    let tick = owner.method("tick", LoggedMetadata::new());
    let _ = tick.call(crate::scope::ScopeSource::Root, (), |_, ()| Ok::<_, String>(()));

    assert!(sink.messages().iter().all(|m| !m.starts_with("HIT")));
    assert!(sink.messages().iter().any(|m| m.starts_with("RETURNED")));
}

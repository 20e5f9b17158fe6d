//! Scope tests - Correlation ids, label chains and cross-boundary resumption
//!
//! Tests that derived loggers share their root's identifier, that label
//! chains grow one step per derivation, and that every line reaches the
//! base sink with its scope attached.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crate::error::ContextKind;
use crate::logger::{BaseLogger, Logger};
use crate::scope::{InvocationContext, RequestScope, ScopeRecord, ScopeSource, ScopedLogger};
use crate::sink::MemorySink;
use crate::types::{CorrelationId, LogLevel, ScopeLabel};

fn base(sink: &MemorySink) -> BaseLogger {
    BaseLogger::new(Arc::new(sink.clone()))
}

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    /// Property: Chains keep their identifier
    /// *For any* sequence of labels, every logger derived from a root shares
    /// the root's correlation id and carries the labels in order.
    #[test]
    fn prop_chain_shares_correlation_id(labels in prop::collection::vec("[A-Za-z.]{1,12}", 1..6)) {
        let base = BaseLogger::default();
        let root = ScopedLogger::from_root(base.clone(), labels[0].as_str(), None);

        let mut current = root.clone();
        for label in &labels[1..] {
            current = ScopedLogger::from_parent(base.clone(), &current, label.as_str());
        }

        prop_assert_eq!(current.correlation_id(), root.correlation_id());
        let rendered: Vec<String> = current.labels().iter().map(ToString::to_string).collect();
        prop_assert_eq!(rendered, labels);
    }

    /// Property: Generated identifiers are short, lowercase hex and unique
    #[test]
    fn prop_correlation_ids_unique(count in 10usize..100) {
        let ids: Vec<CorrelationId> = (0..count).map(|_| CorrelationId::new()).collect();
        let unique: HashSet<_> = ids.iter().cloned().collect();
        prop_assert_eq!(ids.len(), unique.len());

        for id in &ids {
            prop_assert_eq!(id.as_str().len(), 12);
            prop_assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    /// Property: A scope record survives a process boundary
    #[test]
    fn prop_scope_record_resumes(
        id in "[a-z0-9-]{1,20}",
        labels in prop::collection::vec("[A-Za-z]{1,8}", 0..4),
    ) {
        let record = ScopeRecord::new(
            id.parse().unwrap(),
            labels.iter().map(|label| ScopeLabel::from(label.as_str())).collect(),
        );
        let decoded = ScopeRecord::decode(&record.encode());
        prop_assert_eq!(decoded.as_ref(), Some(&record));

        let resumed = ScopedLogger::resume(BaseLogger::default(), record, "Consumer");
        prop_assert_eq!(resumed.correlation_id().as_str(), id.as_str());
        prop_assert_eq!(resumed.labels().len(), labels.len() + 1);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn test_scope_chain() {
    let base = BaseLogger::default();
    let root = ScopedLogger::from_root(base.clone(), "X", None);
    let child = ScopedLogger::from_parent(base, &root, "Y");

    assert_eq!(child.labels(), &[ScopeLabel::from("X"), ScopeLabel::from("Y")]);
    assert_eq!(child.correlation_id(), root.correlation_id());
    assert_eq!(root.labels().len(), 1);
}

#[test]
fn test_scoped_lines_reach_base_sink() {
    let sink = MemorySink::new();
    let id: CorrelationId = "abc123".parse().unwrap();
    let root = ScopedLogger::from_root(base(&sink), "OrderController", Some(id));
    let child = ScopedLogger::from_parent(base(&sink), &root, ScopeLabel::from(&["Stock", "Billing"][..]));

    child.warn("low stock");
    child.log(LogLevel::Skip, "hidden");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "[abc123] OrderController -> [Stock, Billing]: low stock");
    assert_eq!(records[0].level, LogLevel::Warn);
    assert_eq!(records[0].correlation_id(), Some("abc123"));
    assert_eq!(records[0].scope.as_ref().unwrap().labels.len(), 2);
}

#[test]
fn test_request_scope_shares_id() {
    let sink = MemorySink::new();
    let request = RequestScope::from_header(Some("req-7"));

    let guard = ScopeSource::from(&request).derive(&base(&sink), "AuthGuard".into()).unwrap();
    let endpoint = ScopeSource::Context(InvocationContext::Http(&request))
        .derive(&base(&sink), "UserController::/users[GET]".into())
        .unwrap();

    assert_eq!(guard.correlation_id().as_str(), "req-7");
    assert_eq!(endpoint.correlation_id(), guard.correlation_id());
    assert_eq!(endpoint.labels().len(), 1);
}

#[test]
fn test_request_scope_rejects_unusable_header() {
    let blank = RequestScope::from_header(Some("  "));
    let missing = RequestScope::from_header(None);
    assert_eq!(blank.correlation_id().as_str().len(), 12);
    assert_ne!(blank.correlation_id(), missing.correlation_id());
}

#[test]
fn test_request_scope_id_created_once_under_contention() {
    let request = Arc::new(RequestScope::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let request = Arc::clone(&request);
            thread::spawn(move || request.correlation_id().clone())
        })
        .collect();

    let ids: HashSet<CorrelationId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 1);
}

#[test]
fn test_non_http_context_cannot_derive() {
    let base = BaseLogger::default();
    let source = ScopeSource::Context(InvocationContext::Rpc);
    assert_eq!(source.derive(&base, "Guard".into()).unwrap_err(), ContextKind::Rpc);

    let source = ScopeSource::Context(InvocationContext::Ws);
    assert_eq!(source.derive(&base, "Guard".into()).unwrap_err(), ContextKind::Ws);
}

#[test]
fn test_root_source_starts_fresh_chain() {
    let base = BaseLogger::default();
    let a = ScopeSource::Root.derive(&base, "A".into()).unwrap();
    let b = ScopeSource::Root.derive(&base, "A".into()).unwrap();
    assert_ne!(a.correlation_id(), b.correlation_id());
}

#[test]
fn test_decode_is_lenient() {
    let record = ScopeRecord::decode(r#"{"correlationId":"x1","labels":["A",42,["B","C"]]}"#).unwrap();
    assert_eq!(record.labels, vec![ScopeLabel::from("A"), ScopeLabel::from(vec!["B".to_string(), "C".to_string()])]);

    assert!(ScopeRecord::decode(r#"{"labels":["A"]}"#).is_none());
    assert!(ScopeRecord::decode("not json").is_none());
    assert!(ScopeRecord::decode(r#"{"correlationId":"x1"}"#).unwrap().labels.is_empty());
}

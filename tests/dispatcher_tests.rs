//! Dispatcher Tests
//!
//! These tests verify:
//! - Condition handling on PutItem
//! - Lock key extraction and stripping
//! - Per-operation treatment of missing tables and entries
//! - Validation failures leave the store untouched
//! - Command execution

use std::sync::Arc;

use locktable::protocol::{
    AttributeValue, Command, DeleteItemRequest, GetItemRequest, Item, PutItemRequest, Response,
};
use locktable::store::{Attributes, InMemoryStore, TableStore};
use locktable::{Config, Dispatcher, ErrorKind, LockTableError};

// =============================================================================
// Helper Functions
// =============================================================================

const TABLE: &str = "terraform-lock-table";
const LOCK: &str = "tfstates/dynamodbtest";

fn setup() -> (Arc<InMemoryStore>, Dispatcher) {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(store.clone(), "LockID");
    (store, dispatcher)
}

fn item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), AttributeValue::string(*v)))
        .collect()
}

fn put_req(pairs: &[(&str, &str)], condition: Option<&str>) -> PutItemRequest {
    PutItemRequest {
        table_name: TABLE.to_string(),
        item: item(pairs),
        condition_expression: condition.map(str::to_string),
    }
}

fn get_req(lock: &str) -> GetItemRequest {
    GetItemRequest {
        table_name: TABLE.to_string(),
        key: item(&[("LockID", lock)]),
    }
}

fn delete_req(lock: &str) -> DeleteItemRequest {
    DeleteItemRequest {
        table_name: TABLE.to_string(),
        key: item(&[("LockID", lock)]),
    }
}

const ACQUIRE: Option<&str> = Some("attribute_not_exists(LockID)");

// =============================================================================
// PutItem Tests
// =============================================================================

#[test]
fn test_put_strips_lock_key() {
    let (store, dispatcher) = setup();

    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("Info", "Test")], None))
        .unwrap();

    let stored = store.get(TABLE, LOCK).unwrap();
    let expected: Attributes = [("Info".to_string(), "Test".to_string())].into_iter().collect();
    assert_eq!(stored, expected);
}

#[test]
fn test_acquire_then_conflict() {
    let (store, dispatcher) = setup();

    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("Info", "first")], ACQUIRE))
        .unwrap();
    let err = dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("Info", "second")], ACQUIRE))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store.get(TABLE, LOCK).unwrap()["Info"], "first");
}

#[test]
fn test_unconditional_put_overwrites() {
    let (store, dispatcher) = setup();

    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("a", "1")], None))
        .unwrap();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("b", "2")], None))
        .unwrap();

    let stored = store.get(TABLE, LOCK).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored["b"], "2");
}

#[test]
fn test_empty_condition_is_unconditional() {
    let (_store, dispatcher) = setup();

    dispatcher
        .put_item(&put_req(&[("LockID", LOCK)], Some("")))
        .unwrap();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK)], Some("")))
        .unwrap();
}

#[test]
fn test_put_missing_lock_key_is_rejected() {
    let (store, dispatcher) = setup();

    let err = dispatcher
        .put_item(&put_req(&[("Info", "Test")], None))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("LockID is missing"));
    assert_eq!(store.table_count(), 0);
}

#[test]
fn test_condition_on_other_attribute_is_rejected() {
    let (store, dispatcher) = setup();

    let err = dispatcher
        .put_item(&put_req(
            &[("LockID", LOCK), ("Info", "Test")],
            Some("attribute_not_exists(Info)"),
        ))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("must be on LockID"));
    assert_eq!(store.table_count(), 0);
}

#[test]
fn test_unsupported_condition_is_rejected() {
    let (store, dispatcher) = setup();

    for condition in [
        "attribute_exists(LockID)",
        "LockID = :v",
        "attribute_not_exists(LockID) AND attribute_not_exists(Info)",
        "attribute_not_exists()",
    ] {
        let err = dispatcher
            .put_item(&put_req(&[("LockID", LOCK)], Some(condition)))
            .unwrap_err();
        assert!(
            matches!(err, LockTableError::Validation(_)),
            "{} should be rejected, got {:?}",
            condition,
            err
        );
    }
    assert_eq!(store.table_count(), 0);
}

#[test]
fn test_condition_checked_before_lock_key() {
    let (_store, dispatcher) = setup();

    let err = dispatcher
        .put_item(&put_req(&[("Info", "Test")], Some("bogus")))
        .unwrap_err();

    assert!(err.to_string().contains("Invalid condition expression"));
}

#[test]
fn test_custom_key_attribute() {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(store.clone(), "ResourceId");

    dispatcher
        .put_item(&PutItemRequest {
            table_name: "locks".to_string(),
            item: item(&[("ResourceId", "r1"), ("Owner", "me")]),
            condition_expression: Some("attribute_not_exists(ResourceId)".to_string()),
        })
        .unwrap();

    assert_eq!(store.get("locks", "r1").unwrap()["Owner"], "me");

    let err = dispatcher
        .put_item(&PutItemRequest {
            table_name: "locks".to_string(),
            item: item(&[("ResourceId", "r2")]),
            condition_expression: Some("attribute_not_exists(LockID)".to_string()),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// =============================================================================
// GetItem Tests
// =============================================================================

#[test]
fn test_get_after_put() {
    let (_store, dispatcher) = setup();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("a", "1")], None))
        .unwrap();

    let found = dispatcher.get_item(&get_req(LOCK)).unwrap();

    assert_eq!(found, Some(item(&[("a", "1")])));
}

#[test]
fn test_get_unknown_table_is_empty() {
    let (_store, dispatcher) = setup();

    let req = GetItemRequest {
        table_name: "nonexistent-table".to_string(),
        key: item(&[("LockID", "k")]),
    };

    assert_eq!(dispatcher.get_item(&req).unwrap(), None);
}

#[test]
fn test_get_unknown_entry_is_empty() {
    let (_store, dispatcher) = setup();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK)], None))
        .unwrap();

    assert_eq!(dispatcher.get_item(&get_req("other")).unwrap(), None);
}

#[test]
fn test_get_missing_lock_key_is_rejected() {
    let (_store, dispatcher) = setup();

    let req = GetItemRequest {
        table_name: TABLE.to_string(),
        key: Item::new(),
    };

    let err = dispatcher.get_item(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_get_never_returns_lock_key() {
    let (store, dispatcher) = setup();
    // Written directly, bypassing the dispatcher's stripping
    let mut attributes = Attributes::new();
    attributes.insert("LockID".to_string(), LOCK.to_string());
    attributes.insert("Info".to_string(), "x".to_string());
    store.put(TABLE, LOCK, attributes, false).unwrap();

    let found = dispatcher.get_item(&get_req(LOCK)).unwrap().unwrap();

    assert_eq!(found, item(&[("Info", "x")]));
}

// =============================================================================
// DeleteItem Tests
// =============================================================================

#[test]
fn test_delete_then_get() {
    let (_store, dispatcher) = setup();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK), ("a", "1")], None))
        .unwrap();

    dispatcher.delete_item(&delete_req(LOCK)).unwrap();

    assert_eq!(dispatcher.get_item(&get_req(LOCK)).unwrap(), None);
    let err = dispatcher.delete_item(&delete_req(LOCK)).unwrap_err();
    assert!(matches!(err, LockTableError::EntryNotFound { .. }));
}

#[test]
fn test_delete_unknown_table_is_not_found() {
    let (_store, dispatcher) = setup();

    let err = dispatcher.delete_item(&delete_req(LOCK)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, LockTableError::TableNotFound(_)));
}

#[test]
fn test_delete_missing_lock_key_is_rejected() {
    let (store, dispatcher) = setup();
    dispatcher
        .put_item(&put_req(&[("LockID", LOCK)], None))
        .unwrap();

    let req = DeleteItemRequest {
        table_name: TABLE.to_string(),
        key: item(&[("Other", LOCK)]),
    };

    let err = dispatcher.delete_item(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.entry_count(TABLE), Some(1));
}

// =============================================================================
// Execute Tests
// =============================================================================

#[test]
fn test_execute_lock_lifecycle() {
    let dispatcher = Dispatcher::from_config(&Config::default());

    let acquired = dispatcher
        .execute(Command::PutItem(put_req(
            &[("LockID", LOCK), ("Info", "holder")],
            ACQUIRE,
        )))
        .unwrap();
    assert_eq!(acquired, Response::empty());

    let read = dispatcher.execute(Command::GetItem(get_req(LOCK))).unwrap();
    assert_eq!(read, Response::item(item(&[("Info", "holder")])));

    let released = dispatcher
        .execute(Command::DeleteItem(delete_req(LOCK)))
        .unwrap();
    assert_eq!(released, Response::empty());

    let read = dispatcher.execute(Command::GetItem(get_req(LOCK))).unwrap();
    assert_eq!(read, Response::empty());
}

#[test]
fn test_concurrent_dispatch_single_winner() {
    const ACQUIRERS: usize = 16;

    let (store, dispatcher) = setup();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..ACQUIRERS)
            .map(|i| {
                let dispatcher = &dispatcher;
                s.spawn(move || {
                    let who = format!("client-{}", i);
                    dispatcher.put_item(&put_req(&[("LockID", LOCK), ("Who", who.as_str())], ACQUIRE))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(LockTableError::is_conflict));
    assert_eq!(store.entry_count(TABLE), Some(1));
}

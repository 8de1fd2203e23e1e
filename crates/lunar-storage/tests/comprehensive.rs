//! Comprehensive tests for lunar-storage
//!
//! Exercises the fluent contract end to end: single and batch reads,
//! import, removal, wipe, expiration and persistence.

use std::time::Duration;

use lunar_storage::Store;
use serde_json::json;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("lunar-store-{}-{}.json", std::process::id(), name))
}

#[test]
fn test_set_then_get_returns_value() {
    let mut store = Store::session(None);
    store.set("key", "value").unwrap();

    assert_eq!(store.get("key"), Some(json!("value")));
}

#[test]
fn test_chained_sets() {
    let mut store = Store::session(None);
    store
        .set("key", "value")
        .unwrap()
        .set("another", "value")
        .unwrap();

    assert_eq!(store.len(), 2);
}

#[test]
fn test_import_then_batch_get() {
    let mut store = Store::session(None);
    store.import([("a", 1), ("b", 2)]).unwrap();

    let found = store.get_many(&["a", "b"]).unwrap();
    assert_eq!(found["a"], json!(1));
    assert_eq!(found["b"], json!(2));
}

#[test]
fn test_batch_get_skips_missing_keys() {
    let mut store = Store::session(None);
    store.set("a", 1).unwrap();

    let found = store.get_many(&["a", "z"]).unwrap();
    assert_eq!(found.len(), 1);
    assert!(found.contains_key("a"));
}

#[test]
fn test_remove_many_then_batch_get_is_empty() {
    let mut store = Store::session(None);
    store.import([("a", 1), ("b", 2)]).unwrap();

    store.remove_many(&["a", "b"]);
    assert_eq!(store.get_many(&["a", "b"]), None);
}

#[test]
fn test_clear_wipes_everything() {
    let mut store = Store::session(None);
    store.import([("a", 1), ("b", 2), ("c", 3)]).unwrap();

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.get("a"), None);
}

#[test]
fn test_session_scenario() {
    let mut session = Store::session(None);

    session.set("id", 42).unwrap();
    assert_eq!(session.get("id"), Some(json!(42)));

    session.remove("id");
    assert_eq!(session.get("id"), None);
}

#[test]
fn test_expiration_with_real_clock() {
    let mut store = Store::session(Some(Duration::from_millis(30)));
    store.set("key", "value").unwrap();

    assert_eq!(store.get("key"), Some(json!("value")));

    std::thread::sleep(Duration::from_millis(60));

    assert_eq!(store.get("key"), None);
    // lazy eviction removed the raw record too
    assert_eq!(store.backing().get_item("key"), None);
}

#[test]
fn test_persistent_store_survives_reopen() {
    let path = temp_path("reopen");
    let _ = std::fs::remove_file(&path);

    {
        let mut store = Store::local(&path, None);
        store
            .set("settings", json!({ "persist": true, "renew": false }))
            .unwrap();
    }

    let mut reopened = Store::local(&path, None);
    assert_eq!(
        reopened.get("settings"),
        Some(json!({ "persist": true, "renew": false }))
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_writes_share_one_deadline() {
    let mut store = Store::session(Some(Duration::from_secs(300)));
    let deadline = store.expires_at().unwrap();

    store.set("first", 1).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    store.set("second", 2).unwrap();

    for key in ["first", "second"] {
        let raw = store.backing().get_item(key).unwrap();
        let record: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(record["expiresAt"], json!(deadline));
    }
}

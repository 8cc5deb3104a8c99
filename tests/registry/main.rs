//! Integration tests for StoreRegistry.

use std::sync::{Arc, Barrier};
use std::thread;

use observable_store::{DispatchPolicy, EventKind, MissPolicy, StoreConfig, StoreRegistry};
use serde_json::json;

#[test]
fn first_initialization_wins() {
    let registry = StoreRegistry::new();
    registry.init_store("nav", json!({"loading": false}), None).unwrap();
    registry.init_store("nav", json!({"loading": true, "to": "/admin"}), None).unwrap();

    let nav = registry.get_store("nav").unwrap().unwrap();
    assert_eq!(nav.current().unwrap(), json!({"loading": false}));
}

#[test]
fn config_of_later_init_is_ignored() {
    let registry = StoreRegistry::new();
    registry.init_store("tests", json!([]), Some("testId")).unwrap();
    let store = registry
        .init_store_with(
            "tests",
            json!([]),
            StoreConfig::new()
                .with_key_field("slug")
                .with_miss_policy(MissPolicy::Skip),
        )
        .unwrap();

    assert_eq!(store.key_field(), "testId");
    assert_eq!(store.config().miss_policy(), MissPolicy::Emit);
}

#[test]
fn unknown_names_are_not_found() {
    let registry = StoreRegistry::new();
    assert!(registry.get_store("missing").unwrap().is_none());
    assert!(!registry.existed("missing").unwrap());
    assert!(registry.names().unwrap().is_empty());
}

#[test]
fn concurrent_initialization_yields_one_store() {
    let registry = StoreRegistry::new();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry
                    .init_store("counter", json!({ "owner": i }), None)
                    .unwrap()
            })
        })
        .collect();

    let stores: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winner = registry.get_store("counter").unwrap().unwrap().current().unwrap();
    for store in stores {
        assert_eq!(store.current().unwrap(), winner);
    }
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn concurrent_inserts_are_all_committed_and_dispatched() {
    let registry = StoreRegistry::new();
    let store = registry.init_store("events", json!([]), None).unwrap();

    let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let _sub = store
        .watch(EventKind::ItemInserted, move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    store.insert_item(json!({"id": t * 100 + i})).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.item_count().unwrap(), 100);
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 100);
}

#[test]
fn isolated_store_survives_failing_subscriber() {
    let registry = StoreRegistry::new();
    let store = registry
        .init_store_with(
            "theme",
            json!({"mode": "light"}),
            StoreConfig::new().with_dispatch(DispatchPolicy::Isolate),
        )
        .unwrap();

    let _bad = store
        .watch(EventKind::Updated, |_| Err("renderer unavailable".into()))
        .unwrap();

    store.update(json!({"mode": "dark"})).unwrap();
    assert_eq!(store.current().unwrap(), json!({"mode": "dark"}));
}

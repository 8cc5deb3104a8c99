//! Integration tests for collection stores, raw and typed.


use std::sync::{Arc, Mutex};

use models::{PracticeSection, Ticket};
use observable_store::{EventKind, Keyed, StoreError, StoreRegistry};
use serde_json::{json, Value};

#[test]
fn ticket_lifecycle() {
    let registry = StoreRegistry::new();
    registry.init_store("tickets", json!([]), Some("id")).unwrap();
    let tickets = registry.get_store("tickets").unwrap().unwrap();

    tickets.insert_item(json!({"id": 1, "status": "open"})).unwrap();
    tickets.insert_item(json!({"id": 2, "status": "open"})).unwrap();
    tickets.update_item(json!({"id": 1, "status": "closed"})).unwrap();

    assert_eq!(
        tickets.current().unwrap(),
        json!([{"id": 1, "status": "closed"}, {"id": 2, "status": "open"}])
    );
}

#[test]
fn update_in_place_preserves_order() {
    let registry = StoreRegistry::new();
    let store = registry
        .init_store(
            "letters",
            json!([{"id": "a"}, {"id": "b", "field": "y"}, {"id": "c"}]),
            None,
        )
        .unwrap();

    assert!(store.update_item(json!({"id": "b", "field": "x"})).unwrap());
    assert_eq!(
        store.current().unwrap(),
        json!([{"id": "a"}, {"id": "b", "field": "x"}, {"id": "c"}])
    );
}

#[test]
fn remove_on_miss_leaves_collection_unchanged() {
    let registry = StoreRegistry::new();
    let store = registry
        .init_store("letters", json!([{"id": "a"}, {"id": "b"}]), None)
        .unwrap();
    let before = store.current().unwrap();

    assert!(!store.remove_item(json!({"id": "z"})).unwrap());
    assert_eq!(store.current().unwrap(), before);
}

#[test]
fn insert_event_fires_once_after_commit() {
    let registry = StoreRegistry::new();
    let store = registry.init_store("tickets", json!([]), None).unwrap();

    let calls: Arc<Mutex<Vec<(Value, bool)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let reader = store.clone();
    let _sub = store
        .watch(EventKind::ItemInserted, move |event| {
            let visible = reader.get_item(&event.payload["id"]).unwrap().is_some();
            sink.lock().unwrap().push((event.payload.clone(), visible));
            Ok(())
        })
        .unwrap();

    let item = json!({"id": 7, "status": "open"});
    store.insert_item(item.clone()).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![(item, true)]);
}

#[test]
fn get_item_uses_loose_key_equality() {
    let registry = StoreRegistry::new();
    let store = registry.init_store("tickets", json!([{"id": 3}]), None).unwrap();

    assert!(store.get_item(&json!("3")).unwrap().is_some());
    assert!(store.get_item(&json!(3.0)).unwrap().is_some());
    assert!(store.get_item(&json!(4)).unwrap().is_none());
}

#[test]
fn removed_events_fire_on_miss_by_default() {
    let registry = StoreRegistry::new();
    let store = registry.init_store("tickets", json!([]), None).unwrap();

    let seen = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&seen);
    store
        .watch(EventKind::ItemRemoved, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        })
        .unwrap()
        .detach();

    assert!(!store.remove_item(json!({"id": 1})).unwrap());
    assert_eq!(*seen.lock().unwrap(), 1);
    assert_eq!(store.subscriber_count(EventKind::ItemRemoved).unwrap(), 1);
}

#[test]
fn typed_ticket_lifecycle() {
    let registry = StoreRegistry::new();
    let tickets = registry.init_collection::<Ticket>(vec![]).unwrap();

    tickets.insert(&Ticket::open(1)).unwrap();
    tickets.insert(&Ticket::open(2)).unwrap();
    assert!(tickets.update(&Ticket::closed(1)).unwrap());
    assert!(!tickets.update(&Ticket::closed(9)).unwrap());

    assert_eq!(
        tickets.all().unwrap(),
        vec![Ticket::closed(1), Ticket::open(2)]
    );

    // Raw and typed views share the same store.
    let raw = registry.get_store(Ticket::STORE).unwrap().unwrap();
    assert_eq!(raw.get_item(&json!(2)).unwrap(), Some(json!({"id": 2, "status": "open"})));

    let again = registry.items::<Ticket>().unwrap().unwrap();
    assert_eq!(again.get(&1).unwrap(), Some(Ticket::closed(1)));
}

#[test]
fn typed_collection_keeps_first_initialization() {
    let registry = StoreRegistry::new();
    registry.init_collection(vec![Ticket::open(1)]).unwrap();
    let tickets = registry
        .init_collection(vec![Ticket::open(5), Ticket::open(6)])
        .unwrap();

    assert_eq!(tickets.all().unwrap(), vec![Ticket::open(1)]);
}

#[test]
fn typed_access_rejects_mismatched_key_field() {
    let registry = StoreRegistry::new();
    registry.init_store("tickets", json!([]), Some("ticketId")).unwrap();

    let err = registry.items::<Ticket>().err().unwrap();
    assert!(matches!(err, StoreError::KeyFieldMismatch { .. }));
}

#[test]
fn derive_defaults() {
    assert_eq!(PracticeSection::STORE, "practice_sections");
    assert_eq!(PracticeSection::KEY_FIELD, "id");

    let registry = StoreRegistry::new();
    let sections = registry
        .init_collection(vec![PracticeSection {
            id: "math-1".into(),
            title: "Algebra".into(),
            questions: 22,
        }])
        .unwrap();
    assert_eq!(sections.get(&"math-1".to_string()).unwrap().unwrap().questions, 22);
    assert!(registry.existed("practice_sections").unwrap());
}

#[test]
fn typed_watch_receives_items() {
    let registry = StoreRegistry::new();
    let tickets = registry.init_collection::<Ticket>(vec![]).unwrap();

    let closed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&closed);
    let _sub = tickets
        .watch(EventKind::ItemUpdated, move |ticket: &Ticket| {
            if ticket.status == "closed" {
                sink.lock().unwrap().push(ticket.id);
            }
            Ok(())
        })
        .unwrap();

    tickets.insert(&Ticket::open(1)).unwrap();
    tickets.update(&Ticket::closed(1)).unwrap();
    tickets.update(&Ticket::open(1)).unwrap();

    assert_eq!(*closed.lock().unwrap(), vec![1]);
}

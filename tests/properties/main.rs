//! Property tests for collection and registry semantics.

use observable_store::{ObservableStore, StoreRegistry};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn item(id: u32, tag: &str) -> Value {
    json!({"id": id, "tag": tag})
}

/// Collections of items with unique ids.
fn unique_items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::btree_set(0u32..500, 0..20).prop_map(|ids| {
        ids.into_iter()
            .map(|id| item(id, &format!("t{}", id)))
            .collect()
    })
}

proptest! {
    #[test]
    fn second_init_never_replaces_state(a in any::<i64>(), b in any::<i64>(), name in "[a-z]{1,12}") {
        let registry = StoreRegistry::new();
        registry.init_store(&name, json!(a), None).unwrap();
        registry.init_store(&name, json!(b), None).unwrap();
        prop_assert_eq!(registry.get_store(&name).unwrap().unwrap().current().unwrap(), json!(a));
    }

    #[test]
    fn inserted_items_can_be_found(items in unique_items()) {
        let store = ObservableStore::new("items", json!([]));
        for it in &items {
            store.insert_item(it.clone()).unwrap();
        }
        for it in &items {
            prop_assert_eq!(store.get_item(&it["id"]).unwrap(), Some(it.clone()));
        }
        prop_assert_eq!(store.item_count().unwrap(), items.len());
    }

    #[test]
    fn update_item_keeps_positions(items in unique_items(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!items.is_empty());
        let store = ObservableStore::new("items", Value::Array(items.clone()));
        let index = pick.index(items.len());
        let replacement = item(items[index]["id"].as_u64().unwrap() as u32, "changed");

        prop_assert!(store.update_item(replacement.clone()).unwrap());

        let mut expected = items.clone();
        expected[index] = replacement;
        prop_assert_eq!(store.current().unwrap(), Value::Array(expected));
    }

    #[test]
    fn removing_absent_keys_changes_nothing(items in unique_items(), missing in 500u32..1000) {
        let store = ObservableStore::new("items", Value::Array(items.clone()));
        prop_assert!(!store.remove_item(item(missing, "x")).unwrap());
        prop_assert_eq!(store.current().unwrap(), Value::Array(items));
    }

    #[test]
    fn object_update_is_a_shallow_merge(
        base in prop::collection::btree_map("[a-e]", any::<i32>(), 0..5),
        patch in prop::collection::btree_map("[a-e]", any::<i32>(), 0..5),
    ) {
        let to_object = |m: &std::collections::BTreeMap<String, i32>| {
            Value::Object(m.iter().map(|(k, v)| (k.clone(), json!(v))).collect::<Map<_, _>>())
        };
        let store = ObservableStore::new("object", to_object(&base));
        store.update(to_object(&patch)).unwrap();

        let mut merged = base.clone();
        merged.extend(patch.clone());
        prop_assert_eq!(store.current().unwrap(), to_object(&merged));
    }
}

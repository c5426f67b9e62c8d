use super::*;
use serde_json::{Value, json};

fn data(value: Value) -> ComponentData {
    match value {
        Value::Object(map) => map,
        _ => ComponentData::new(),
    }
}

fn page() -> Page {
    Page {
        key: "home".into(),
        components: vec![
            Component::new(1, "hero", 0).with_data(data(json!({"title": "A", "subtitle": "keep"}))),
            Component::new(2, "faq", 1),
        ],
    }
}

#[test]
fn apply_creates_entry() {
    let overlay = Overlay::default().apply(1, data(json!({"a": 1})));
    assert_eq!(overlay.len(), 1);
    assert_eq!(overlay.patch_for(1), Some(&data(json!({"a": 1}))));
}

#[test]
fn apply_accumulates_disjoint_fields() {
    let overlay = Overlay::default()
        .apply(1, data(json!({"a": 1})))
        .apply(1, data(json!({"b": 2})));
    assert_eq!(overlay.patch_for(1), Some(&data(json!({"a": 1, "b": 2}))));
}

#[test]
fn apply_overwrites_overlapping_fields() {
    let overlay = Overlay::default()
        .apply(1, data(json!({"a": 1})))
        .apply(1, data(json!({"a": 2})));
    assert_eq!(overlay.patch_for(1), Some(&data(json!({"a": 2}))));
}

#[test]
fn apply_keeps_other_ids_separate() {
    let overlay = Overlay::default()
        .apply(1, data(json!({"a": 1})))
        .apply(2, data(json!({"a": 2})));
    assert_eq!(overlay.patch_for(1), Some(&data(json!({"a": 1}))));
    assert_eq!(overlay.patch_for(2), Some(&data(json!({"a": 2}))));
}

#[test]
fn clear_empties() {
    let overlay = Overlay::default().apply(1, data(json!({"a": 1}))).clear();
    assert!(overlay.is_empty());
    assert_eq!(overlay, Overlay::default());
}

#[test]
fn settle_drops_only_unchanged_stored_entries() {
    let saved = Overlay::default()
        .apply(1, data(json!({"title": "B"})))
        .apply(3, data(json!({"title": "C"})));
    let current = saved
        .clone()
        .apply(2, data(json!({"heading": "new"})))
        .apply(3, data(json!({"title": "C2"})));

    let settled = current.settle(&saved, &[1, 3]);
    assert_eq!(settled.ids().collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(settled.patch_for(3), Some(&data(json!({"title": "C2"}))));
}

#[test]
fn settle_keeps_entries_the_server_did_not_confirm() {
    let saved = Overlay::default().apply(1, data(json!({"title": "B"})));
    let settled = saved.clone().settle(&saved, &[]);
    assert_eq!(settled, saved);
}

#[test]
fn reconcile_drops_exactly_missing_ids() {
    let overlay = Overlay::default()
        .apply(1, data(json!({"title": "B"})))
        .apply(2, data(json!({"q": 1})))
        .apply(9, data(json!({"gone": true})));
    let reconciled = overlay.clone().reconcile(&page());
    assert_eq!(reconciled.ids().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(reconciled.patch_for(1), overlay.patch_for(1));
    assert_eq!(reconciled.patch_for(2), overlay.patch_for(2));
}

#[test]
fn reconcile_after_remove() {
    let overlay = Overlay::default().apply(2, data(json!({"q": 1})));
    let reconciled = overlay.reconcile(&page().remove(2));
    assert!(reconciled.is_empty());
}

#[test]
fn merged_data_prefers_overlay_and_keeps_persisted() {
    let overlay = Overlay::default().apply(1, data(json!({"title": "B", "extra": true})));
    let merged = overlay.merged_data(&page().components[0]);
    assert_eq!(merged, data(json!({"title": "B", "subtitle": "keep", "extra": true})));
}

#[test]
fn merged_without_entry_is_identity() {
    let overlay = Overlay::default().apply(1, data(json!({"title": "B"})));
    assert_eq!(overlay.merged(&page().components[1]), page().components[1]);
}

#[test]
fn pending_lists_merged_data_for_live_ids() {
    let overlay = Overlay::default()
        .apply(1, data(json!({"title": "B"})))
        .apply(5, data(json!({"x": 1})));
    let pending = overlay.pending(&page());
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, 1);
    assert_eq!(pending[0].1, data(json!({"title": "B", "subtitle": "keep"})));
}

#[test]
fn serializes_as_id_keyed_object() {
    let overlay = Overlay::default().apply(3, data(json!({"title": "X"})));
    assert_eq!(serde_json::to_value(&overlay).unwrap(), json!({"3": {"title": "X"}}));
    let restored: Overlay = serde_json::from_value(json!({"3": {"title": "X"}})).unwrap();
    assert_eq!(restored, overlay);
}

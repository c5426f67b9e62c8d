use super::*;
use crate::component::{ComponentData, Page};
use crate::overlay::Overlay;
use serde_json::json;

const ORIGIN: &str = "https://admin.example.com";
const FOREIGN: &str = "https://evil.example.net";

fn scenario_page() -> Page {
    let mut hero = ComponentData::new();
    hero.insert("title".into(), json!("A"));
    Page {
        key: "home".into(),
        components: vec![Component::new(1, "hero", 0).with_data(hero), Component::new(2, "missing-type", 1)],
    }
}

fn init_payload(components: &[Component]) -> Value {
    PreviewMessage::init(components.to_vec()).to_value()
}

// =============================================================
// same_origin
// =============================================================

#[test]
fn same_origin_exact_match_only() {
    assert!(same_origin(ORIGIN, ORIGIN));
    assert!(!same_origin(ORIGIN, FOREIGN));
    assert!(!same_origin(ORIGIN, "https://admin.example.com:8443"));
    assert!(!same_origin(ORIGIN, "http://admin.example.com"));
}

#[test]
fn opaque_origins_never_match() {
    assert!(!same_origin("null", "null"));
    assert!(!same_origin("", ""));
}

// =============================================================
// Receiver
// =============================================================

#[test]
fn receiver_starts_waiting() {
    let receiver = PreviewReceiver::new(ORIGIN);
    assert_eq!(receiver.state(), &ReceiverState::Waiting);
    assert!(!receiver.is_ready());
    assert!(receiver.components().is_none());
}

#[test]
fn receiver_becomes_ready_on_snapshot() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    assert_eq!(receiver.receive(ORIGIN, &init_payload(&list)), Delivery::Applied);
    assert!(receiver.is_ready());
    assert_eq!(receiver.components(), Some(list.as_slice()));
}

#[test]
fn receiver_rejects_foreign_origin_while_waiting() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    assert_eq!(receiver.receive(FOREIGN, &init_payload(&list)), Delivery::ForeignOrigin);
    assert_eq!(receiver.state(), &ReceiverState::Waiting);
}

#[test]
fn receiver_rejects_foreign_origin_while_ready() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    receiver.receive(ORIGIN, &init_payload(&list));
    assert_eq!(receiver.receive(FOREIGN, &init_payload(&[])), Delivery::ForeignOrigin);
    assert_eq!(receiver.components(), Some(list.as_slice()));
}

#[test]
fn identical_snapshots_are_idempotent() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    receiver.receive(ORIGIN, &init_payload(&list));
    let before = receiver.state().clone();
    assert_eq!(receiver.receive(ORIGIN, &init_payload(&list)), Delivery::Unchanged);
    assert_eq!(receiver.state(), &before);
}

#[test]
fn later_snapshot_replaces_wholesale() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    receiver.receive(ORIGIN, &init_payload(&scenario_page().effective_list(&Overlay::default())));

    let mut patch = ComponentData::new();
    patch.insert("title".into(), json!("B"));
    let edited = scenario_page()
        .remove(2)
        .effective_list(&Overlay::default().apply(1, patch));
    assert_eq!(receiver.receive(ORIGIN, &init_payload(&edited)), Delivery::Applied);

    let held = receiver.components().unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].data.get("title"), Some(&json!("B")));
}

#[test]
fn empty_snapshot_is_ready_not_waiting() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    assert_eq!(receiver.receive(ORIGIN, &init_payload(&[])), Delivery::Applied);
    assert_eq!(receiver.state(), &ReceiverState::Ready(Vec::new()));
}

#[test]
fn receiver_ignores_unrelated_traffic() {
    let mut receiver = PreviewReceiver::new(ORIGIN);
    assert_eq!(receiver.receive(ORIGIN, &json!({"type": "webpackOk"})), Delivery::Ignored);
    assert_eq!(receiver.receive(ORIGIN, &json!({"kind": "PREVIEW_READY"})), Delivery::Ignored);
    assert_eq!(receiver.state(), &ReceiverState::Waiting);
}

#[test]
fn receiver_announces_ready() {
    let receiver = PreviewReceiver::new(ORIGIN);
    assert_eq!(receiver.announcement(), PreviewMessage::Ready);
}

// =============================================================
// Sender
// =============================================================

#[test]
fn sender_snapshot_records_latest() {
    let mut sender = PreviewSender::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    let msg = sender.snapshot(list.clone());
    assert_eq!(msg, PreviewMessage::init(list.clone()));
    assert_eq!(sender.latest(), Some(list.as_slice()));
    assert!(!sender.receiver_ready());
}

#[test]
fn ready_resends_latest_snapshot() {
    let mut sender = PreviewSender::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    sender.snapshot(list.clone());

    let resend = sender.receive(ORIGIN, &PreviewMessage::Ready.to_value());
    assert_eq!(resend, Some(PreviewMessage::init(list)));
    assert!(sender.receiver_ready());
}

#[test]
fn ready_before_any_snapshot_sends_nothing() {
    let mut sender = PreviewSender::new(ORIGIN);
    assert_eq!(sender.receive(ORIGIN, &PreviewMessage::Ready.to_value()), None);
    assert!(sender.receiver_ready());
}

#[test]
fn ready_from_foreign_origin_is_dropped() {
    let mut sender = PreviewSender::new(ORIGIN);
    sender.snapshot(Vec::new());
    assert_eq!(sender.receive(FOREIGN, &PreviewMessage::Ready.to_value()), None);
    assert!(!sender.receiver_ready());
}

#[test]
fn sender_ignores_echoed_snapshots() {
    let mut sender = PreviewSender::new(ORIGIN);
    sender.snapshot(Vec::new());
    assert_eq!(sender.receive(ORIGIN, &init_payload(&[])), None);
}

#[test]
fn lost_initial_snapshot_is_recovered_by_handshake() {
    let mut sender = PreviewSender::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());

    // Sent before the preview mounted: nobody receives it.
    let _lost = sender.snapshot(list.clone());

    let mut receiver = PreviewReceiver::new(ORIGIN);
    assert!(!receiver.is_ready());

    let announce = receiver.announcement().to_value();
    let resend = sender.receive(ORIGIN, &announce).unwrap();
    assert_eq!(receiver.receive(ORIGIN, &resend.to_value()), Delivery::Applied);
    assert_eq!(receiver.components(), Some(list.as_slice()));
}

#[test]
fn remounted_receiver_gets_snapshot_again() {
    let mut sender = PreviewSender::new(ORIGIN);
    let list = scenario_page().effective_list(&Overlay::default());
    sender.snapshot(list.clone());

    for _ in 0..2 {
        let mut receiver = PreviewReceiver::new(ORIGIN);
        let resend = sender
            .receive(ORIGIN, &receiver.announcement().to_value())
            .unwrap();
        receiver.receive(ORIGIN, &resend.to_value());
        assert_eq!(receiver.components(), Some(list.as_slice()));
    }
}

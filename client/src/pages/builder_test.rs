use super::*;

#[test]
fn share_base_joins_origin_and_static_route() {
    assert_eq!(share_base("https://cms.example.com", "home"), "https://cms.example.com/app/preview/home");
    assert_eq!(share_base("https://cms.example.com/", "home"), "https://cms.example.com/app/preview/home");
}

#[test]
fn save_label_reflects_pending_count() {
    assert_eq!(save_label(0, false), "Saved");
    assert_eq!(save_label(1, false), "Save 1 change");
    assert_eq!(save_label(3, false), "Save 3 changes");
    assert_eq!(save_label(3, true), "Saving…");
}

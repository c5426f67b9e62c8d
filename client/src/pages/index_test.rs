use super::*;

#[test]
fn parse_new_key_normalizes() {
    assert_eq!(parse_new_key("  Landing-Page ").unwrap(), "landing-page");
    assert_eq!(parse_new_key("docs_v2").unwrap(), "docs_v2");
}

#[test]
fn parse_new_key_rejects_bad_input() {
    assert_eq!(parse_new_key("   ").unwrap_err(), "enter a page key");
    assert!(parse_new_key("has space").is_err());
    assert!(parse_new_key("a/b").is_err());
    assert!(parse_new_key(&"x".repeat(65)).is_err());
}

use super::*;
use crate::component::ComponentData;
use serde_json::{Value, json};

fn data(value: Value) -> ComponentData {
    match value {
        Value::Object(map) => map,
        _ => ComponentData::new(),
    }
}

fn token_for(payload: &[u8]) -> String {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(payload).unwrap();
    URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
}

fn sample_overlay() -> Overlay {
    Overlay::default()
        .apply(1, data(json!({"title": "B", "subtitle": "Ünïcödé ✓"})))
        .apply(
            42,
            data(json!({
                "ratio": 0.1,
                "tiny": 1e-7,
                "neg": -3.5,
                "min": i64::MIN,
                "max": u64::MAX,
                "none": null,
                "flag": false,
                "items": [{"q": "Why?", "a": "Because."}, [1, 2, 3]]
            })),
        )
}

// =============================================================
// Round trip
// =============================================================

#[test]
fn round_trip_preserves_overlay() {
    let overlay = sample_overlay();
    let decoded = decode(&encode(&overlay)).unwrap();
    assert_eq!(decoded, overlay);
}

#[test]
fn round_trip_highly_compressible_overlays() {
    for repeat in [5, 10, 20, 40, 80, 2_000] {
        let body = "Lorem ipsum dolor sit amet. ".repeat(repeat);
        let overlay = Overlay::default().apply(1, data(json!({ "body": body })));
        let decoded = decode(&encode(&overlay)).unwrap();
        assert_eq!(decoded, overlay, "repeat {repeat}");
    }
}

#[test]
fn round_trip_extreme_keys_and_emoji() {
    let overlay = Overlay::default()
        .apply(i64::MIN, data(json!({ "title": "🚀✨".repeat(500) })))
        .apply(i64::MAX, data(json!({ "body": "🙂 ".repeat(1_000) })));
    assert_eq!(decode(&encode(&overlay)).unwrap(), overlay);
}

#[test]
fn payload_at_limit_decodes() {
    let filler = "x".repeat(MAX_DECODED_BYTES - 32);
    let payload = format!(r#"{{"1": {{"body": "{filler}"}}}}"#);
    assert!(payload.len() <= MAX_DECODED_BYTES);
    let overlay = decode(&token_for(payload.as_bytes())).unwrap();
    assert_eq!(overlay.patch_for(1).and_then(|p| p.get("body")).and_then(Value::as_str).map(str::len), Some(filler.len()));
}

#[test]
fn round_trip_empty_overlay() {
    let decoded = decode(&encode(&Overlay::default())).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn token_is_url_safe() {
    let token = encode(&sample_overlay());
    assert!(
        token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
}

#[test]
fn decode_tolerates_padding_and_whitespace() {
    let token = encode(&sample_overlay());
    let decoded = decode(&format!("  {token}==\n")).unwrap();
    assert_eq!(decoded, sample_overlay());
}

// =============================================================
// Fail closed
// =============================================================

#[test]
fn empty_token_is_error() {
    assert!(matches!(decode(""), Err(DraftError::Empty)));
    assert!(matches!(decode("   "), Err(DraftError::Empty)));
}

#[test]
fn garbage_is_base64_error() {
    assert!(matches!(decode("not a token!"), Err(DraftError::Base64(_))));
}

#[test]
fn every_truncation_fails() {
    let token = encode(&sample_overlay());
    for len in 1..token.len() {
        assert!(decode(&token[..len]).is_err(), "prefix of length {len} decoded");
    }
}

#[test]
fn corrupted_header_fails() {
    let token = encode(&sample_overlay());
    let corrupted = format!("A{}", &token[1..]);
    assert!(decode(&corrupted).is_err());
}

#[test]
fn corrupted_body_fails() {
    let mut bytes = URL_SAFE_NO_PAD.decode(encode(&sample_overlay())).unwrap();
    bytes[2] ^= 0xFF;
    assert!(decode(&URL_SAFE_NO_PAD.encode(bytes)).is_err());
}

#[test]
fn truncated_stream_reports_truncation() {
    let overlay = Overlay::default().apply(1, data(json!({ "body": "abc ".repeat(400) })));
    let bytes = URL_SAFE_NO_PAD.decode(encode(&overlay)).unwrap();
    let cut = URL_SAFE_NO_PAD.encode(&bytes[..bytes.len() - 6]);
    assert!(matches!(decode(&cut), Err(DraftError::Truncated | DraftError::Inflate(_))));
}

#[test]
fn trailing_bytes_fail() {
    let mut bytes = URL_SAFE_NO_PAD.decode(encode(&sample_overlay())).unwrap();
    bytes.extend_from_slice(&[0, 0, 0]);
    assert!(matches!(decode(&URL_SAFE_NO_PAD.encode(bytes)), Err(DraftError::TrailingBytes)));
}

#[test]
fn non_object_patch_fails() {
    assert!(matches!(decode(&token_for(br#"{"1": 5}"#)), Err(DraftError::Json(_))));
}

#[test]
fn non_integer_key_fails() {
    assert!(matches!(decode(&token_for(br#"{"abc": {}}"#)), Err(DraftError::Json(_))));
}

#[test]
fn non_map_payload_fails() {
    assert!(matches!(decode(&token_for(b"[1,2,3]")), Err(DraftError::Json(_))));
}

#[test]
fn oversized_payload_fails() {
    let payload = vec![b' '; MAX_DECODED_BYTES + 16];
    assert!(matches!(decode(&token_for(&payload)), Err(DraftError::TooLarge)));
}

// =============================================================
// decode_or_empty / share_link
// =============================================================

#[test]
fn decode_or_empty_absent_token() {
    let (overlay, err) = decode_or_empty(None);
    assert!(overlay.is_empty());
    assert!(err.is_none());
}

#[test]
fn decode_or_empty_bad_token_yields_no_overrides() {
    let (overlay, err) = decode_or_empty(Some("%%%"));
    assert!(overlay.is_empty());
    assert!(err.is_some());
}

#[test]
fn decode_or_empty_good_token() {
    let token = encode(&sample_overlay());
    let (overlay, err) = decode_or_empty(Some(&token));
    assert_eq!(overlay, sample_overlay());
    assert!(err.is_none());
}

#[test]
fn share_link_appends_draft_param() {
    let overlay = sample_overlay();
    let link = share_link("https://site.test/app/preview/home", &overlay);
    let token = link
        .strip_prefix("https://site.test/app/preview/home?draft=")
        .unwrap();
    assert_eq!(decode(token).unwrap(), overlay);
}

#[test]
fn share_link_extends_existing_query() {
    let link = share_link("/app/preview/home?theme=dark", &sample_overlay());
    assert!(link.starts_with("/app/preview/home?theme=dark&draft="));
}

#[test]
fn share_link_without_edits_is_base() {
    assert_eq!(share_link("/app/preview/home", &Overlay::default()), "/app/preview/home");
}

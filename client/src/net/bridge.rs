//! `postMessage` glue between the builder page and the preview iframe.
//!
//! SYSTEM CONTEXT
//! ==============
//! The protocol rules (origin check, message kinds, readiness) live in
//! `blocks::bridge`. This module only moves JSON across the window boundary:
//! it posts serialized `PreviewMessage`s with the target origin pinned to our
//! own origin, and hands every incoming `message` event to a callback as
//! `(origin, payload)`.
//!
//! TRADE-OFFS
//! ==========
//! Posting is fire-and-forget. A message posted before the other side has a
//! listener is lost; the `PREVIEW_READY` handshake recovers from that.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use blocks::PreviewMessage;
use serde_json::Value;

/// Payload of a `message` event as JSON; non-JSON data becomes `Null`.
pub fn parse_event_data(raw: Option<String>) -> Value {
    raw.and_then(|s| serde_json::from_str(&s).ok()).unwrap_or(Value::Null)
}

/// Origin of the current document, e.g. `https://cms.example.com`.
pub fn current_origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

#[cfg(feature = "hydrate")]
fn to_js(message: &PreviewMessage) -> Option<wasm_bindgen::JsValue> {
    js_sys::JSON::parse(&message.to_json()).ok()
}

/// Post to the preview iframe's window. Returns whether a post was attempted.
#[cfg(feature = "hydrate")]
pub fn post_to_frame(frame: &web_sys::HtmlIFrameElement, target_origin: &str, message: &PreviewMessage) -> bool {
    let (Some(window), Some(payload)) = (frame.content_window(), to_js(message)) else {
        return false;
    };
    match window.post_message(&payload, target_origin) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("post {} to preview failed: {e:?}", message.kind());
            false
        }
    }
}

/// Post to the embedding (parent) window, if there is one.
pub fn post_to_parent(target_origin: &str, message: &PreviewMessage) -> bool {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let parent = match window.parent() {
            Ok(Some(parent)) => parent,
            _ => return false,
        };
        let Some(payload) = to_js(message) else {
            return false;
        };
        parent.post_message(&payload, target_origin).is_ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (target_origin, message);
        false
    }
}

/// Call `on_message(origin, payload)` for every `message` event on this
/// window until the owning reactive scope is cleaned up.
pub fn use_message_listener(on_message: impl Fn(String, Value) + 'static) {
    #[cfg(feature = "hydrate")]
    {
        use leptos::prelude::*;

        let handle = window_event_listener(leptos::ev::message, move |ev: web_sys::MessageEvent| {
            let raw = js_sys::JSON::stringify(&ev.data())
                .ok()
                .map(String::from);
            on_message(ev.origin(), parse_event_data(raw));
        });
        on_cleanup(move || handle.remove());
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = on_message;
    }
}

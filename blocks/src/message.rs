//! Messages posted between the builder and the preview surface.
//!
//! The channel is connectionless and unacknowledged. Two kinds exist:
//!
//! - `PREVIEW_INIT` (builder -> preview): the full effective component list.
//!   Never a diff; every edit re-sends the whole snapshot.
//! - `PREVIEW_READY` (preview -> builder): the preview has mounted and is
//!   listening. The builder answers with its latest snapshot, which recovers
//!   any snapshot sent before the preview existed.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;

/// `kind` tag of a snapshot message.
pub const PREVIEW_INIT: &str = "PREVIEW_INIT";

/// `kind` tag of a readiness announcement.
pub const PREVIEW_READY: &str = "PREVIEW_READY";

/// A preview channel message. Serializes as `{"kind": "...", ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PreviewMessage {
    #[serde(rename = "PREVIEW_INIT")]
    Init { components: Vec<Component> },
    #[serde(rename = "PREVIEW_READY")]
    Ready,
}

impl PreviewMessage {
    #[must_use]
    pub fn init(components: Vec<Component>) -> Self {
        Self::Init { components }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => PREVIEW_INIT,
            Self::Ready => PREVIEW_READY,
        }
    }

    /// Parse an inbound payload. Anything that is not a well-formed message
    /// of a known kind yields `None`; the channel is shared with unrelated
    /// traffic, so foreign payloads are not errors.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("kind").and_then(Value::as_str)?;
        if kind != PREVIEW_INIT && kind != PREVIEW_READY {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Parse a JSON text payload. See [`PreviewMessage::from_value`].
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        Self::from_value(&value)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

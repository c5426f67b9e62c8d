//! Live preview bridge: sender and receiver state machines.
//!
//! SYSTEM CONTEXT
//! ==============
//! The builder and the preview run in separate browsing contexts with no
//! shared memory. The only link is a fire-and-forget message channel with
//! per-sender FIFO ordering and no delivery before the receiver exists.
//! These types hold the protocol rules; the browser glue only moves JSON.
//!
//! DESIGN
//! ======
//! Receiver: `Waiting -> Ready`, no terminal state. Every accepted snapshot
//! replaces the held list wholesale.
//!
//! Readiness: the receiver announces `PREVIEW_READY` when it mounts and the
//! sender answers with its latest snapshot. Snapshots sent before the
//! receiver mounted are lost on the wire and recovered by that answer; a
//! reloaded receiver announces again and gets the snapshot again.
//!
//! Both sides drop every message whose origin differs from their own before
//! looking at its payload.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use serde_json::Value;

use crate::component::Component;
use crate::message::PreviewMessage;

/// Whether a message origin is acceptable for a context at `expected`.
///
/// Opaque origins (`"null"`) and empty strings never match, even each other.
#[must_use]
pub fn same_origin(expected: &str, actual: &str) -> bool {
    !expected.is_empty() && expected != "null" && expected == actual
}

// =============================================================================
// RECEIVER
// =============================================================================

/// Preview-side state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ReceiverState {
    /// Mounted, no snapshot yet. Renders a loading indicator.
    #[default]
    Waiting,
    /// Holding the most recent snapshot.
    Ready(Vec<Component>),
}

/// Outcome of offering a message to a [`PreviewReceiver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Snapshot accepted and state replaced.
    Applied,
    /// Snapshot accepted but identical to the held one.
    Unchanged,
    /// Dropped: origin mismatch.
    ForeignOrigin,
    /// Dropped: not a snapshot message.
    Ignored,
}

/// Receiving end of the preview channel.
#[derive(Clone, Debug)]
pub struct PreviewReceiver {
    origin: String,
    state: ReceiverState,
}

impl PreviewReceiver {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into(), state: ReceiverState::Waiting }
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn state(&self) -> &ReceiverState {
        &self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ReceiverState::Ready(_))
    }

    /// Held snapshot, if any.
    #[must_use]
    pub fn components(&self) -> Option<&[Component]> {
        match &self.state {
            ReceiverState::Waiting => None,
            ReceiverState::Ready(components) => Some(components),
        }
    }

    /// Message to post to the builder once mounted.
    #[must_use]
    pub fn announcement(&self) -> PreviewMessage {
        PreviewMessage::Ready
    }

    /// Offer a raw inbound payload from `origin`.
    pub fn receive(&mut self, origin: &str, payload: &Value) -> Delivery {
        if !same_origin(&self.origin, origin) {
            return Delivery::ForeignOrigin;
        }
        match PreviewMessage::from_value(payload) {
            Some(message) => self.apply(message),
            None => Delivery::Ignored,
        }
    }

    /// Apply an already-parsed message that passed the origin check.
    pub fn apply(&mut self, message: PreviewMessage) -> Delivery {
        let PreviewMessage::Init { components } = message else {
            return Delivery::Ignored;
        };
        if self.components() == Some(components.as_slice()) {
            return Delivery::Unchanged;
        }
        self.state = ReceiverState::Ready(components);
        Delivery::Applied
    }
}

// =============================================================================
// SENDER
// =============================================================================

/// Sending end of the preview channel, owned by the builder.
#[derive(Clone, Debug)]
pub struct PreviewSender {
    origin: String,
    latest: Option<Vec<Component>>,
    receiver_ready: bool,
}

impl PreviewSender {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into(), latest: None, receiver_ready: false }
    }

    /// Origin the preview must post from, and the target origin for sends.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether a `PREVIEW_READY` has been seen since construction.
    #[must_use]
    pub fn receiver_ready(&self) -> bool {
        self.receiver_ready
    }

    #[must_use]
    pub fn latest(&self) -> Option<&[Component]> {
        self.latest.as_deref()
    }

    /// Record a new snapshot and return the message to post. Sent whether or
    /// not the receiver is known to be listening.
    pub fn snapshot(&mut self, components: Vec<Component>) -> PreviewMessage {
        self.latest = Some(components.clone());
        PreviewMessage::init(components)
    }

    /// Offer a raw inbound payload from `origin`. Returns the snapshot to
    /// re-send when the payload is a same-origin readiness announcement and a
    /// snapshot exists.
    pub fn receive(&mut self, origin: &str, payload: &Value) -> Option<PreviewMessage> {
        if !same_origin(&self.origin, origin) {
            return None;
        }
        match PreviewMessage::from_value(payload)? {
            PreviewMessage::Ready => self.on_ready(),
            PreviewMessage::Init { .. } => None,
        }
    }

    fn on_ready(&mut self) -> Option<PreviewMessage> {
        self.receiver_ready = true;
        self.latest.clone().map(PreviewMessage::init)
    }
}

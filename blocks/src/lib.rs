//! Shared page-component model, pending-edit overlay, draft link codec, and
//! live preview protocol.
//!
//! This crate owns every representation that crosses a boundary between the
//! `livepage` server, the builder (editor) surface, and the preview
//! (rendering) surface. It has no I/O and no browser dependencies, so the same
//! merge and protocol rules run in the server, in WASM, and in the CLI.
//!
//! ARCHITECTURE
//! ============
//! - [`component`]: components, pages, and the effective-list projection.
//! - [`overlay`]: unpersisted per-component data patches held by the editor.
//! - [`draft`]: overlay <-> URL-safe token for link-shared draft previews.
//! - [`message`]: wire shape of messages posted between the two surfaces.
//! - [`bridge`]: sender and receiver state machines for the live preview.
//! - [`rest`]: request bodies and endpoint paths of the persistence API.

pub mod bridge;
pub mod component;
pub mod draft;
pub mod message;
pub mod overlay;
pub mod rest;

pub use bridge::{Delivery, PreviewReceiver, PreviewSender, ReceiverState};
pub use component::{Component, ComponentData, ComponentId, Page, PageComponentRow, ReorderItem};
pub use draft::DraftError;
pub use message::PreviewMessage;
pub use overlay::Overlay;

//! Client state modules.
//!
//! DESIGN
//! ======
//! Plain structs that pages wrap in `RwSignal`s. Keeping the logic out of
//! the view code lets it run under `cargo test` with no browser.

pub mod editor;
pub mod notify;
pub mod preview;

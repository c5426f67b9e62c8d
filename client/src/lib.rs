//! # client
//!
//! Leptos UI for the page builder: the builder (editor) surface, the preview
//! (rendering) surface it embeds in an iframe, and a page index.
//!
//! ARCHITECTURE
//! ============
//! - `registry` / `render`: component type tag -> renderer -> `Block` view model.
//! - `state`: editor session, preview mode logic, notifications. Plain data,
//!   unit-tested without a browser.
//! - `net`: REST helpers and the `postMessage` glue, real only with `hydrate`.
//! - `components` / `pages`: Leptos views over the above.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod registry;
pub mod render;
pub mod state;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}

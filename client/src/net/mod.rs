//! Network layer: REST persistence helpers and the cross-frame message glue.
//!
//! ARCHITECTURE
//! ============
//! Both modules only do real I/O with the `hydrate` feature. Under SSR they
//! compile to stubs so shared components render without a browser.

pub mod api;
pub mod bridge;

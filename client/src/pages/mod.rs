//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Session logic lives in `state` so it can be tested
//! without a browser.

pub mod builder;
pub mod index;
pub mod preview;

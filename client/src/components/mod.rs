//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render preview blocks and editor chrome. Shared state comes
//! from the page that mounts them or from Leptos context providers.

pub mod block_view;
pub mod component_editor;
pub mod toast_stack;

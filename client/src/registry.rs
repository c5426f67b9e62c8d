//! Component type registry.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both surfaces route every effective component through [`resolve`]. The set
//! of renderable types is the closed [`ComponentKind`] enum; any other tag
//! resolves to [`Resolution::NotFound`] and is shown as a diagnostic block.
//!
//! DESIGN
//! ======
//! Renderer descriptors sit in one `OnceLock` slot per kind and are built on
//! first resolution of that kind. Creating the registry touches no slot, so its
//! cost does not depend on how many kinds exist. Lookup is a `match` on the tag
//! plus an array index.
//!
//! TRADE-OFFS
//! ==========
//! All renderers are compiled into the same WASM module, so the first load of
//! a kind is synchronous and the loading state around it is never observed.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::sync::OnceLock;

use blocks::{Component, ComponentData};

use crate::render::{self, Block, RenderedBlock};

// =============================================================================
// KINDS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Hero,
    PopularTools,
    CategoryGrid,
    RichText,
    Faq,
    CallToAction,
}

const KIND_COUNT: usize = 6;

impl ComponentKind {
    pub const ALL: [Self; KIND_COUNT] =
        [Self::Hero, Self::PopularTools, Self::CategoryGrid, Self::RichText, Self::Faq, Self::CallToAction];

    /// Wire tag stored in `component_type`.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::PopularTools => "popular-tools",
            Self::CategoryGrid => "category-grid",
            Self::RichText => "rich-text",
            Self::Faq => "faq",
            Self::CallToAction => "call-to-action",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::PopularTools => "Popular tools",
            Self::CategoryGrid => "Category grid",
            Self::RichText => "Rich text",
            Self::Faq => "FAQ",
            Self::CallToAction => "Call to action",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hero" => Some(Self::Hero),
            "popular-tools" => Some(Self::PopularTools),
            "category-grid" => Some(Self::CategoryGrid),
            "rich-text" => Some(Self::RichText),
            "faq" => Some(Self::Faq),
            "call-to-action" => Some(Self::CallToAction),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    fn render_fn(self) -> fn(&ComponentData) -> Block {
        match self {
            Self::Hero => render::hero,
            Self::PopularTools => render::popular_tools,
            Self::CategoryGrid => render::category_grid,
            Self::RichText => render::rich_text,
            Self::Faq => render::faq,
            Self::CallToAction => render::call_to_action,
        }
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// Loaded renderer for one kind.
#[derive(Debug)]
pub struct Renderer {
    kind: ComponentKind,
    render: fn(&ComponentData) -> Block,
}

impl Renderer {
    fn load(kind: ComponentKind) -> Self {
        Self { kind, render: kind.render_fn() }
    }

    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    #[must_use]
    pub fn render(&self, data: &ComponentData) -> Block {
        (self.render)(data)
    }
}

#[derive(Debug)]
pub enum Resolution<'a> {
    Found(&'a Renderer),
    /// Carries the unrecognized tag.
    NotFound(String),
}

// =============================================================================
// REGISTRY
// =============================================================================

pub struct Registry {
    slots: [OnceLock<Renderer>; KIND_COUNT],
}

impl Registry {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: [const { OnceLock::new() }; KIND_COUNT] }
    }

    /// Total over all strings; never panics.
    pub fn resolve(&self, component_type: &str) -> Resolution<'_> {
        match ComponentKind::from_tag(component_type) {
            Some(kind) => Resolution::Found(self.slots[kind.slot()].get_or_init(|| Renderer::load(kind))),
            None => Resolution::NotFound(component_type.to_owned()),
        }
    }

    /// Number of kinds whose renderer has been loaded.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Resolve and render, substituting a diagnostic for unknown types.
    #[must_use]
    pub fn render(&self, component: &Component) -> RenderedBlock {
        let block = match self.resolve(&component.component_type) {
            Resolution::Found(renderer) => renderer.render(&component.data),
            Resolution::NotFound(component_type) => Block::Diagnostic { component_type },
        };
        RenderedBlock { id: component.id, component_type: component.component_type.clone(), block }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: Registry = Registry::new();

/// Resolve against the process-wide registry.
pub fn resolve(component_type: &str) -> Resolution<'static> {
    REGISTRY.resolve(component_type)
}

/// Render a list of effective components with the process-wide registry.
pub fn render_all(components: &[Component]) -> Vec<RenderedBlock> {
    components.iter().map(|c| REGISTRY.render(c)).collect()
}

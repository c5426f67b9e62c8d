//! Target-independent view model produced by component renderers.
//!
//! DESIGN
//! ======
//! Each renderer reads the fields it knows from the component's untyped data
//! and fills a [`Block`]. Missing or ill-typed fields fall back to defaults;
//! the data schema belongs to the renderer and nothing upstream validates it.
//! The Leptos layer (`components::block_view`) turns a `Block` into DOM, so
//! everything here is testable without a browser.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use blocks::{ComponentData, ComponentId};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use serde_json::{Map, Value};

// =============================================================================
// VIEW MODEL
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub href: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// One rendered component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Hero {
        title: String,
        subtitle: Option<String>,
        image_url: Option<String>,
        cta: Option<Link>,
    },
    PopularTools {
        heading: String,
        tools: Vec<Card>,
    },
    CategoryGrid {
        heading: String,
        categories: Vec<Card>,
    },
    /// HTML from markdown: raw HTML dropped, link and image URLs restricted
    /// to [`is_safe_url`] schemes.
    RichText {
        html: String,
    },
    Faq {
        heading: String,
        items: Vec<FaqItem>,
    },
    CallToAction {
        heading: String,
        body: Option<String>,
        button: Option<Link>,
    },
    /// Stand-in for a component whose type has no renderer.
    Diagnostic {
        component_type: String,
    },
}

/// A block tagged with the component it came from, keyed by id in lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBlock {
    pub id: ComponentId,
    pub component_type: String,
    pub block: Block,
}

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// Non-blank string field. Numbers and booleans are shown as text.
fn text(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or(data: &Map<String, Value>, key: &str, default: &str) -> String {
    text(data, key).unwrap_or_else(|| default.to_owned())
}

/// Object entries of an array field; non-object entries are skipped.
fn objects<'a>(data: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Whether `url` may reach an `href` or `src`: relative, or one of
/// `http`, `https`, `mailto`. Component data is untrusted; a draft token can
/// carry anything.
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let cleaned: String = url.chars().filter(|c| !c.is_whitespace() && !c.is_control()).collect();
    let Some(colon) = cleaned.find(':') else {
        return true;
    };
    if cleaned[..colon].contains(['/', '?', '#']) {
        return true;
    }
    matches!(cleaned[..colon].to_ascii_lowercase().as_str(), "http" | "https" | "mailto")
}

fn url(data: &Map<String, Value>, key: &str) -> Option<String> {
    text(data, key).filter(|u| is_safe_url(u))
}

fn link(data: &Map<String, Value>, label_key: &str, href_key: &str) -> Option<Link> {
    Some(Link { label: text(data, label_key)?, href: url(data, href_key)? })
}

fn cards(data: &Map<String, Value>, key: &str) -> Vec<Card> {
    objects(data, key)
        .filter_map(|item| {
            Some(Card {
                title: text(item, "name").or_else(|| text(item, "title"))?,
                description: text(item, "description"),
                href: url(item, "href").or_else(|| {
                    text(item, "slug").map(|s| format!("/{}", s.trim_start_matches('/'))).filter(|u| is_safe_url(u))
                }),
                icon: text(item, "icon"),
            })
        })
        .collect()
}

/// Markdown to HTML with raw HTML events dropped and unsafe link or image
/// URLs blanked.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if !is_safe_url(&dest_url) => {
            Some(Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed(""), title, id }))
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if !is_safe_url(&dest_url) => {
            Some(Event::Start(Tag::Image { link_type, dest_url: CowStr::Borrowed(""), title, id }))
        }
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

// =============================================================================
// RENDERERS
// =============================================================================

pub(crate) fn hero(data: &ComponentData) -> Block {
    Block::Hero {
        title: text_or(data, "title", "Untitled"),
        subtitle: text(data, "subtitle"),
        image_url: url(data, "image_url"),
        cta: link(data, "cta_label", "cta_href"),
    }
}

pub(crate) fn popular_tools(data: &ComponentData) -> Block {
    Block::PopularTools { heading: text_or(data, "heading", "Popular tools"), tools: cards(data, "tools") }
}

pub(crate) fn category_grid(data: &ComponentData) -> Block {
    Block::CategoryGrid { heading: text_or(data, "heading", "Categories"), categories: cards(data, "categories") }
}

pub(crate) fn rich_text(data: &ComponentData) -> Block {
    Block::RichText { html: markdown_to_html(&text(data, "body").unwrap_or_default()) }
}

pub(crate) fn faq(data: &ComponentData) -> Block {
    let items = objects(data, "items")
        .filter_map(|item| Some(FaqItem { question: text(item, "question")?, answer: text_or(item, "answer", "") }))
        .collect();
    Block::Faq { heading: text_or(data, "heading", "Frequently asked questions"), items }
}

pub(crate) fn call_to_action(data: &ComponentData) -> Block {
    Block::CallToAction {
        heading: text_or(data, "heading", ""),
        body: text(data, "body"),
        button: link(data, "button_label", "button_href"),
    }
}

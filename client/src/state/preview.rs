//! Rendering-surface state: live snapshots or fetched rows plus a draft.
//!
//! DESIGN
//! ======
//! The mode is fixed from the query string when the page mounts.
//!
//! - Live: no fetch. The surface starts waiting, announces readiness to its
//!   parent, and shows only what arrives over the bridge.
//! - Static: one fetch of the persisted rows, an optional `draft` token laid
//!   over them, and nothing from the bridge.
//!
//! ERROR HANDLING
//! ==============
//! A bad draft token is logged by the caller and treated as no draft.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use blocks::{Delivery, DraftError, Overlay, Page, PageComponentRow, PreviewMessage, PreviewReceiver, draft};
use serde_json::Value;

use crate::registry;
use crate::render::RenderedBlock;

/// How the preview surface was opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewMode {
    Live,
    Static { draft: Option<String> },
}

impl PreviewMode {
    /// `live` counts as set unless it is `0` or `false`; an empty value
    /// (`?live`) is set.
    #[must_use]
    pub fn from_query(live: Option<&str>, draft: Option<&str>) -> Self {
        match live.map(str::trim) {
            Some(flag) if !flag.eq_ignore_ascii_case("false") && flag != "0" => Self::Live,
            _ => Self::Static { draft: draft.map(str::to_owned).filter(|d| !d.trim().is_empty()) },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewView {
    /// Waiting for the fetch or the first snapshot.
    Loading,
    Blocks(Vec<RenderedBlock>),
}

#[derive(Clone, Debug)]
pub struct PreviewSession {
    page_key: String,
    mode: PreviewMode,
    receiver: PreviewReceiver,
    fetched: Option<Vec<RenderedBlock>>,
}

impl PreviewSession {
    #[must_use]
    pub fn new(page_key: impl Into<String>, mode: PreviewMode, origin: impl Into<String>) -> Self {
        Self { page_key: page_key.into(), mode, receiver: PreviewReceiver::new(origin), fetched: None }
    }

    #[must_use]
    pub fn mode(&self) -> &PreviewMode {
        &self.mode
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.mode == PreviewMode::Live
    }

    /// Static mode fetches once; live mode never does.
    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        !self.is_live() && self.fetched.is_none()
    }

    /// Readiness message to post to the parent on mount, in live mode only.
    #[must_use]
    pub fn announcement(&self) -> Option<PreviewMessage> {
        self.is_live().then(|| self.receiver.announcement())
    }

    /// Fetched rows arrived. Ignored in live mode. Returns the draft decode
    /// error, if the token was unusable.
    pub fn on_fetched(&mut self, rows: Vec<PageComponentRow>) -> Option<DraftError> {
        let PreviewMode::Static { draft } = &self.mode else {
            return None;
        };
        let (blocks, err) = draft_blocks(&self.page_key, rows, draft.as_deref());
        self.fetched = Some(blocks);
        err
    }

    /// Inbound window message. Ignored outside live mode.
    pub fn on_message(&mut self, origin: &str, payload: &Value) -> Delivery {
        if !self.is_live() {
            return Delivery::Ignored;
        }
        self.receiver.receive(origin, payload)
    }

    #[must_use]
    pub fn view(&self) -> PreviewView {
        let blocks = match &self.mode {
            PreviewMode::Live => self.receiver.components().map(registry::render_all),
            PreviewMode::Static { .. } => self.fetched.clone(),
        };
        blocks.map_or(PreviewView::Loading, PreviewView::Blocks)
    }
}

/// Effective list of `rows` under the overlay decoded from `draft`, rendered.
pub fn draft_blocks(
    page_key: &str,
    rows: Vec<PageComponentRow>,
    draft: Option<&str>,
) -> (Vec<RenderedBlock>, Option<DraftError>) {
    let (overlay, err): (Overlay, _) = draft::decode_or_empty(draft);
    let page = Page::from_rows(page_key, rows);
    (registry::render_all(&page.effective_list(&overlay)), err)
}

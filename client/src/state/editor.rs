//! Builder-side editing session for one page.
//!
//! DESIGN
//! ======
//! `EditorSession` owns the persisted page, the pending-edit overlay, and the
//! preview sender together. Every mutation that changes the effective list
//! returns the `PREVIEW_INIT` message to post, so the page component never
//! has to decide when to re-send. The whole session sits in one `RwSignal`,
//! which makes persist-and-clear a single update: the saved rows and the
//! settled overlay become visible at the same time.
//!
//! Persisted changes (create, toggle, delete, reorder) round-trip through the
//! server first and are applied from the returned rows; only data edits are
//! held locally in the overlay.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use blocks::rest::{BulkReorder, ComponentPatch, NewComponent};
use blocks::{
    Component, ComponentData, ComponentId, Overlay, Page, PageComponentRow, PreviewMessage, PreviewSender, ReorderItem,
    draft,
};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct EditorSession {
    page: Page,
    overlay: Overlay,
    sender: PreviewSender,
    /// Rows have been fetched at least once.
    pub loaded: bool,
    /// A save is in flight; the save button is disabled.
    pub saving: bool,
    pub selected: Option<ComponentId>,
    /// Bumped whenever the page changes for a reason other than a local data
    /// edit. Sidebar editors are keyed on it so typing keeps focus.
    pub revision: u64,
    /// Overlay as it stood when the current save began.
    in_flight: Option<Overlay>,
}

impl EditorSession {
    #[must_use]
    pub fn new(page_key: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            page: Page::new(page_key),
            overlay: Overlay::default(),
            sender: PreviewSender::new(origin),
            loaded: false,
            saving: false,
            selected: None,
            revision: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn sender(&self) -> &PreviewSender {
        &self.sender
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// What the preview shows right now.
    #[must_use]
    pub fn effective(&self) -> Vec<Component> {
        self.page.effective_list(&self.overlay)
    }

    /// Every component, inactive included, in order, with pending edits merged.
    /// This is the list the builder sidebar edits.
    #[must_use]
    pub fn outline(&self) -> Vec<Component> {
        let mut all: Vec<Component> = self.page.components.iter().map(|c| self.overlay.merged(c)).collect();
        all.sort_by_key(|c| c.order);
        all
    }

    fn rebuilt(&mut self) -> PreviewMessage {
        self.revision += 1;
        self.snapshot()
    }

    fn snapshot(&mut self) -> PreviewMessage {
        let effective = self.effective();
        self.sender.snapshot(effective)
    }

    // =========================================================================
    // LOCAL EDITS
    // =========================================================================

    /// Merge `patch` into the pending edits of `id`. `None` when `id` is not
    /// on the page.
    pub fn edit(&mut self, id: ComponentId, patch: ComponentData) -> Option<PreviewMessage> {
        if !self.page.contains(id) {
            return None;
        }
        self.overlay = std::mem::take(&mut self.overlay).apply(id, patch);
        Some(self.snapshot())
    }

    pub fn set_field(&mut self, id: ComponentId, key: &str, value: Value) -> Option<PreviewMessage> {
        let mut patch = ComponentData::new();
        patch.insert(key.to_owned(), value);
        self.edit(id, patch)
    }

    /// Drop all pending edits.
    pub fn discard(&mut self) -> PreviewMessage {
        self.overlay = std::mem::take(&mut self.overlay).clear();
        self.rebuilt()
    }

    // =========================================================================
    // SERVER ROUND-TRIPS
    // =========================================================================

    /// Replace the page with freshly fetched rows, keeping pending edits for
    /// components that still exist.
    pub fn load(&mut self, rows: Vec<PageComponentRow>) -> PreviewMessage {
        self.page = Page::from_rows(self.page.key.clone(), rows);
        self.overlay = std::mem::take(&mut self.overlay).reconcile(&self.page);
        self.loaded = true;
        self.rebuilt()
    }

    /// `PATCH` bodies for every pending edit.
    #[must_use]
    pub fn pending_saves(&self) -> Vec<(ComponentId, ComponentPatch)> {
        self.overlay
            .pending(&self.page)
            .into_iter()
            .map(|(id, data)| {
                (id, ComponentPatch { component_data: Some(Value::Object(data)), ..ComponentPatch::default() })
            })
            .collect()
    }

    /// Mark a save as started and return the `PATCH` bodies to send. `None`
    /// while another save is in flight or when nothing is pending.
    pub fn begin_save(&mut self) -> Option<Vec<(ComponentId, ComponentPatch)>> {
        if self.saving || !self.is_dirty() {
            return None;
        }
        self.saving = true;
        self.in_flight = Some(self.overlay.clone());
        Some(self.pending_saves())
    }

    /// A save failed part-way; pending edits stay for a retry.
    pub fn abort_save(&mut self) {
        self.saving = false;
        self.in_flight = None;
    }

    /// The save's `PATCH`es returned `rows`. Each stored row replaces its
    /// component, and its pending edit is dropped in the same step unless it
    /// was edited again while the save was in flight.
    pub fn commit_persisted(&mut self, rows: Vec<PageComponentRow>) -> PreviewMessage {
        let sent = self.in_flight.take().unwrap_or_default();
        let stored: Vec<ComponentId> = rows.iter().map(|row| row.id).collect();
        for row in rows {
            self.page = self.page.upsert(row.into_component());
        }
        self.overlay = std::mem::take(&mut self.overlay).settle(&sent, &stored).reconcile(&self.page);
        self.saving = false;
        self.rebuilt()
    }

    /// Body for adding a component of `component_type` at the end.
    #[must_use]
    pub fn new_component(&self, component_type: &str) -> NewComponent {
        NewComponent {
            page_key: self.page.key.clone(),
            component_type: component_type.to_owned(),
            component_order: Some(self.page.next_order()),
            component_data: None,
            is_active: None,
        }
    }

    /// A created or updated row came back from the server.
    pub fn apply_saved(&mut self, row: PageComponentRow) -> PreviewMessage {
        self.page = self.page.upsert(row.into_component());
        self.rebuilt()
    }

    pub fn apply_removed(&mut self, id: ComponentId) -> PreviewMessage {
        self.page = self.page.remove(id);
        self.overlay = std::mem::take(&mut self.overlay).reconcile(&self.page);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.rebuilt()
    }

    /// Bulk reorder body that moves `id` by `delta` slots and renumbers the
    /// page `0..n`. `None` if `id` is unknown or the move leaves the list.
    #[must_use]
    pub fn move_request(&self, id: ComponentId, delta: i64) -> Option<BulkReorder> {
        let mut ids: Vec<ComponentId> = self.page.reorder_items().into_iter().map(|item| item.id).collect();
        let from = ids.iter().position(|x| *x == id)?;
        let to = i64::try_from(from).ok()?.checked_add(delta)?;
        let to = usize::try_from(to).ok().filter(|to| *to < ids.len())?;
        if to == from {
            return None;
        }
        let moved = ids.remove(from);
        ids.insert(to, moved);
        let items = ids
            .into_iter()
            .zip(0_i64..)
            .map(|(id, order)| ReorderItem { id, order })
            .collect();
        Some(BulkReorder { page_key: self.page.key.clone(), items })
    }

    /// Rows returned by a reorder. Pending edits survive.
    pub fn apply_reorder(&mut self, rows: Vec<PageComponentRow>) -> PreviewMessage {
        self.page = Page::from_rows(self.page.key.clone(), rows);
        self.overlay = std::mem::take(&mut self.overlay).reconcile(&self.page);
        self.rebuilt()
    }

    // =========================================================================
    // PREVIEW CHANNEL
    // =========================================================================

    /// Offer an inbound window message. Returns the snapshot to re-send when
    /// the preview announced readiness.
    pub fn on_message(&mut self, origin: &str, payload: &Value) -> Option<PreviewMessage> {
        self.sender.receive(origin, payload)
    }

    /// Link that previews the current pending edits without saving them.
    #[must_use]
    pub fn share_link(&self, preview_url: &str) -> String {
        draft::share_link(preview_url, &self.overlay)
    }
}

//! Pending-edit overlay: unpersisted per-component data patches.
//!
//! DESIGN
//! ======
//! The overlay is additive per field, not per call: patches for the same
//! component accumulate, later values win on overlapping keys. Operations
//! consume and return the overlay so the owner always swaps in a whole new
//! value and a reader never sees a half-applied change.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentData, ComponentId, Page};

/// Component id -> partial data patch, owned by one editor session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overlay {
    entries: BTreeMap<ComponentId, ComponentData>,
}

impl Overlay {
    /// Shallow-merge `patch` into the entry for `id`, creating it if absent.
    #[must_use]
    pub fn apply(mut self, id: ComponentId, patch: ComponentData) -> Self {
        self.entries.entry(id).or_default().extend(patch);
        self
    }

    /// Empty overlay, used right after a successful persist.
    #[must_use]
    pub fn clear(self) -> Self {
        Self::default()
    }

    /// Drop the entries of `saved` that were written back and have not been
    /// edited since. `saved` is the overlay as it stood when the save began;
    /// `stored` holds the ids the server confirmed. Entries edited during the
    /// save stay pending.
    #[must_use]
    pub fn settle(mut self, saved: &Overlay, stored: &[ComponentId]) -> Self {
        self.entries
            .retain(|id, patch| !(stored.contains(id) && saved.entries.get(id) == Some(&*patch)));
        self
    }

    /// Drop entries whose component no longer exists on `page`.
    #[must_use]
    pub fn reconcile(mut self, page: &Page) -> Self {
        self.entries.retain(|id, _| page.contains(*id));
        self
    }

    #[must_use]
    pub fn patch_for(&self, id: ComponentId) -> Option<&ComponentData> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.entries.keys().copied()
    }

    /// Persisted data with this overlay's patch laid over it.
    #[must_use]
    pub fn merged_data(&self, component: &Component) -> ComponentData {
        let mut data = component.data.clone();
        if let Some(patch) = self.entries.get(&component.id) {
            data.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        data
    }

    /// Effective component: `component` with merged data.
    #[must_use]
    pub fn merged(&self, component: &Component) -> Component {
        Component { data: self.merged_data(component), ..component.clone() }
    }

    /// `(id, merged data)` for every entry that still has a component on
    /// `page`, ready to be written back.
    #[must_use]
    pub fn pending(&self, page: &Page) -> Vec<(ComponentId, ComponentData)> {
        self.entries
            .keys()
            .filter_map(|id| page.get(*id))
            .map(|component| (component.id, self.merged_data(component)))
            .collect()
    }
}

//! Page components and the effective-list projection.
//!
//! DESIGN
//! ======
//! A [`Page`] is treated as a value: every mutation returns a new page so the
//! builder can diff before/after and hand either side to the preview. `order`
//! values only need to induce an ordering; they are never renumbered as a
//! side effect. [`Page::renumber`] is the separate, explicit tidy-up pass.

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::overlay::Overlay;

/// Persistence-assigned component identity.
pub type ComponentId = i64;

/// Untyped component payload. The schema belongs to the renderer for the
/// component's type, not to the model.
pub type ComponentData = Map<String, Value>;

fn default_active() -> bool {
    true
}

/// One content block on a page. This is the shape carried by preview
/// snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Renderer tag, e.g. `"hero"` or `"popular-tools"`.
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub data: ComponentData,
    /// Render position, ascending. Ties keep insertion order.
    #[serde(default)]
    pub order: i64,
    /// Inactive components are kept for re-activation but never rendered.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Component {
    #[must_use]
    pub fn new(id: ComponentId, component_type: impl Into<String>, order: i64) -> Self {
        Self { id, component_type: component_type.into(), data: ComponentData::new(), order, active: true }
    }

    #[must_use]
    pub fn with_data(mut self, data: ComponentData) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Row shape of the REST persistence endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageComponentRow {
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_key: Option<String>,
    pub component_type: String,
    #[serde(default)]
    pub component_order: i64,
    #[serde(default)]
    pub component_data: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl PageComponentRow {
    /// Convert into the model shape. Non-object payloads become empty data.
    #[must_use]
    pub fn into_component(self) -> Component {
        let data = match self.component_data {
            Value::Object(map) => map,
            _ => ComponentData::new(),
        };
        Component {
            id: self.id,
            component_type: self.component_type,
            data,
            order: self.component_order,
            active: self.is_active,
        }
    }

    #[must_use]
    pub fn from_component(page_key: Option<String>, component: Component) -> Self {
        Self {
            id: component.id,
            page_key,
            component_type: component.component_type,
            component_order: component.order,
            component_data: Value::Object(component.data),
            is_active: component.active,
        }
    }
}

/// One `{id, order}` pair for the bulk reorder endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: ComponentId,
    pub order: i64,
}

/// A page key plus its components in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub key: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Page {
    /// Empty page, as created by the admin "new page" action.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), components: Vec::new() }
    }

    /// Build a page from REST rows, keeping row order as insertion order.
    /// Later rows with a duplicate id replace earlier ones.
    #[must_use]
    pub fn from_rows(key: impl Into<String>, rows: Vec<PageComponentRow>) -> Self {
        rows.into_iter()
            .map(PageComponentRow::into_component)
            .fold(Self::new(key), |page, component| page.upsert(component))
    }

    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Order value that places a new component after every existing one.
    #[must_use]
    pub fn next_order(&self) -> i64 {
        self.components
            .iter()
            .map(|c| c.order)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Rendered view: active components only, overlay merged, stable-sorted by
    /// `order` ascending.
    #[must_use]
    pub fn effective_list(&self, overlay: &Overlay) -> Vec<Component> {
        let mut list: Vec<Component> = self
            .components
            .iter()
            .filter(|c| c.active)
            .map(|c| overlay.merged(c))
            .collect();
        list.sort_by_key(|c| c.order);
        list
    }

    /// Replace one component's `order`. Siblings are left untouched.
    #[must_use]
    pub fn reorder(&self, id: ComponentId, new_order: i64) -> Self {
        self.map_component(id, |c| c.order = new_order)
    }

    #[must_use]
    pub fn set_active(&self, id: ComponentId, active: bool) -> Self {
        self.map_component(id, |c| c.active = active)
    }

    /// Replace the component with the same id in place, or append it.
    #[must_use]
    pub fn upsert(&self, component: Component) -> Self {
        let mut next = self.clone();
        match next.components.iter_mut().find(|c| c.id == component.id) {
            Some(existing) => *existing = component,
            None => next.components.push(component),
        }
        next
    }

    #[must_use]
    pub fn remove(&self, id: ComponentId) -> Self {
        Self {
            key: self.key.clone(),
            components: self.components.iter().filter(|c| c.id != id).cloned().collect(),
        }
    }

    /// Assign contiguous orders `0..n` following the current induced order.
    /// Inactive components keep their relative slot.
    #[must_use]
    pub fn renumber(&self) -> Self {
        let mut components = self.components.clone();
        components.sort_by_key(|c| c.order);
        for (index, component) in components.iter_mut().enumerate() {
            component.order = i64::try_from(index).unwrap_or(i64::MAX);
        }
        Self { key: self.key.clone(), components }
    }

    /// `{id, order}` pairs for every component, in induced order.
    #[must_use]
    pub fn reorder_items(&self) -> Vec<ReorderItem> {
        let mut items: Vec<ReorderItem> = self
            .components
            .iter()
            .map(|c| ReorderItem { id: c.id, order: c.order })
            .collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// REST rows for every component, tagged with this page's key.
    #[must_use]
    pub fn to_rows(&self) -> Vec<PageComponentRow> {
        self.components
            .iter()
            .cloned()
            .map(|c| PageComponentRow::from_component(Some(self.key.clone()), c))
            .collect()
    }

    fn map_component(&self, id: ComponentId, apply: impl FnOnce(&mut Component)) -> Self {
        let mut next = self.clone();
        if let Some(component) = next.components.iter_mut().find(|c| c.id == id) {
            apply(component);
        }
        next
    }
}

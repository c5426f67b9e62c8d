//! In-memory page store.
//!
//! Used when `DATABASE_URL` is unset and by the route tests. State lives in a
//! single `tokio::sync::RwLock` so multi-row operations are atomic with
//! respect to each other.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use blocks::rest::{ComponentPatch, NewComponent, PageSummary};
use blocks::{ComponentId, PageComponentRow, ReorderItem};
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{PageStore, StoreError, normalize_data, validate_page_key, validate_reorder, validate_type};

#[derive(Debug, Clone)]
struct StoredComponent {
    page_key: String,
    component_type: String,
    component_order: i64,
    component_data: Value,
    is_active: bool,
}

impl StoredComponent {
    fn to_row(&self, id: ComponentId) -> PageComponentRow {
        PageComponentRow {
            id,
            page_key: Some(self.page_key.clone()),
            component_type: self.component_type.clone(),
            component_order: self.component_order,
            component_data: self.component_data.clone(),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    pages: BTreeSet<String>,
    components: BTreeMap<ComponentId, StoredComponent>,
    next_id: ComponentId,
}

impl Inner {
    fn rows_for(&self, page_key: &str) -> Vec<PageComponentRow> {
        let mut rows: Vec<PageComponentRow> = self
            .components
            .iter()
            .filter(|(_, c)| c.page_key == page_key)
            .map(|(id, c)| c.to_row(*id))
            .collect();
        rows.sort_by_key(|row| (row.component_order, row.id));
        rows
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut StoredComponent, StoreError> {
        self.components
            .get_mut(&id)
            .ok_or(StoreError::ComponentNotFound(id))
    }
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { next_id: 1, ..Inner::default() }) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn create_page(&self, key: &str) -> Result<PageSummary, StoreError> {
        validate_page_key(key)?;
        let mut inner = self.inner.write().await;
        if inner.pages.contains(key) {
            return Err(StoreError::PageExists(key.to_owned()));
        }
        inner.pages.insert(key.to_owned());
        Ok(PageSummary { key: key.to_owned(), component_count: 0 })
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .pages
            .iter()
            .map(|key| {
                let count = inner.components.values().filter(|c| &c.page_key == key).count();
                PageSummary { key: key.clone(), component_count: i64::try_from(count).unwrap_or(i64::MAX) }
            })
            .collect())
    }

    async fn delete_page(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.pages.remove(key) {
            return Err(StoreError::PageNotFound(key.to_owned()));
        }
        inner.components.retain(|_, c| c.page_key != key);
        Ok(())
    }

    async fn list_components(&self, page_key: &str) -> Result<Vec<PageComponentRow>, StoreError> {
        Ok(self.inner.read().await.rows_for(page_key))
    }

    async fn create_component(&self, new: NewComponent) -> Result<PageComponentRow, StoreError> {
        validate_type(&new.component_type)?;
        let component_data = normalize_data(new.component_data)?;
        let mut inner = self.inner.write().await;
        if !inner.pages.contains(&new.page_key) {
            return Err(StoreError::PageNotFound(new.page_key));
        }
        let component_order = match new.component_order {
            Some(order) => order,
            None => inner
                .components
                .values()
                .filter(|c| c.page_key == new.page_key)
                .map(|c| c.component_order)
                .max()
                .map_or(0, |max| max.saturating_add(1)),
        };
        let id = inner.next_id;
        inner.next_id += 1;
        let stored = StoredComponent {
            page_key: new.page_key,
            component_type: new.component_type,
            component_order,
            component_data,
            is_active: new.is_active.unwrap_or(true),
        };
        let row = stored.to_row(id);
        inner.components.insert(id, stored);
        Ok(row)
    }

    async fn update_component(&self, id: ComponentId, patch: ComponentPatch) -> Result<PageComponentRow, StoreError> {
        if let Some(component_type) = &patch.component_type {
            validate_type(component_type)?;
        }
        let data = match patch.component_data {
            Some(data) => Some(normalize_data(Some(data))?),
            None => None,
        };
        let mut inner = self.inner.write().await;
        let stored = inner.component_mut(id)?;
        if let Some(component_type) = patch.component_type {
            stored.component_type = component_type;
        }
        if let Some(data) = data {
            stored.component_data = data;
        }
        if let Some(active) = patch.is_active {
            stored.is_active = active;
        }
        Ok(stored.to_row(id))
    }

    async fn update_order(&self, id: ComponentId, order: i64) -> Result<PageComponentRow, StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner.component_mut(id)?;
        stored.component_order = order;
        Ok(stored.to_row(id))
    }

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .components
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ComponentNotFound(id))
    }

    async fn bulk_reorder(&self, page_key: &str, items: &[ReorderItem]) -> Result<Vec<PageComponentRow>, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.pages.contains(page_key) {
            return Err(StoreError::PageNotFound(page_key.to_owned()));
        }
        let page_ids: Vec<ComponentId> = inner
            .components
            .iter()
            .filter(|(_, c)| c.page_key == page_key)
            .map(|(id, _)| *id)
            .collect();
        validate_reorder(&page_ids, items)?;
        for item in items {
            inner.component_mut(item.id)?.component_order = item.order;
        }
        Ok(inner.rows_for(page_key))
    }
}

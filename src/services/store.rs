//! Persistence contract for pages and their components.
//!
//! DESIGN
//! ======
//! Route handlers talk to a `dyn PageStore` so the same handlers run against
//! Postgres in production and the in-memory store in tests or when no
//! database is configured. Input validation that does not need storage lives
//! here as free functions shared by both implementations.
//!
//! Component rows are always returned ordered by `(component_order, id)`.
//! Persisted ids increase monotonically, so ties keep insertion order.

use async_trait::async_trait;
use blocks::rest::{ComponentPatch, NewComponent, PageSummary, is_valid_page_key};
use blocks::{ComponentId, PageComponentRow, ReorderItem};
use serde_json::Value;

use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    PageNotFound(String),
    #[error("component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("page already exists: {0}")]
    PageExists(String),
    #[error("invalid page key: {0:?}")]
    InvalidPageKey(String),
    #[error("component type must not be empty")]
    EmptyType,
    #[error("component data must be a JSON object")]
    InvalidData,
    #[error("component {0} does not belong to the page")]
    InvalidReorder(ComponentId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PageNotFound(_) => "E_PAGE_NOT_FOUND",
            Self::ComponentNotFound(_) => "E_COMPONENT_NOT_FOUND",
            Self::PageExists(_) => "E_PAGE_EXISTS",
            Self::InvalidPageKey(_) => "E_INVALID_PAGE_KEY",
            Self::EmptyType => "E_INVALID_TYPE",
            Self::InvalidData => "E_INVALID_DATA",
            Self::InvalidReorder(_) => "E_INVALID_REORDER",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Create an empty page.
    async fn create_page(&self, key: &str) -> Result<PageSummary, StoreError>;

    /// All pages, ordered by key.
    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError>;

    /// Delete a page and every component on it.
    async fn delete_page(&self, key: &str) -> Result<(), StoreError>;

    /// Components of a page. An unknown page yields an empty list.
    async fn list_components(&self, page_key: &str) -> Result<Vec<PageComponentRow>, StoreError>;

    /// Insert a component. Order defaults to one past the current maximum.
    async fn create_component(&self, new: NewComponent) -> Result<PageComponentRow, StoreError>;

    /// Apply the present fields of `patch`. `component_data` replaces the
    /// stored payload wholesale.
    async fn update_component(&self, id: ComponentId, patch: ComponentPatch) -> Result<PageComponentRow, StoreError>;

    async fn update_order(&self, id: ComponentId, order: i64) -> Result<PageComponentRow, StoreError>;

    async fn delete_component(&self, id: ComponentId) -> Result<(), StoreError>;

    /// Set several orders at once. Either every item applies or none does.
    async fn bulk_reorder(&self, page_key: &str, items: &[ReorderItem]) -> Result<Vec<PageComponentRow>, StoreError>;
}

// =============================================================================
// VALIDATION
// =============================================================================

pub(crate) fn validate_page_key(key: &str) -> Result<(), StoreError> {
    if is_valid_page_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidPageKey(key.to_owned()))
    }
}

pub(crate) fn validate_type(component_type: &str) -> Result<(), StoreError> {
    if component_type.trim().is_empty() {
        return Err(StoreError::EmptyType);
    }
    Ok(())
}

/// Missing data becomes `{}`; anything other than an object is rejected.
pub(crate) fn normalize_data(data: Option<Value>) -> Result<Value, StoreError> {
    match data {
        None | Some(Value::Null) => Ok(Value::Object(serde_json::Map::new())),
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err(StoreError::InvalidData),
    }
}

/// Check every reorder item against the ids present on the page.
pub(crate) fn validate_reorder(page_ids: &[ComponentId], items: &[ReorderItem]) -> Result<(), StoreError> {
    match items.iter().find(|item| !page_ids.contains(&item.id)) {
        Some(item) => Err(StoreError::InvalidReorder(item.id)),
        None => Ok(()),
    }
}

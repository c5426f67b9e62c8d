//! REST bodies and endpoint paths shared by the server, the UI, and the CLI.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{ComponentId, ReorderItem};

/// Longest accepted page key.
pub const MAX_PAGE_KEY_LEN: usize = 64;

/// Whether `key` is a usable page key: 1-64 chars of `[a-z0-9_-]`.
///
/// Keys travel unescaped in URL paths, so the alphabet is restricted.
#[must_use]
pub fn is_valid_page_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_PAGE_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

#[must_use]
pub fn page_components_path(page_key: &str) -> String {
    format!("/page-components/page/{page_key}")
}

#[must_use]
pub fn component_path(id: ComponentId) -> String {
    format!("/page-components/{id}")
}

#[must_use]
pub fn component_order_path(id: ComponentId) -> String {
    format!("/page-components/{id}/order")
}

pub const COMPONENTS_PATH: &str = "/page-components";
pub const BULK_REORDER_PATH: &str = "/page-components/reorder";
pub const PAGES_PATH: &str = "/pages";

#[must_use]
pub fn page_path(page_key: &str) -> String {
    format!("/pages/{page_key}")
}

/// UI route of the preview surface for a page.
#[must_use]
pub fn preview_route(page_key: &str, live: bool) -> String {
    if live {
        format!("/app/preview/{page_key}?live=1")
    } else {
        format!("/app/preview/{page_key}")
    }
}

/// UI route of the builder surface for a page.
#[must_use]
pub fn builder_route(page_key: &str) -> String {
    format!("/app/pages/{page_key}/builder")
}

/// `POST /pages`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
    pub key: String,
}

/// Item of `GET /pages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub key: String,
    #[serde(default)]
    pub component_count: i64,
}

/// `POST /page-components`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewComponent {
    pub page_key: String,
    pub component_type: String,
    /// Defaults to after the last component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// `PATCH /page-components/{id}`. Absent fields are left unchanged;
/// `component_data` replaces the stored payload wholesale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ComponentPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.component_type.is_none() && self.component_data.is_none() && self.is_active.is_none()
    }
}

/// `PATCH /page-components/{id}/order`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order: i64,
}

/// `POST /page-components/reorder`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReorder {
    pub page_key: String,
    pub items: Vec<ReorderItem>,
}

/// JSON error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

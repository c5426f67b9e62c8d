//! REST API helpers for the page persistence endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning empty/error values.
//!
//! ERROR HANDLING
//! ==============
//! The component list fetch fails open: any failure yields an empty list so
//! the preview still renders. Mutations return `Result<_, String>` with a
//! message suitable for a toast.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "hydrate"))]
use blocks::rest::ErrorBody;
#[cfg(feature = "hydrate")]
use blocks::rest::NewPage;
use blocks::rest::{BulkReorder, ComponentPatch, NewComponent, PageSummary};
use blocks::{ComponentId, PageComponentRow};

/// Toast text for a failed request: the server's error message when the body
/// is a JSON error, else the status code.
#[cfg(any(test, feature = "hydrate"))]
fn failure_message(action: &str, status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => format!("{action} failed: {}", err.message),
        Err(_) => format!("{action} failed: {status}"),
    }
}

#[cfg(feature = "hydrate")]
async fn read_failure(action: &str, resp: gloo_net::http::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    failure_message(action, status, &body)
}

/// Fetch the persisted rows of a page. Never fails; errors yield `[]`.
pub async fn fetch_page_components(page_key: &str) -> Vec<PageComponentRow> {
    #[cfg(feature = "hydrate")]
    {
        let url = blocks::rest::page_components_path(page_key);
        let resp = match gloo_net::http::Request::get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("fetch {url} failed: {e}");
                return Vec::new();
            }
        };
        if !resp.ok() {
            log::warn!("fetch {url} returned {}", resp.status());
            return Vec::new();
        }
        resp.json::<Vec<PageComponentRow>>().await.unwrap_or_else(|e| {
            log::warn!("fetch {url} returned malformed rows: {e}");
            Vec::new()
        })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = page_key;
        Vec::new()
    }
}

/// List pages. `None` on any failure.
pub async fn fetch_pages() -> Option<Vec<PageSummary>> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(blocks::rest::PAGES_PATH)
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Vec<PageSummary>>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// # Errors
///
/// Returns a display message if the request fails or the key is taken.
pub async fn create_page(key: &str) -> Result<PageSummary, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(blocks::rest::PAGES_PATH)
            .json(&NewPage { key: key.to_owned() })
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("create page", resp).await);
        }
        resp.json::<PageSummary>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns a display message if the request fails.
pub async fn create_component(body: &NewComponent) -> Result<PageComponentRow, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(blocks::rest::COMPONENTS_PATH)
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("add component", resp).await);
        }
        resp.json::<PageComponentRow>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns a display message if the request fails.
pub async fn update_component(id: ComponentId, patch: &ComponentPatch) -> Result<PageComponentRow, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = blocks::rest::component_path(id);
        let resp = gloo_net::http::Request::patch(&url)
            .json(patch)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("save component", resp).await);
        }
        resp.json::<PageComponentRow>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (id, patch);
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns a display message if the request fails.
pub async fn delete_component(id: ComponentId) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let url = blocks::rest::component_path(id);
        let resp = gloo_net::http::Request::delete(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("delete component", resp).await);
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err("not available on server".to_owned())
    }
}

/// # Errors
///
/// Returns a display message if the request fails or an id is foreign.
pub async fn bulk_reorder(body: &BulkReorder) -> Result<Vec<PageComponentRow>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(blocks::rest::BULK_REORDER_PATH)
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure("reorder", resp).await);
        }
        resp.json::<Vec<PageComponentRow>>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err("not available on server".to_owned())
    }
}

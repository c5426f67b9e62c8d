//! Page component routes.
//!
//! Bodies and paths are the shared shapes from `blocks::rest`, so the UI and
//! the CLI serialize exactly what these handlers accept.

#[cfg(test)]
#[path = "components_test.rs"]
mod components_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use blocks::rest::{BulkReorder, ComponentPatch, NewComponent, OrderUpdate};
use blocks::{ComponentId, PageComponentRow};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /page-components/page/{page_key}`: components of a page, in order.
pub async fn list_components(
    State(state): State<AppState>,
    Path(page_key): Path<String>,
) -> Result<Json<Vec<PageComponentRow>>, ApiError> {
    Ok(Json(state.store.list_components(&page_key).await?))
}

/// `POST /page-components`: add a component to a page.
pub async fn create_component(
    State(state): State<AppState>,
    Json(body): Json<NewComponent>,
) -> Result<(StatusCode, Json<PageComponentRow>), ApiError> {
    let row = state.store.create_component(body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /page-components/{id}`: update type, data, or active flag.
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
    Json(body): Json<ComponentPatch>,
) -> Result<Json<PageComponentRow>, ApiError> {
    Ok(Json(state.store.update_component(id, body).await?))
}

/// `PATCH /page-components/{id}/order`: move one component.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
    Json(body): Json<OrderUpdate>,
) -> Result<Json<PageComponentRow>, ApiError> {
    Ok(Json(state.store.update_order(id, body.order).await?))
}

/// `DELETE /page-components/{id}`
pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_component(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /page-components/reorder`: set several orders in one call.
pub async fn bulk_reorder(
    State(state): State<AppState>,
    Json(body): Json<BulkReorder>,
) -> Result<Json<Vec<PageComponentRow>>, ApiError> {
    Ok(Json(state.store.bulk_reorder(&body.page_key, &body.items).await?))
}

//! Page routes.

#[cfg(test)]
#[path = "pages_test.rs"]
mod pages_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use blocks::rest::{NewPage, PageSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /pages`: create an empty page.
pub async fn create_page(
    State(state): State<AppState>,
    Json(body): Json<NewPage>,
) -> Result<(StatusCode, Json<PageSummary>), ApiError> {
    let page = state.store.create_page(&body.key).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// `GET /pages`: list pages with their component counts.
pub async fn list_pages(State(state): State<AppState>) -> Result<Json<Vec<PageSummary>>, ApiError> {
    Ok(Json(state.store.list_pages().await?))
}

/// `DELETE /pages/{key}`: delete a page and its components.
pub async fn delete_page(State(state): State<AppState>, Path(key): Path<String>) -> Result<StatusCode, ApiError> {
    state.store.delete_page(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

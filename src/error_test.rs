use super::*;
use axum::body::to_bytes;

#[test]
fn store_error_to_status_maps_not_found() {
    assert_eq!(store_error_to_status(&StoreError::PageNotFound("home".into())), StatusCode::NOT_FOUND);
    assert_eq!(store_error_to_status(&StoreError::ComponentNotFound(3)), StatusCode::NOT_FOUND);
}

#[test]
fn store_error_to_status_maps_conflict_and_bad_request() {
    assert_eq!(store_error_to_status(&StoreError::PageExists("home".into())), StatusCode::CONFLICT);
    assert_eq!(store_error_to_status(&StoreError::InvalidReorder(9)), StatusCode::BAD_REQUEST);
    assert_eq!(store_error_to_status(&StoreError::InvalidData), StatusCode::BAD_REQUEST);
    assert_eq!(store_error_to_status(&StoreError::EmptyType), StatusCode::BAD_REQUEST);
    assert_eq!(store_error_to_status(&StoreError::InvalidPageKey("A B".into())), StatusCode::BAD_REQUEST);
}

#[test]
fn store_error_to_status_maps_database() {
    let err = StoreError::Database(sqlx::Error::PoolTimedOut);
    assert_eq!(store_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.retryable());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(StoreError::PageNotFound(String::new()).error_code(), "E_PAGE_NOT_FOUND");
    assert_eq!(StoreError::ComponentNotFound(1).error_code(), "E_COMPONENT_NOT_FOUND");
    assert_eq!(StoreError::PageExists(String::new()).error_code(), "E_PAGE_EXISTS");
    assert_eq!(StoreError::InvalidReorder(1).error_code(), "E_INVALID_REORDER");
    assert_eq!(StoreError::Database(sqlx::Error::PoolClosed).error_code(), "E_DATABASE");
    assert!(!StoreError::PageExists(String::new()).retryable());
}

#[tokio::test]
async fn api_error_renders_json_body() {
    let response = ApiError::from(StoreError::ComponentNotFound(7)).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.code, "E_COMPONENT_NOT_FOUND");
    assert_eq!(body.message, "component not found: 7");
}

#[tokio::test]
async fn database_errors_hide_details() {
    let response = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).into_response();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.code, "E_DATABASE");
    assert_eq!(body.message, "internal error");
}

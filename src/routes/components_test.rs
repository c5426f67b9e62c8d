use super::*;
use blocks::ReorderItem;
use serde_json::json;

use crate::state::test_helpers;

fn hero(page_key: &str) -> NewComponent {
    NewComponent {
        page_key: page_key.into(),
        component_type: "hero".into(),
        component_order: None,
        component_data: Some(json!({"title": "A"})),
        is_active: None,
    }
}

async fn create(state: &AppState, body: NewComponent) -> PageComponentRow {
    let (status, Json(row)) = create_component(State(state.clone()), Json(body)).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    row
}

#[tokio::test]
async fn create_then_list() {
    let state = test_helpers::test_app_state_with_pages(&["home"]).await;
    let row = create(&state, hero("home")).await;

    let Json(rows) = list_components(State(state), Path("home".into())).await.unwrap();
    assert_eq!(rows, vec![row]);
}

#[tokio::test]
async fn list_unknown_page_is_empty() {
    let state = test_helpers::test_app_state();
    let Json(rows) = list_components(State(state), Path("ghost".into())).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn create_on_unknown_page_is_not_found() {
    let state = test_helpers::test_app_state();
    let err = create_component(State(state), Json(hero("ghost"))).await.unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.code, "E_PAGE_NOT_FOUND");
}

#[tokio::test]
async fn patch_replaces_data() {
    let state = test_helpers::test_app_state_with_pages(&["home"]).await;
    let row = create(&state, hero("home")).await;
    let patch = ComponentPatch { component_data: Some(json!({"subtitle": "S"})), ..ComponentPatch::default() };

    let Json(updated) = update_component(State(state), Path(row.id), Json(patch)).await.unwrap();
    assert_eq!(updated.component_data, json!({"subtitle": "S"}));
}

#[tokio::test]
async fn patch_order_and_delete() {
    let state = test_helpers::test_app_state_with_pages(&["home"]).await;
    let row = create(&state, hero("home")).await;

    let Json(moved) = update_order(State(state.clone()), Path(row.id), Json(OrderUpdate { order: 7 }))
        .await
        .unwrap();
    assert_eq!(moved.component_order, 7);

    let status = delete_component(State(state.clone()), Path(row.id)).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = delete_component(State(state), Path(row.id)).await.unwrap_err();
    assert_eq!(err.code, "E_COMPONENT_NOT_FOUND");
}

#[tokio::test]
async fn bulk_reorder_returns_sorted_rows() {
    let state = test_helpers::test_app_state_with_pages(&["home"]).await;
    let a = create(&state, hero("home")).await;
    let b = create(&state, hero("home")).await;
    let body = BulkReorder {
        page_key: "home".into(),
        items: vec![ReorderItem { id: a.id, order: 1 }, ReorderItem { id: b.id, order: 0 }],
    };

    let Json(rows) = bulk_reorder(State(state), Json(body)).await.unwrap();
    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b.id, a.id]);
}

#[tokio::test]
async fn bulk_reorder_rejects_unknown_ids() {
    let state = test_helpers::test_app_state_with_pages(&["home"]).await;
    create(&state, hero("home")).await;
    let body = BulkReorder { page_key: "home".into(), items: vec![ReorderItem { id: 404, order: 0 }] };

    let err = bulk_reorder(State(state), Json(body)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_INVALID_REORDER");
}

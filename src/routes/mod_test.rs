use super::*;
use blocks::rest::{ErrorBody, NewComponent, NewPage, PageSummary, page_components_path};
use blocks::{Page, PageComponentRow};
use serde_json::json;

use crate::state::test_helpers;

async fn spawn_api() -> String {
    let app = api_routes(test_helpers::test_app_state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn_api().await;
    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn page_and_component_flow_over_http() {
    let base = spawn_api().await;
    let http = reqwest::Client::new();

    let created = http
        .post(format!("{base}{PAGES_PATH}"))
        .json(&NewPage { key: "home".into() })
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);

    for component_type in ["hero", "missing-type"] {
        let response = http
            .post(format!("{base}{COMPONENTS_PATH}"))
            .json(&NewComponent {
                page_key: "home".into(),
                component_type: component_type.into(),
                component_order: None,
                component_data: Some(json!({"title": "A"})),
                is_active: None,
            })
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    let rows: Vec<PageComponentRow> = http
        .get(format!("{base}{}", page_components_path("home")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let page = Page::from_rows("home", rows);
    let types: Vec<&str> = page.components.iter().map(|c| c.component_type.as_str()).collect();
    assert_eq!(types, vec!["hero", "missing-type"]);

    let pages: Vec<PageSummary> = http.get(format!("{base}{PAGES_PATH}")).send().await.unwrap().json().await.unwrap();
    assert_eq!(pages, vec![PageSummary { key: "home".into(), component_count: 2 }]);
}

#[tokio::test]
async fn errors_carry_json_body() {
    let base = spawn_api().await;
    let response = reqwest::Client::new()
        .delete(format!("{base}/page-components/12"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.code, "E_COMPONENT_NOT_FOUND");
}

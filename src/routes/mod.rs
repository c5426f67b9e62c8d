//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The persistence API is served at the root (`/pages`, `/page-components`)
//! and the Leptos UI lives under `/app`. Builder and preview share this
//! origin, which the preview protocol relies on.

pub mod components;
pub mod pages;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::{delete, get, patch, post};
use blocks::rest::{BULK_REORDER_PATH, COMPONENTS_PATH, PAGES_PATH};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Persistence API routes.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(PAGES_PATH, get(pages::list_pages).post(pages::create_page))
        .route("/pages/{key}", delete(pages::delete_page))
        .route(COMPONENTS_PATH, post(components::create_component))
        .route(BULK_REORDER_PATH, post(components::bulk_reorder))
        .route("/page-components/page/{page_key}", get(components::list_components))
        .route(
            "/page-components/{id}",
            patch(components::update_component).delete(components::delete_component),
        )
        .route("/page-components/{id}/order", patch(components::update_order))
        .route("/healthz", get(healthz))
        .route("/", get(redirect_root_to_app))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_root_to_app() -> Redirect {
    Redirect::temporary("/app/pages")
}

/// API routes + Leptos SSR under `/app` + compiled assets under `/pkg`.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `Cargo.toml` `[package.metadata.leptos]` section).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

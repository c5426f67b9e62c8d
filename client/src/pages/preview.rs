//! Preview surface: renders a page's components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Opened two ways. With `?live=1` it runs inside the builder's iframe and
//! shows whatever snapshot the builder last posted. Without it, it fetches
//! the persisted rows once and lays an optional `?draft=` token over them,
//! which is how a share link shows unsaved edits.

use leptos::prelude::*;
use leptos_router::hooks::{use_params_map, use_query_map};

use crate::components::block_view::BlockView;
use crate::net::{api, bridge};
use crate::state::preview::{PreviewMode, PreviewSession, PreviewView};

#[component]
pub fn PreviewPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let page_key = params.with_untracked(|p| p.get("key")).unwrap_or_default();
    let mode = query.with_untracked(|q| PreviewMode::from_query(q.get_str("live"), q.get_str("draft")));
    let origin = bridge::current_origin().unwrap_or_default();
    let session = RwSignal::new(PreviewSession::new(page_key.clone(), mode, origin.clone()));

    // Static mode: one fetch of the persisted rows.
    Effect::new(move || {
        if !session.with_untracked(PreviewSession::needs_fetch) {
            return;
        }
        let key = page_key.clone();
        leptos::task::spawn_local(async move {
            let rows = api::fetch_page_components(&key).await;
            if let Some(Some(err)) = session.try_update(|s| s.on_fetched(rows)) {
                #[cfg(feature = "hydrate")]
                log::warn!("ignoring draft for {key}: {err}");
                #[cfg(not(feature = "hydrate"))]
                let _ = err;
            }
        });
    });

    // Live mode: listen first, then tell the builder we are ready.
    bridge::use_message_listener(move |from, payload| {
        let delivery = session.try_update_untracked(|s| s.on_message(&from, &payload));
        if matches!(delivery, Some(blocks::Delivery::Applied)) {
            session.notify();
        }
    });
    Effect::new(move || {
        if let Some(ready) = session.with_untracked(PreviewSession::announcement) {
            bridge::post_to_parent(&origin, &ready);
        }
    });

    view! {
        <main class="preview-surface">
            {move || match session.with(PreviewSession::view) {
                PreviewView::Loading => view! { <p class="preview-surface__loading">"Loading preview…"</p> }.into_any(),
                PreviewView::Blocks(blocks) if blocks.is_empty() => {
                    view! { <p class="preview-surface__empty">"This page has no visible components."</p> }.into_any()
                }
                PreviewView::Blocks(blocks) => blocks
                    .into_iter()
                    .map(|rendered| view! { <BlockView rendered=rendered/> })
                    .collect_view()
                    .into_any(),
            }}
        </main>
    }
}

//! Builder surface: component sidebar plus a live preview iframe.
//!
//! ARCHITECTURE
//! ============
//! One `RwSignal<EditorSession>` holds the page, pending edits, and the
//! preview sender. Every session mutation that changes the effective list
//! yields a `PREVIEW_INIT`, which [`apply`] posts to the iframe.
//!
//! - Data edits stay local (overlay) until Save.
//! - Add, toggle, delete, and reorder go to the server first; the returned
//!   rows are applied.
//! - Save PATCHes every pending edit and adopts the returned rows, dropping
//!   the saved edits in the same update. Edits typed while the save is in
//!   flight stay pending.
//!
//! ERROR HANDLING
//! ==============
//! Request failures become error toasts. A failed save keeps the pending
//! edits so it can be retried.

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

use blocks::rest::{self, ComponentPatch};
use blocks::{ComponentData, ComponentId, PreviewMessage};
use leptos::html::Iframe;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use serde_json::Value;

use crate::components::component_editor::ComponentEditor;
use crate::net::{api, bridge};
use crate::registry::ComponentKind;
use crate::state::editor::EditorSession;
use crate::state::notify::{AppContext, Notifier};

/// Absolute static preview URL used as the base of share links.
#[must_use]
pub fn share_base(origin: &str, page_key: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), rest::preview_route(page_key, false))
}

/// Button label for the save action.
#[must_use]
pub fn save_label(pending: usize, saving: bool) -> String {
    match (saving, pending) {
        (true, _) => "Saving…".to_owned(),
        (false, 0) => "Saved".to_owned(),
        (false, 1) => "Save 1 change".to_owned(),
        (false, n) => format!("Save {n} changes"),
    }
}

fn post(frame: NodeRef<Iframe>, message: &PreviewMessage) {
    #[cfg(feature = "hydrate")]
    {
        let (Some(frame), Some(origin)) = (frame.get_untracked(), bridge::current_origin()) else {
            return;
        };
        bridge::post_to_frame(&frame, &origin, message);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (frame, message);
    }
}

/// Run a session mutation and post the snapshot it produced, if any.
fn apply(
    session: RwSignal<EditorSession>,
    frame: NodeRef<Iframe>,
    mutate: impl FnOnce(&mut EditorSession) -> Option<PreviewMessage>,
) {
    if let Some(Some(message)) = session.try_update(mutate) {
        post(frame, &message);
    }
}

async fn save(session: RwSignal<EditorSession>, frame: NodeRef<Iframe>, notifier: Notifier) {
    let Some(Some(patches)) = session.try_update(EditorSession::begin_save) else {
        return;
    };
    notifier.begin_loading();
    let mut stored = Vec::with_capacity(patches.len());
    for (id, patch) in &patches {
        match api::update_component(*id, patch).await {
            Ok(row) => stored.push(row),
            Err(message) => {
                session.update(EditorSession::abort_save);
                notifier.end_loading();
                notifier.error(message);
                return;
            }
        }
    }
    apply(session, frame, |s| Some(s.commit_persisted(stored)));
    notifier.end_loading();
    notifier.success(format!("saved {} component(s)", patches.len()));
}

#[component]
pub fn BuilderPage() -> impl IntoView {
    let notifier = expect_context::<AppContext>().notifier;
    let params = use_params_map();
    let page_key = params.with_untracked(|p| p.get("key")).unwrap_or_default();
    let origin = bridge::current_origin().unwrap_or_default();
    let session = RwSignal::new(EditorSession::new(page_key.clone(), origin.clone()));
    let frame = NodeRef::<Iframe>::new();
    let add_type = RwSignal::new(ComponentKind::ALL[0].tag().to_owned());
    let share_link = RwSignal::new(None::<String>);

    let fetch_key = page_key.clone();
    Effect::new(move || {
        let key = fetch_key.clone();
        leptos::task::spawn_local(async move {
            notifier.begin_loading();
            let rows = api::fetch_page_components(&key).await;
            apply(session, frame, |s| Some(s.load(rows)));
            notifier.end_loading();
        });
    });

    // The preview asks for the latest snapshot once its listener is up.
    bridge::use_message_listener(move |from, payload| {
        if let Some(Some(message)) = session.try_update_untracked(|s| s.on_message(&from, &payload)) {
            post(frame, &message);
        }
    });

    let on_select = Callback::new(move |id: ComponentId| {
        session.update(|s| s.selected = if s.selected == Some(id) { None } else { Some(id) });
    });
    let on_field = Callback::new(move |(id, key, value): (ComponentId, String, Value)| {
        apply(session, frame, |s| s.set_field(id, &key, value));
    });
    let on_replace = Callback::new(move |(id, data): (ComponentId, ComponentData)| {
        apply(session, frame, |s| s.edit(id, data));
    });
    let on_toggle = Callback::new(move |(id, active): (ComponentId, bool)| {
        leptos::task::spawn_local(async move {
            let patch = ComponentPatch { is_active: Some(active), ..ComponentPatch::default() };
            match api::update_component(id, &patch).await {
                Ok(row) => apply(session, frame, |s| Some(s.apply_saved(row))),
                Err(message) => notifier.error(message),
            }
        });
    });
    let on_move = Callback::new(move |(id, delta): (ComponentId, i64)| {
        let Some(body) = session.with_untracked(|s| s.move_request(id, delta)) else {
            return;
        };
        leptos::task::spawn_local(async move {
            match api::bulk_reorder(&body).await {
                Ok(rows) => apply(session, frame, |s| Some(s.apply_reorder(rows))),
                Err(message) => notifier.error(message),
            }
        });
    });
    let on_delete = Callback::new(move |id: ComponentId| {
        leptos::task::spawn_local(async move {
            match api::delete_component(id).await {
                Ok(()) => apply(session, frame, |s| Some(s.apply_removed(id))),
                Err(message) => notifier.error(message),
            }
        });
    });

    let on_add = move |_| {
        let body = session.with_untracked(|s| s.new_component(&add_type.get_untracked()));
        leptos::task::spawn_local(async move {
            match api::create_component(&body).await {
                Ok(row) => {
                    let id = row.id;
                    apply(session, frame, |s| {
                        let message = s.apply_saved(row);
                        s.selected = Some(id);
                        Some(message)
                    });
                }
                Err(message) => notifier.error(message),
            }
        });
    };
    let on_save = move |_| leptos::task::spawn_local(save(session, frame, notifier));
    let on_discard = move |_| apply(session, frame, |s| Some(s.discard()));
    let share_origin = origin.clone();
    let on_share = move |_| {
        let link = session.with_untracked(|s| s.share_link(&share_base(&share_origin, &s.page().key)));
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.navigator().clipboard().write_text(&link);
            }
        }
        share_link.set(Some(link));
        notifier.info("share link copied");
    };

    let preview_src = rest::preview_route(&page_key, true);

    view! {
        <div class="builder">
            <aside class="builder__sidebar">
                <header class="builder__header">
                    <a href="/app/pages" class="builder__back">"← Pages"</a>
                    <h1><code>{page_key.clone()}</code></h1>
                </header>
                <div class="builder__actions">
                    <button
                        class="btn btn--primary"
                        disabled=move || session.with(|s| s.saving || !s.is_dirty())
                        on:click=on_save
                    >
                        {move || session.with(|s| save_label(s.pending_saves().len(), s.saving))}
                    </button>
                    <button class="btn" disabled=move || session.with(|s| !s.is_dirty()) on:click=on_discard>
                        "Discard"
                    </button>
                    <button class="btn" on:click=on_share>"Share draft"</button>
                </div>
                {move || share_link.get().map(|link| view! { <input class="builder__share" readonly prop:value=link/> })}
                <Show
                    when=move || session.with(|s| s.loaded)
                    fallback=|| view! { <p class="builder__loading">"Loading…"</p> }
                >
                    <div class="builder__outline">
                        <For
                            each=move || {
                                session.with(|s| {
                                    s.outline()
                                        .into_iter()
                                        .map(|c| (s.selected == Some(c.id), s.revision, c))
                                        .collect::<Vec<_>>()
                                })
                            }
                            key=|(selected, revision, c)| (c.id, *selected, *revision)
                            children=move |(selected, _, component)| {
                                view! {
                                    <ComponentEditor
                                        component=component
                                        selected=selected
                                        on_select=on_select
                                        on_field=on_field
                                        on_replace=on_replace
                                        on_toggle=on_toggle
                                        on_move=on_move
                                        on_delete=on_delete
                                    />
                                }
                            }
                        />
                    </div>
                </Show>
                <div class="builder__add">
                    <select on:change=move |ev| add_type.set(event_target_value(&ev))>
                        {ComponentKind::ALL
                            .iter()
                            .map(|kind| view! { <option value=kind.tag()>{kind.label()}</option> })
                            .collect_view()}
                    </select>
                    <button class="btn" on:click=on_add>"Add component"</button>
                </div>
            </aside>
            <iframe class="builder__preview" title="Preview" node_ref=frame src=preview_src></iframe>
        </div>
    }
}

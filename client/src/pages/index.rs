//! Page index: lists pages and creates new ones.
//!
//! SYSTEM CONTEXT
//! ==============
//! Landing route of the UI. Creating a page navigates straight to its
//! builder.

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;

use blocks::rest::{self, PageSummary};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::api;
use crate::state::notify::AppContext;

/// Normalize the "new page" input. Keys are lowercase; surrounding
/// whitespace is dropped.
///
/// # Errors
///
/// Returns a message for the form when the key is unusable.
pub fn parse_new_key(raw: &str) -> Result<String, &'static str> {
    let key = raw.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err("enter a page key");
    }
    if rest::is_valid_page_key(&key) {
        Ok(key)
    } else {
        Err("use up to 64 letters, digits, '-' or '_'")
    }
}

#[component]
pub fn PagesIndex() -> impl IntoView {
    let notifier = expect_context::<AppContext>().notifier;
    let navigate = use_navigate();
    let pages = RwSignal::new(None::<Vec<PageSummary>>);
    let new_key = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<&'static str>);

    Effect::new(move || {
        leptos::task::spawn_local(async move {
            notifier.begin_loading();
            match api::fetch_pages().await {
                Some(list) => pages.set(Some(list)),
                None => {
                    pages.set(Some(Vec::new()));
                    notifier.error("could not load pages");
                }
            }
            notifier.end_loading();
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let key = match parse_new_key(&new_key.get_untracked()) {
            Ok(key) => key,
            Err(message) => {
                form_error.set(Some(message));
                return;
            }
        };
        form_error.set(None);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::create_page(&key).await {
                Ok(created) => {
                    notifier.success(format!("created {}", created.key));
                    navigate(&rest::builder_route(&created.key), NavigateOptions::default());
                }
                Err(message) => notifier.error(message),
            }
        });
    };

    view! {
        <div class="pages-index">
            <header class="pages-index__header">
                <h1>"Pages"</h1>
                <form class="pages-index__create" on:submit=on_submit>
                    <input
                        type="text"
                        placeholder="new-page-key"
                        prop:value=move || new_key.get()
                        on:input=move |ev| new_key.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn--primary">"Create"</button>
                </form>
                {move || form_error.get().map(|e| view! { <p class="field__error">{e}</p> })}
            </header>
            {move || match pages.get() {
                None => view! { <p class="pages-index__loading">"Loading…"</p> }.into_any(),
                Some(list) if list.is_empty() => view! { <p class="pages-index__empty">"No pages yet."</p> }.into_any(),
                Some(list) => view! {
                    <table class="pages-index__table">
                        <thead>
                            <tr>
                                <th>"Key"</th>
                                <th>"Components"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list
                                .into_iter()
                                .map(|page| {
                                    view! {
                                        <tr>
                                            <td><code>{page.key.clone()}</code></td>
                                            <td>{page.component_count}</td>
                                            <td class="pages-index__links">
                                                <a href=rest::builder_route(&page.key)>"Edit"</a>
                                                <a href=rest::preview_route(&page.key, false) target="_blank">"Preview"</a>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                .into_any(),
            }}
        </div>
    }
}

//! Toasts and the busy indicator, fed by the root `AppContext`.

use leptos::prelude::*;

use crate::state::notify::AppContext;

#[component]
pub fn ToastStack() -> impl IntoView {
    let notifier = expect_context::<AppContext>().notifier;
    let state = notifier.state();

    view! {
        <Show when=move || state.get().is_loading()>
            <div class="busy-indicator" aria-live="polite">"Working…"</div>
        </Show>
        <div class="toast-stack">
            <For
                each=move || state.get().toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() role="status">
                            <span>{toast.message}</span>
                            <button class="toast__close" on:click=move |_| notifier.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

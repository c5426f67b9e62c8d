//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::toast_stack::ToastStack;
use crate::pages::{builder::BuilderPage, index::PagesIndex, preview::PreviewPage};
use crate::state::notify::AppContext;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the notification context and sets up client-side routing for the
/// page index, the builder, and the preview surface.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(AppContext::default());

    view! {
        <Stylesheet id="leptos" href="/pkg/livepage.css"/>
        <Title text="Livepage"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=(StaticSegment("app"), StaticSegment("pages")) view=PagesIndex/>
                <Route
                    path=(StaticSegment("app"), StaticSegment("pages"), ParamSegment("key"), StaticSegment("builder"))
                    view=BuilderPage
                />
                <Route path=(StaticSegment("app"), StaticSegment("preview"), ParamSegment("key")) view=PreviewPage/>
            </Routes>
        </Router>
        <ToastStack/>
    }
}

//! Root application component with routing, context providers, and the
//! session-core wiring.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::change_client::spawn_change_feed;
use crate::pages::{admin::AdminPage, book::BookPage, catalog::CatalogPage, sign_in::SignInPage};
use crate::state::{auth::AuthState, books::BooksState, ui::UiState};

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
/// Provides all shared state contexts, starts the change feed, wires the
/// session core (bootstrap + both listeners), and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Reactive state contexts for all child components.
    let auth = RwSignal::new(AuthState::default());
    let books = RwSignal::new(BooksState::default());
    let ui = RwSignal::new(UiState::default());

    provide_context(auth);
    provide_context(books);
    provide_context(ui);

    let feed = spawn_change_feed();
    provide_context(feed.clone());

    // Session core: one-shot bootstrap plus the two lifetime listeners.
    #[cfg(feature = "hydrate")]
    {
        crate::session::bootstrap::spawn_bootstrap(auth, ui);
        crate::session::events::install(auth, &feed);
        crate::session::profile_sync::install(auth, feed);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &feed;
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/stacks.css"/>
        <Title text="Stacks"/>

        <Router>
            <RouteGuard/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("auth") view=SignInPage/>
                <Route path=StaticSegment("") view=CatalogPage/>
                <Route path=(StaticSegment("book"), ParamSegment("id")) view=BookPage/>
                <Route path=StaticSegment("admin") view=AdminPage/>
            </Routes>
        </Router>
    }
}

/// Installs the navigation guard inside the router context.
#[component]
fn RouteGuard() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    crate::util::auth::install_route_guard(auth);
}

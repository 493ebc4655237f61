//! Admin page: user approval queue and admin-membership management.
//!
//! SYSTEM CONTEXT
//! ==============
//! The directory refreshes live from the unfiltered `profiles` change
//! stream, so two admins working the queue see each other's decisions.
//! Server-side authorization is the real gate; the UI check here only
//! avoids rendering a dead-end page.

use leptos::prelude::*;

use crate::net::change_client::ChangeFeedHandle;
use crate::net::types::DirectoryUser;
use crate::state::auth::AuthState;

const PROFILES_TABLE: &str = "profiles";

#[cfg(feature = "hydrate")]
fn refresh_directory(users: RwSignal<Vec<DirectoryUser>>, info: RwSignal<String>) {
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_user_directory().await {
            Ok(listing) => users.set(listing),
            Err(e) => info.set(format!("Directory load failed: {e}")),
        }
    });
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let feed = expect_context::<ChangeFeedHandle>();

    let users = RwSignal::new(Vec::<DirectoryUser>::new());
    let info = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let requested = RwSignal::new(false);
        Effect::new(move || {
            if requested.get() {
                return;
            }
            if !auth.with(|a| a.is_ready() && a.is_admin) {
                return;
            }
            refresh_directory(users, info);
            requested.set(true);
        });

        let channel = feed.subscribe(PROFILES_TABLE, None, move |_event| {
            refresh_directory(users, info);
        });
        let feed_cleanup = feed.clone();
        on_cleanup(move || feed_cleanup.unsubscribe(&channel));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &feed;
    }

    let on_set_approval = move |user_id: String, approved: bool| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::set_user_approval(&user_id, approved).await {
                info.set(format!("Approval update failed: {e}"));
            } else {
                refresh_directory(users, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (user_id, approved);
    };

    let on_set_admin = move |user_id: String, is_admin: bool| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::set_admin_membership(&user_id, is_admin).await {
                info.set(format!("Admin update failed: {e}"));
            } else {
                refresh_directory(users, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (user_id, is_admin);
    };

    let not_admin = move || auth.with(|a| a.is_ready() && !a.is_admin);

    view! {
        <div class="admin-page">
            <a class="admin-page__back" href="/">"← Back to the shelf"</a>
            <h1>"User administration"</h1>

            <Show when=not_admin>
                <p class="admin-page__denied">"Admins only."</p>
            </Show>

            <Show when=move || !info.get().is_empty()>
                <p class="admin-page__info" role="alert">{move || info.get()}</p>
            </Show>

            <Show when=move || auth.with(|a| a.is_admin)>
                <table class="admin-table">
                    <thead>
                        <tr>
                            <th>"Email"</th>
                            <th>"Name"</th>
                            <th>"Approved"</th>
                            <th>"Admin"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || users.get()
                            key=|user| user.user_id.clone()
                            children=move |user| {
                                let approve_id = user.user_id.clone();
                                let admin_id = user.user_id.clone();
                                let is_approved = user.is_approved;
                                let is_admin = user.is_admin;
                                view! {
                                    <tr>
                                        <td>{user.email.clone()}</td>
                                        <td>{user.display_name.clone().unwrap_or_default()}</td>
                                        <td>
                                            <button on:click=move |_| on_set_approval(
                                                approve_id.clone(),
                                                !is_approved,
                                            )>
                                                {if is_approved { "Revoke" } else { "Approve" }}
                                            </button>
                                        </td>
                                        <td>
                                            <button on:click=move |_| on_set_admin(
                                                admin_id.clone(),
                                                !is_admin,
                                            )>
                                                {if is_admin { "Remove admin" } else { "Make admin" }}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </div>
    }
}

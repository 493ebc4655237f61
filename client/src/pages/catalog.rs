//! Catalog page listing the shared bookshelf with add-book intake.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It fetches the catalog over
//! REST once approval is established and refreshes it live from the
//! `books` change stream. Unapproved users see a waiting banner instead
//! of the catalog.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::book_card::BookCard;
use crate::net::change_client::ChangeFeedHandle;
use crate::net::types::BookDraft;
use crate::session::sign_out::spawn_sign_out;
use crate::state::auth::AuthState;
use crate::state::books::BooksState;
use crate::state::ui::UiState;
use crate::util::ui_persistence;

const BOOKS_TABLE: &str = "books";
const DRAFT_STORAGE_KEY: &str = "add_book_draft";

#[cfg(feature = "hydrate")]
fn refresh_books(books: RwSignal<BooksState>) {
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_books().await {
            Ok(items) => books.update(|s| s.apply_listing(items)),
            Err(e) => books.update(|s| s.apply_error(e)),
        }
    });
}

#[component]
pub fn CatalogPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let books = expect_context::<RwSignal<BooksState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let feed = expect_context::<ChangeFeedHandle>();
    let navigate = use_navigate();

    // Initial fetch once approval is established, plus live refresh from
    // the books change stream.
    #[cfg(feature = "hydrate")]
    {
        let requested = RwSignal::new(false);
        Effect::new(move || {
            if requested.get() {
                return;
            }
            let ready = auth.with(|a| a.is_ready() && a.is_signed_in() && a.is_approved);
            if !ready {
                return;
            }
            books.update(|s| s.loading = true);
            refresh_books(books);
            requested.set(true);
        });

        let channel = feed.subscribe(BOOKS_TABLE, None, move |_event| {
            refresh_books(books);
        });
        let feed_cleanup = feed.clone();
        on_cleanup(move || feed_cleanup.unsubscribe(&channel));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &feed;
    }

    // Add-book dialog state, draft-persisted across visits.
    let show_add = RwSignal::new(false);
    let draft = RwSignal::new(
        ui_persistence::load_json::<BookDraft>(DRAFT_STORAGE_KEY).unwrap_or_default(),
    );
    let lookup_busy = RwSignal::new(false);
    let dialog_info = RwSignal::new(String::new());

    Effect::new(move || {
        ui_persistence::save_json(DRAFT_STORAGE_KEY, &draft.get());
    });

    let on_lookup = move |_| {
        if lookup_busy.get() {
            return;
        }
        let isbn = draft.with(|d| d.isbn.clone().unwrap_or_default());
        if isbn.trim().is_empty() {
            dialog_info.set("Enter an ISBN first.".to_owned());
            return;
        }
        lookup_busy.set(true);
        dialog_info.set("Looking up...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::lookup_isbn(isbn.trim()).await {
                Ok(preview) => {
                    draft.update(|d| {
                        d.title = preview.title;
                        d.author = preview.author;
                        d.isbn = Some(preview.isbn);
                        d.cover_url = preview.cover_url;
                        if d.description.as_deref().unwrap_or_default().is_empty() {
                            d.description = preview.description;
                        }
                    });
                    dialog_info.set(String::new());
                }
                Err(e) => dialog_info.set(format!("Lookup failed: {e}")),
            }
            lookup_busy.set(false);
        });
    };

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current = draft.get();
        if current.title.trim().is_empty() || current.author.trim().is_empty() {
            dialog_info.set("Title and author are required.".to_owned());
            return;
        }

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_book(&current).await {
                Ok(created) => {
                    draft.set(BookDraft::default());
                    show_add.set(false);
                    dialog_info.set(String::new());
                    books.update(|s| s.created_book_id = Some(created.id));
                    refresh_books(books);
                }
                Err(e) => dialog_info.set(format!("Add failed: {e}")),
            }
        });
    };

    // Navigate to a just-created book's detail view.
    let navigate_created = navigate.clone();
    Effect::new(move || {
        if let Some(book_id) = books.get().created_book_id.clone() {
            books.update(|s| s.created_book_id = None);
            navigate_created(&format!("/book/{book_id}"), NavigateOptions::default());
        }
    });

    let navigate_sign_out = navigate.clone();
    let on_sign_out = move |_| {
        let navigate = navigate_sign_out.clone();
        spawn_sign_out(auth, ui, move |path, options| navigate(path, options));
    };

    let self_email = move || {
        auth.with(|a| a.user.as_ref().map(|u| u.email.clone()))
            .unwrap_or_default()
    };
    let awaiting_approval =
        move || auth.with(|a| a.is_ready() && a.is_signed_in() && !a.is_approved);
    let booting = move || auth.with(|a| !a.is_ready());

    view! {
        <div class="catalog-page">
            <header class="catalog-header">
                <h1>"Stacks"</h1>
                <nav class="catalog-header__nav">
                    <Show when=move || auth.with(|a| a.is_admin)>
                        <a class="catalog-header__admin" href="/admin">"Admin"</a>
                    </Show>
                    <span class="catalog-header__email">{self_email}</span>
                    <button class="catalog-header__signout" on:click=on_sign_out>
                        "Sign out"
                    </button>
                </nav>
            </header>

            <Show when=move || ui.get().notice.is_some()>
                <div class="notice-banner" role="alert">
                    <span>{move || ui.get().notice.unwrap_or_default()}</span>
                    <button on:click=move |_| ui.update(UiState::clear_notice)>"✕"</button>
                </div>
            </Show>

            <Show when=booting>
                <p class="catalog-loading">"Loading..."</p>
            </Show>

            <Show when=awaiting_approval>
                <div class="approval-banner">
                    <h2>"Almost there"</h2>
                    <p>"An admin needs to approve your account before you can browse the shelf."</p>
                </div>
            </Show>

            <Show when=move || auth.with(|a| a.is_ready() && a.is_approved)>
                <section class="catalog-grid">
                    <For
                        each=move || books.get().items
                        key=|book| book.id.clone()
                        children=move |book| view! { <BookCard book=book/> }
                    />
                </section>
                <button class="catalog-add" on:click=move |_| show_add.set(true)>
                    "Add a book"
                </button>
            </Show>

            <Show when=move || show_add.get()>
                <div class="dialog-backdrop">
                    <form class="dialog" on:submit=on_add>
                        <h2>"Add a book"</h2>
                        <input
                            class="dialog-input"
                            type="text"
                            placeholder="ISBN (optional)"
                            prop:value=move || draft.with(|d| d.isbn.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| {
                                    d.isbn = if value.trim().is_empty() { None } else { Some(value) };
                                });
                            }
                        />
                        <button type="button" disabled=move || lookup_busy.get() on:click=on_lookup>
                            "Look up ISBN"
                        </button>
                        <input
                            class="dialog-input"
                            type="text"
                            placeholder="Title"
                            prop:value=move || draft.with(|d| d.title.clone())
                            on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                        />
                        <input
                            class="dialog-input"
                            type="text"
                            placeholder="Author"
                            prop:value=move || draft.with(|d| d.author.clone())
                            on:input=move |ev| draft.update(|d| d.author = event_target_value(&ev))
                        />
                        <textarea
                            class="dialog-input dialog-input--description"
                            placeholder="Description"
                            prop:value=move || draft.with(|d| d.description.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| {
                                    d.description =
                                        if value.trim().is_empty() { None } else { Some(value) };
                                });
                            }
                        ></textarea>
                        <Show when=move || !dialog_info.get().is_empty()>
                            <p class="dialog-info">{move || dialog_info.get()}</p>
                        </Show>
                        <div class="dialog-actions">
                            <button type="button" on:click=move |_| show_add.set(false)>
                                "Cancel"
                            </button>
                            <button type="submit">"Add"</button>
                        </div>
                    </form>
                </div>
            </Show>
        </div>
    }
}

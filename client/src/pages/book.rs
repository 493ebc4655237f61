//! Book detail page: lending, comments, ratings, reactions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Detail state is fetched over REST and refreshed live from a row-scoped
//! `books` subscription, so a lend/return in another tab updates the page
//! without a reload.

#[cfg(test)]
#[path = "book_test.rs"]
mod book_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::star_rating::StarRating;
use crate::net::change_client::ChangeFeedHandle;
use crate::net::types::BookDetail;
use crate::state::auth::AuthState;

const BOOKS_TABLE: &str = "books";
const REACTION_PALETTE: [&str; 4] = ["👍", "❤️", "📚", "😂"];

/// Render untrusted comment markdown to HTML.
pub(crate) fn render_markdown(source: &str) -> String {
    let parser = pulldown_cmark::Parser::new(source);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Whether `user_id` may return the current loan.
pub(crate) fn can_return(borrowed_by: Option<&str>, user_id: Option<&str>, is_admin: bool) -> bool {
    match borrowed_by {
        None => false,
        Some(borrower) => is_admin || user_id == Some(borrower),
    }
}

/// Whether `user_id` may delete this catalog entry.
pub(crate) fn can_delete(added_by: Option<&str>, user_id: Option<&str>, is_admin: bool) -> bool {
    is_admin || (added_by.is_some() && added_by == user_id)
}

#[cfg(feature = "hydrate")]
fn refresh_detail(book_id: String, detail: RwSignal<Option<BookDetail>>, info: RwSignal<String>) {
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_book_detail(&book_id).await {
            Ok(payload) => detail.set(Some(payload)),
            Err(e) => info.set(format!("Load failed: {e}")),
        }
    });
}

#[component]
pub fn BookPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let feed = expect_context::<ChangeFeedHandle>();
    let params = use_params_map();
    let navigate = use_navigate();

    let book_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));
    let detail = RwSignal::new(None::<BookDetail>);
    let info = RwSignal::new(String::new());
    let comment_draft = RwSignal::new(String::new());

    // Fetch on mount and whenever the route id changes; keep a row-scoped
    // live subscription in step with the id.
    #[cfg(feature = "hydrate")]
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        let current: Rc<RefCell<Option<crate::net::change_client::Channel>>> = Rc::default();
        let current_cleanup = current.clone();
        let feed_cleanup = feed.clone();
        on_cleanup(move || {
            if let Some(channel) = current_cleanup.borrow_mut().take() {
                feed_cleanup.unsubscribe(&channel);
            }
        });

        let feed_effect = feed.clone();
        Effect::new(move || {
            let id = book_id.get();
            if let Some(channel) = current.borrow_mut().take() {
                feed_effect.unsubscribe(&channel);
            }
            if id.is_empty() {
                return;
            }

            refresh_detail(id.clone(), detail, info);

            let refresh_id = id.clone();
            let channel = feed_effect.subscribe(BOOKS_TABLE, Some(id), move |_event| {
                refresh_detail(refresh_id.clone(), detail, info);
            });
            *current.borrow_mut() = Some(channel);
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &feed;
    }

    let self_user_id = move || auth.with(|a| a.user.as_ref().map(|u| u.id.clone()));

    let on_lend = move |_| {
        let id = book_id.get();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::lend_book(&id).await {
                info.set(format!("Borrow failed: {e}"));
            } else {
                refresh_detail(id, detail, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = id;
    };

    let on_return = move |_| {
        let id = book_id.get();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::return_book(&id).await {
                info.set(format!("Return failed: {e}"));
            } else {
                refresh_detail(id, detail, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = id;
    };

    let navigate_delete = navigate.clone();
    let on_delete = Callback::new(move |()| {
        let id = book_id.get();
        let navigate = navigate_delete.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::delete_book(&id).await {
                info.set(format!("Delete failed: {e}"));
            } else {
                navigate("/", NavigateOptions::default());
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, navigate);
    });

    let on_comment = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = book_id.get();
        let body = comment_draft.get().trim().to_owned();
        if body.is_empty() {
            return;
        }
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::post_comment(&id, &body).await {
                Ok(_) => {
                    comment_draft.set(String::new());
                    refresh_detail(id, detail, info);
                }
                Err(e) => info.set(format!("Comment failed: {e}")),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, body);
    };

    let on_rate = Callback::new(move |stars: u8| {
        let id = book_id.get();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::set_rating(&id, stars).await {
                info.set(format!("Rating failed: {e}"));
            } else {
                refresh_detail(id, detail, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, stars);
    });

    let on_react = move |emoji: &'static str| {
        let id = book_id.get();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::toggle_reaction(&id, emoji).await {
                info.set(format!("Reaction failed: {e}"));
            } else {
                refresh_detail(id, detail, info);
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, emoji);
    };

    view! {
        <div class="book-page">
            <a class="book-page__back" href="/">"← Back to the shelf"</a>

            <Show when=move || !info.get().is_empty()>
                <p class="book-page__info" role="alert">{move || info.get()}</p>
            </Show>

            {move || {
                detail.get().map(|payload| {
                    let book = payload.book;
                    let user_id = self_user_id();
                    let is_admin = auth.with(|a| a.is_admin);
                    let borrowed = book.borrowed_by.is_some();
                    let returnable =
                        can_return(book.borrowed_by.as_deref(), user_id.as_deref(), is_admin);
                    let deletable =
                        can_delete(book.added_by.as_deref(), user_id.as_deref(), is_admin);
                    let my_stars = payload.my_stars.and_then(|s| u8::try_from(s).ok());
                    let rating_label = book.rating_avg.map_or_else(
                        || "No ratings yet".to_owned(),
                        |avg| format!("{avg:.1} from {} ratings", book.rating_count),
                    );

                    let reactions = REACTION_PALETTE
                        .into_iter()
                        .map(|emoji| {
                            let reaction =
                                payload.reactions.iter().find(|r| r.emoji == emoji).cloned();
                            let count = reaction.as_ref().map_or(0, |r| r.count);
                            let reacted = reaction.as_ref().is_some_and(|r| r.reacted);
                            view! {
                                <button
                                    class="book-detail__reaction"
                                    class:book-detail__reaction--own=reacted
                                    on:click=move |_| on_react(emoji)
                                >
                                    {emoji}
                                    " "
                                    {count}
                                </button>
                            }
                        })
                        .collect_view();

                    view! {
                        <article class="book-detail">
                            <header class="book-detail__header">
                                <h1>{book.title}</h1>
                                <p class="book-detail__author">{book.author}</p>
                            </header>

                            <p class="book-detail__description">
                                {book.description.unwrap_or_default()}
                            </p>

                            <div class="book-detail__lending">
                                <Show when=move || !borrowed>
                                    <button on:click=on_lend>"Borrow"</button>
                                </Show>
                                <Show when=move || returnable>
                                    <button on:click=on_return>"Return"</button>
                                </Show>
                                <Show when=move || borrowed && !returnable>
                                    <span class="book-detail__borrowed">"Currently borrowed"</span>
                                </Show>
                                <Show when=move || deletable>
                                    <button
                                        class="book-detail__delete"
                                        on:click=move |_| on_delete.run(())
                                    >
                                        "Remove from shelf"
                                    </button>
                                </Show>
                            </div>

                            <div class="book-detail__rating">
                                <StarRating current=my_stars on_rate=on_rate/>
                                <span class="book-detail__rating-avg">{rating_label}</span>
                            </div>

                            <div class="book-detail__reactions">{reactions}</div>

                            <section class="book-comments">
                                <h2>"Comments"</h2>
                                <For
                                    each=move || {
                                        detail.get().map(|d| d.comments).unwrap_or_default()
                                    }
                                    key=|comment| comment.id.clone()
                                    children=move |comment| {
                                        let body_html = render_markdown(&comment.body);
                                        view! {
                                            <div class="book-comment">
                                                <span class="book-comment__author">
                                                    {comment.author_name.clone()}
                                                </span>
                                                <div
                                                    class="book-comment__body"
                                                    inner_html=body_html
                                                ></div>
                                            </div>
                                        }
                                    }
                                />
                                <form class="book-comment-form" on:submit=on_comment>
                                    <textarea
                                        placeholder="Say something about this book..."
                                        prop:value=move || comment_draft.get()
                                        on:input=move |ev| comment_draft.set(event_target_value(&ev))
                                    ></textarea>
                                    <button type="submit">"Post"</button>
                                </form>
                            </section>
                        </article>
                    }
                })
            }}
        </div>
    }
}

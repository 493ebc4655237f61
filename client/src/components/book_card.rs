//! Reusable card component for catalog entries.
//!
//! DESIGN
//! ======
//! Keeps catalog presentation consistent between the grid and any future
//! list views while centralizing the availability badge.

use leptos::prelude::*;

use crate::net::types::Book;

/// A clickable card representing one book in the catalog.
#[component]
pub fn BookCard(book: Book) -> impl IntoView {
    let href = format!("/book/{}", book.id);
    let available = book.borrowed_by.is_none();
    let rating_label = book.rating_avg.map_or_else(
        || "unrated".to_owned(),
        |avg| format!("{avg:.1}★ ({})", book.rating_count),
    );
    let cover = book
        .cover_url
        .map(|url| view! { <img class="book-card__cover" src=url alt=""/> });

    view! {
        <a class="book-card" class:book-card--borrowed=!available href=href>
            {cover}
            <span class="book-card__title">{book.title}</span>
            <span class="book-card__author">{book.author}</span>
            <span class="book-card__meta">
                <span class="book-card__rating">{rating_label}</span>
                <span class="book-card__badge">
                    {if available { "Available" } else { "Borrowed" }}
                </span>
            </span>
        </a>
    }
}

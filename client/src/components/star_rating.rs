//! Interactive five-star rating row.

use leptos::prelude::*;

/// Clickable star row; `current` is the user's own rating, if any.
#[component]
pub fn StarRating(
    #[prop(optional_no_strip)] current: Option<u8>,
    on_rate: Callback<u8>,
) -> impl IntoView {
    let filled = current.unwrap_or(0);

    view! {
        <span class="star-rating">
            {(1..=5u8)
                .map(|stars| {
                    view! {
                        <button
                            class="star-rating__star"
                            class:star-rating__star--filled=stars <= filled
                            on:click=move |_| on_rate.run(stars)
                            aria-label=format!("Rate {stars} stars")
                        >
                            {if stars <= filled { "★" } else { "☆" }}
                        </button>
                    }
                })
                .collect_view()}
        </span>
    }
}

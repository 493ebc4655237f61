//! AI description drafting for ISBN intake.
//!
//! Thin orchestration over the provider-neutral [`LlmChat`] trait: builds
//! the prompt, extracts the first text block, trims it. Callers treat a
//! failure as "no description" — intake never blocks on the model.

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;

use crate::llm::{ChatResponse, Content, ContentBlock, LlmChat, LlmError, Message};

const DESCRIPTION_MAX_TOKENS: u32 = 300;
const DESCRIPTION_SYSTEM_PROMPT: &str = "You write blurbs for an office book-lending shelf. \
Given a title and author, reply with a two-sentence, spoiler-free description of the book. \
Reply with the description only, no preamble.";

pub(crate) fn description_prompt(title: &str, author: &str) -> String {
    format!("Title: {title}\nAuthor: {author}")
}

/// First text block of a chat response, trimmed; `None` when the model
/// returned no usable text.
pub(crate) fn extract_text(response: &ChatResponse) -> Option<String> {
    response.content.iter().find_map(|block| match block {
        ContentBlock::Text { text } => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        _ => None,
    })
}

/// Draft a short description for a book.
///
/// # Errors
///
/// Returns an [`LlmError`] when the provider call fails or returns no
/// text.
pub async fn draft_description(llm: &dyn LlmChat, title: &str, author: &str) -> Result<String, LlmError> {
    let messages = [Message {
        role: "user".to_owned(),
        content: Content::Text(description_prompt(title, author)),
    }];

    let response = llm
        .chat(DESCRIPTION_MAX_TOKENS, DESCRIPTION_SYSTEM_PROMPT, &messages)
        .await?;

    extract_text(&response).ok_or_else(|| LlmError::ApiParse("response contained no text".to_owned()))
}

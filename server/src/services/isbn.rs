//! ISBN metadata lookup against the Open Library API.
//!
//! ERROR HANDLING
//! ==============
//! Response parsing is split from transport so it can be exercised against
//! canned payloads; an ISBN with no entry maps to `NotFound` rather than a
//! parse failure.

#[cfg(test)]
#[path = "isbn_test.rs"]
mod tests;

use std::time::Duration;

const API_BASE: &str = "https://openlibrary.org/api/books";
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum IsbnError {
    #[error("isbn is not valid: {0}")]
    InvalidIsbn(String),
    #[error("no record for isbn {0}")]
    NotFound(String),
    #[error("lookup request failed: {0}")]
    Request(String),
    #[error("lookup response malformed: {0}")]
    Parse(String),
}

/// Metadata extracted from the lookup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsbnBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
}

/// Strip separators and validate the shape of an ISBN-10/13.
///
/// Returns the compact form, uppercased (a trailing `X` check digit is
/// only legal for ISBN-10).
#[must_use]
pub fn normalize_isbn(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !compact.is_ascii() {
        return None;
    }

    let valid = match compact.len() {
        10 => {
            compact[..9].chars().all(|c| c.is_ascii_digit())
                && compact
                    .chars()
                    .last()
                    .is_some_and(|c| c.is_ascii_digit() || c == 'X')
        }
        13 => compact.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };

    valid.then_some(compact)
}

/// Look up one ISBN.
///
/// # Errors
///
/// Returns [`IsbnError`] for invalid input, transport failures, malformed
/// payloads, or an ISBN Open Library does not know.
pub async fn lookup(isbn: &str) -> Result<IsbnBook, IsbnError> {
    let isbn = normalize_isbn(isbn).ok_or_else(|| IsbnError::InvalidIsbn(isbn.to_owned()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| IsbnError::Request(e.to_string()))?;

    let url = format!("{API_BASE}?bibkeys=ISBN:{isbn}&format=json&jscmd=data");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| IsbnError::Request(e.to_string()))?;

    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| IsbnError::Request(e.to_string()))?;

    if status != 200 {
        return Err(IsbnError::Request(format!("status {status}")));
    }

    parse_response(&isbn, &text)
}

/// Parse an Open Library `jscmd=data` payload for `isbn`.
pub(crate) fn parse_response(isbn: &str, json: &str) -> Result<IsbnBook, IsbnError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| IsbnError::Parse(e.to_string()))?;

    let key = format!("ISBN:{isbn}");
    let Some(entry) = value.get(&key) else {
        return Err(IsbnError::NotFound(isbn.to_owned()));
    };

    let title = entry
        .get("title")
        .and_then(|t| t.as_str())
        .ok_or_else(|| IsbnError::Parse("missing title".to_owned()))?
        .to_owned();

    let author = entry
        .get("authors")
        .and_then(|a| a.as_array())
        .and_then(|a| a.first())
        .and_then(|a| a.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("Unknown")
        .to_owned();

    let cover_url = entry
        .get("cover")
        .and_then(|c| c.get("medium").or_else(|| c.get("large")).or_else(|| c.get("small")))
        .and_then(|u| u.as_str())
        .map(str::to_owned);

    Ok(IsbnBook { isbn: isbn.to_owned(), title, author, cover_url })
}

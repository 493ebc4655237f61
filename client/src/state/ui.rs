//! Transient UI state: the global notice banner.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Cross-page UI state provided via context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// One-line failure/info notice shown at the top of the page.
    pub notice: Option<String>,
}

impl UiState {
    /// Show a notice, replacing any existing one.
    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Dismiss the notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

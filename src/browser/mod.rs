pub mod webdriver;

#[cfg(test)]
pub mod mock;

use crate::error::BrowserError;
use async_trait::async_trait;
use std::time::Duration;

pub use webdriver::WebDriverBrowser;

/// Capabilities the scraper needs from a browser automation handle.
///
/// All selectors are CSS. A handle is owned by exactly one session and is
/// driven one command at a time.
#[async_trait]
pub trait Browser: Send {
    /// Navigate to a URL
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// URL of the current page after redirects
    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Rendered HTML of the current page
    async fn source(&mut self) -> Result<String, BrowserError>;

    /// Wait until at least one element matches
    async fn wait_present(&mut self, selector: &str, timeout: Duration)
    -> Result<(), BrowserError>;

    /// Wait until at least one matching element is displayed
    async fn wait_visible(&mut self, selector: &str, timeout: Duration)
    -> Result<(), BrowserError>;

    /// Number of elements currently matching
    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError>;

    /// Text of the first match, `None` when nothing matches
    async fn text(&mut self, selector: &str) -> Result<Option<String>, BrowserError>;

    /// Attribute of every match. Each element is read independently so one
    /// stale element does not spoil the others.
    async fn attributes(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Result<Option<String>, BrowserError>>, BrowserError>;

    /// Scroll the first match to the bottom of its content
    async fn scroll_to_bottom(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Move the pointer over the last match
    async fn hover_last(&mut self, selector: &str) -> Result<(), BrowserError>;
}

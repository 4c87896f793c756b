//! Scripted in-memory browser for exercising discovery and extraction
//! without a WebDriver server.

use crate::browser::Browser;
use crate::error::BrowserError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A listing page served by the mock
#[derive(Debug, Clone)]
pub struct MockPage {
    pub html: String,
    /// URL reported after navigation, e.g. the `/place/` form of the link
    pub resolved_url: String,
    /// When false the title never appears and waiting for it times out
    pub loads: bool,
}

#[derive(Debug, Default)]
pub struct MockBrowser {
    /// Result counts returned by successive reads of the feed; the last value repeats
    pub feed_counts: Vec<usize>,
    /// Number of upcoming feed reads that fail with a stale element
    pub stale_reads: usize,
    /// Fail feed reads with this error once the scripted counts run out
    pub feed_error: Option<BrowserError>,
    /// Whether the search page shows any results at all
    pub results_present: bool,
    /// 1-based `scroll_to_bottom` calls that fail with a stale element
    pub stale_scroll_calls: Vec<usize>,
    /// Text of the end-of-list marker, if shown
    pub end_marker: Option<String>,
    /// Attribute values returned by the final link collection
    pub hrefs: Vec<Result<Option<String>, BrowserError>>,
    pub pages: HashMap<String, MockPage>,
    /// Fail every `source` read with this error
    pub source_error: Option<BrowserError>,

    pub visited: Vec<String>,
    pub feed_reads: usize,
    pub scrolls: usize,
    pub hovers: usize,
    scroll_calls: usize,
    current: Option<String>,
}

impl MockBrowser {
    pub fn with_feed(counts: &[usize]) -> Self {
        Self {
            feed_counts: counts.to_vec(),
            results_present: true,
            ..Self::default()
        }
    }

    pub fn add_page(&mut self, url: &str, resolved_url: &str, html: &str) {
        self.pages.insert(
            url.to_string(),
            MockPage {
                html: html.to_string(),
                resolved_url: resolved_url.to_string(),
                loads: true,
            },
        );
    }

    pub fn add_broken_page(&mut self, url: &str) {
        self.pages.insert(
            url.to_string(),
            MockPage {
                html: String::new(),
                resolved_url: url.to_string(),
                loads: false,
            },
        );
    }

    fn current_page(&self) -> Option<&MockPage> {
        self.current.as_ref().and_then(|url| self.pages.get(url))
    }

    fn on_search_page(&self) -> bool {
        self.current_page().is_none()
    }

    fn read_feed(&mut self) -> Result<usize, BrowserError> {
        if self.stale_reads > 0 {
            self.stale_reads -= 1;
            return Err(BrowserError::StaleElement);
        }
        if self.feed_reads >= self.feed_counts.len() {
            if let Some(error) = &self.feed_error {
                return Err(error.clone());
            }
        }
        let index = self.feed_reads.min(self.feed_counts.len().saturating_sub(1));
        self.feed_reads += 1;
        Ok(self.feed_counts.get(index).copied().unwrap_or(0))
    }

    fn timeout(selector: &str, timeout: Duration) -> BrowserError {
        BrowserError::Timeout {
            selector: selector.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.visited.push(url.to_string());
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        match self.current_page() {
            Some(page) => Ok(page.resolved_url.clone()),
            None => self
                .current
                .clone()
                .ok_or_else(|| BrowserError::Command("no page loaded".to_string())),
        }
    }

    async fn source(&mut self) -> Result<String, BrowserError> {
        if let Some(error) = &self.source_error {
            return Err(error.clone());
        }
        Ok(self
            .current_page()
            .map(|page| page.html.clone())
            .unwrap_or_default())
    }

    async fn wait_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let present = match self.current_page() {
            Some(page) => page.loads,
            None => self.results_present,
        };
        if present {
            Ok(())
        } else {
            Err(Self::timeout(selector, timeout))
        }
    }

    async fn wait_visible(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        // Visibility is judged on the markup: any page with an address row counts
        let visible = self
            .current_page()
            .is_some_and(|page| page.loads && page.html.contains("Io6YTe"));
        if visible {
            Ok(())
        } else {
            Err(Self::timeout(selector, timeout))
        }
    }

    async fn count(&mut self, _selector: &str) -> Result<usize, BrowserError> {
        if self.on_search_page() {
            self.read_feed()
        } else {
            Ok(0)
        }
    }

    async fn text(&mut self, _selector: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.end_marker.clone())
    }

    async fn attributes(
        &mut self,
        _selector: &str,
        _name: &str,
    ) -> Result<Vec<Result<Option<String>, BrowserError>>, BrowserError> {
        Ok(self.hrefs.clone())
    }

    async fn scroll_to_bottom(&mut self, _selector: &str) -> Result<(), BrowserError> {
        self.scroll_calls += 1;
        if self.stale_scroll_calls.contains(&self.scroll_calls) {
            return Err(BrowserError::StaleElement);
        }
        self.scrolls += 1;
        Ok(())
    }

    async fn hover_last(&mut self, _selector: &str) -> Result<(), BrowserError> {
        self.hovers += 1;
        Ok(())
    }
}

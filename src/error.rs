use fantoccini::error::{CmdError, ErrorStatus};
use thiserror::Error;

/// Faults reported by a browser automation handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    #[error("timed out after {timeout_secs}s waiting for `{selector}`")]
    Timeout { selector: String, timeout_secs: u64 },

    /// The element was re-rendered between lookup and use
    #[error("stale element reference")]
    StaleElement,

    #[error("webdriver command failed: {0}")]
    Command(String),
}

impl BrowserError {
    pub fn is_stale(&self) -> bool {
        matches!(self, BrowserError::StaleElement)
    }
}

impl From<CmdError> for BrowserError {
    fn from(error: CmdError) -> Self {
        match error {
            CmdError::Standard(e) if e.error == ErrorStatus::StaleElementReference => {
                BrowserError::StaleElement
            }
            other => BrowserError::Command(other.to_string()),
        }
    }
}

/// Errors raised while scraping one query or one listing
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no results for \"{query}\" within {timeout_secs}s")]
    NoResults { query: String, timeout_secs: u64 },

    #[error("listing {url} did not load: {source}")]
    ListingLoad {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("invalid search URL: {0}")]
    SearchUrl(#[from] url::ParseError),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

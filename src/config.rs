use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Top level configuration for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL that search queries are appended to
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// Interface language requested from the map site
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub selectors: Selectors,
}

/// Tuning for the scroll-and-count pagination loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Seconds to wait for the first result to appear
    #[serde(default = "default_results_wait_secs")]
    pub results_wait_secs: u64,

    /// Upper bound on scroll iterations
    #[serde(default = "default_max_scroll_attempts")]
    pub max_scroll_attempts: usize,

    /// Pause after scrolling the feed
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Pause after hovering the last entry
    #[serde(default = "default_hover_settle_ms")]
    pub hover_settle_ms: u64,

    /// Pause before retrying an iteration that hit a stale element
    #[serde(default = "default_stale_retry_ms")]
    pub stale_retry_ms: u64,

    /// Consecutive unchanged counts treated as the end of the feed when
    /// the site shows no end-of-list marker
    #[serde(default = "default_stall_confirmations")]
    pub stall_confirmations: usize,
}

/// Waits used while loading a single listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_title_wait_secs")]
    pub title_wait_secs: u64,

    #[serde(default = "default_address_wait_secs")]
    pub address_wait_secs: u64,
}

/// CSS selectors for the map site's markup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub result_link: String,
    pub feed: String,
    pub end_marker: String,
    pub title: String,
    pub rating: String,
    pub website: String,
    pub phone: String,
    pub category: String,
    /// Waited on for visibility before the other address candidates are tried
    pub address_primary: String,
    pub address_fallbacks: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            result_link: ".hfpxzc".to_string(),
            feed: r#"div[role="feed"]"#.to_string(),
            end_marker: ".m6QErb.tLjsW".to_string(),
            title: "h1".to_string(),
            rating: ".F7nice span:nth-child(1)".to_string(),
            website: r#"[data-item-id^="authority"]"#.to_string(),
            phone: r#"[data-item-id^="phone"]"#.to_string(),
            category: ".fontBodyMedium span button".to_string(),
            address_primary: r#"div[class*="Io6YTe"], div[data-tooltip="Copy address"]"#
                .to_string(),
            address_fallbacks: vec![
                "div.RcCsl.fVHpi.w4vB1d span.AhqS1e".to_string(),
                "div.rogA2c div.Io6YTe".to_string(),
                r#"div[data-section-id="ad"] div.Io6YTe"#.to_string(),
            ],
        }
    }
}

impl Selectors {
    /// Address candidates in priority order
    pub fn address_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.address_primary.as_str())
            .chain(self.address_fallbacks.iter().map(String::as_str))
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_search_base_url() -> String {
    "https://www.google.com/maps/search/".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_results_wait_secs() -> u64 {
    10
}

fn default_max_scroll_attempts() -> usize {
    20
}

fn default_scroll_settle_ms() -> u64 {
    2000
}

fn default_hover_settle_ms() -> u64 {
    1000
}

fn default_stale_retry_ms() -> u64 {
    1000
}

fn default_stall_confirmations() -> usize {
    1
}

fn default_title_wait_secs() -> u64 {
    15
}

fn default_address_wait_secs() -> u64 {
    10
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            search_base_url: default_search_base_url(),
            language: default_language(),
            discovery: DiscoveryConfig::default(),
            extraction: ExtractionConfig::default(),
            selectors: Selectors::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            results_wait_secs: default_results_wait_secs(),
            max_scroll_attempts: default_max_scroll_attempts(),
            scroll_settle_ms: default_scroll_settle_ms(),
            hover_settle_ms: default_hover_settle_ms(),
            stale_retry_ms: default_stale_retry_ms(),
            stall_confirmations: default_stall_confirmations(),
        }
    }
}

impl DiscoveryConfig {
    pub fn results_wait(&self) -> Duration {
        Duration::from_secs(self.results_wait_secs)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn hover_settle(&self) -> Duration {
        Duration::from_millis(self.hover_settle_ms)
    }

    pub fn stale_retry(&self) -> Duration {
        Duration::from_millis(self.stale_retry_ms)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title_wait_secs: default_title_wait_secs(),
            address_wait_secs: default_address_wait_secs(),
        }
    }
}

impl ExtractionConfig {
    pub fn title_wait(&self) -> Duration {
        Duration::from_secs(self.title_wait_secs)
    }

    pub fn address_wait(&self) -> Duration {
        Duration::from_secs(self.address_wait_secs)
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ScraperConfig::from_json("{}").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.discovery.max_scroll_attempts, 20);
        assert_eq!(config.discovery.stall_confirmations, 1);
        assert_eq!(config.discovery.scroll_settle(), Duration::from_secs(2));
        assert_eq!(config.extraction.title_wait(), Duration::from_secs(15));
        assert_eq!(config.selectors.result_link, ".hfpxzc");
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let json = r#"{
            "discovery": { "stall_confirmations": 3 },
            "selectors": { "title": "h1.DUwDvf" }
        }"#;
        let config = ScraperConfig::from_json(json).unwrap();
        assert_eq!(config.discovery.stall_confirmations, 3);
        assert_eq!(config.discovery.max_scroll_attempts, 20);
        assert_eq!(config.selectors.title, "h1.DUwDvf");
        assert_eq!(config.selectors.phone, r#"[data-item-id^="phone"]"#);
    }

    #[test]
    fn test_address_candidates_order() {
        let selectors = Selectors::default();
        let candidates: Vec<&str> = selectors.address_candidates().collect();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0], selectors.address_primary);
        assert_eq!(candidates[3], r#"div[data-section-id="ad"] div.Io6YTe"#);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ScraperConfig::from_json("{ not json").is_err());
    }
}

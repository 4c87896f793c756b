//! Listing discovery: scroll the result feed until it stops growing and
//! collect the link of every entry.

use crate::browser::Browser;
use crate::config::{DiscoveryConfig, ScraperConfig, Selectors};
use crate::error::{BrowserError, ScrapeError};
use crate::query::Query;
use crate::utils::pause;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Canonical URL of one discovered listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingRef(String);

impl ListingRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Unique listing links in the order the feed rendered them
    pub listings: Vec<ListingRef>,
    /// Scroll iteration (1-based) on which the loop stopped
    pub iterations: usize,
    /// The site's end-of-list marker was seen
    pub reached_end: bool,
}

enum Iteration {
    /// Result count seen and stall count to carry into the next attempt
    Scrolled { count: usize, stalls: usize },
    Finished { reached_end: bool },
}

/// Runs the search and collects every listing the feed exposes.
///
/// Fails with [`ScrapeError::NoResults`] when no result appears within the
/// configured wait. Hitting the scroll cap is not an error; whatever has been
/// rendered by then is returned.
pub async fn discover<B: Browser + ?Sized>(
    browser: &mut B,
    query: &Query,
    config: &ScraperConfig,
) -> Result<Discovery, ScrapeError> {
    let url = query.search_url(&config.search_base_url, &config.language)?;
    ::log::info!("Searching: {}", query.text());
    ::log::debug!("Search URL: {}", url);

    browser.goto(url.as_str()).await?;

    let wait = config.discovery.results_wait();
    if browser
        .wait_present(&config.selectors.result_link, wait)
        .await
        .is_err()
    {
        return Err(ScrapeError::NoResults {
            query: query.text(),
            timeout_secs: wait.as_secs(),
        });
    }

    let (iterations, reached_end) =
        scroll_feed(browser, &config.selectors, &config.discovery).await;
    let listings = collect_listings(browser, &config.selectors).await?;

    ::log::info!(
        "Collected {} listing URLs after {} iterations",
        listings.len(),
        iterations
    );

    Ok(Discovery {
        listings,
        iterations,
        reached_end,
    })
}

/// Scrolls until the feed stalls, the end marker shows or the attempt cap is hit.
/// Returns the iteration the loop stopped on and whether the end marker was seen.
async fn scroll_feed<B: Browser + ?Sized>(
    browser: &mut B,
    selectors: &Selectors,
    config: &DiscoveryConfig,
) -> (usize, bool) {
    let mut previous_count = 0;
    let mut attempt = 0;
    let mut stalls = 0;
    let mut stale_retries = 0;

    while attempt < config.max_scroll_attempts {
        match feed_iteration(browser, selectors, config, attempt, previous_count, stalls).await {
            Ok(Iteration::Scrolled { count, stalls: seen }) => {
                previous_count = count;
                stalls = seen;
                attempt += 1;
            }
            Ok(Iteration::Finished { reached_end }) => return (attempt + 1, reached_end),
            Err(e) if e.is_stale() => {
                stale_retries += 1;
                if stale_retries > config.max_scroll_attempts {
                    ::log::warn!("Giving up after {} stale element retries", stale_retries - 1);
                    return (attempt + 1, false);
                }
                ::log::debug!("Stale element encountered, retrying attempt {}", attempt + 1);
                pause(config.stale_retry()).await;
            }
            Err(e) => {
                ::log::warn!("Error during scrolling: {}", e);
                return (attempt + 1, false);
            }
        }
    }

    ::log::info!(
        "Stopped scrolling after {} attempts with {} results",
        attempt,
        previous_count
    );
    (attempt, false)
}

async fn feed_iteration<B: Browser + ?Sized>(
    browser: &mut B,
    selectors: &Selectors,
    config: &DiscoveryConfig,
    attempt: usize,
    previous_count: usize,
    stalls: usize,
) -> Result<Iteration, BrowserError> {
    let count = browser.count(&selectors.result_link).await?;
    ::log::debug!("Attempt {}: found {} results", attempt + 1, count);

    // Only committed by the caller once the whole iteration succeeds
    let stalls = if attempt > 0 && count == previous_count {
        stalls + 1
    } else {
        0
    };

    if stalls > 0 {
        let end_text = browser.text(&selectors.end_marker).await.ok().flatten();
        if end_text.is_some_and(|text| text.to_lowercase().contains("end")) {
            ::log::info!("Reached the end of results");
            return Ok(Iteration::Finished { reached_end: true });
        }

        if stalls >= config.stall_confirmations.max(1) {
            ::log::info!("No end message found, assuming all results loaded");
            return Ok(Iteration::Finished { reached_end: false });
        }

        ::log::debug!(
            "Result count unchanged ({} of {} checks), scrolling again",
            stalls,
            config.stall_confirmations
        );
    }

    browser.scroll_to_bottom(&selectors.feed).await?;
    pause(config.scroll_settle()).await;

    browser.hover_last(&selectors.result_link).await?;
    pause(config.hover_settle()).await;

    Ok(Iteration::Scrolled { count, stalls })
}

/// Reads the link of every rendered entry, skipping stale ones and duplicates
async fn collect_listings<B: Browser + ?Sized>(
    browser: &mut B,
    selectors: &Selectors,
) -> Result<Vec<ListingRef>, BrowserError> {
    let mut seen = HashSet::new();
    let mut listings = Vec::new();

    for value in browser.attributes(&selectors.result_link, "href").await? {
        match value {
            Ok(Some(href)) if !href.is_empty() => {
                if seen.insert(href.clone()) {
                    listings.push(ListingRef::new(href));
                }
            }
            Ok(_) => {}
            Err(BrowserError::StaleElement) => {
                ::log::debug!("Stale element when collecting URLs, skipping");
            }
            Err(e) => {
                ::log::warn!("Could not read listing link: {}", e);
            }
        }
    }

    Ok(listings)
}

use crate::browser::Browser;
use crate::config::ScraperConfig;
use crate::discovery::ListingRef;
use crate::error::ScrapeError;
use crate::parsers::{AddressTagger, parse_listing};
use crate::results::BusinessRecord;

/// Loads one listing and reads its fields.
///
/// Only navigation and the title wait can fail. An unreadable page still
/// yields the place id and link from the resolved URL.
pub async fn extract<B: Browser + ?Sized>(
    browser: &mut B,
    listing: &ListingRef,
    query: &str,
    config: &ScraperConfig,
    tagger: &dyn AddressTagger,
) -> Result<BusinessRecord, ScrapeError> {
    let load_error = |source| ScrapeError::ListingLoad {
        url: listing.to_string(),
        source,
    };

    browser.goto(listing.as_str()).await.map_err(load_error)?;
    browser
        .wait_present(&config.selectors.title, config.extraction.title_wait())
        .await
        .map_err(load_error)?;

    let resolved_url = match browser.current_url().await {
        Ok(url) => url,
        Err(e) => {
            ::log::debug!("Could not read resolved URL for {}: {}", listing, e);
            listing.to_string()
        }
    };

    if let Err(e) = browser
        .wait_visible(
            &config.selectors.address_primary,
            config.extraction.address_wait(),
        )
        .await
    {
        ::log::debug!("Address not visible on {}: {}", listing, e);
    }

    let html = match browser.source().await {
        Ok(html) => html,
        Err(e) => {
            ::log::warn!("Could not read page source for {}: {}", listing, e);
            String::new()
        }
    };
    Ok(parse_listing(
        &html,
        &resolved_url,
        query,
        &config.selectors,
        tagger,
    ))
}

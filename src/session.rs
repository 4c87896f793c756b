use crate::browser::Browser;
use crate::config::ScraperConfig;
use crate::discovery::discover;
use crate::error::ScrapeError;
use crate::extract::extract;
use crate::parsers::{AddressTagger, RuleTagger};
use crate::query::Query;
use crate::results::{BusinessRecord, ColumnMapping, Row};

/// Runs queries against one browser handle, which it owns exclusively
pub struct ScrapeSession<B: Browser> {
    browser: B,
    config: ScraperConfig,
    tagger: Box<dyn AddressTagger>,
}

impl<B: Browser> ScrapeSession<B> {
    pub fn new(browser: B, config: ScraperConfig) -> Self {
        Self {
            browser,
            config,
            tagger: Box::new(RuleTagger),
        }
    }

    /// Replace the address tagger
    pub fn with_tagger(mut self, tagger: impl AddressTagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Gives the browser handle back, e.g. to close it
    pub fn into_browser(self) -> B {
        self.browser
    }

    /// Scrapes a query and returns rows with output column names, in
    /// discovery order. Never fails: faults only reduce the number of rows.
    pub async fn run(&mut self, query: &Query, column_base: Option<&str>) -> Vec<Row> {
        let columns = ColumnMapping::for_base(column_base);
        ::log::debug!("Using columns for base {:?}", column_base);

        self.records(query)
            .await
            .iter()
            .map(|record| columns.project(record))
            .collect()
    }

    /// Scrapes a query into records without renaming
    pub async fn records(&mut self, query: &Query) -> Vec<BusinessRecord> {
        let text = query.text();

        let discovery = match discover(&mut self.browser, query, &self.config).await {
            Ok(discovery) => discovery,
            Err(e @ ScrapeError::NoResults { .. }) => {
                ::log::warn!("{}", e);
                return Vec::new();
            }
            Err(e) => {
                ::log::error!("Error scraping {}: {}", text, e);
                return Vec::new();
            }
        };

        let total = discovery.listings.len();
        let mut records = Vec::with_capacity(total);

        for (index, listing) in discovery.listings.iter().enumerate() {
            ::log::info!("Scraping business {}/{}: {}", index + 1, total, listing);
            match extract(
                &mut self.browser,
                listing,
                &text,
                &self.config,
                self.tagger.as_ref(),
            )
            .await
            {
                Ok(record) => records.push(record),
                Err(e) => ::log::error!("Error scraping business at {}: {}", listing, e),
            }
        }

        ::log::info!("Scraped {} businesses for query: {}", records.len(), text);
        records
    }
}

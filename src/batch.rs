//! Runs every business type against every location of one state and keeps
//! only the rows that really belong to the searched location.

use crate::browser::Browser;
use crate::query::{LocationKind, Query};
use crate::results::{ColumnMapping, Row};
use crate::session::ScrapeSession;
use crate::states;

/// Column prepended to zip code results
pub const SEARCH_ZIPCODE_COLUMN: &str = "Search Zipcode";

/// Business types offered for a run
pub const BUSINESS_TYPES: &[&str] = &[
    "shopping center",
    "department store",
    "mall",
    "food court",
    "entertainment",
    "smoke shop",
    "retailer",
    "wholesaler",
    "cigar shop",
    "tobacco shop",
    "tobacco wholesaler",
    "tobacco retailer",
    "convenience store",
    "cigar wholesaler",
    "gas station",
    "vaporizer store",
    "liquor store",
    "vape shop",
    "supermarket",
    "restaurant",
    "bar",
];

/// Locations and business types to search within one state
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Full state name or postal code
    pub state: String,
    pub location_kind: LocationKind,
    pub locations: Vec<String>,
    pub business_types: Vec<String>,
}

impl BatchPlan {
    /// Postal code for the plan's state; unknown names are used as given
    pub fn state_code(&self) -> String {
        states::state_code(&self.state)
            .map(str::to_string)
            .unwrap_or_else(|| self.state.clone())
    }

    /// Queries in run order: every business type for the first location, then the next
    pub fn queries(&self) -> Vec<Query> {
        let state_code = self.state_code();
        self.locations
            .iter()
            .flat_map(|location| {
                self.business_types.iter().map(|business_type| {
                    Query::new(business_type.as_str(), location.as_str(), self.location_kind)
                        .with_state(state_code.as_str())
                })
            })
            .collect()
    }
}

/// Runs every query of the plan in sequence and returns the kept rows
pub async fn run_batch<B: Browser>(session: &mut ScrapeSession<B>, plan: &BatchPlan) -> Vec<Row> {
    let mut all_rows = Vec::new();

    for query in plan.queries() {
        ::log::info!("Scraping: {}", query.text());

        let rows = session.run(&query, Some(query.business_type())).await;
        let scraped = rows.len();
        let kept: Vec<Row> = rows
            .into_iter()
            .filter_map(|row| keep_for_location(row, &query))
            .collect();

        ::log::info!(
            "Scraped {} businesses for {}, kept {} after filtering",
            scraped,
            query.text(),
            kept.len()
        );
        all_rows.extend(kept);
    }

    all_rows
}

/// Keeps rows located in the searched city or zip code. Zip code rows get
/// the searched zip prepended.
pub fn keep_for_location(mut row: Row, query: &Query) -> Option<Row> {
    let columns = ColumnMapping::default();
    let location = query.location();

    match query.location_kind() {
        LocationKind::City => {
            let city = columns.column_for("city").and_then(|column| row.get_str(column));
            let matches = city
                .is_some_and(|city| !city.is_empty() && city.to_lowercase() == location.to_lowercase());
            matches.then_some(row)
        }
        LocationKind::ZipCode => {
            let zip = columns.column_for("zip_code").and_then(|column| row.get_str(column));
            if zip != Some(location) {
                return None;
            }
            row.prepend(SEARCH_ZIPCODE_COLUMN, location);
            Some(row)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockBrowser;
    use crate::config::ScraperConfig;
    use crate::error::BrowserError;

    fn row(city: &str, zip: &str) -> Row {
        let mut row = Row::default();
        row.push("BusinessName", "Shop");
        row.push("City", city);
        row.push("Zipcode", zip);
        row
    }

    fn plan(kind: LocationKind, locations: &[&str], types: &[&str]) -> BatchPlan {
        BatchPlan {
            state: "Alabama".to_string(),
            location_kind: kind,
            locations: locations.iter().map(|s| s.to_string()).collect(),
            business_types: types.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_queries_iterate_types_within_locations() {
        let plan = plan(LocationKind::City, &["Mobile", "Daphne"], &["bar", "mall"]);
        let texts: Vec<String> = plan.queries().iter().map(Query::text).collect();
        assert_eq!(
            texts,
            vec![
                "bar in Mobile, AL",
                "mall in Mobile, AL",
                "bar in Daphne, AL",
                "mall in Daphne, AL",
            ]
        );
    }

    #[test]
    fn test_unknown_state_is_used_verbatim() {
        let mut plan = plan(LocationKind::City, &["Hamilton"], &["bar"]);
        plan.state = "Bermuda".to_string();
        assert_eq!(plan.state_code(), "Bermuda");
    }

    #[test]
    fn test_city_filter_is_case_insensitive() {
        let query = Query::new("bar", "mobile", LocationKind::City);
        assert!(keep_for_location(row("Mobile", "36602"), &query).is_some());
        assert!(keep_for_location(row("Prichard", "36610"), &query).is_none());
        assert!(keep_for_location(row("", ""), &query).is_none());
    }

    #[test]
    fn test_zip_filter_prepends_search_zip() {
        let query = Query::new("bar", "36602", LocationKind::ZipCode);
        let kept = keep_for_location(row("Mobile", "36602"), &query).unwrap();
        let names: Vec<&str> = kept.column_names().collect();
        assert_eq!(names, vec!["Search Zipcode", "BusinessName", "City", "Zipcode"]);
        assert_eq!(kept.get_str(SEARCH_ZIPCODE_COLUMN), Some("36602"));

        assert!(keep_for_location(row("Mobile", "36604"), &query).is_none());
    }

    #[tokio::test]
    async fn test_run_batch_filters_rows() {
        let mut browser = MockBrowser::with_feed(&[2, 2]);
        browser.hrefs = vec![
            Ok::<_, BrowserError>(Some("https://maps/l/1".to_string())),
            Ok(Some("https://maps/l/2".to_string())),
        ];
        browser.add_page(
            "https://maps/l/1",
            "https://www.google.com/maps/place/In+Town/@1,2",
            r#"<h1>In Town</h1><div class="Io6YTe">1 Royal St, Mobile, AL 36602</div>"#,
        );
        browser.add_page(
            "https://maps/l/2",
            "https://www.google.com/maps/place/Out+Of+Town/@1,2",
            r#"<h1>Out Of Town</h1><div class="Io6YTe">9 Main St, Prichard, AL 36610</div>"#,
        );

        let mut config = ScraperConfig::default();
        config.discovery.scroll_settle_ms = 0;
        config.discovery.hover_settle_ms = 0;
        let mut session = ScrapeSession::new(browser, config);

        let rows = run_batch(&mut session, &plan(LocationKind::City, &["Mobile"], &["bar"])).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("BusinessName"), Some("In Town"));
    }
}

use crate::config::Selectors;
use crate::parsers::address::normalize_with;
use crate::parsers::tagger::AddressTagger;
use crate::results::BusinessRecord;
use crate::utils::{contains_any_ignore_case, normalize_whitespace};
use scraper::{ElementRef, Html, Selector};

/// Scraped category to broad category
pub const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("Tobacco shop", "Retail"),
    ("Smoke shop", "Retail"),
    ("Liquor store", "Retail"),
    ("Gas station", "Services"),
    ("Convenience store", "Retail"),
    ("Department store", "Retail"),
    ("Mall", "Retail"),
    ("Entertainment", "Entertainment"),
];

/// Broad category for anything missing from [`CATEGORY_MAPPING`]
pub const OTHER_CATEGORY: &str = "Other";

/// Words that only show up when an address selector caught the wrong row
pub const CONTAMINATION_TOKENS: &[&str] = &["closed", "open", "phone", "website", "hours"];

/// Parses one rendered listing page into a record.
///
/// Every field is read on its own; a missing field keeps its default and
/// does not affect the others.
pub fn parse_listing<T: AddressTagger + ?Sized>(
    html: &str,
    resolved_url: &str,
    query: &str,
    selectors: &Selectors,
    tagger: &T,
) -> BusinessRecord {
    let doc = Html::parse_document(html);
    let mut record = BusinessRecord::new(query);

    record.place_id = place_id_from_url(resolved_url);
    record.name = or_default("name", extract_name(&doc, selectors));
    record.rating = or_default("rating", extract_rating(&doc, selectors));
    record.website = or_default("website", extract_website(&doc, selectors));
    record.phone = or_default("phone", extract_phone(&doc, selectors));
    record.main_category = or_default("category", extract_category(&doc, selectors));
    record.broad_category = broad_category(&record.main_category).to_string();

    let raw_address = or_default("address", extract_address(&doc, selectors));
    record.address = normalize_with(tagger, &raw_address);
    record.full_address = record.address.full_address(&raw_address);
    ::log::debug!("Full address generated: {}", record.full_address);

    record.link = resolved_url.to_string();
    record
}

fn or_default<T: Default>(field: &str, value: Option<T>) -> T {
    value.unwrap_or_else(|| {
        ::log::debug!("No {} found, using default", field);
        T::default()
    })
}

pub fn extract_name(doc: &Html, selectors: &Selectors) -> Option<String> {
    select_text(doc, &selectors.title)
}

/// Star rating, clamped to 0-5. Anything that is not a number is treated as absent.
pub fn extract_rating(doc: &Html, selectors: &Selectors) -> Option<f64> {
    let text = select_text(doc, &selectors.rating)?;
    let rating: f64 = text.replace(',', ".").parse().ok()?;
    rating.is_finite().then(|| rating.clamp(0.0, 5.0))
}

pub fn extract_website(doc: &Html, selectors: &Selectors) -> Option<String> {
    select_first(doc, &selectors.website)?
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

pub fn extract_phone(doc: &Html, selectors: &Selectors) -> Option<String> {
    let phone = clean_phone(&select_text(doc, &selectors.phone)?);
    (!phone.is_empty()).then_some(phone)
}

pub fn extract_category(doc: &Html, selectors: &Selectors) -> Option<String> {
    select_text(doc, &selectors.category)
}

/// First non-empty address candidate, unless it is contaminated
pub fn extract_address(doc: &Html, selectors: &Selectors) -> Option<String> {
    let (selector, address) = selectors
        .address_candidates()
        .find_map(|css| select_text(doc, css).map(|text| (css, text)))?;
    ::log::debug!("Raw address extracted with {}: {}", selector, address);

    if is_contaminated(&address) {
        ::log::debug!("Discarding address containing page labels: {}", address);
        return None;
    }
    Some(address)
}

/// Strips the icon or label in front of a phone number, keeping an opening
/// parenthesis or plus sign that belongs to the number
pub fn clean_phone(raw: &str) -> String {
    raw.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '(' || c == '+'))
        .trim()
        .to_string()
}

pub fn broad_category(main_category: &str) -> &'static str {
    CATEGORY_MAPPING
        .iter()
        .find(|(category, _)| *category == main_category)
        .map_or(OTHER_CATEGORY, |(_, broad)| *broad)
}

pub fn is_contaminated(address: &str) -> bool {
    contains_any_ignore_case(address, CONTAMINATION_TOKENS)
}

/// Path segment after `/place/`, or empty
pub fn place_id_from_url(url: &str) -> String {
    url.rsplit_once("/place/")
        .and_then(|(_, rest)| rest.split('/').next())
        .unwrap_or_default()
        .to_string()
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        ::log::warn!("Ignoring invalid selector: {}", css);
        return None;
    };
    doc.select(&selector).next()
}

/// Whitespace-normalized text of the first match, `None` if missing or blank
fn select_text(doc: &Html, css: &str) -> Option<String> {
    let element = select_first(doc, css)?;
    let text = normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty()).then_some(text)
}

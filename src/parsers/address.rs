use crate::parsers::tagger::{AddressLabel, AddressTagger, RuleTagger, TaggedAddress};
use crate::results::{AddressComponents, DEFAULT_COUNTRY};

/// Street parts in the order they are joined
const STREET_LABELS: [AddressLabel; 6] = [
    AddressLabel::AddressNumber,
    AddressLabel::StreetNamePreDirectional,
    AddressLabel::StreetName,
    AddressLabel::StreetNamePostType,
    AddressLabel::OccupancyType,
    AddressLabel::OccupancyIdentifier,
];

/// Normalizes an address with the built-in [`RuleTagger`]
pub fn normalize(raw: &str) -> AddressComponents {
    normalize_with(&RuleTagger, raw)
}

/// Splits raw address text into components.
///
/// The tagger is tried first; if it rejects the text the address is split on
/// commas by position instead. Never fails: unparseable parts stay empty.
pub fn normalize_with<T: AddressTagger + ?Sized>(tagger: &T, raw: &str) -> AddressComponents {
    let raw = raw.trim();
    if raw.is_empty() {
        ::log::debug!("No address provided, returning defaults");
        return AddressComponents::default();
    }

    match tagger.tag(raw) {
        Ok(tagged) => {
            let components = from_tagged(&tagged);
            ::log::debug!("Parsed address components: {:?}", components);
            components
        }
        Err(e) => {
            ::log::debug!("Address tagging failed for `{}`: {}", raw, e);
            let components = split_by_position(raw);
            ::log::debug!("Fallback address components: {:?}", components);
            components
        }
    }
}

/// Builds components from tagger output. Country is always the default.
pub fn from_tagged(tagged: &TaggedAddress) -> AddressComponents {
    let street = STREET_LABELS
        .iter()
        .map(|label| tagged.get(*label))
        .collect::<Vec<_>>()
        .join(" ");

    AddressComponents {
        street: street.split_whitespace().collect::<Vec<_>>().join(" "),
        city: tagged.get(AddressLabel::PlaceName).to_string(),
        state: tagged.get(AddressLabel::StateName).to_string(),
        zip_code: tagged.get(AddressLabel::ZipCode).to_string(),
        country: DEFAULT_COUNTRY.to_string(),
    }
}

/// Positional comma split used when tagging fails.
///
/// Assumes `street, city, STATE ZIP, country`. Real addresses often differ,
/// so this is a best-effort guess and can assign parts to the wrong field.
pub fn split_by_position(raw: &str) -> AddressComponents {
    let parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut components = AddressComponents::default();

    if let Some(street) = parts.first() {
        components.street = street.to_string();
    }
    if let Some(city) = parts.get(1) {
        components.city = city.to_string();
    }
    if let Some(state_zip) = parts.get(2) {
        let (state, zip) = split_state_zip(state_zip);
        components.state = state.to_string();
        components.zip_code = zip.to_string();
    }
    if let Some(country) = parts.get(3) {
        components.country = country.to_string();
    }

    components
}

/// Splits on the first space: state before it, everything after it is the zip
fn split_state_zip(text: &str) -> (&str, &str) {
    match text.split_once(' ') {
        Some((state, zip)) => (state, zip.trim()),
        None => (text, ""),
    }
}

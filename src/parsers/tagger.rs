use crate::states;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

static HOUSE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+[A-Za-z]?(?:[-/]\d+[A-Za-z]?)?$").expect("house number pattern should be valid")
});

static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("zip pattern should be valid"));

static COUNTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:united states(?: of america)?|usa|u\.s\.a\.?|us)$")
        .expect("country pattern should be valid")
});

const DIRECTIONALS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "north", "south", "east", "west", "northeast",
    "northwest", "southeast", "southwest",
];

const STREET_TYPES: &[&str] = &[
    "aly", "alley", "ave", "av", "avenue", "blvd", "boulevard", "cir", "circle", "ct", "court",
    "ctr", "center", "cv", "cove", "dr", "drive", "expy", "expressway", "fwy", "freeway", "hwy",
    "highway", "ln", "lane", "loop", "pike", "pkwy", "parkway", "pl", "place", "plz", "plaza",
    "pt", "point", "rd", "road", "row", "run", "sq", "square", "st", "street", "ter", "terrace",
    "trl", "trail", "way", "xing", "crossing",
];

const OCCUPANCY_TYPES: &[&str] = &[
    "apt", "apartment", "bldg", "building", "dept", "fl", "floor", "lot", "ofc", "office", "rm",
    "room", "spc", "space", "ste", "suite", "trlr", "unit", "#",
];

/// Labels a tagger can assign to parts of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressLabel {
    LandmarkName,
    AddressNumber,
    StreetNamePreDirectional,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    OccupancyType,
    OccupancyIdentifier,
    PlaceName,
    StateName,
    ZipCode,
}

/// Labeled parts of one address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedAddress {
    labels: BTreeMap<AddressLabel, String>,
}

impl TaggedAddress {
    /// Value for a label, empty when the label was not assigned
    pub fn get(&self, label: AddressLabel) -> &str {
        self.labels.get(&label).map(String::as_str).unwrap_or("")
    }

    /// Assigns a label. Assigning the same label twice makes the address ambiguous.
    pub fn insert(
        &mut self,
        label: AddressLabel,
        value: impl Into<String>,
    ) -> Result<(), TagError> {
        if self.labels.contains_key(&label) {
            return Err(TagError::RepeatedLabel(label));
        }
        self.labels.insert(label, value.into());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("address is empty")]
    Empty,

    #[error("label {0:?} assigned more than once")]
    RepeatedLabel(AddressLabel),

    #[error("unrecognized address part `{0}`")]
    Unrecognized(String),
}

/// Splits free-text addresses into labeled parts
pub trait AddressTagger: Send + Sync {
    fn tag(&self, raw: &str) -> Result<TaggedAddress, TagError>;
}

/// Keyword and pattern based tagger for US addresses shaped like
/// `[landmark,] 123 N Main St Suite 4, City, ST 12345[, country]`.
///
/// Anything that does not fit the shape is rejected rather than guessed at.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

impl AddressTagger for RuleTagger {
    fn tag(&self, raw: &str) -> Result<TaggedAddress, TagError> {
        let mut segments: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.len() > 1 && segments.last().is_some_and(|last| COUNTRY.is_match(last)) {
            segments.pop();
        }

        let Some(state_zip) = segments.pop() else {
            return Err(TagError::Empty);
        };

        let mut tagged = TaggedAddress::default();
        tag_state_zip(state_zip, &mut tagged)?;

        // A lone segment is the street if it starts with a number, else the city
        let street_only = segments.len() == 1 && starts_with_number(segments[0]);
        if !street_only {
            if let Some(city) = segments.pop() {
                tagged.insert(AddressLabel::PlaceName, city)?;
            }
        }

        if !segments.is_empty() {
            tag_street_lines(&segments, &mut tagged)?;
        }

        Ok(tagged)
    }
}

fn tag_state_zip(segment: &str, tagged: &mut TaggedAddress) -> Result<(), TagError> {
    let mut tokens: Vec<&str> = segment.split_whitespace().collect();

    if tokens.last().is_some_and(|token| ZIP_CODE.is_match(token)) {
        if let Some(zip) = tokens.pop() {
            tagged.insert(AddressLabel::ZipCode, zip)?;
        }
    }

    let state = tokens.join(" ");
    if state.is_empty() {
        if tagged.is_empty() {
            return Err(TagError::Unrecognized(segment.to_string()));
        }
        return Ok(());
    }

    if !states::is_state(&state) {
        return Err(TagError::Unrecognized(segment.to_string()));
    }
    tagged.insert(AddressLabel::StateName, state)
}

/// Street line is the first line starting with a house number. Lines before
/// it name a landmark, lines after it must be occupancy.
fn tag_street_lines(lines: &[&str], tagged: &mut TaggedAddress) -> Result<(), TagError> {
    let street_index = lines
        .iter()
        .position(|line| starts_with_number(line))
        .unwrap_or(0);

    if street_index > 0 {
        tagged.insert(AddressLabel::LandmarkName, lines[..street_index].join(", "))?;
    }

    tag_street_line(lines[street_index], tagged)?;

    for line in &lines[street_index + 1..] {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !is_occupancy(tokens[0]) {
            return Err(TagError::Unrecognized(line.to_string()));
        }
        tag_occupancy(&tokens, tagged)?;
    }

    Ok(())
}

fn tag_street_line(line: &str, tagged: &mut TaggedAddress) -> Result<(), TagError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut start = 0;

    if HOUSE_NUMBER.is_match(tokens[0]) {
        tagged.insert(AddressLabel::AddressNumber, tokens[0])?;
        start = 1;
    }

    let end = tokens[start..]
        .iter()
        .position(|token| is_occupancy(token))
        .map_or(tokens.len(), |offset| start + offset);

    // "N Main St" and "E Broadway" carry a pre-directional, "North St" does not
    let remaining = end - start;
    if remaining >= 2
        && is_directional(tokens[start])
        && (remaining >= 3 || !is_street_type(tokens[start + 1]))
    {
        tagged.insert(AddressLabel::StreetNamePreDirectional, tokens[start])?;
        start += 1;
    }

    let mut name = &tokens[start..end];

    if let [rest @ .., last] = name {
        let post_directional = match rest {
            [] => false,
            [first] => !is_street_type(first),
            _ => true,
        };
        if post_directional && is_directional(last) {
            tagged.insert(AddressLabel::StreetNamePostDirectional, *last)?;
            name = rest;
        }
    }

    if let [rest @ .., last] = name {
        if !rest.is_empty() && is_street_type(last) {
            tagged.insert(AddressLabel::StreetNamePostType, *last)?;
            name = rest;
        }
    }

    if name.is_empty() {
        return Err(TagError::Unrecognized(line.to_string()));
    }
    tagged.insert(AddressLabel::StreetName, name.join(" "))?;

    if end < tokens.len() {
        tag_occupancy(&tokens[end..], tagged)?;
    }

    Ok(())
}

fn tag_occupancy(tokens: &[&str], tagged: &mut TaggedAddress) -> Result<(), TagError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(());
    };

    // "#1200" is an identifier on its own
    if first.len() > 1 && first.starts_with('#') {
        let mut identifier = vec![*first];
        identifier.extend_from_slice(rest);
        return tagged.insert(AddressLabel::OccupancyIdentifier, identifier.join(" "));
    }

    tagged.insert(AddressLabel::OccupancyType, *first)?;
    if !rest.is_empty() {
        tagged.insert(AddressLabel::OccupancyIdentifier, rest.join(" "))?;
    }
    Ok(())
}

fn starts_with_number(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| HOUSE_NUMBER.is_match(token))
}

fn keyword(token: &str) -> String {
    token.trim_end_matches('.').to_lowercase()
}

fn is_directional(token: &str) -> bool {
    DIRECTIONALS.contains(&keyword(token).as_str())
}

fn is_street_type(token: &str) -> bool {
    STREET_TYPES.contains(&keyword(token).as_str())
}

fn is_occupancy(token: &str) -> bool {
    token.starts_with('#') || OCCUPANCY_TYPES.contains(&keyword(token).as_str())
}

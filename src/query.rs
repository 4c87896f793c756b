use serde::{Deserialize, Serialize};
use url::Url;

/// What a search location refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationKind {
    City,
    ZipCode,
}

/// A single business search, e.g. "liquor store in Mobile, AL"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    business_type: String,
    location: String,
    location_kind: LocationKind,
    state: Option<String>,
}

impl Query {
    pub fn new(
        business_type: impl Into<String>,
        location: impl Into<String>,
        location_kind: LocationKind,
    ) -> Self {
        Self {
            business_type: business_type.into(),
            location: location.into(),
            location_kind,
            state: None,
        }
    }

    /// Qualify the location with a state code
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.state = (!state.trim().is_empty()).then_some(state);
        self
    }

    pub fn business_type(&self) -> &str {
        &self.business_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn location_kind(&self) -> LocationKind {
        self.location_kind
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The text typed into the search box
    pub fn text(&self) -> String {
        match &self.state {
            Some(state) => format!("{} in {}, {}", self.business_type, self.location, state),
            None => format!("{} in {}", self.business_type, self.location),
        }
    }

    /// Search page URL for this query
    pub fn search_url(&self, base: &str, language: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&self.text())
            .push("");
        if !language.is_empty() {
            url.query_pairs_mut().append_pair("hl", language);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_with_state() {
        let query = Query::new("liquor store", "Mobile", LocationKind::City).with_state("AL");
        assert_eq!(query.text(), "liquor store in Mobile, AL");
    }

    #[test]
    fn test_text_without_state() {
        let query = Query::new("bar", "36602", LocationKind::ZipCode).with_state("  ");
        assert_eq!(query.state(), None);
        assert_eq!(query.text(), "bar in 36602");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let query = Query::new("liquor store", "Mobile", LocationKind::City).with_state("AL");
        let url = query
            .search_url("https://www.google.com/maps/search/", "en")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/search/liquor%20store%20in%20Mobile,%20AL/?hl=en"
        );
    }

    #[test]
    fn test_search_url_escapes_slashes_and_hashes() {
        let query = Query::new("24/7 store #1", "Austin", LocationKind::City);
        let url = query
            .search_url("https://www.google.com/maps/search", "")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/maps/search/24%2F7%20store%20%231%20in%20Austin/"
        );
    }

    #[test]
    fn test_search_url_rejects_bad_base() {
        let query = Query::new("bar", "Austin", LocationKind::City);
        assert!(query.search_url("not a url", "en").is_err());
    }
}

/// US state and territory names with their postal codes
pub const STATE_NAME_TO_CODE: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virgin Islands", "VI"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Postal code for a state name, case-insensitive. Codes map to themselves.
pub fn state_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATE_NAME_TO_CODE
        .iter()
        .find(|(full, code)| full.eq_ignore_ascii_case(name) || code.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Returns true if the text is a state name or postal code
pub fn is_state(text: &str) -> bool {
    state_code(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_lookup() {
        assert_eq!(state_code("Alabama"), Some("AL"));
        assert_eq!(state_code("new york"), Some("NY"));
        assert_eq!(state_code(" IL "), Some("IL"));
        assert_eq!(state_code("tx"), Some("TX"));
        assert_eq!(state_code("Atlantis"), None);
    }

    #[test]
    fn test_is_state() {
        assert!(is_state("Puerto Rico"));
        assert!(!is_state("Springfield"));
        assert!(!is_state(""));
    }
}

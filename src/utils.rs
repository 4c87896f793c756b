use std::time::Duration;

/// Sleeps for the given duration; zero returns immediately
pub async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive check for any of the given lowercase needles
pub fn contains_any_ignore_case(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n b\t\tc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_contains_any_ignore_case() {
        assert!(contains_any_ignore_case("Hours: OPEN now", &["open"]));
        assert!(!contains_any_ignore_case("123 Main St", &["open", "hours"]));
    }

    #[tokio::test]
    async fn test_zero_pause_returns() {
        pause(Duration::ZERO).await;
    }
}

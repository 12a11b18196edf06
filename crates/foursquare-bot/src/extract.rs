//! Free-text parsing of a search request.
//!
//! Each field has its own extractor returning `None` on a miss; the caller
//! decides what a miss means for that field.

use foursquare_client::SearchParams;
use once_cell::sync::Lazy;
use regex::Regex;

/// Search term used when the message carries filters but no trailing word.
pub const DEFAULT_QUERY: &str = "food";

static NEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'[A-Za-z]\w+,?[\s\w+]+?'").expect("near regex"));
static RADIUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3,}").expect("radius regex"));
static QUERY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s([A-Za-z]+)\n?\z").expect("query regex"));

/// First single-quoted phrase starting with a letter, quotes included.
pub fn extract_near(content: &str) -> Option<&str> {
    NEAR_RE.find(content).map(|found| found.as_str())
}

/// First run of three or more digits anywhere in the text.
pub fn extract_radius(content: &str) -> Option<&str> {
    RADIUS_RE.find(content).map(|found| found.as_str())
}

/// Trailing word of letters preceded by whitespace.
pub fn extract_query(content: &str) -> Option<&str> {
    QUERY_RE
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|found| found.as_str())
}

/// Assembles the request for one message. `radius` and `query` are only
/// considered when the message has at least two words.
pub fn search_params(content: &str, oauth_token: &str) -> SearchParams {
    let has_filters = content.split_whitespace().nth(1).is_some();

    let radius = has_filters
        .then(|| extract_radius(content))
        .flatten()
        .map(str::to_owned);
    let query = has_filters
        .then(|| extract_query(content).unwrap_or(DEFAULT_QUERY).to_owned());

    SearchParams::new(oauth_token)
        .near(extract_near(content).map(str::to_owned))
        .radius(radius)
        .query(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_keeps_the_quotes() {
        assert_eq!(
            extract_near("@foursquare 'Millenium Park' 8000 donuts"),
            Some("'Millenium Park'")
        );
        assert_eq!(extract_near("@foursquare 'Chicago, IL'"), Some("'Chicago, IL'"));
        assert_eq!(
            extract_near("@foursquare 'Melbourne, Australia' 40000 seafood"),
            Some("'Melbourne, Australia'")
        );
    }

    #[test]
    fn near_requires_leading_letter_and_quotes() {
        assert_eq!(extract_near("@foursquare '9th Street' pizza"), None);
        assert_eq!(extract_near("@foursquare Chicago"), None);
        assert_eq!(extract_near("@foursquare 'C'"), None);
    }

    #[test]
    fn radius_is_first_long_digit_run() {
        assert_eq!(extract_radius("@foursquare 'Boston' 12 500 2000"), Some("500"));
        assert_eq!(extract_radius("@foursquare 'Boston' 99 pizza"), None);
        assert_eq!(extract_radius("zip 60601x"), Some("60601"));
    }

    #[test]
    fn query_is_trailing_word() {
        assert_eq!(extract_query("@foursquare 'Boston' 800 sushi"), Some("sushi"));
        assert_eq!(extract_query("@foursquare 'Boston' sushi\n"), Some("sushi"));
        assert_eq!(extract_query("@foursquare 'Boston'"), None);
        assert_eq!(extract_query("@foursquare 'Boston' 800"), None);
        assert_eq!(extract_query("@foursquare 'Boston' ramen2"), None);
    }

    #[test]
    fn full_request_extracts_every_field() {
        let params = search_params("@foursquare 'Millenium Park' 8000 donuts", "key");
        assert_eq!(params.near.as_deref(), Some("'Millenium Park'"));
        assert_eq!(params.radius.as_deref(), Some("8000"));
        assert_eq!(params.query.as_deref(), Some("donuts"));
        assert_eq!(params.limit, 3);
        assert_eq!(params.oauth_token, "key");
    }

    #[test]
    fn location_only_defaults_query_and_omits_radius() {
        let params = search_params("@foursquare 'Chicago, IL'", "key");
        assert_eq!(params.near.as_deref(), Some("'Chicago, IL'"));
        assert_eq!(params.radius, None);
        assert_eq!(params.query.as_deref(), Some("food"));
    }

    #[test]
    fn single_word_skips_optional_fields() {
        let params = search_params("@foursquare", "key");
        assert_eq!(params.near, None);
        assert_eq!(params.radius, None);
        assert_eq!(params.query, None);
    }

    #[test]
    fn missing_location_leaves_near_unset() {
        let params = search_params("@foursquare Chicago 500 tacos", "key");
        assert_eq!(params.near, None);
        assert_eq!(params.radius.as_deref(), Some("500"));
        assert_eq!(params.query.as_deref(), Some("tacos"));
    }
}

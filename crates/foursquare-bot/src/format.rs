use foursquare_client::Venue;

pub const INVALID_REQUEST: &str = "Invalid Request\nIf stuck, try '@foursquare help'.";

pub const HELP_TEXT: &str = "
The Foursquare bot can receive keyword limiters that specify the location, distance (meters) and
cusine of a restaurant in that exact order.
Please note the required use of quotes in the search location.

Example Inputs:
@foursquare 'Millenium Park' 8000 donuts
@foursquare 'Melbourne, Australia' 40000 seafood
                ";

pub const USAGE: &str = "
This plugin allows users to search for restaurants nearby an inputted
location to a limit of 3 venues for every location. The name, address
and description of the restaurant will be outputted.
It looks for messages starting with '@foursquare'.
If you need help, simply type:
@foursquare /help into the Compose Message box

Sample input:
@foursquare Chicago, IL
@foursquare help
";

/// The three lines shown for each venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueSummary {
    pub name: String,
    pub address: String,
    pub category: String,
}

impl From<&Venue> for VenueSummary {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            address: venue.formatted_address(),
            category: venue.category_label().unwrap_or_default().to_string(),
        }
    }
}

impl VenueSummary {
    pub fn render(&self) -> String {
        format!("{}\n{}\n{}", self.name, self.address, self.category)
    }
}

pub fn format_venues(venues: &[Venue]) -> String {
    venues
        .iter()
        .map(|venue| VenueSummary::from(venue).render())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Success reply. A missing location renders as an empty phrase.
pub fn venues_reply(near: Option<&str>, venues: &[Venue]) -> String {
    format!(
        "Food nearby {} coming right up:\n{}",
        near.unwrap_or_default(),
        format_venues(venues)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use foursquare_client::types::{Category, Location};

    fn venue(name: &str, address: &[&str], category: &str) -> Venue {
        Venue {
            id: None,
            name: name.to_string(),
            location: Location {
                formatted_address: address.iter().map(|line| (*line).to_string()).collect(),
            },
            categories: vec![Category {
                name: None,
                plural_name: category.to_string(),
            }],
        }
    }

    #[test]
    fn venue_renders_three_lines() {
        let rendered = VenueSummary::from(&venue(
            "Lou Malnati's",
            &["439 N Wells St", "Chicago, IL 60654"],
            "Pizza Places",
        ))
        .render();
        assert_eq!(rendered, "Lou Malnati's\n439 N Wells St, Chicago, IL 60654\nPizza Places");
    }

    #[test]
    fn venues_are_joined_without_blank_lines() {
        let venues = vec![
            venue("A", &["1 Main St"], "Cafés"),
            venue("B", &["2 Main St"], "Bakeries"),
        ];
        assert_eq!(
            format_venues(&venues),
            "A\n1 Main St\nCafés\nB\n2 Main St\nBakeries"
        );
    }

    #[test]
    fn reply_is_prefixed_with_location() {
        let venues = vec![venue("A", &["1 Main St"], "Cafés")];
        assert_eq!(
            venues_reply(Some("'Chicago'"), &venues),
            "Food nearby 'Chicago' coming right up:\nA\n1 Main St\nCafés"
        );
    }

    #[test]
    fn help_text_keeps_trailing_indentation() {
        assert!(HELP_TEXT.starts_with("\nThe Foursquare bot can receive keyword limiters"));
        assert!(HELP_TEXT.ends_with("40000 seafood\n                "));
    }

    #[test]
    fn empty_result_keeps_header() {
        assert_eq!(
            venues_reply(Some("'Nowhere'"), &[]),
            "Food nearby 'Nowhere' coming right up:\n"
        );
    }
}

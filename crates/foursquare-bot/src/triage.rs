/// Spellings of the bot's handle. Matching is case-sensitive containment, so
/// `@4sq` also fires inside `@4square` or `x@4sqy`.
pub const TRIGGERS: [&str; 5] = ["@FourSquare", "@Foursquare", "@foursquare", "@4square", "@4sq"];

pub const HELP_TOKEN: &str = "/help";

/// Whether the message is addressed to the bot at all.
pub fn is_triggered(content: &str) -> bool {
    TRIGGERS.iter().any(|trigger| content.contains(trigger))
}

/// Whether one of the whitespace-separated words is exactly `/help`.
pub fn is_help_request(content: &str) -> bool {
    content.split_whitespace().any(|word| word == HELP_TOKEN)
}

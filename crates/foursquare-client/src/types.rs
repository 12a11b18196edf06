use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of venues requested per search.
pub const DEFAULT_LIMIT: u32 = 3;
/// Date-coded API version the response shapes below were written against.
pub const API_VERSION: u32 = 20170108;

/// Query string for `GET /venues/search`.
///
/// Built once per message and never mutated afterwards; optional fields that
/// are `None` are left out of the request entirely.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<String>,
    pub v: u32,
    pub oauth_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl SearchParams {
    pub fn new(oauth_token: impl Into<String>) -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            near: None,
            v: API_VERSION,
            oauth_token: oauth_token.into(),
            radius: None,
            query: None,
        }
    }

    #[must_use]
    pub fn near(mut self, near: Option<String>) -> Self {
        self.near = near;
        self
    }

    #[must_use]
    pub fn radius(mut self, radius: Option<String>) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }
}

impl fmt::Debug for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchParams")
            .field("limit", &self.limit)
            .field("near", &self.near)
            .field("v", &self.v)
            .field("oauth_token", &"<redacted>")
            .field("radius", &self.radius)
            .field("query", &self.query)
            .finish()
    }
}

/// Envelope returned by every v2 endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub meta: Meta,
    #[serde(default)]
    pub response: SearchPayload,
}

impl SearchResponse {
    /// Whether the embedded API code reports success. Foursquare can answer
    /// HTTP 200 and still flag the request as failed here.
    pub fn is_success(&self) -> bool {
        self.meta.code == 200
    }

    pub fn venues(&self) -> &[Venue] {
        &self.response.venues
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub venues: Vec<Venue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Venue {
    /// Address lines joined the way Foursquare displays them.
    pub fn formatted_address(&self) -> String {
        self.location.formatted_address.join(", ")
    }

    /// Plural label of the primary (first) category.
    pub fn category_label(&self) -> Option<&str> {
        self.categories
            .first()
            .map(|category| category.plural_name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub formatted_address: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub plural_name: String,
}

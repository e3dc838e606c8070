//! The record shape emitted by the page-side capture agent.
//!
//! Every field is optional: the agent sends whatever it managed to pull out
//! of a result card, and the sink accepts partially populated records. Wire
//! names are camelCase (including the historical `...URL` spellings), so the
//! serde attributes here are the contract with the in-page script.

use serde::{Deserialize, Serialize};

/// Fixed sink column order. Rows are always written with exactly these
/// columns; absent fields become empty cells, never omitted columns.
pub const SINK_COLUMNS: [&str; 18] = [
    "name",
    "fullAddress",
    "phones",
    "website",
    "domain",
    "averageRating",
    "reviewCount",
    "categories",
    "openingHours",
    "placeId",
    "kgmid",
    "cid",
    "latitude",
    "longitude",
    "googleMapsURL",
    "googleKnowledgeURL",
    "featuredImage",
    "scrapedAt",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    /// Comma-joined phone numbers, as flattened by the capture agent.
    #[serde(default)]
    pub phones: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    /// Comma-joined category labels.
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub kgmid: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, rename = "googleMapsURL")]
    pub google_maps_url: Option<String>,
    #[serde(default, rename = "googleKnowledgeURL")]
    pub google_knowledge_url: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Capture timestamp as reported by the agent (ISO 8601 string).
    #[serde(default)]
    pub scraped_at: Option<String>,
}

impl BusinessRecord {
    /// Renders the record as one sink row in [`SINK_COLUMNS`] order.
    #[must_use]
    pub fn sink_row(&self) -> [String; 18] {
        fn cell(value: Option<&str>) -> String {
            value.unwrap_or_default().to_owned()
        }
        fn num<T: ToString>(value: Option<&T>) -> String {
            value.map(ToString::to_string).unwrap_or_default()
        }

        [
            cell(self.name.as_deref()),
            cell(self.full_address.as_deref()),
            cell(self.phones.as_deref()),
            cell(self.website.as_deref()),
            cell(self.domain.as_deref()),
            num(self.average_rating.as_ref()),
            num(self.review_count.as_ref()),
            cell(self.categories.as_deref()),
            cell(self.opening_hours.as_deref()),
            cell(self.place_id.as_deref()),
            cell(self.kgmid.as_deref()),
            cell(self.cid.as_deref()),
            num(self.latitude.as_ref()),
            num(self.longitude.as_ref()),
            cell(self.google_maps_url.as_deref()),
            cell(self.google_knowledge_url.as_deref()),
            cell(self.featured_image.as_deref()),
            cell(self.scraped_at.as_deref()),
        ]
    }
}

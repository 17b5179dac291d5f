use serde::{Serialize, Serializer};

use super::MISSING_VALUE;

/// Column set shared by the CSV and JSON writers. Order is part of the
/// output contract and must stay in sync with the field order below.
pub const COLUMNS: [&str; 7] = [
    "title",
    "seller_name",
    "seller_level",
    "price",
    "rating",
    "num_reviews",
    "gig_url",
];

/// One gig from a search results page. `gig_url` is the only required
/// field; a fragment that yields no URL never becomes a `GigListing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GigListing {
    #[serde(serialize_with = "na_if_none")]
    pub title: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub seller_name: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub seller_level: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub price: Option<f64>,
    #[serde(serialize_with = "na_if_none")]
    pub rating: Option<f64>,
    #[serde(serialize_with = "na_if_none")]
    pub num_reviews: Option<u32>,
    pub gig_url: String,
}

/// Serialize `None` as the "N/A" marker instead of `null`, so both output
/// formats share a single missing-value convention.
fn na_if_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(MISSING_VALUE),
    }
}

impl GigListing {
    /// Cell values in column order, with missing fields as the marker.
    pub fn csv_fields(&self) -> [String; 7] {
        [
            text_or_missing(&self.title),
            text_or_missing(&self.seller_name),
            text_or_missing(&self.seller_level),
            display_or_missing(&self.price),
            display_or_missing(&self.rating),
            display_or_missing(&self.num_reviews),
            self.gig_url.clone(),
        ]
    }
}

fn text_or_missing(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING_VALUE.to_string())
}

fn display_or_missing<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => MISSING_VALUE.to_string(),
    }
}

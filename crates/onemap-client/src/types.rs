use serde::Deserialize;

/// Response body of the OneMap elastic search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Total number of matches across all pages
    pub found: i64,
    #[serde(default)]
    pub total_num_pages: Option<u32>,
    #[serde(default)]
    pub page_num: Option<u32>,
    /// OneMap may omit the list entirely when nothing matched
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// First match in provider order, if the provider reported any
    pub fn first_match(&self) -> Option<&SearchResult> {
        if self.found <= 0 {
            return None;
        }
        self.results.first()
    }
}

/// A single address match. OneMap sends every field as a string.
///
/// The address fields are required; a payload missing any of them fails to
/// decode rather than producing a partially filled match.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "SEARCHVAL", default)]
    pub search_val: Option<String>,
    #[serde(rename = "BLK_NO")]
    pub block_number: String,
    #[serde(rename = "ROAD_NAME")]
    pub road_name: String,
    #[serde(rename = "BUILDING")]
    pub building: String,
    #[serde(rename = "ADDRESS")]
    pub address: String,
    #[serde(rename = "POSTAL")]
    pub postal: String,
    #[serde(rename = "X", default)]
    pub x: Option<String>,
    #[serde(rename = "Y", default)]
    pub y: Option<String>,
    #[serde(rename = "LATITUDE", default)]
    pub latitude: Option<String>,
    #[serde(rename = "LONGITUDE", default)]
    pub longitude: Option<String>,
}

use serde::{Deserialize, Serialize};

use crate::hubspot_structs::non_blank;

/// One entry of a Geoapify `format=json` search response.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>, // catch-all
}

impl GeocodeResult {
    /// Best available locality name: city, then county, then state.
    pub fn locality(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
            .or_else(|| non_blank(self.county.as_deref()))
            .or_else(|| non_blank(self.state.as_deref()))
    }
}

/// Outcome of a single lookup. `best` is `None` when the provider had no match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeLookup {
    pub best: Option<GeocodeResult>,
    pub raw: serde_json::Value,
}

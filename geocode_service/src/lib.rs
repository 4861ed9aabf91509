use reqwest::Response;
use thiserror::Error;

use shared_lib::env_utils::GeoapifyConfig;
use shared_lib::geo_structs::{GeocodeLookup, GeocodeResult};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geoapify returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("request to Geoapify failed")]
    Transport(#[source] reqwest::Error),
}

impl GeocodeError {
    pub fn provider_message(&self) -> String {
        match self {
            GeocodeError::Upstream { message, .. } => message.clone(),
            GeocodeError::Transport(err) => err.to_string(),
        }
    }
}

// the api key travels in the query string, keep it out of error messages and logs
impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Transport(err.without_url())
    }
}

#[derive(Debug, Clone)]
pub struct GeoapifyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(config: &GeoapifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Looks up a postal code. No match is a normal outcome: `best` is `None`.
    pub async fn geocode(
        &self,
        postcode: &str,
        country: &str,
    ) -> Result<GeocodeLookup, GeocodeError> {
        tracing::trace!("Geocoding postcode {postcode} in {country}");
        let resp = self
            .client
            .get(format!("{}/v1/geocode/search", self.base_url))
            .query(&[
                ("postcode", postcode),
                ("country", country),
                ("format", "json"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let raw = resp.json::<serde_json::Value>().await?;

        Ok(GeocodeLookup {
            best: first_result(&raw),
            raw,
        })
    }
}

/// Applies the locality policy: city, then county, then state.
pub fn resolve_locality(result: &GeocodeResult) -> Option<String> {
    result.locality().map(str::to_string)
}

fn first_result(raw: &serde_json::Value) -> Option<GeocodeResult> {
    let first = raw.get("results")?.as_array()?.first()?;
    match serde_json::from_value::<GeocodeResult>(first.clone()) {
        Ok(result) => Some(result),
        Err(err) => {
            tracing::warn!("Unreadable geocoding result, treating as no match: {}", err);
            None
        }
    }
}

async fn check_status(resp: Response) -> Result<Response, GeocodeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    // Geoapify errors look like {"statusCode":401,"error":"Unauthorized","message":"Invalid apiKey"}
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(GeocodeError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> GeoapifyClient {
        GeoapifyClient::new(&GeoapifyConfig {
            api_key: "geo-key".to_string(),
            base_url: server.base_url(),
        })
    }

    #[tokio::test]
    async fn geocode_returns_first_result() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/geocode/search")
                    .query_param("postcode", "48201")
                    .query_param("country", "US")
                    .query_param("format", "json")
                    .query_param("apiKey", "geo-key");
                then.status(200).json_body(json!({
                    "results": [
                        {"postcode": "48201", "country_code": "us", "city": "Detroit", "county": "Wayne", "state": "Michigan"},
                        {"postcode": "48201", "city": "Elsewhere"}
                    ],
                    "query": {"postcode": "48201"}
                }));
            })
            .await;

        let lookup = client(&server).geocode("48201", "US").await.unwrap();

        mock.assert_async().await;
        let best = lookup.best.expect("a match");
        assert_eq!(best.city.as_deref(), Some("Detroit"));
        assert_eq!(best.country_code.as_deref(), Some("us"));
        assert_eq!(resolve_locality(&best).as_deref(), Some("Detroit"));
        assert_eq!(lookup.raw["query"]["postcode"], json!("48201"));
    }

    #[tokio::test]
    async fn no_results_is_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/geocode/search");
                then.status(200).json_body(json!({"results": []}));
            })
            .await;

        let lookup = client(&server).geocode("00000", "US").await.unwrap();
        assert!(lookup.best.is_none());
        assert_eq!(lookup.raw, json!({"results": []}));
    }

    #[tokio::test]
    async fn surfaces_provider_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/geocode/search");
                then.status(401).json_body(json!({
                    "statusCode": 401,
                    "error": "Unauthorized",
                    "message": "Invalid apiKey"
                }));
            })
            .await;

        let err = client(&server).geocode("48201", "US").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Upstream { status: 401, .. }));
        assert_eq!(err.provider_message(), "Invalid apiKey");
    }

    #[test]
    fn locality_order_is_city_county_state() {
        let result: GeocodeResult =
            serde_json::from_value(json!({"city": null, "county": "Wayne", "state": "MI"}))
                .unwrap();
        assert_eq!(resolve_locality(&result).as_deref(), Some("Wayne"));

        let empty = GeocodeResult::default();
        assert_eq!(resolve_locality(&empty), None);
    }

    #[test]
    fn missing_results_key_means_no_match() {
        assert!(first_result(&json!({"features": []})).is_none());
        assert!(first_result(&json!({"results": "nope"})).is_none());
    }
}

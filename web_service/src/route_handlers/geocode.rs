use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use geocode_service::resolve_locality;
use shared_lib::hubspot_structs::non_blank;

use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct GeocodeParams {
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// Manual lookup, handy for checking what a zip resolves to without touching a contact.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(postcode) = non_blank(params.postcode.as_deref()).map(str::trim) else {
        return Err(ApiError::BadRequest(
            "You need to pass ?postcode=XXXX".to_string(),
        ));
    };
    let country = non_blank(params.country.as_deref())
        .map(str::trim)
        .unwrap_or(&state.default_country);

    let lookup = state
        .geocoder
        .geocode(postcode, country)
        .await
        .inspect_err(|err| error!("Failed to geocode {}: {}", postcode, err))?;

    let city = lookup.best.as_ref().and_then(resolve_locality);

    Ok(Json(json!({
        "postcode": postcode,
        "country": country,
        "city": city,
        "raw": lookup.raw,
    })))
}

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use shared_lib::hubspot_structs::non_blank;
use sync_service::sync_city_from_zip;

use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct UpdateCityParams {
    pub country: Option<String>,
}

pub async fn handler(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    Query(params): Query<UpdateCityParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let country = non_blank(params.country.as_deref())
        .map(str::trim)
        .unwrap_or(&state.default_country);

    let outcome = sync_city_from_zip(&state.hubspot, &state.geocoder, &contact_id, country)
        .await
        .inspect_err(|err| warn!("Failed to update city for contact {}: {}", contact_id, err))?;

    Ok(Json(json!({
        "success": true,
        "contactId": outcome.contact_id,
        "zip": outcome.zip,
        "city": outcome.city,
        "message": format!("Contact {} updated with city: {}", outcome.contact_id, outcome.city),
    })))
}

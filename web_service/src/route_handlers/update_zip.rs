use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use shared_lib::hubspot_structs::{non_blank, string_or_number, ZIP_PROPERTY};

use crate::error::ApiError;
use crate::AppState;

const UPDATED_CONTACT_PROPERTIES: &[&str] = &["zip", "firstname", "lastname"];

#[derive(Deserialize, Debug)]
pub struct UpdateZipRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub zip: Option<String>,
}

/// Writes the zip as given, no geocoding. The webhook picks up the change if subscribed.
pub async fn handler(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    payload: Result<Json<UpdateZipRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected update-zip body: {}", rejection);
            return Err(missing_zip());
        }
    };
    let Some(zip) = non_blank(request.zip.as_deref()).map(str::trim) else {
        return Err(missing_zip());
    };

    let properties = HashMap::from([(ZIP_PROPERTY, zip)]);
    state
        .hubspot
        .update_contact(&contact_id, &properties)
        .await
        .inspect_err(|err| error!("Failed to update zip for contact {}: {}", contact_id, err))?;

    let contact = state
        .hubspot
        .get_contact(&contact_id, UPDATED_CONTACT_PROPERTIES)
        .await
        .inspect_err(|err| error!("Failed to re-read contact {}: {}", contact_id, err))?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Zip updated for contact {contact_id}"),
        "contact": contact,
    })))
}

fn missing_zip() -> ApiError {
    ApiError::BadRequest("ZIP not provided in the request body".to_string())
}

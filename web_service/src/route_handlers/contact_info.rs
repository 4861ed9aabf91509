use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use tracing::error;

use shared_lib::hubspot_structs::CONTACT_INFO_PROPERTIES;

use crate::error::ApiError;
use crate::AppState;

pub async fn handler(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let contact = state
        .hubspot
        .get_contact(&contact_id, CONTACT_INFO_PROPERTIES)
        .await
        .inspect_err(|err| error!("Failed to fetch contact {}: {}", contact_id, err))?;

    Ok(Json(json!({
        "success": true,
        "contact": contact,
    })))
}

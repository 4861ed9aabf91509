use axum::extract::State;
use axum::Json;
use tracing::error;

use shared_lib::hubspot_structs::CONTACT_INFO_PROPERTIES;

use crate::error::ApiError;
use crate::AppState;

const LIST_LIMIT: u32 = 10;

pub async fn handler(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let contacts = state
        .hubspot
        .list_contacts(CONTACT_INFO_PROPERTIES, LIST_LIMIT)
        .await
        .inspect_err(|err| error!("Failed to list contacts: {}", err))?;

    Ok(Json(contacts))
}

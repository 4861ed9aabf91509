use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use sync_service::process_webhook_events;

use crate::AppState;

/// HubSpot delivers a JSON array of events. Each element is decoded on its own
/// and per-event failures are logged and swallowed. Only a body that is not a
/// JSON array is answered with a 500.
pub async fn handler(State(state): State<AppState>, body: Bytes) -> StatusCode {
    tracing::debug!("Webhook events received: {}", String::from_utf8_lossy(&body));

    let events: Vec<serde_json::Value> = match serde_json::from_slice(&body) {
        Ok(events) => events,
        Err(err) => {
            tracing::error!("Failed to parse webhook payload: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    process_webhook_events(
        &state.hubspot,
        &state.geocoder,
        &events,
        &state.default_country,
    )
    .await;

    StatusCode::OK
}

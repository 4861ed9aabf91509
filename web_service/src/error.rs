use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use geocode_service::GeocodeError;
use hubspot_service::HubspotError;
use shared_lib::utils::error_chain;
use sync_service::SyncError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Crm(#[from] HubspotError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),

            ApiError::Sync(SyncError::MissingPostalCode { contact, .. }) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "No zip found for this contact",
                    "contact": contact,
                }),
            ),
            ApiError::Sync(SyncError::NoGeocodeMatch { zip }) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Address not found by the geocoding provider",
                    "zip": zip,
                }),
            ),
            ApiError::Sync(SyncError::NoLocalityResolved { zip, result }) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "City not found for this zip",
                    "zip": zip,
                    "geoResponse": result,
                }),
            ),

            ApiError::Sync(SyncError::Crm(err @ HubspotError::InvalidContactId(_)))
            | ApiError::Crm(err @ HubspotError::InvalidContactId(_)) => {
                (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
            }

            ApiError::Sync(SyncError::Crm(err)) | ApiError::Crm(err) => {
                upstream(err.provider_message(), err)
            }
            ApiError::Sync(SyncError::Geocode(err)) | ApiError::Geocode(err) => {
                upstream(err.provider_message(), err)
            }
        };

        (status, Json(body)).into_response()
    }
}

fn upstream(message: String, err: &dyn std::error::Error) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": message,
            "stack": error_chain(err),
        }),
    )
}

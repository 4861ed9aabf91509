pub mod error;
pub mod route_handlers;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use geocode_service::GeoapifyClient;
use hubspot_service::HubspotClient;
use shared_lib::env_utils::AppConfig;
use shared_lib::utils;

/// Clients are built once from the start-up config and cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub hubspot: HubspotClient,
    pub geocoder: GeoapifyClient,
    pub default_country: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            hubspot: HubspotClient::new(&config.hubspot),
            geocoder: GeoapifyClient::new(&config.geoapify),
            default_country: config.default_country.clone(),
        }
    }
}

#[derive(Clone)]
struct RequestUri(Uri);

/**
 * main router for the app, the contact routes plus the hubspot webhook route
 **/
pub fn get_main_router(state: AppState) -> Router {
    tracing::debug!("initializing router(s) ...");

    Router::new()
        .route(
            "/contact-info/:contact_id",
            get(route_handlers::contact_info::handler),
        )
        .route("/geocode", get(route_handlers::geocode::handler))
        .route(
            "/update-zip/:contact_id",
            post(route_handlers::update_zip::handler),
        )
        .route(
            "/update-city/:contact_id",
            get(route_handlers::update_city::handler),
        )
        .route("/webhook", post(route_handlers::webhooks::handler))
        .route(
            "/list-contacts",
            get(route_handlers::list_contacts::handler),
        )
        .route("/healthcheck", get(|| async { "Ok" }))
        .with_state(state)
}

/**
 * the main router wrapped in request logging and the cors policy
 **/
pub fn get_app(state: AppState, allowed_origins: &[String]) -> Router {
    get_main_router(state)
        .layer(axum::middleware::from_fn(
            |request: Request, next: Next| async move {
                let uri = request.uri().clone();

                let mut response = next.run(request).await;

                response.extensions_mut().insert(RequestUri(uri));

                response
            },
        ))
        .layer(TraceLayer::new_for_http().on_response(
            |response: &Response, latency: std::time::Duration, _span: &tracing::Span| {
                let url = match response.extensions().get::<RequestUri>().map(|r| &r.0) {
                    Some(uri) => uri.to_string(),
                    None => "unknown".to_string(),
                };
                let status = response.status();
                let latency = utils::duration_to_ms_string(latency);

                if url == "/healthcheck" {
                    tracing::trace!("{} {} {}", url, status, latency);
                    return;
                }

                tracing::debug!("{} {} {}", url, status, latency);
            },
        ))
        .layer(cors_layer(allowed_origins))
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

use std::env;

use anyhow::Context;
use tracing::error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";
pub const DEFAULT_GEOAPIFY_BASE_URL: &str = "https://api.geoapify.com";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:3001",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
    "https://app.hubspot.com",
];

#[derive(Debug, Clone)]
pub struct HubspotConfig {
    pub token: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct GeoapifyConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Everything the relay needs from its environment, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub hubspot: HubspotConfig,
    pub geoapify: GeoapifyConfig,
    pub default_country: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: get_port(),
            hubspot: HubspotConfig {
                token: get_hubspot_token()?,
                base_url: get_base_url("HUBSPOT_BASE_URL", DEFAULT_HUBSPOT_BASE_URL)?,
            },
            geoapify: GeoapifyConfig {
                api_key: get_geoapify_api_key()?,
                base_url: get_base_url("GEOAPIFY_BASE_URL", DEFAULT_GEOAPIFY_BASE_URL)?,
            },
            default_country: get_default_country(),
            allowed_origins: get_allowed_origins(),
        })
    }
}

pub fn get_port() -> u16 {
    parse_port(env::var("PORT").ok())
}

pub fn parse_port(port: Option<String>) -> u16 {
    let Some(port) = port else {
        return DEFAULT_PORT;
    };

    match port.trim().parse::<u16>() {
        Ok(port) => port,
        _ => {
            error!("Failed to parse PORT env var, using default");
            DEFAULT_PORT
        }
    }
}

pub fn get_hubspot_token() -> anyhow::Result<String> {
    required_var("HUBSPOT_TOKEN")
}

pub fn get_geoapify_api_key() -> anyhow::Result<String> {
    required_var("GEOAPIFY_API_KEY")
}

pub fn get_default_country() -> String {
    match env::var("DEFAULT_COUNTRY") {
        Ok(country) if !country.trim().is_empty() => country.trim().to_string(),
        _ => DEFAULT_COUNTRY.to_string(),
    }
}

pub fn get_allowed_origins() -> Vec<String> {
    parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok())
}

/// Comma separated list, falls back to the local dev origins plus HubSpot.
pub fn parse_origins(origins: Option<String>) -> Vec<String> {
    let parsed: Vec<String> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        parsed
    }
}

fn get_base_url(var: &str, default: &str) -> anyhow::Result<String> {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    normalize_base_url(&raw).with_context(|| format!("{var} is not a valid URL"))
}

/// Validates a base url and strips the trailing slash so paths can be appended.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())?;
    if parsed.cannot_be_a_base() {
        return Err(anyhow::anyhow!("{raw} cannot be used as a base url"));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn required_var(var: &str) -> anyhow::Result<String> {
    let value = env::var(var).with_context(|| format!("{var} environment variable not found"))?;
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{var} environment variable is empty"));
    }
    Ok(value)
}

mod error;

pub use error::HubspotError;

use reqwest::{header, Response, StatusCode, Url};
use serde::Serialize;

use shared_lib::env_utils::HubspotConfig;
use shared_lib::hubspot_structs::Contact;

/// Thin client over the HubSpot CRM v3 contacts API.
#[derive(Debug, Clone)]
pub struct HubspotClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct UpdateContactBody<'a, P: Serialize> {
    properties: &'a P,
}

impl HubspotClient {
    pub fn new(config: &HubspotConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn contacts_url(&self) -> String {
        format!("{}/crm/v3/objects/contacts", self.base_url)
    }

    // The id always lands as one encoded path segment, never as extra path or query.
    fn contact_url(&self, contact_id: &str) -> Result<Url, HubspotError> {
        if matches!(contact_id.trim(), "" | "." | "..") {
            return Err(HubspotError::InvalidContactId(contact_id.to_string()));
        }

        let mut url = Url::parse(&self.contacts_url())
            .map_err(|err| HubspotError::BaseUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| HubspotError::BaseUrl(self.base_url.clone()))?
            .push(contact_id);
        Ok(url)
    }

    pub async fn get_contact(
        &self,
        contact_id: &str,
        properties: &[&str],
    ) -> Result<Contact, HubspotError> {
        tracing::trace!("Fetching contact {contact_id}");
        let resp = self
            .client
            .get(self.contact_url(contact_id)?)
            .header(header::AUTHORIZATION, self.bearer())
            .query(&[("properties", properties.join(","))])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json::<Contact>().await?)
    }

    /// Merges `properties` into the contact, leaving every other property untouched.
    pub async fn update_contact<P>(
        &self,
        contact_id: &str,
        properties: &P,
    ) -> Result<Contact, HubspotError>
    where
        P: Serialize,
    {
        tracing::trace!("Updating contact {contact_id}");
        let resp = self
            .client
            .patch(self.contact_url(contact_id)?)
            .header(header::AUTHORIZATION, self.bearer())
            .json(&UpdateContactBody { properties })
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json::<Contact>().await?)
    }

    pub async fn list_contacts(
        &self,
        properties: &[&str],
        limit: u32,
    ) -> Result<serde_json::Value, HubspotError> {
        let resp = self
            .client
            .get(self.contacts_url())
            .header(header::AUTHORIZATION, self.bearer())
            .query(&[
                ("properties", properties.join(",")),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json::<serde_json::Value>().await?)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

async fn check_status(resp: Response) -> Result<Response, HubspotError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    Err(match status {
        StatusCode::NOT_FOUND => HubspotError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HubspotError::Unauthorized(message),
        StatusCode::BAD_REQUEST => HubspotError::Validation(message),
        _ => HubspotError::Upstream {
            status: status.as_u16(),
            message,
        },
    })
}

// HubSpot error bodies look like {"status":"error","message":"...","category":"..."}
fn error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = match parsed {
        Some(value) => value.get("message")?.as_str()?.to_string(),
        None => body.trim().to_string(),
    };
    (!message.is_empty()).then_some(message)
}

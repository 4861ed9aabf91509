use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubspotError {
    #[error("HubSpot could not find the resource: {0}")]
    NotFound(String),

    #[error("HubSpot rejected the token: {0}")]
    Unauthorized(String),

    #[error("HubSpot rejected the request: {0}")]
    Validation(String),

    #[error("HubSpot returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid contact id: {0:?}")]
    InvalidContactId(String),

    #[error("invalid HubSpot base url: {0}")]
    BaseUrl(String),

    #[error("request to HubSpot failed")]
    Transport(#[from] reqwest::Error),
}

impl HubspotError {
    /// The message HubSpot gave for the failure, when there was one.
    pub fn provider_message(&self) -> String {
        match self {
            HubspotError::NotFound(message)
            | HubspotError::Unauthorized(message)
            | HubspotError::Validation(message)
            | HubspotError::Upstream { message, .. } => message.clone(),
            HubspotError::Transport(err) => err.to_string(),
            HubspotError::InvalidContactId(_) | HubspotError::BaseUrl(_) => self.to_string(),
        }
    }
}

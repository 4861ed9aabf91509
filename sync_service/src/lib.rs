//! The one piece of business logic in the relay: read a contact's zip,
//! resolve it to a locality and write that back as the contact's city.
//! Every entrypoint (direct request or webhook) goes through
//! [`sync_city_from_zip`].

pub mod webhook;

use std::collections::HashMap;

use thiserror::Error;

use geocode_service::{resolve_locality, GeoapifyClient, GeocodeError};
use hubspot_service::{HubspotClient, HubspotError};
use shared_lib::geo_structs::GeocodeResult;
use shared_lib::hubspot_structs::{Contact, CITY_PROPERTY, ZIP_PROPERTY};

pub use webhook::{process_webhook_events, BatchReport};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("contact {contact_id} has no zip")]
    MissingPostalCode {
        contact_id: String,
        contact: Box<Contact>,
    },

    #[error("no geocoding match for zip {zip}")]
    NoGeocodeMatch { zip: String },

    #[error("no city, county or state found for zip {zip}")]
    NoLocalityResolved {
        zip: String,
        result: Box<GeocodeResult>,
    },

    #[error(transparent)]
    Crm(#[from] HubspotError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub contact_id: String,
    pub zip: String,
    pub city: String,
}

pub async fn sync_city_from_zip(
    crm: &HubspotClient,
    geocoder: &GeoapifyClient,
    contact_id: &str,
    country: &str,
) -> Result<SyncOutcome, SyncError> {
    let contact = crm.get_contact(contact_id, &[ZIP_PROPERTY]).await?;

    let zip = match contact.zip() {
        Some(zip) => zip.trim().to_string(),
        None => {
            return Err(SyncError::MissingPostalCode {
                contact_id: contact_id.to_string(),
                contact: Box::new(contact),
            })
        }
    };
    tracing::debug!("Zip found for contact {}: {}", contact_id, zip);

    let lookup = geocoder.geocode(&zip, country).await?;
    let Some(best) = lookup.best else {
        return Err(SyncError::NoGeocodeMatch { zip });
    };

    let Some(city) = resolve_locality(&best) else {
        return Err(SyncError::NoLocalityResolved {
            zip,
            result: Box::new(best),
        });
    };
    tracing::debug!("Locality resolved for zip {}: {}", zip, city);

    let properties = HashMap::from([(CITY_PROPERTY, city.as_str())]);
    crm.update_contact(contact_id, &properties).await?;

    tracing::info!("Contact {} updated with city: {}", contact_id, city);

    Ok(SyncOutcome {
        contact_id: contact_id.to_string(),
        zip,
        city,
    })
}

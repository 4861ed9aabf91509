use serde::{Deserialize, Deserializer, Serialize};

pub const ZIP_PROPERTY: &str = "zip";
pub const CITY_PROPERTY: &str = "city";
pub const CONTACT_PROPERTY_CHANGE: &str = "contact.propertyChange";

/// Properties requested by the diagnostic contact routes.
pub const CONTACT_INFO_PROPERTIES: &[&str] = &["zip", "city", "firstname", "lastname"];

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub properties: ContactProperties,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>, // catch-all
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>, // catch-all
}

impl Contact {
    /// The contact's zip, treating blank values the same as a missing one.
    pub fn zip(&self) -> Option<&str> {
        non_blank(self.properties.zip.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub subscription_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub property_value: Option<serde_json::Value>,
    #[serde(default)]
    pub event_id: Option<serde_json::Value>,
    #[serde(default)]
    pub occurred_at: Option<serde_json::Value>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>, // catch-all
}

impl WebhookEvent {
    /// True for the events the relay acts on: a contact's zip property changed.
    pub fn is_zip_change(&self) -> bool {
        self.property_name.as_deref() == Some(ZIP_PROPERTY)
            && self.subscription_type.as_deref() == Some(CONTACT_PROPERTY_CHANGE)
    }
}

pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// HubSpot sends object ids as numbers, callers of the relay tend to send strings
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

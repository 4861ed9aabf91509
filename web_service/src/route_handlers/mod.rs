pub mod contact_info;
pub mod geocode;
pub mod list_contacts;
pub mod update_city;
pub mod update_zip;
pub mod webhooks;

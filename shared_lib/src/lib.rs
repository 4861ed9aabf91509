pub mod env_utils;
pub mod geo_structs;
pub mod hubspot_structs;
pub mod utils;

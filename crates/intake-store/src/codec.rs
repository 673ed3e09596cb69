//! Column codec for the additional-services list
//!
//! The only place the list is turned into, or read back from, its stored form:
//! a JSON array of strings. An empty list is stored as `[]`, never NULL.

use intake_core::AdditionalServices;

/// Stored form of an additional-services list
pub fn encode_services(services: &AdditionalServices) -> Result<String, serde_json::Error> {
    serde_json::to_string(services)
}

/// Read a stored list back. NULL and blank columns decode to an empty list.
pub fn decode_services(raw: Option<&str>) -> Result<AdditionalServices, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(AdditionalServices::default()),
        Some(text) => {
            let items: Vec<String> = serde_json::from_str(text)?;
            Ok(AdditionalServices::new(items))
        }
    }
}

//! Intake records
//!
//! `New*` types are what the dispatcher hands to the store; the full record
//! types are what the store reads back, with identity, status and timestamps.

use crate::status::{BookingStatus, MessageStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Ordered selection of add-on services attached to a booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdditionalServices(Vec<String>);

impl AdditionalServices {
    /// Build from raw selections, trimming and dropping blanks, keeping order
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            items
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A validated booking, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub property_type: Option<String>,
    pub service_type: String,
    pub urgency: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: Option<String>,
    pub property_size: Option<String>,
    pub frequency: Option<String>,
    pub special_requirements: Option<String>,
    pub access_instructions: Option<String>,
    pub additional_services: AdditionalServices,
}

impl NewBooking {
    /// Customer display name
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A stored booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub property_type: Option<String>,
    pub service_type: String,
    pub urgency: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: Option<String>,
    pub property_size: Option<String>,
    pub frequency: Option<String>,
    pub special_requirements: Option<String>,
    pub access_instructions: Option<String>,
    pub additional_services: AdditionalServices,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A validated contact message, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
}

/// A stored contact message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additional_services_drops_blanks_and_keeps_order() {
        let services = AdditionalServices::new(["  oven cleaning ", "", "windows", "   "]);
        assert_eq!(services.len(), 2);
        assert_eq!(services.iter().collect::<Vec<_>>(), vec!["oven cleaning", "windows"]);
    }

    #[test]
    fn additional_services_serializes_as_array() {
        let services = AdditionalServices::new(["carpet", "fridge"]);
        let json = serde_json::to_string(&services).unwrap();
        assert_eq!(json, r#"["carpet","fridge"]"#);
    }
}

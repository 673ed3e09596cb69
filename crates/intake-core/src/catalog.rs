//! Read-only catalog rows owned by the marketing side of the site
//!
//! The intake pipeline only reads these for display and linking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_from: Option<f64>,
    pub active: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub active: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: i64,
    pub customer_name: String,
    pub testimonial_text: String,
    pub service_type: Option<String>,
    pub rating: Option<i64>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub id: i64,
    pub area_name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub id: i64,
    pub service_id: i64,
    pub property_size: String,
    pub price: f64,
    pub active: bool,
}

/// Aggregate counts across intake and catalog tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeStats {
    /// All bookings regardless of status
    pub bookings: u64,
    /// Bookings still awaiting confirmation
    pub pending_bookings: u64,
    /// All testimonials
    pub testimonials: u64,
    /// Services currently offered
    pub services: u64,
    /// Contact messages nobody has read
    pub new_messages: u64,
    /// Equipment currently listed
    pub equipment: u64,
}

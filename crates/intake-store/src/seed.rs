//! Catalog seeding from a TOML file
//!
//! Used by `init-db --seed` and tests. Intake submissions never touch this.
//!
//! ```toml
//! [[services]]
//! name = "Deep Cleaning"
//! price_from = 120.0
//!
//! [[pricing]]
//! service = "Deep Cleaning"
//! property_size = "2 bedroom"
//! price = 150.0
//! ```

use crate::error::{StoreError, StoreResult};
use crate::row::{now_stamp, stamp};
use crate::store::IntakeStore;
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedService {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_from: Option<f64>,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedEquipment {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedTestimonial {
    pub customer_name: String,
    #[serde(rename = "text")]
    pub testimonial_text: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub featured: bool,
    /// Defaults to the time of seeding
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedServiceArea {
    pub name: String,
    #[serde(default = "yes")]
    pub active: bool,
}

/// Pricing row; `service` names a service defined in the same seed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedPricing {
    pub service: String,
    pub property_size: String,
    pub price: f64,
    #[serde(default = "yes")]
    pub active: bool,
}

/// Whole catalog seed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub services: Vec<SeedService>,
    pub equipment: Vec<SeedEquipment>,
    pub testimonials: Vec<SeedTestimonial>,
    pub service_areas: Vec<SeedServiceArea>,
    pub pricing: Vec<SeedPricing>,
}

/// Rows inserted per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub services: usize,
    pub equipment: usize,
    pub testimonials: usize,
    pub service_areas: usize,
    pub pricing: usize,
}

impl CatalogSeed {
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
            && self.equipment.is_empty()
            && self.testimonials.is_empty()
            && self.service_areas.is_empty()
            && self.pricing.is_empty()
    }
}

impl IntakeStore {
    /// Insert every seed row in one transaction
    ///
    /// Nothing is written if any row fails, including a pricing row that
    /// names an unknown service.
    pub fn seed_catalog(&self, seed: &CatalogSeed) -> StoreResult<SeedReport> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut report = SeedReport::default();
        let mut service_ids: HashMap<&str, i64> = HashMap::new();

        for service in &seed.services {
            tx.execute(
                "INSERT INTO services (name, description, price_from, active, sort_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    service.name,
                    service.description,
                    service.price_from,
                    service.active,
                    service.sort_order
                ],
            )?;
            service_ids.insert(service.name.as_str(), tx.last_insert_rowid());
            report.services += 1;
        }

        for item in &seed.equipment {
            tx.execute(
                "INSERT INTO equipment (name, category, description, active, sort_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![item.name, item.category, item.description, item.active, item.sort_order],
            )?;
            report.equipment += 1;
        }

        for testimonial in &seed.testimonials {
            let created_at = testimonial.created_at.map_or_else(now_stamp, stamp);
            tx.execute(
                "INSERT INTO testimonials \
                 (customer_name, testimonial_text, service_type, rating, featured, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    testimonial.customer_name,
                    testimonial.testimonial_text,
                    testimonial.service_type,
                    testimonial.rating,
                    testimonial.featured,
                    created_at
                ],
            )?;
            report.testimonials += 1;
        }

        for area in &seed.service_areas {
            tx.execute(
                "INSERT INTO service_areas (area_name, active) VALUES (?1, ?2)",
                params![area.name, area.active],
            )?;
            report.service_areas += 1;
        }

        for price in &seed.pricing {
            let service_id = service_ids
                .get(price.service.as_str())
                .copied()
                .ok_or_else(|| StoreError::UnknownSeedService(price.service.clone()))?;
            tx.execute(
                "INSERT INTO pricing (service_id, property_size, price, active) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![service_id, price.property_size, price.price, price.active],
            )?;
            report.pricing += 1;
        }

        tx.commit()?;
        info!(?report, "catalog seeded");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[[services]]
name = "Deep Cleaning"
price_from = 120.0
sort_order = 1

[[services]]
name = "Window Cleaning"
active = false

[[service_areas]]
name = "Westlands"

[[pricing]]
service = "Deep Cleaning"
property_size = "2 bedroom"
price = 150.0
"#;

    #[test]
    fn parses_with_defaults() {
        let seed = CatalogSeed::from_toml_str(SEED).unwrap();
        assert_eq!(seed.services.len(), 2);
        assert!(seed.services[0].active);
        assert!(!seed.services[1].active);
        assert!(seed.equipment.is_empty());
        assert!(!seed.is_empty());
    }

    #[test]
    fn unknown_service_rolls_back() {
        let store = IntakeStore::open_in_memory().unwrap();
        let mut seed = CatalogSeed::from_toml_str(SEED).unwrap();
        seed.pricing[0].service = "Gutter Cleaning".into();
        let err = store.seed_catalog(&seed).unwrap_err();
        assert!(matches!(err, StoreError::UnknownSeedService(name) if name == "Gutter Cleaning"));
        assert!(store.list_services(false).unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            CatalogSeed::from_toml_str("[[services]]\nprice_from = 1.0"),
            Err(StoreError::SeedParse(_))
        ));
    }
}

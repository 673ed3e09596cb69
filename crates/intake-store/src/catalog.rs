//! Read-only catalog queries
//!
//! Listings the site pages show next to the forms. None of these are on the
//! intake path.

use crate::error::{StoreError, StoreResult};
use crate::row::{conversion, timestamp};
use crate::store::IntakeStore;
use intake_core::{
    BookingStatus, EquipmentItem, IntakeStats, MessageStatus, PricingEntry, ServiceArea,
    ServiceEntry, Testimonial,
};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;

const SERVICE_COLUMNS: &str = "id, name, description, price_from, active, sort_order";
const EQUIPMENT_COLUMNS: &str = "id, name, category, description, active, sort_order";
const TESTIMONIAL_COLUMNS: &str =
    "id, customer_name, testimonial_text, service_type, rating, featured, created_at";
const PRICING_COLUMNS: &str = "id, service_id, property_size, price, active";

fn service_from_row(row: &Row<'_>) -> rusqlite::Result<ServiceEntry> {
    Ok(ServiceEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price_from: row.get(3)?,
        active: row.get(4)?,
        sort_order: row.get(5)?,
    })
}

fn equipment_from_row(row: &Row<'_>) -> rusqlite::Result<EquipmentItem> {
    Ok(EquipmentItem {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        active: row.get(4)?,
        sort_order: row.get(5)?,
    })
}

fn testimonial_from_row(row: &Row<'_>) -> rusqlite::Result<Testimonial> {
    Ok(Testimonial {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        testimonial_text: row.get(2)?,
        service_type: row.get(3)?,
        rating: row.get(4)?,
        featured: row.get(5)?,
        created_at: timestamp(row, 6)?,
    })
}

fn count(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let n: i64 = row.get(idx)?;
    u64::try_from(n).map_err(|err| conversion(idx, err))
}

fn pricing_from_row(row: &Row<'_>) -> rusqlite::Result<PricingEntry> {
    Ok(PricingEntry {
        id: row.get(0)?,
        service_id: row.get(1)?,
        property_size: row.get(2)?,
        price: row.get(3)?,
        active: row.get(4)?,
    })
}

impl IntakeStore {
    fn query_list<T, P>(
        &self,
        table: &'static str,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> StoreResult<Vec<T>>
    where
        P: rusqlite::Params,
    {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::from_row(table, err))
    }

    /// Services by `sort_order`, then id
    pub fn list_services(&self, active_only: bool) -> StoreResult<Vec<ServiceEntry>> {
        self.query_list(
            "services",
            &format!(
                "SELECT {SERVICE_COLUMNS} FROM services WHERE (?1 = 0 OR active = 1) \
                 ORDER BY sort_order ASC, id ASC"
            ),
            params![active_only],
            service_from_row,
        )
    }

    /// An active service by id
    pub fn get_service(&self, id: i64) -> StoreResult<Option<ServiceEntry>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1 AND active = 1"),
            params![id],
            service_from_row,
        )
        .optional()
        .map_err(|err| StoreError::from_row("services", err))
    }

    /// Active equipment, optionally in one category
    pub fn list_equipment(&self, category: Option<&str>) -> StoreResult<Vec<EquipmentItem>> {
        self.query_list(
            "equipment",
            &format!(
                "SELECT {EQUIPMENT_COLUMNS} FROM equipment \
                 WHERE active = 1 AND (?1 IS NULL OR category = ?1) \
                 ORDER BY sort_order ASC, name ASC"
            ),
            params![category],
            equipment_from_row,
        )
    }

    /// Active equipment grouped by category, each group in listing order
    pub fn equipment_by_category(&self) -> StoreResult<BTreeMap<String, Vec<EquipmentItem>>> {
        let mut grouped: BTreeMap<String, Vec<EquipmentItem>> = BTreeMap::new();
        for item in self.list_equipment(None)? {
            grouped.entry(item.category.clone()).or_default().push(item);
        }
        Ok(grouped)
    }

    /// Testimonials, newest first; `Some(flag)` filters on `featured`
    pub fn list_testimonials(&self, featured: Option<bool>) -> StoreResult<Vec<Testimonial>> {
        self.query_list(
            "testimonials",
            &format!(
                "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials \
                 WHERE (?1 IS NULL OR featured = ?1) ORDER BY created_at DESC, id DESC"
            ),
            params![featured],
            testimonial_from_row,
        )
    }

    pub fn featured_testimonials(&self) -> StoreResult<Vec<Testimonial>> {
        self.list_testimonials(Some(true))
    }

    /// At most `limit` testimonials, newest first
    pub fn recent_testimonials(&self, limit: usize) -> StoreResult<Vec<Testimonial>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_list(
            "testimonials",
            &format!(
                "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials \
                 ORDER BY created_at DESC, id DESC LIMIT ?1"
            ),
            params![limit],
            testimonial_from_row,
        )
    }

    /// Case-insensitive substring search over name, text and service type
    ///
    /// SQLite's `lower()` folds ASCII only, so matching happens here with
    /// Unicode case folding on both sides.
    pub fn search_testimonials(&self, term: &str) -> StoreResult<Vec<Testimonial>> {
        let needle = term.to_lowercase();
        let matches = |value: &str| value.to_lowercase().contains(&needle);
        Ok(self
            .list_testimonials(None)?
            .into_iter()
            .filter(|t| {
                matches(&t.customer_name)
                    || matches(&t.testimonial_text)
                    || t.service_type.as_deref().is_some_and(matches)
            })
            .collect())
    }

    /// Active service areas by name
    pub fn list_service_areas(&self) -> StoreResult<Vec<ServiceArea>> {
        self.query_list(
            "service_areas",
            "SELECT id, area_name, active FROM service_areas WHERE active = 1 ORDER BY area_name ASC",
            params![],
            |row| {
                Ok(ServiceArea {
                    id: row.get(0)?,
                    area_name: row.get(1)?,
                    active: row.get(2)?,
                })
            },
        )
    }

    /// Active pricing rows by service, then property size
    pub fn list_pricing(&self) -> StoreResult<Vec<PricingEntry>> {
        self.query_list(
            "pricing",
            &format!(
                "SELECT {PRICING_COLUMNS} FROM pricing WHERE active = 1 \
                 ORDER BY service_id ASC, property_size ASC"
            ),
            params![],
            pricing_from_row,
        )
    }

    pub fn pricing_for_service(&self, service_id: i64) -> StoreResult<Vec<PricingEntry>> {
        self.query_list(
            "pricing",
            &format!(
                "SELECT {PRICING_COLUMNS} FROM pricing WHERE service_id = ?1 AND active = 1 \
                 ORDER BY property_size ASC"
            ),
            params![service_id],
            pricing_from_row,
        )
    }

    /// Counts across intake and catalog tables
    pub fn stats(&self) -> StoreResult<IntakeStats> {
        let conn = self.conn.lock();
        let stats = conn.query_row(
            "SELECT \
                (SELECT COUNT(*) FROM bookings), \
                (SELECT COUNT(*) FROM bookings WHERE status = ?1), \
                (SELECT COUNT(*) FROM testimonials), \
                (SELECT COUNT(*) FROM services WHERE active = 1), \
                (SELECT COUNT(*) FROM contact_messages WHERE status = ?2), \
                (SELECT COUNT(*) FROM equipment WHERE active = 1)",
            params![BookingStatus::Pending.as_str(), MessageStatus::New.as_str()],
            |row| {
                Ok(IntakeStats {
                    bookings: count(row, 0)?,
                    pending_bookings: count(row, 1)?,
                    testimonials: count(row, 2)?,
                    services: count(row, 3)?,
                    new_messages: count(row, 4)?,
                    equipment: count(row, 5)?,
                })
            },
        )?;
        Ok(stats)
    }
}

//! Intake record persistence
//!
//! One connection, opened once and shared behind a mutex. Every write that
//! reads before it writes runs in a transaction.

use crate::codec::{decode_services, encode_services};
use crate::error::{StoreError, StoreResult};
use crate::row::{conversion, now_stamp, optional_timestamp, parsed, timestamp};
use crate::schema;
use intake_core::{
    validate_transition, BookingRequest, BookingStatus, ContactMessage, MessageStatus,
    NewBooking, NewContactMessage, StatusWorkflow,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Default busy timeout for the shared connection
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite journal mode for file-backed stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    #[default]
    Wal,
    Delete,
}

impl JournalMode {
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Connection options applied on open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
    pub journal_mode: JournalMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            journal_mode: JournalMode::default(),
        }
    }
}

impl StoreOptions {
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }
}

/// Write side used by the dispatcher
///
/// Implemented by [`IntakeStore`]; tests substitute failing or recording
/// implementations.
pub trait IntakeRepository: Send + Sync {
    /// Insert a booking with status `pending`; returns the new id
    fn create_booking(&self, booking: &NewBooking) -> StoreResult<i64>;

    /// Insert a contact message with status `new`; returns the new id
    fn create_contact_message(&self, message: &NewContactMessage) -> StoreResult<i64>;
}

const BOOKING_COLUMNS: &str = "id, first_name, last_name, email, phone, address, property_type, \
     service_type, urgency, preferred_date, preferred_time, property_size, frequency, \
     special_requirements, access_instructions, additional_services, status, created_at, updated_at";

const MESSAGE_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, created_at, updated_at";

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<BookingRequest> {
    let services: Option<String> = row.get(15)?;
    Ok(BookingRequest {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        property_type: row.get(6)?,
        service_type: row.get(7)?,
        urgency: row.get(8)?,
        preferred_date: parsed(row, 9)?,
        preferred_time: row.get(10)?,
        property_size: row.get(11)?,
        frequency: row.get(12)?,
        special_requirements: row.get(13)?,
        access_instructions: row.get(14)?,
        additional_services: decode_services(services.as_deref())
            .map_err(|err| conversion(15, err))?,
        status: parsed(row, 16)?,
        created_at: timestamp(row, 17)?,
        updated_at: optional_timestamp(row, 18)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        status: parsed(row, 6)?,
        created_at: timestamp(row, 7)?,
        updated_at: optional_timestamp(row, 8)?,
    })
}

/// The single persistence handle
#[derive(Debug)]
pub struct IntakeStore {
    pub(crate) conn: Mutex<Connection>,
}

impl IntakeStore {
    /// Open (creating if needed) a file-backed store and bootstrap its schema
    pub fn open(path: impl AsRef<Path>, options: &StoreOptions) -> StoreResult<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        apply_pragmas(&conn, options, true)?;
        schema::bootstrap(&mut conn)?;
        info!(path = %path.display(), "intake store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory store, mostly for tests
    pub fn open_in_memory() -> StoreResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        apply_pragmas(&conn, &StoreOptions::default(), false)?;
        schema::bootstrap(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Schema version recorded by bootstrap
    pub fn schema_version(&self) -> StoreResult<Option<i64>> {
        schema::version(&self.conn.lock())
    }

    /// Insert a booking with status `pending`
    pub fn create_booking(&self, booking: &NewBooking) -> StoreResult<i64> {
        let services = encode_services(&booking.additional_services)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO bookings (first_name, last_name, email, phone, address, property_type, \
             service_type, urgency, preferred_date, preferred_time, property_size, frequency, \
             special_requirements, access_instructions, additional_services, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                booking.first_name,
                booking.last_name,
                booking.email,
                booking.phone,
                booking.address,
                booking.property_type,
                booking.service_type,
                booking.urgency,
                booking.preferred_date.format("%Y-%m-%d").to_string(),
                booking.preferred_time,
                booking.property_size,
                booking.frequency,
                booking.special_requirements,
                booking.access_instructions,
                services,
                BookingStatus::Pending.as_str(),
                now_stamp(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, service_type = %booking.service_type, "booking stored");
        Ok(id)
    }

    /// Insert a contact message with status `new`
    pub fn create_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        body: &str,
        phone: Option<&str>,
    ) -> StoreResult<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO contact_messages (name, email, subject, message, phone, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                name,
                email,
                subject,
                body,
                phone,
                MessageStatus::New.as_str(),
                now_stamp()
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "contact message stored");
        Ok(id)
    }

    pub fn get_booking(&self, id: i64) -> StoreResult<Option<BookingRequest>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            booking_from_row,
        )
        .optional()
        .map_err(|err| StoreError::from_row("bookings", err))
    }

    pub fn get_contact_message(&self, id: i64) -> StoreResult<Option<ContactMessage>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {MESSAGE_COLUMNS} FROM contact_messages WHERE id = ?1"),
            params![id],
            message_from_row,
        )
        .optional()
        .map_err(|err| StoreError::from_row("contact_messages", err))
    }

    /// Bookings, newest first, optionally filtered by status
    pub fn list_bookings(&self, status: Option<BookingStatus>) -> StoreResult<Vec<BookingRequest>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![status.map(BookingStatus::as_str)], booking_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::from_row("bookings", err))
    }

    /// Contact messages, newest first, optionally filtered by status
    pub fn list_contact_messages(
        &self,
        status: Option<MessageStatus>,
    ) -> StoreResult<Vec<ContactMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM contact_messages \
             WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![status.map(MessageStatus::as_str)], message_from_row)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::from_row("contact_messages", err))
    }

    /// Move a booking along its workflow
    ///
    /// `Ok(false)` when no booking has this id. Steps the workflow forbids,
    /// including re-applying the current status, fail with
    /// [`StoreError::IllegalTransition`] and leave the row untouched.
    pub fn update_booking_status(&self, id: i64, status: BookingStatus) -> StoreResult<bool> {
        self.transition("bookings", id, status)
    }

    /// Move a contact message along its workflow; same contract as
    /// [`IntakeStore::update_booking_status`]
    pub fn update_message_status(&self, id: i64, status: MessageStatus) -> StoreResult<bool> {
        self.transition("contact_messages", id, status)
    }

    fn transition<S>(&self, table: &'static str, id: i64, next: S) -> StoreResult<bool>
    where
        S: StatusWorkflow + FromStr,
        S::Err: StdError + Send + Sync + 'static,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let current: Option<String> = tx
            .query_row(
                &format!("SELECT status FROM {table} WHERE id = ?1"),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(false);
        };
        let current: S = current.parse().map_err(|err: S::Err| StoreError::CorruptRow {
            table,
            detail: err.to_string(),
        })?;
        validate_transition(current, next)?;
        tx.execute(
            &format!("UPDATE {table} SET status = ?1, updated_at = ?2 WHERE id = ?3"),
            params![next.to_string(), now_stamp(), id],
        )?;
        tx.commit()?;
        info!(table, id, from = %current, to = %next, "status updated");
        Ok(true)
    }
}

impl IntakeRepository for IntakeStore {
    fn create_booking(&self, booking: &NewBooking) -> StoreResult<i64> {
        IntakeStore::create_booking(self, booking)
    }

    fn create_contact_message(&self, message: &NewContactMessage) -> StoreResult<i64> {
        IntakeStore::create_contact_message(
            self,
            &message.name,
            &message.email,
            &message.subject,
            &message.message,
            message.phone.as_deref(),
        )
    }
}

fn apply_pragmas(conn: &Connection, options: &StoreOptions, file_backed: bool) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if file_backed {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = {};",
            options.journal_mode.pragma_value()
        ))?;
    }
    conn.busy_timeout(options.busy_timeout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use intake_core::AdditionalServices;

    fn booking() -> NewBooking {
        NewBooking {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@example.com".into(),
            phone: "0712345678".into(),
            address: "12 Ngong Road, Nairobi".into(),
            property_type: Some("apartment".into()),
            service_type: "deep_clean".into(),
            urgency: None,
            preferred_date: NaiveDate::from_ymd_opt(2030, 1, 2).unwrap(),
            preferred_time: Some("morning".into()),
            property_size: None,
            frequency: None,
            special_requirements: None,
            access_instructions: None,
            additional_services: AdditionalServices::new(["oven", "windows"]),
        }
    }

    #[test]
    fn booking_reads_back() {
        let store = IntakeStore::open_in_memory().unwrap();
        let id = store.create_booking(&booking()).unwrap();
        let stored = store.get_booking(id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.preferred_date, NaiveDate::from_ymd_opt(2030, 1, 2).unwrap());
        assert_eq!(stored.additional_services, AdditionalServices::new(["oven", "windows"]));
        assert_eq!(stored.updated_at, None);
    }

    #[test]
    fn schema_version_recorded_once() {
        let store = IntakeStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), Some(schema::SCHEMA_VERSION));
        schema::bootstrap(&mut store.conn.lock()).unwrap();
        let rows: i64 = store
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM store_meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn corrupt_status_is_reported() {
        let store = IntakeStore::open_in_memory().unwrap();
        let id = store.create_contact_message("Ann Lee", "ann@example.com", "Hi", "Need a quote", None).unwrap();
        store
            .conn
            .lock()
            .execute_batch("PRAGMA ignore_check_constraints = ON; UPDATE contact_messages SET status = 'lost';")
            .unwrap();
        let err = store.get_contact_message(id).unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { table: "contact_messages", .. }));
    }

    #[test]
    fn options_builders() {
        let options = StoreOptions::default()
            .with_busy_timeout(Duration::from_millis(250))
            .with_journal_mode(JournalMode::Delete);
        assert_eq!(options.busy_timeout, Duration::from_millis(250));
        assert_eq!(options.journal_mode.pragma_value(), "delete");
    }
}

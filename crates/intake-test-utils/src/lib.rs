//! Testing utilities for the intake workspace
//!
//! Shared payload fixtures, a fixed clock, and doubles for the store and the
//! notification sink.

#![allow(missing_docs)]

use chrono::{Duration, NaiveDate};
use intake_core::{NewBooking, NewContactMessage, NotificationError};
use intake_dispatch::{
    FixedClock, IntakeDispatcher, Notification, NotificationHandle, NotificationQueue,
    NotificationSink, RawSubmission,
};
use intake_store::{IntakeRepository, IntakeStore, StoreError, StoreResult};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// The date every fixture treats as today
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

pub fn yesterday() -> NaiveDate {
    today() - Duration::days(1)
}

pub fn next_week() -> NaiveDate {
    today() + Duration::days(7)
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(today()))
}

pub fn contact_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("form_type", "contact"),
        ("contactFirstName", "Ann"),
        ("contactLastName", "Lee"),
        ("contactEmail", "ann@example.com"),
        ("contactSubject", "Hi"),
        ("contactMessage", "Need a quote"),
    ]
}

pub fn contact_submission() -> RawSubmission {
    RawSubmission::from_pairs(contact_fields())
}

pub fn booking_json(preferred_date: NaiveDate) -> Value {
    json!({
        "form_type": "booking",
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com",
        "phone": "+254 712 345 678",
        "address": "12 Ngong Road, Nairobi",
        "propertyType": "apartment",
        "serviceType": "deep_clean",
        "preferredDate": preferred_date.format("%Y-%m-%d").to_string(),
        "preferredTime": "morning",
        "additionalServices": ["oven", "windows"]
    })
}

pub fn booking_submission(preferred_date: NaiveDate) -> RawSubmission {
    let body = booking_json(preferred_date);
    body.as_object()
        .map(RawSubmission::from_json)
        .unwrap_or_default()
}

pub fn quick_contact_submission() -> RawSubmission {
    RawSubmission::from_pairs([
        ("form_type", "quick_contact"),
        ("quickName", "Ann"),
        ("quickEmail", "ann@example.com"),
        ("quickProject", "Move-out clean"),
        ("quickTimeline", "This week"),
    ])
}

/// Remove a field from a submission's pair list
pub fn without(
    fields: Vec<(&'static str, &'static str)>,
    names: &[&str],
) -> Vec<(&'static str, &'static str)> {
    fields
        .into_iter()
        .filter(|(name, _)| !names.contains(name))
        .collect()
}

/// Sink that keeps every delivered notification
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Notification>>,
    notify: Notify,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    /// Wait until at least `count` notifications have arrived
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        loop {
            let notified = self.notify.notified();
            {
                let delivered = self.delivered.lock();
                if delivered.len() >= count {
                    return delivered.clone();
                }
            }
            notified.await;
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.delivered.lock().push(notification.clone());
        self.notify.notify_one();
        Ok(())
    }
}

/// Sink whose transport is always down
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotificationSink for FailingSink {
    async fn deliver(&self, _notification: &Notification) -> Result<(), NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotificationError::Delivery("mail transport unavailable".into()))
    }
}

/// Repository whose every write fails like a full disk
#[derive(Debug, Default)]
pub struct FailingRepository {
    attempts: AtomicUsize,
}

impl FailingRepository {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
            Some("database or disk is full".into()),
        ))
    }
}

impl IntakeRepository for FailingRepository {
    fn create_booking(&self, _booking: &NewBooking) -> StoreResult<i64> {
        Err(self.fail())
    }

    fn create_contact_message(&self, _message: &NewContactMessage) -> StoreResult<i64> {
        Err(self.fail())
    }
}

/// In-memory store plus a dispatcher pinned to [`today`]
pub fn setup_dispatcher() -> (IntakeDispatcher, Arc<IntakeStore>) {
    let store = Arc::new(IntakeStore::open_in_memory().unwrap());
    let dispatcher = IntakeDispatcher::new(store.clone()).with_clock(fixed_clock());
    (dispatcher, store)
}

/// Same as [`setup_dispatcher`], with notifications recorded by a [`RecordingSink`].
/// Must be called inside a Tokio runtime.
pub fn setup_notifying_dispatcher() -> (
    IntakeDispatcher,
    Arc<IntakeStore>,
    Arc<RecordingSink>,
    NotificationHandle,
) {
    let (dispatcher, store) = setup_dispatcher();
    let sink = RecordingSink::new();
    let (handle, _task) = NotificationQueue::spawn(sink.clone(), 16);
    (dispatcher.with_notifier(handle.clone()), store, sink, handle)
}

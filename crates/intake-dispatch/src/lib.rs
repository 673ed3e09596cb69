//! Intake Dispatch
//!
//! The server-side gate between an HTTP submission and the store.
//!
//! # Overview
//!
//! - **RawSubmission**: untrusted key/value payload from a form or JSON body
//! - **IntakeDispatcher**: method and form-kind routing, required fields,
//!   rule checks, normalization, persistence
//! - **NotificationQueue**: post-commit staff notifications on a background task
//! - **Clock**: the date the "not in the past" rule compares against
//!
//! # Example
//!
//! ```rust
//! use intake_dispatch::{IntakeDispatcher, IntakeRequest, RawSubmission};
//! use intake_store::IntakeStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(IntakeStore::open_in_memory().unwrap());
//! let dispatcher = IntakeDispatcher::new(store);
//!
//! let receipt = dispatcher
//!     .dispatch(IntakeRequest::post(RawSubmission::from_pairs([
//!         ("form_type", "contact"),
//!         ("contactFirstName", "Ann"),
//!         ("contactLastName", "Lee"),
//!         ("contactEmail", "ann@example.com"),
//!         ("contactSubject", "Hi"),
//!         ("contactMessage", "Need a quote"),
//!     ])))
//!     .unwrap();
//! assert!(receipt.to_envelope().success);
//! ```

#![allow(missing_docs)]

pub mod clock;
pub mod dispatcher;
pub mod forms;
pub mod notify;
pub mod payload;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatcher::{thanks, IntakeDispatcher, IntakeReceipt, IntakeRequest};
pub use forms::{BookingForm, ContactForm, IntakeForm, QuickContactForm};
pub use notify::{
    LogMailer, MailComposer, Notification, NotificationHandle, NotificationQueue,
    NotificationSink, OutboundMail,
};
pub use payload::{FieldValue, RawSubmission};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Intake Store
//!
//! SQLite persistence for the intake pipeline.
//!
//! # Overview
//!
//! - **IntakeStore**: the single connection handle, opened once per process
//! - **IntakeRepository**: the write seam the dispatcher depends on
//! - **codec**: stored form of the additional-services list
//! - **seed**: catalog bootstrap from TOML
//!
//! # Example
//!
//! ```rust
//! use intake_core::{BookingStatus, MessageStatus};
//! use intake_store::IntakeStore;
//!
//! let store = IntakeStore::open_in_memory().unwrap();
//! let id = store
//!     .create_contact_message("Ann Lee", "ann@example.com", "Hi", "Need a quote", None)
//!     .unwrap();
//!
//! assert!(store.update_message_status(id, MessageStatus::Read).unwrap());
//! assert!(!store.update_booking_status(999, BookingStatus::Confirmed).unwrap());
//! ```

#![allow(missing_docs)]

pub mod codec;
mod catalog;
pub mod error;
mod row;
mod schema;
pub mod seed;
mod store;

pub use codec::{decode_services, encode_services};
pub use error::{StoreError, StoreResult};
pub use schema::SCHEMA_VERSION;
pub use seed::{CatalogSeed, SeedReport};
pub use store::{IntakeRepository, IntakeStore, JournalMode, StoreOptions, DEFAULT_BUSY_TIMEOUT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

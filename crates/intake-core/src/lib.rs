//! Intake Core - domain model for booking and contact intake
//!
//! Shared by every layer of the intake pipeline:
//! - Form kinds and their wire field names
//! - Booking and contact records with their status workflows
//! - Read-only catalog rows and aggregate stats
//! - The intake error taxonomy and the JSON response envelope
//!
//! # Example
//!
//! ```rust
//! use intake_core::{BookingStatus, FormKind, StatusWorkflow};
//!
//! let kind: FormKind = "quick_contact".parse().unwrap();
//! assert_eq!(kind, FormKind::QuickContact);
//!
//! assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
//! assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Pending));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod status;
pub mod types;

pub use catalog::{EquipmentItem, IntakeStats, PricingEntry, ServiceArea, ServiceEntry, Testimonial};
pub use envelope::ResponseEnvelope;
pub use error::{FieldError, IntakeError, NotificationError, TransitionError};
pub use fields::{FormKind, UnknownFormKind};
pub use status::{validate_transition, BookingStatus, MessageStatus, StatusWorkflow, UnknownStatus};
pub use types::{
    AdditionalServices, BookingRequest, ContactMessage, NewBooking, NewContactMessage,
};

/// Common imports for code working with intake records
pub mod prelude {
    pub use crate::{
        AdditionalServices, BookingRequest, BookingStatus, ContactMessage, FieldError, FormKind,
        IntakeError, MessageStatus, NewBooking, NewContactMessage, ResponseEnvelope,
        StatusWorkflow,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

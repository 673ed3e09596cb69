//! Intake Validation
//!
//! Field rules and the form schemas built from them.
//!
//! # Overview
//!
//! - **rules**: pure per-field checks (email, name, phone, address, text, date)
//! - **schema**: the field set of each form kind, run by both gates
//! - **engine**: headless model of the browser-side form behaviour
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use intake_core::FormKind;
//! use intake_validation::{FormSession, SubmitDecision};
//! use std::collections::BTreeMap;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
//! let mut session = FormSession::new(FormKind::QuickContact, today);
//!
//! let mut values = BTreeMap::new();
//! values.insert("quickName".to_string(), "Ann".to_string());
//! values.insert("quickEmail".to_string(), "ann@example".to_string());
//! values.insert("quickProject".to_string(), "Move-out clean".to_string());
//!
//! assert!(session.submit(&values).is_ready());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod rules;
pub mod schema;

pub use engine::{
    FieldState, FieldView, FlowPhase, FormSession, Notice, NoticeKind, PreparedSubmission,
    SubmissionFlow, SubmitDecision,
};
pub use rules::{
    is_valid_email, is_valid_name, is_valid_phone, parse_service_date, validate_address,
    validate_email, validate_name, validate_phone, validate_required, validate_service_date,
    validate_text, TextBounds, Violation,
};
pub use schema::{FieldSpec, FormSchema, Gate, Presence, Rule};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

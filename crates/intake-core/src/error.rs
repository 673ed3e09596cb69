//! Error types for the intake pipeline
//!
//! Provides the caller-facing taxonomy for:
//! - Rejected input (missing fields, failed field rules, unknown form kind)
//! - Wrong HTTP verb
//! - Persistence failures, reported generically
//! - Best-effort notification failures, which are logged and never surfaced

use serde::{Deserialize, Serialize};

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the field
    pub field: String,
    /// Human-readable reason, ready to show next to the field
    pub reason: String,
}

impl FieldError {
    #[inline]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main intake error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// One or more field rules failed; always carries every failure
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    /// Required fields absent or blank; names every one of them
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// `form_type` missing or not one of the known kinds
    #[error("invalid form type: {}", .0.as_deref().unwrap_or("<missing>"))]
    InvalidFormType(Option<String>),

    /// The store did not accept the write
    #[error("persistence failed")]
    PersistenceFailed,

    /// Anything other than POST
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl IntakeError {
    /// HTTP status the error maps to
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed(_) => 422,
            Self::MissingFields(_) | Self::InvalidFormType(_) => 400,
            Self::MethodNotAllowed(_) => 405,
            Self::PersistenceFailed => 500,
        }
    }

    /// Whether the caller can fix the request and resubmit
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::PersistenceFailed)
    }

    /// Short error label for the response envelope
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "Validation failed",
            Self::MissingFields(_) => "Missing required fields",
            Self::InvalidFormType(_) => "Invalid form type",
            Self::PersistenceFailed => "An error occurred while processing your request",
            Self::MethodNotAllowed(_) => "Method not allowed",
        }
    }

    /// Message shown to the submitter. Never contains internal detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationFailed(errors) => {
                let reasons: Vec<&str> = errors.iter().map(|e| e.reason.as_str()).collect();
                format!("Please correct the following: {}", reasons.join(" "))
            }
            Self::MissingFields(fields) => {
                format!("Missing required fields: {}", fields.join(", "))
            }
            Self::InvalidFormType(_) => "Invalid form type".to_string(),
            Self::PersistenceFailed => {
                "We could not save your request. Please try again later.".to_string()
            }
            Self::MethodNotAllowed(_) => "Only POST requests are accepted.".to_string(),
        }
    }

    /// Field-level failures, if any
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailed(errors) => errors,
            _ => &[],
        }
    }
}

/// Illegal status workflow step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The outbound queue is no longer accepting work
    #[error("notification queue closed")]
    QueueClosed,

    /// The outbound queue is at capacity
    #[error("notification queue full")]
    QueueFull,

    /// The outbound transport refused the message
    #[error("delivery failed: {0}")]
    Delivery(String),
}

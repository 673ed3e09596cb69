//! Form schemas
//!
//! One schema per [`FormKind`], shared by the advisory gate in the browser
//! model and the authoritative gate on the server. Both gates run the same
//! rules, so the server never accepts a value the form would have refused.

use crate::rules::{self, TextBounds, Violation};
use chrono::NaiveDate;
use intake_core::fields::{booking, contact, quick_contact};
use intake_core::{FieldError, FormKind};

/// Rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Name,
    Email,
    Phone,
    Address,
    ServiceDate,
    Required,
    Text(TextBounds),
}

impl Rule {
    /// Run the rule against a raw value
    pub fn check(self, value: &str, today: NaiveDate) -> Result<(), Violation> {
        match self {
            Rule::Name => rules::validate_name(value),
            Rule::Email => rules::validate_email(value),
            Rule::Phone => rules::validate_phone(value),
            Rule::Address => rules::validate_address(value),
            Rule::ServiceDate => rules::validate_service_date(value, today),
            Rule::Required => rules::validate_required(value),
            Rule::Text(bounds) => rules::validate_text(value, bounds),
        }
    }

    /// User-facing reason for a violation of this rule
    #[must_use]
    pub fn describe(self, violation: Violation, label: &str) -> String {
        match (self, violation) {
            (Rule::Email, Violation::Missing) => "Email address is required.".to_string(),
            (Rule::Email, _) => {
                "Please enter a valid email address (e.g., user@example.com).".to_string()
            }
            (Rule::Phone, Violation::Missing) => "Phone number is required.".to_string(),
            (Rule::Phone, _) => "Please enter a valid phone number.".to_string(),
            (Rule::Address, Violation::Missing) => "Address is required.".to_string(),
            (Rule::Address, Violation::TooShort { min }) => {
                format!("Please provide a complete address (at least {min} characters).")
            }
            (Rule::Address, _) => {
                "Address is too long. Please provide a shorter address.".to_string()
            }
            (Rule::ServiceDate, Violation::Missing) => "Service date is required.".to_string(),
            (Rule::ServiceDate, Violation::InPast) => {
                "Service date cannot be in the past.".to_string()
            }
            (Rule::ServiceDate, _) => "Please enter a valid service date.".to_string(),
            (Rule::Name, Violation::InvalidFormat) => format!(
                "{label} can only contain letters, spaces, hyphens, apostrophes, and periods."
            ),
            (_, Violation::Missing) => format!("{label} is required."),
            (_, Violation::TooShort { min }) => {
                format!("{label} must be at least {min} characters long.")
            }
            (_, Violation::TooLong { max }) => format!("{label} must be less than {max} characters."),
            (_, Violation::InvalidFormat | Violation::InPast) => format!("{label} is invalid."),
        }
    }
}

/// When a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Both gates refuse to continue without it
    Required,
    /// The form asks for it; the server only checks it when supplied
    Advisory,
}

/// One bound field of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name
    pub name: &'static str,
    /// Label used in reasons
    pub label: &'static str,
    pub rule: Rule,
    pub presence: Presence,
    /// Replaces the rule's own "required" reason
    pub missing_reason: Option<&'static str>,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, rule: Rule) -> Self {
        Self {
            name,
            label,
            rule,
            presence: Presence::Required,
            missing_reason: None,
        }
    }

    const fn advisory(mut self) -> Self {
        self.presence = Presence::Advisory;
        self
    }

    const fn missing_reason(mut self, reason: &'static str) -> Self {
        self.missing_reason = Some(reason);
        self
    }

    /// Run the field rule, producing a field-keyed reason on failure
    pub fn check(&self, value: &str, today: NaiveDate) -> Result<(), FieldError> {
        self.rule.check(value, today).map_err(|violation| {
            let reason = match (violation, self.missing_reason) {
                (Violation::Missing, Some(reason)) => reason.to_string(),
                _ => self.rule.describe(violation, self.label),
            };
            FieldError::new(self.name, reason)
        })
    }
}

/// Which gate is running the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Browser-side, UX only
    Advisory,
    /// Server-side, cannot be bypassed
    Authoritative,
}

/// Field set of one form kind
#[derive(Debug)]
pub struct FormSchema {
    pub kind: FormKind,
    pub fields: &'static [FieldSpec],
    /// Transient notice shown while the submission is in flight
    pub processing_message: &'static str,
}

static BOOKING_FIELDS: [FieldSpec; 7] = [
    FieldSpec::new(booking::FIRST_NAME, "First Name", Rule::Name),
    FieldSpec::new(booking::LAST_NAME, "Last Name", Rule::Name),
    FieldSpec::new(booking::EMAIL, "Email", Rule::Email),
    FieldSpec::new(booking::PHONE, "Phone", Rule::Phone),
    FieldSpec::new(booking::ADDRESS, "Address", Rule::Address),
    FieldSpec::new(booking::PREFERRED_DATE, "Service date", Rule::ServiceDate),
    FieldSpec::new(booking::SERVICE_TYPE, "Service type", Rule::Required),
];

static CONTACT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::new(contact::FIRST_NAME, "First Name", Rule::Name),
    FieldSpec::new(contact::LAST_NAME, "Last Name", Rule::Name),
    FieldSpec::new(contact::EMAIL, "Email", Rule::Email),
    FieldSpec::new(contact::PHONE, "Phone", Rule::Phone).advisory(),
    FieldSpec::new(contact::SUBJECT, "Subject", Rule::Required),
    FieldSpec::new(contact::MESSAGE, "Message", Rule::Text(TextBounds::new(10, 1000))),
];

static QUICK_CONTACT_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new(quick_contact::NAME, "Name", Rule::Name),
    FieldSpec::new(quick_contact::EMAIL, "Email", Rule::Email),
    FieldSpec::new(quick_contact::PROJECT, "Project", Rule::Required)
        .advisory()
        .missing_reason("Please tell us about your service needs."),
];

static BOOKING_SCHEMA: FormSchema = FormSchema {
    kind: FormKind::Booking,
    fields: &BOOKING_FIELDS,
    processing_message: "Processing your booking request...",
};

static CONTACT_SCHEMA: FormSchema = FormSchema {
    kind: FormKind::Contact,
    fields: &CONTACT_FIELDS,
    processing_message: "Sending your message...",
};

static QUICK_CONTACT_SCHEMA: FormSchema = FormSchema {
    kind: FormKind::QuickContact,
    fields: &QUICK_CONTACT_FIELDS,
    processing_message: "Processing your request...",
};

impl FormSchema {
    /// Schema for a form kind
    #[must_use]
    pub fn for_kind(kind: FormKind) -> &'static FormSchema {
        match kind {
            FormKind::Booking => &BOOKING_SCHEMA,
            FormKind::Contact => &CONTACT_SCHEMA,
            FormKind::QuickContact => &QUICK_CONTACT_SCHEMA,
        }
    }

    /// Look up a bound field by wire name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Run every field rule and collect all failures, in schema order
    ///
    /// The advisory gate treats an absent value as empty. The authoritative
    /// gate skips advisory fields that were not supplied; absent required
    /// fields are reported as missing before this runs.
    pub fn validate<'a, F>(&self, lookup: F, today: NaiveDate, gate: Gate) -> Vec<FieldError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.fields
            .iter()
            .filter_map(|spec| {
                let value = lookup(spec.name);
                let supplied = value.is_some_and(|v| !v.trim().is_empty());
                if gate == Gate::Authoritative && spec.presence == Presence::Advisory && !supplied {
                    return None;
                }
                spec.check(value.unwrap_or(""), today).err()
            })
            .collect()
    }
}

//! Typed forms
//!
//! Built only after a submission has passed the required-field and rule
//! checks. Values are trimmed and optional blanks become `None`.

use crate::payload::RawSubmission;
use chrono::NaiveDate;
use intake_core::fields::{booking, contact, quick_contact};
use intake_core::{AdditionalServices, FieldError, FormKind, IntakeError, NewBooking, NewContactMessage};
use intake_validation::parse_service_date;

/// Subject stored for quick-contact requests
pub const QUICK_CONTACT_SUBJECT: &str = "Quick Contact Request";
/// Placeholder for an unanswered quick-contact question
pub const NOT_SPECIFIED: &str = "Not specified";

fn required(raw: &RawSubmission, name: &str) -> String {
    raw.get(name).map(str::trim).unwrap_or_default().to_string()
}

fn optional(raw: &RawSubmission, name: &str) -> Option<String> {
    raw.get(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    #[must_use]
    pub fn from_raw(raw: &RawSubmission) -> Self {
        Self {
            first_name: required(raw, contact::FIRST_NAME),
            last_name: required(raw, contact::LAST_NAME),
            email: required(raw, contact::EMAIL),
            phone: optional(raw, contact::PHONE),
            subject: required(raw, contact::SUBJECT),
            message: required(raw, contact::MESSAGE),
        }
    }

    #[must_use]
    pub fn into_message(self) -> NewContactMessage {
        NewContactMessage {
            name: format!("{} {}", self.first_name, self.last_name),
            email: self.email,
            subject: self.subject,
            message: self.message,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm(pub NewBooking);

impl BookingForm {
    /// Fails only if the preferred date does not parse, which the rule
    /// check has already ruled out.
    pub fn from_raw(raw: &RawSubmission) -> Result<Self, IntakeError> {
        let preferred_date: NaiveDate = raw
            .get(booking::PREFERRED_DATE)
            .and_then(parse_service_date)
            .ok_or_else(|| {
                IntakeError::ValidationFailed(vec![FieldError::new(
                    booking::PREFERRED_DATE,
                    "Please enter a valid service date.",
                )])
            })?;

        Ok(Self(NewBooking {
            first_name: required(raw, booking::FIRST_NAME),
            last_name: required(raw, booking::LAST_NAME),
            email: required(raw, booking::EMAIL),
            phone: required(raw, booking::PHONE),
            address: required(raw, booking::ADDRESS),
            property_type: optional(raw, booking::PROPERTY_TYPE),
            service_type: required(raw, booking::SERVICE_TYPE),
            urgency: optional(raw, booking::URGENCY),
            preferred_date,
            preferred_time: optional(raw, booking::PREFERRED_TIME),
            property_size: optional(raw, booking::PROPERTY_SIZE),
            frequency: optional(raw, booking::FREQUENCY),
            special_requirements: optional(raw, booking::SPECIAL_REQUIREMENTS),
            access_instructions: optional(raw, booking::ACCESS_INSTRUCTIONS),
            additional_services: AdditionalServices::new(raw.values(booking::ADDITIONAL_SERVICES)),
        }))
    }

    #[must_use]
    pub fn into_booking(self) -> NewBooking {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickContactForm {
    pub name: String,
    pub email: String,
    pub project: Option<String>,
    pub timeline: Option<String>,
}

impl QuickContactForm {
    #[must_use]
    pub fn from_raw(raw: &RawSubmission) -> Self {
        Self {
            name: required(raw, quick_contact::NAME),
            email: required(raw, quick_contact::EMAIL),
            project: optional(raw, quick_contact::PROJECT),
            timeline: optional(raw, quick_contact::TIMELINE),
        }
    }

    /// Message body: `Service Type: … | Timeline: …`
    #[must_use]
    pub fn body(&self) -> String {
        format!(
            "Service Type: {} | Timeline: {}",
            self.project.as_deref().unwrap_or(NOT_SPECIFIED),
            self.timeline.as_deref().unwrap_or(NOT_SPECIFIED)
        )
    }

    #[must_use]
    pub fn into_message(self) -> NewContactMessage {
        let message = self.body();
        NewContactMessage {
            name: self.name,
            email: self.email,
            subject: QUICK_CONTACT_SUBJECT.to_string(),
            message,
            phone: None,
        }
    }
}

/// A normalized submission of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeForm {
    Contact(ContactForm),
    Booking(BookingForm),
    QuickContact(QuickContactForm),
}

impl IntakeForm {
    pub fn from_raw(kind: FormKind, raw: &RawSubmission) -> Result<Self, IntakeError> {
        Ok(match kind {
            FormKind::Contact => IntakeForm::Contact(ContactForm::from_raw(raw)),
            FormKind::Booking => IntakeForm::Booking(BookingForm::from_raw(raw)?),
            FormKind::QuickContact => IntakeForm::QuickContact(QuickContactForm::from_raw(raw)),
        })
    }

    #[must_use]
    pub fn kind(&self) -> FormKind {
        match self {
            IntakeForm::Contact(_) => FormKind::Contact,
            IntakeForm::Booking(_) => FormKind::Booking,
            IntakeForm::QuickContact(_) => FormKind::QuickContact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_contact_body_fallbacks() {
        let raw = RawSubmission::from_pairs([
            ("quickName", " Ann "),
            ("quickEmail", "ann@example.com"),
            ("quickTimeline", "  "),
        ]);
        let form = QuickContactForm::from_raw(&raw);
        assert_eq!(form.name, "Ann");
        assert_eq!(form.body(), "Service Type: Not specified | Timeline: Not specified");

        let message = form.into_message();
        assert_eq!(message.subject, QUICK_CONTACT_SUBJECT);
        assert_eq!(message.phone, None);
    }

    #[test]
    fn contact_joins_name() {
        let raw = RawSubmission::from_pairs([
            ("contactFirstName", "Ann"),
            ("contactLastName", "Lee"),
            ("contactEmail", "ann@example.com"),
            ("contactPhone", ""),
            ("contactSubject", "Hi"),
            ("contactMessage", "Need a quote"),
        ]);
        let message = ContactForm::from_raw(&raw).into_message();
        assert_eq!(message.name, "Ann Lee");
        assert_eq!(message.phone, None);
    }

    #[test]
    fn booking_collects_services_and_blanks() {
        let raw = RawSubmission::from_pairs([
            ("firstName", "Ann"),
            ("preferredDate", "2030-01-02"),
            ("urgency", ""),
            ("additionalServices[]", "oven"),
            ("additionalServices[]", " "),
            ("additionalServices[]", "windows"),
        ]);
        let booking = BookingForm::from_raw(&raw).unwrap().into_booking();
        assert_eq!(booking.urgency, None);
        assert_eq!(booking.additional_services.iter().collect::<Vec<_>>(), vec!["oven", "windows"]);
    }

    #[test]
    fn booking_without_date_is_rejected() {
        let raw = RawSubmission::from_pairs([("firstName", "Ann")]);
        assert!(matches!(
            BookingForm::from_raw(&raw),
            Err(IntakeError::ValidationFailed(_))
        ));
    }
}

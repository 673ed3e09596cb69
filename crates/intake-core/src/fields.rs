//! Form kinds and the wire names of their fields
//!
//! Field names match the `name` attributes of the public HTML forms, so a
//! form-encoded body and a JSON body carry the same keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key carrying the form kind discriminator
pub const FORM_TYPE: &str = "form_type";

/// Booking form fields
pub mod booking {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ADDRESS: &str = "address";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const SERVICE_TYPE: &str = "serviceType";
    pub const URGENCY: &str = "urgency";
    pub const PREFERRED_DATE: &str = "preferredDate";
    pub const PREFERRED_TIME: &str = "preferredTime";
    pub const PROPERTY_SIZE: &str = "propertySize";
    pub const FREQUENCY: &str = "frequency";
    pub const SPECIAL_REQUIREMENTS: &str = "specialRequirements";
    pub const ACCESS_INSTRUCTIONS: &str = "accessInstructions";
    pub const ADDITIONAL_SERVICES: &str = "additionalServices";
}

/// Contact form fields
pub mod contact {
    pub const FIRST_NAME: &str = "contactFirstName";
    pub const LAST_NAME: &str = "contactLastName";
    pub const EMAIL: &str = "contactEmail";
    pub const PHONE: &str = "contactPhone";
    pub const SUBJECT: &str = "contactSubject";
    pub const MESSAGE: &str = "contactMessage";
}

/// Quick contact (homepage) form fields
pub mod quick_contact {
    pub const NAME: &str = "quickName";
    pub const EMAIL: &str = "quickEmail";
    pub const PROJECT: &str = "quickProject";
    pub const TIMELINE: &str = "quickTimeline";
}

/// The closed set of forms the intake endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Full contact form
    Contact,
    /// Service booking form
    Booking,
    /// Homepage quick enquiry
    QuickContact,
}

impl FormKind {
    /// Every form kind, in declaration order
    pub const ALL: [FormKind; 3] = [FormKind::Contact, FormKind::Booking, FormKind::QuickContact];

    /// Discriminator value sent in `form_type`
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Booking => "booking",
            FormKind::QuickContact => "quick_contact",
        }
    }

    /// Fields the server refuses to process without
    #[must_use]
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            FormKind::Contact => &[
                contact::FIRST_NAME,
                contact::LAST_NAME,
                contact::EMAIL,
                contact::SUBJECT,
                contact::MESSAGE,
            ],
            FormKind::Booking => &[
                booking::FIRST_NAME,
                booking::LAST_NAME,
                booking::EMAIL,
                booking::PHONE,
                booking::ADDRESS,
                booking::SERVICE_TYPE,
                booking::PREFERRED_DATE,
            ],
            FormKind::QuickContact => &[quick_contact::NAME, quick_contact::EMAIL],
        }
    }

    /// Whether a successful submission triggers a staff notification
    #[inline]
    #[must_use]
    pub fn notifies(self) -> bool {
        !matches!(self, FormKind::QuickContact)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized `form_type` value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form kind: {0}")]
pub struct UnknownFormKind(pub String);

impl FromStr for FormKind {
    type Err = UnknownFormKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "contact" => Ok(FormKind::Contact),
            "booking" => Ok(FormKind::Booking),
            "quick_contact" => Ok(FormKind::QuickContact),
            other => Err(UnknownFormKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_kind_round_trips_through_discriminator() {
        for kind in FormKind::ALL {
            assert_eq!(kind.as_str().parse::<FormKind>().unwrap(), kind);
        }
    }

    #[test]
    fn form_kind_rejects_unknown() {
        let err = "bogus".parse::<FormKind>().unwrap_err();
        assert_eq!(err, UnknownFormKind("bogus".to_string()));
        assert!("".parse::<FormKind>().is_err());
        assert!("Booking".parse::<FormKind>().is_err());
    }

    #[test]
    fn booking_requires_seven_fields() {
        let required = FormKind::Booking.required_fields();
        assert_eq!(required.len(), 7);
        assert!(required.contains(&booking::PREFERRED_DATE));
        assert!(!required.contains(&booking::PROPERTY_TYPE));
    }

    #[test]
    fn quick_contact_does_not_notify() {
        assert!(FormKind::Contact.notifies());
        assert!(FormKind::Booking.notifies());
        assert!(!FormKind::QuickContact.notifies());
    }
}

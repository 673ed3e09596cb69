//! Intake dispatcher
//!
//! The authoritative gate. Every submission, whatever the client did, goes
//! through the same ordered checks:
//! 1. method is POST
//! 2. `form_type` names a known form
//! 3. every required field is present
//! 4. every field rule passes
//!
//! Only then is the submission normalized, persisted and, for contact and
//! booking forms, announced on the notification queue. Any failure returns
//! before the store is touched.

use crate::clock::{Clock, SystemClock};
use crate::forms::IntakeForm;
use crate::notify::{Notification, NotificationHandle};
use crate::payload::RawSubmission;
use intake_core::fields::FORM_TYPE;
use intake_core::{FormKind, IntakeError, ResponseEnvelope};
use intake_store::{IntakeRepository, StoreError};
use intake_validation::schema::{FormSchema, Gate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Thank-you shown after a stored contact message
pub const CONTACT_THANKS: &str =
    "Thank you for your message! We will get back to you within 2 hours.";
/// Thank-you shown after a stored booking
pub const BOOKING_THANKS: &str =
    "Thank you for your booking request! We will confirm your appointment within 2 hours.";
/// Thank-you shown after a stored quick enquiry
pub const QUICK_CONTACT_THANKS: &str = "Thank you for your inquiry! We will get back to you soon.";

/// One inbound submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRequest {
    pub method: String,
    pub payload: RawSubmission,
}

impl IntakeRequest {
    pub fn new(method: impl Into<String>, payload: RawSubmission) -> Self {
        Self {
            method: method.into(),
            payload,
        }
    }

    /// A POST carrying `payload`
    #[must_use]
    pub fn post(payload: RawSubmission) -> Self {
        Self::new("POST", payload)
    }
}

/// Accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub kind: FormKind,
    pub record_id: i64,
    pub message: &'static str,
}

impl IntakeReceipt {
    #[must_use]
    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::ok(self.message)
    }
}

/// Routes submissions to validation, the store and the notification queue
#[derive(Clone)]
pub struct IntakeDispatcher {
    repository: Arc<dyn IntakeRepository>,
    notifier: Option<NotificationHandle>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for IntakeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeDispatcher")
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl IntakeDispatcher {
    /// Dispatcher over a repository, with no notifications and the system clock
    pub fn new(repository: Arc<dyn IntakeRepository>) -> Self {
        Self {
            repository,
            notifier: None,
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: NotificationHandle) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate, persist and announce one submission
    pub fn dispatch(&self, request: IntakeRequest) -> Result<IntakeReceipt, IntakeError> {
        if !request.method.eq_ignore_ascii_case("POST") {
            warn!(method = %request.method, "intake rejected: method not allowed");
            return Err(IntakeError::MethodNotAllowed(request.method));
        }
        let raw = request.payload;

        let kind = Self::form_kind(&raw)?;
        debug!(form = %kind, fields = raw.len(), "routing submission");

        let missing: Vec<String> = kind
            .required_fields()
            .iter()
            .filter(|name| raw.is_blank(name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            warn!(form = %kind, missing = ?missing, "intake rejected: missing fields");
            return Err(IntakeError::MissingFields(missing));
        }

        let errors = FormSchema::for_kind(kind).validate(
            |name| raw.get(name),
            self.clock.today(),
            Gate::Authoritative,
        );
        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            warn!(form = %kind, fields = ?fields, "intake rejected: validation failed");
            return Err(IntakeError::ValidationFailed(errors));
        }

        let form = IntakeForm::from_raw(kind, &raw)?;
        let (record_id, notification) = self.persist(form)?;
        info!(form = %kind, record_id, "intake accepted");

        if let Some(notification) = notification {
            self.announce(notification);
        }

        Ok(IntakeReceipt {
            kind,
            record_id,
            message: thanks(kind),
        })
    }

    fn form_kind(raw: &RawSubmission) -> Result<FormKind, IntakeError> {
        let Some(value) = raw.get(FORM_TYPE) else {
            warn!("intake rejected: form_type missing");
            return Err(IntakeError::InvalidFormType(None));
        };
        value.parse::<FormKind>().map_err(|_| {
            warn!(form_type = %value, "intake rejected: unknown form_type");
            IntakeError::InvalidFormType(Some(value.to_string()))
        })
    }

    fn persist(&self, form: IntakeForm) -> Result<(i64, Option<Notification>), IntakeError> {
        let kind = form.kind();
        let received_at = self.clock.now();
        let stored = match form {
            IntakeForm::Booking(form) => {
                let booking = form.into_booking();
                self.repository.create_booking(&booking).map(|record_id| {
                    let notification = Notification::Booking {
                        record_id,
                        booking,
                        received_at,
                    };
                    (record_id, Some(notification))
                })
            }
            IntakeForm::Contact(form) => {
                let message = form.into_message();
                self.repository
                    .create_contact_message(&message)
                    .map(|record_id| {
                        let notification = Notification::Contact {
                            record_id,
                            message,
                            received_at,
                        };
                        (record_id, Some(notification))
                    })
            }
            IntakeForm::QuickContact(form) => self
                .repository
                .create_contact_message(&form.into_message())
                .map(|record_id| (record_id, None)),
        };
        stored.map_err(|err: StoreError| {
            error!(form = %kind, error = %err, transient = err.is_transient(), "intake persistence failed");
            IntakeError::PersistenceFailed
        })
    }

    fn announce(&self, notification: Notification) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let record_id = notification.record_id();
        if let Err(err) = notifier.enqueue(notification) {
            warn!(record_id, error = %err, "notification not queued");
        }
    }
}

/// Thank-you message for a stored submission
#[must_use]
pub fn thanks(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Contact => CONTACT_THANKS,
        FormKind::Booking => BOOKING_THANKS,
        FormKind::QuickContact => QUICK_CONTACT_THANKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use intake_store::IntakeStore;

    fn dispatcher() -> (IntakeDispatcher, Arc<IntakeStore>) {
        let store = Arc::new(IntakeStore::open_in_memory().unwrap());
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        let dispatcher = IntakeDispatcher::new(store.clone()).with_clock(Arc::new(clock));
        (dispatcher, store)
    }

    #[test]
    fn method_is_checked_first() {
        let (dispatcher, _) = dispatcher();
        let err = dispatcher
            .dispatch(IntakeRequest::new("GET", RawSubmission::new()))
            .unwrap_err();
        assert_eq!(err, IntakeError::MethodNotAllowed("GET".into()));

        let err = dispatcher
            .dispatch(IntakeRequest::new("post", RawSubmission::new()))
            .unwrap_err();
        assert_eq!(err, IntakeError::InvalidFormType(None));
    }

    #[test]
    fn quick_contact_is_stored_without_phone() {
        let (dispatcher, store) = dispatcher();
        let receipt = dispatcher
            .dispatch(IntakeRequest::post(RawSubmission::from_pairs([
                ("form_type", "quick_contact"),
                ("quickName", "Ann"),
                ("quickEmail", "ann@example.com"),
                ("quickProject", "Move-out clean"),
            ])))
            .unwrap();
        assert_eq!(receipt.message, QUICK_CONTACT_THANKS);

        let stored = store.get_contact_message(receipt.record_id).unwrap().unwrap();
        assert_eq!(stored.subject, "Quick Contact Request");
        assert_eq!(stored.message, "Service Type: Move-out clean | Timeline: Not specified");
        assert_eq!(stored.phone, None);
    }

    #[test]
    fn receipt_renders_success_envelope() {
        let receipt = IntakeReceipt {
            kind: FormKind::Booking,
            record_id: 3,
            message: BOOKING_THANKS,
        };
        let envelope = receipt.to_envelope();
        assert!(envelope.success);
        assert_eq!(envelope.message, BOOKING_THANKS);
    }
}

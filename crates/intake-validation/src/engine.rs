//! Headless form engine
//!
//! Models the presentation-side gate without a DOM:
//! - Per-field state driven by blur and input events
//! - Whole-form submit that aggregates every failure
//! - The submission exchange and its timed notices
//!
//! Nothing here persists anything. The server revalidates every submission.

use crate::schema::{FormSchema, Gate};
use chrono::NaiveDate;
use intake_core::fields::FORM_TYPE;
use intake_core::{FieldError, FormKind, ResponseEnvelope};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Banner raised when submit finds any invalid field
pub const BLOCKED_BANNER: &str = "Please correct the errors above before submitting.";
/// Shown when the exchange fails or the server sends no message
pub const FALLBACK_FAILURE: &str = "An error occurred. Please try again.";
/// Success notices disappear after this long
pub const SUCCESS_DISMISS: Duration = Duration::from_secs(5);
/// Failure notices disappear after this long
pub const FAILURE_DISMISS: Duration = Duration::from_secs(7);

/// Display state of a single field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

/// State plus the last recorded reason
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldView {
    pub state: FieldState,
    /// Kept after `input` clears the styling, until the next blur
    pub reason: Option<String>,
}

impl FieldView {
    #[inline]
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.state == FieldState::Invalid
    }
}

/// Notice styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Processing,
    Success,
    Failure,
}

/// Transient message above the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub dismiss_after: Duration,
}

impl Notice {
    /// Processing and success notices share the success container
    #[must_use]
    pub fn success(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            dismiss_after: SUCCESS_DISMISS,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
            dismiss_after: FAILURE_DISMISS,
        }
    }

    /// Whether the notice is still shown `elapsed` after it appeared
    #[inline]
    #[must_use]
    pub fn is_visible_at(&self, elapsed: Duration) -> bool {
        elapsed < self.dismiss_after
    }
}

/// A payload the engine let through
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub form_type: FormKind,
    pub fields: BTreeMap<String, String>,
    pub notice: Notice,
}

impl PreparedSubmission {
    /// Wire body: every field plus the `form_type` discriminator
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        body.insert(
            FORM_TYPE.to_string(),
            Value::String(self.form_type.as_str().to_string()),
        );
        Value::Object(body)
    }
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitDecision {
    /// At least one field failed; nothing is sent
    Blocked {
        errors: Vec<FieldError>,
        banner: Notice,
    },
    Ready(PreparedSubmission),
}

impl SubmitDecision {
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SubmitDecision::Ready(_))
    }
}

/// One rendered form and its field states
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: &'static FormSchema,
    today: NaiveDate,
    views: BTreeMap<&'static str, FieldView>,
}

impl FormSession {
    /// Bind a session to a form kind; `today` is the viewer's local date
    #[must_use]
    pub fn new(kind: FormKind, today: NaiveDate) -> Self {
        let schema = FormSchema::for_kind(kind);
        let views = schema
            .fields
            .iter()
            .map(|spec| (spec.name, FieldView::default()))
            .collect();
        Self {
            schema,
            today,
            views,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.schema.kind
    }

    /// Field lost focus. Returns `None` for a field the form does not bind.
    pub fn blur(&mut self, field: &str, value: &str) -> Option<&FieldView> {
        let spec = self.schema.field(field)?;
        let result = spec.check(value, self.today);
        let view = self.views.get_mut(spec.name)?;
        match result {
            Ok(()) => {
                view.state = FieldState::Valid;
                view.reason = None;
            }
            Err(err) => {
                view.state = FieldState::Invalid;
                view.reason = Some(err.reason);
            }
        }
        Some(view)
    }

    /// Field is being edited
    pub fn input(&mut self, field: &str) {
        if let Some(view) = self.views.get_mut(field) {
            if view.state == FieldState::Invalid {
                view.state = FieldState::Untouched;
            }
        }
    }

    #[must_use]
    pub fn view(&self, field: &str) -> Option<&FieldView> {
        self.views.get(field)
    }

    /// Fields currently styled invalid
    pub fn invalid_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.views
            .iter()
            .filter(|(_, view)| view.is_invalid())
            .map(|(name, _)| *name)
    }

    /// Run every rule; block on any failure, otherwise build the payload
    pub fn submit(&mut self, values: &BTreeMap<String, String>) -> SubmitDecision {
        let errors = self.schema.validate(
            |name| values.get(name).map(String::as_str),
            self.today,
            Gate::Advisory,
        );

        for (name, view) in &mut self.views {
            match errors.iter().find(|e| e.field == *name) {
                Some(err) => {
                    view.state = FieldState::Invalid;
                    view.reason = Some(err.reason.clone());
                }
                None => {
                    view.state = FieldState::Valid;
                    view.reason = None;
                }
            }
        }

        if !errors.is_empty() {
            return SubmitDecision::Blocked {
                errors,
                banner: Notice::failure(BLOCKED_BANNER),
            };
        }

        SubmitDecision::Ready(PreparedSubmission {
            form_type: self.schema.kind,
            fields: values.clone(),
            notice: Notice::success(NoticeKind::Processing, self.schema.processing_message),
        })
    }

    /// Clear every field, as after a successful submission
    pub fn reset(&mut self) {
        for view in self.views.values_mut() {
            *view = FieldView::default();
        }
    }
}

/// Phase of the submission exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowPhase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// The asynchronous exchange with the server
#[derive(Debug, Clone, Default)]
pub struct SubmissionFlow {
    phase: FlowPhase,
    notice: Option<Notice>,
}

impl SubmissionFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Notice currently on screen, if any
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Request sent; shows the processing notice
    pub fn start(&mut self, submission: &PreparedSubmission) -> &Notice {
        self.phase = FlowPhase::InFlight;
        self.notice.insert(submission.notice.clone())
    }

    /// Server answered with an envelope
    pub fn resolve(&mut self, envelope: &ResponseEnvelope) -> &Notice {
        let notice = if envelope.success {
            self.phase = FlowPhase::Succeeded;
            Notice::success(NoticeKind::Success, envelope.message.clone())
        } else {
            self.phase = FlowPhase::Failed;
            let message = if envelope.message.trim().is_empty() {
                FALLBACK_FAILURE.to_string()
            } else {
                envelope.message.clone()
            };
            Notice::failure(message)
        };
        self.notice.insert(notice)
    }

    /// The exchange itself failed: network error or unreadable body
    pub fn transport_failed(&mut self) -> &Notice {
        self.phase = FlowPhase::Failed;
        self.notice.insert(Notice::failure(FALLBACK_FAILURE))
    }
}

//! JSON response envelope shared by the server and the form engine

use crate::error::{FieldError, IntakeError};
use serde::{Deserialize, Serialize};

/// `{success, message, error?, fields?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ResponseEnvelope {
    /// Successful intake with a user-facing thank-you
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            fields: Vec::new(),
        }
    }

    /// Failure with a label and a user-facing message
    #[must_use]
    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
            fields: Vec::new(),
        }
    }
}

impl From<&IntakeError> for ResponseEnvelope {
    fn from(err: &IntakeError) -> Self {
        Self {
            success: false,
            message: err.public_message(),
            error: Some(err.label().to_string()),
            fields: err.field_errors().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_envelope_omits_error_keys() {
        let json = serde_json::to_value(ResponseEnvelope::ok("Thanks")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "Thanks"}));
    }

    #[test]
    fn validation_envelope_carries_fields() {
        let err = IntakeError::ValidationFailed(vec![FieldError::new("email", "bad")]);
        let envelope = ResponseEnvelope::from(&err);
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Validation failed"));
        assert_eq!(envelope.fields, vec![FieldError::new("email", "bad")]);
    }

    #[test]
    fn envelope_parses_without_optional_keys() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert_eq!(envelope.error, None);
        assert!(envelope.fields.is_empty());
    }
}

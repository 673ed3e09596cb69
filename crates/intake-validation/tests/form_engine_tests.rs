use chrono::NaiveDate;
use intake_core::{FormKind, ResponseEnvelope};
use intake_validation::schema::{FormSchema, Gate};
use intake_validation::{FlowPhase, FormSession, NoticeKind, SubmissionFlow, SubmitDecision};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn contact_values() -> BTreeMap<String, String> {
    [
        ("contactFirstName", "Ann"),
        ("contactLastName", "Lee"),
        ("contactEmail", "ann@example.com"),
        ("contactSubject", "Hi"),
        ("contactMessage", "Need a quote"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn test_contact_form_round_trip_through_flow() {
    let mut session = FormSession::new(FormKind::Contact, today());
    let mut values = contact_values();
    // contactPhone is optional on the server but the form still checks it
    values.insert("contactPhone".into(), "0712 345 678".into());

    let SubmitDecision::Ready(prepared) = session.submit(&values) else {
        panic!("contact form should be ready");
    };
    assert_eq!(prepared.notice.message, "Sending your message...");

    let mut flow = SubmissionFlow::new();
    flow.start(&prepared);
    let notice = flow
        .resolve(&ResponseEnvelope::ok(
            "Thank you for your message! We will get back to you within 2 hours.",
        ))
        .clone();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.is_visible_at(Duration::from_secs(4)));
    assert!(!notice.is_visible_at(Duration::from_secs(5)));
    assert_eq!(flow.phase(), FlowPhase::Succeeded);
}

#[test]
fn test_server_failure_message_is_shown() {
    let mut flow = SubmissionFlow::new();
    let envelope = ResponseEnvelope::failure("Invalid form type", "Invalid form type");
    let notice = flow.resolve(&envelope);
    assert_eq!(notice.kind, NoticeKind::Failure);
    assert_eq!(notice.message, "Invalid form type");
}

#[test]
fn test_both_gates_agree_on_supplied_values() {
    let schema = FormSchema::for_kind(FormKind::Contact);
    let mut values = contact_values();
    values.insert("contactMessage".into(), "short".into());

    let advisory = schema.validate(|k| values.get(k).map(String::as_str), today(), Gate::Advisory);
    let authoritative =
        schema.validate(|k| values.get(k).map(String::as_str), today(), Gate::Authoritative);

    let advisory_fields: Vec<&str> = advisory.iter().map(|e| e.field.as_str()).collect();
    // Absent contactPhone is the only difference between the gates
    assert_eq!(advisory_fields, vec!["contactPhone", "contactMessage"]);
    assert_eq!(authoritative.len(), 1);
    assert_eq!(authoritative[0], advisory[1]);
}

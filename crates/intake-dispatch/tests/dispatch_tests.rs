//! End-to-end dispatch behavior over an in-memory store

use intake_core::{BookingStatus, FormKind, IntakeError, MessageStatus};
use intake_dispatch::{
    IntakeDispatcher, IntakeRequest, Notification, NotificationQueue, RawSubmission,
};
use intake_test_utils::{
    booking_submission, contact_fields, contact_submission, fixed_clock, next_week,
    quick_contact_submission, setup_dispatcher, setup_notifying_dispatcher, without, yesterday,
    FailingRepository, FailingSink, RecordingSink,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_contact_submission_is_stored_as_new() {
    let (dispatcher, store) = setup_dispatcher();

    let receipt = dispatcher
        .dispatch(IntakeRequest::post(contact_submission()))
        .unwrap();
    assert_eq!(receipt.kind, FormKind::Contact);

    let envelope = receipt.to_envelope();
    assert!(envelope.success);
    assert_eq!(
        envelope.message,
        "Thank you for your message! We will get back to you within 2 hours."
    );

    let messages = store.list_contact_messages(None).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, receipt.record_id);
    assert_eq!(messages[0].name, "Ann Lee");
    assert_eq!(messages[0].subject, "Hi");
    assert_eq!(messages[0].status, MessageStatus::New);
}

#[test]
fn test_booking_in_the_past_is_rejected_before_storage() {
    let (dispatcher, store) = setup_dispatcher();

    let err = dispatcher
        .dispatch(IntakeRequest::post(booking_submission(yesterday())))
        .unwrap_err();

    match &err {
        IntakeError::ValidationFailed(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "preferredDate");
            assert_eq!(errors[0].reason, "Service date cannot be in the past.");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(err.status_code(), 422);
    assert!(store.list_bookings(None).unwrap().is_empty());
}

#[test]
fn test_future_booking_is_pending_with_services() {
    let (dispatcher, store) = setup_dispatcher();

    let receipt = dispatcher
        .dispatch(IntakeRequest::post(booking_submission(next_week())))
        .unwrap();

    let booking = store.get_booking(receipt.record_id).unwrap().unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.preferred_date, next_week());
    assert_eq!(
        booking.additional_services.iter().collect::<Vec<_>>(),
        vec!["oven", "windows"]
    );
    assert_eq!(booking.urgency, None);
}

#[test]
fn test_unknown_form_type_is_rejected() {
    let (dispatcher, store) = setup_dispatcher();
    let payload = RawSubmission::from_pairs(
        without(contact_fields(), &["form_type"])
            .into_iter()
            .chain([("form_type", "bogus")]),
    );
    assert!(payload.get("contactEmail").is_some());

    let err = dispatcher.dispatch(IntakeRequest::post(payload)).unwrap_err();
    assert_eq!(err, IntakeError::InvalidFormType(Some("bogus".into())));
    assert_eq!(err.status_code(), 400);
    assert!(store.list_contact_messages(None).unwrap().is_empty());
}

#[test]
fn test_missing_fields_are_all_named() {
    let (dispatcher, store) = setup_dispatcher();
    let mut payload = RawSubmission::new();
    for (key, value) in [
        ("form_type", "booking"),
        ("firstName", "Ann"),
        ("lastName", "Lee"),
        ("email", "ann@example.com"),
        ("phone", "  "),
        ("serviceType", "deep_clean"),
        ("preferredDate", "2026-03-20"),
    ] {
        payload.append(key, value);
    }

    let err = dispatcher.dispatch(IntakeRequest::post(payload)).unwrap_err();
    assert_eq!(
        err,
        IntakeError::MissingFields(vec!["phone".into(), "address".into()])
    );
    assert!(store.list_bookings(None).unwrap().is_empty());
}

#[test]
fn test_every_rule_failure_is_reported() {
    let (dispatcher, _) = setup_dispatcher();
    let payload = RawSubmission::from_pairs([
        ("form_type", "contact"),
        ("contactFirstName", "A"),
        ("contactLastName", "Lee"),
        ("contactEmail", "not-an-email"),
        ("contactSubject", "Hi"),
        ("contactMessage", "Need a quote"),
    ]);

    let err = dispatcher.dispatch(IntakeRequest::post(payload)).unwrap_err();
    let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["contactFirstName", "contactEmail"]);
}

#[test]
fn test_non_post_is_refused() {
    let (dispatcher, store) = setup_dispatcher();
    let err = dispatcher
        .dispatch(IntakeRequest::new("PUT", contact_submission()))
        .unwrap_err();
    assert_eq!(err.status_code(), 405);
    assert!(store.list_contact_messages(None).unwrap().is_empty());
}

#[test]
fn test_store_failure_is_generic() {
    let repository = Arc::new(FailingRepository::default());
    let dispatcher = IntakeDispatcher::new(repository.clone()).with_clock(fixed_clock());

    let err = dispatcher
        .dispatch(IntakeRequest::post(contact_submission()))
        .unwrap_err();
    assert_eq!(err, IntakeError::PersistenceFailed);
    assert_eq!(err.status_code(), 500);
    assert!(!err.public_message().contains("full"));
    assert_eq!(repository.attempts(), 1);
}

#[tokio::test]
async fn test_committed_contact_is_announced() {
    let (dispatcher, _store, sink, _handle) = setup_notifying_dispatcher();

    let receipt = dispatcher
        .dispatch(IntakeRequest::post(contact_submission()))
        .unwrap();

    let delivered = tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
        .await
        .unwrap();
    assert_eq!(delivered.len(), 1);
    match &delivered[0] {
        Notification::Contact {
            record_id, message, ..
        } => {
            assert_eq!(*record_id, receipt.record_id);
            assert_eq!(message.email, "ann@example.com");
        }
        other => panic!("expected contact notification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_quick_contact_is_not_announced() {
    let (dispatcher, store, sink, _handle) = setup_notifying_dispatcher();

    dispatcher
        .dispatch(IntakeRequest::post(quick_contact_submission()))
        .unwrap();
    let receipt = dispatcher
        .dispatch(IntakeRequest::post(booking_submission(next_week())))
        .unwrap();

    let delivered = tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
        .await
        .unwrap();
    assert_eq!(delivered.len(), 1);
    assert!(matches!(
        delivered[0],
        Notification::Booking { record_id, .. } if record_id == receipt.record_id
    ));
    assert_eq!(store.list_contact_messages(None).unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_submission_is_not_announced() {
    let (dispatcher, _store, sink, handle) = setup_notifying_dispatcher();

    let _ = dispatcher.dispatch(IntakeRequest::post(RawSubmission::from_pairs([(
        "form_type",
        "bogus",
    )])));
    let _ = dispatcher.dispatch(IntakeRequest::post(booking_submission(yesterday())));

    drop(dispatcher);
    drop(handle);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn test_failed_store_sends_nothing() {
    let sink = RecordingSink::new();
    let (handle, task) = NotificationQueue::spawn(sink.clone(), 4);
    let dispatcher = IntakeDispatcher::new(Arc::new(FailingRepository::default()))
        .with_clock(fixed_clock())
        .with_notifier(handle);

    let err = dispatcher
        .dispatch(IntakeRequest::post(booking_submission(next_week())))
        .unwrap_err();
    assert_eq!(err, IntakeError::PersistenceFailed);

    drop(dispatcher);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_does_not_affect_the_submitter() {
    let (dispatcher, store) = setup_dispatcher();
    let sink = Arc::new(FailingSink::default());
    let (handle, task) = NotificationQueue::spawn(sink.clone(), 4);
    let dispatcher = dispatcher.with_notifier(handle);

    let receipt = dispatcher
        .dispatch(IntakeRequest::post(contact_submission()))
        .unwrap();
    assert!(receipt.to_envelope().success);

    drop(dispatcher);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sink.attempts(), 1);
    assert!(store.get_contact_message(receipt.record_id).unwrap().is_some());
}

use intake_core::{validate_transition, BookingStatus, MessageStatus, StatusWorkflow};
use proptest::prelude::*;

fn booking_rank(status: BookingStatus) -> u8 {
    match status {
        BookingStatus::Pending => 0,
        BookingStatus::Confirmed => 1,
        BookingStatus::Completed => 2,
        BookingStatus::Cancelled => 3,
    }
}

#[test]
fn test_pending_transitions() {
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Cancelled).is_ok());
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Completed).is_ok());

    // Invalid
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Pending).is_err());
}

#[test]
fn test_both_workflows_may_skip_a_step() {
    assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    assert!(MessageStatus::New.can_transition_to(MessageStatus::Archived));
    assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
}

#[test]
fn test_terminal_states_have_no_exits() {
    for to in BookingStatus::ALL {
        assert!(validate_transition(BookingStatus::Completed, to).is_err());
        assert!(validate_transition(BookingStatus::Cancelled, to).is_err());
    }
    for to in MessageStatus::ALL {
        assert!(validate_transition(MessageStatus::Archived, to).is_err());
    }
}

proptest! {
    #[test]
    fn prop_booking_transitions_only_move_forward_or_cancel(
        from in prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Confirmed),
            Just(BookingStatus::Completed),
            Just(BookingStatus::Cancelled),
        ],
        to in prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Confirmed),
            Just(BookingStatus::Completed),
            Just(BookingStatus::Cancelled),
        ]
    ) {
        if validate_transition(from, to).is_ok() {
            prop_assert!(to == BookingStatus::Cancelled || booking_rank(to) > booking_rank(from));
            prop_assert!(from.allowed_transitions().contains(&to));
        } else {
            prop_assert!(!from.allowed_transitions().contains(&to));
        }
    }

    #[test]
    fn prop_message_status_never_returns_to_new(
        from in prop_oneof![
            Just(MessageStatus::New),
            Just(MessageStatus::Read),
            Just(MessageStatus::Archived),
        ]
    ) {
        prop_assert!(!from.can_transition_to(MessageStatus::New));
    }
}

//! Status workflows for intake records
//!
//! Bookings move forward through `pending -> confirmed -> completed`, may be
//! completed without a confirmation step, and may be cancelled from any
//! non-terminal state. Contact messages move
//! `new -> read -> archived`, and may be archived unread.

use crate::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// A status enum with a fixed transition table
pub trait StatusWorkflow: Copy + Eq + Debug + Display + 'static {
    /// States reachable in one step from `self`
    fn allowed_transitions(self) -> &'static [Self];

    /// Check a single step
    #[inline]
    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// No further transitions are possible
    #[inline]
    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Validates a status transition.
pub fn validate_transition<S: StatusWorkflow>(from: S, to: S) -> Result<(), TransitionError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(TransitionError {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Lifecycle of a booking request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation by staff
    #[default]
    Pending,
    /// Appointment confirmed
    Confirmed,
    /// Service delivered
    Completed,
    /// Withdrawn by either side
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    /// Stored column value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl StatusWorkflow for BookingStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Completed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Completed => &[],
            Cancelled => &[],
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Lifecycle of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Not yet opened by staff
    #[default]
    New,
    /// Opened
    Read,
    /// Filed away
    Archived,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 3] = [MessageStatus::New, MessageStatus::Read, MessageStatus::Archived];

    /// Stored column value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Archived => "archived",
        }
    }
}

impl StatusWorkflow for MessageStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        use MessageStatus::*;
        match self {
            New => &[Read, Archived],
            Read => &[Archived],
            Archived => &[],
        }
    }
}

impl Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Status string that names no known state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

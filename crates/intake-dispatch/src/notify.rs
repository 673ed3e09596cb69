//! Post-commit staff notifications
//!
//! The dispatcher enqueues a [`Notification`] after a record is committed.
//! A background task drains the queue into a [`NotificationSink`]. Delivery
//! is best-effort: failures are logged and never reach the submitter.

use chrono::NaiveDateTime;
use intake_core::{NewBooking, NewContactMessage, NotificationError};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default staff inbox
pub const DEFAULT_RECIPIENT: &str = "hello@sparknest.co.ke";
/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

const RECEIVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Something staff should hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Booking {
        record_id: i64,
        booking: NewBooking,
        received_at: NaiveDateTime,
    },
    Contact {
        record_id: i64,
        message: NewContactMessage,
        received_at: NaiveDateTime,
    },
}

impl Notification {
    #[must_use]
    pub fn record_id(&self) -> i64 {
        match self {
            Notification::Booking { record_id, .. } | Notification::Contact { record_id, .. } => {
                *record_id
            }
        }
    }
}

/// A composed email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: String,
}

/// Renders notifications as plain-text staff emails
#[derive(Debug, Clone)]
pub struct MailComposer {
    recipient: String,
}

impl Default for MailComposer {
    fn default() -> Self {
        Self::new(DEFAULT_RECIPIENT)
    }
}

impl MailComposer {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    #[must_use]
    pub fn compose(&self, notification: &Notification) -> OutboundMail {
        match notification {
            Notification::Booking {
                booking,
                received_at,
                ..
            } => OutboundMail {
                to: self.recipient.clone(),
                subject: "New Booking Request - SparkNest Services".to_string(),
                body: booking_body(booking, *received_at),
                reply_to: booking.email.clone(),
            },
            Notification::Contact {
                message,
                received_at,
                ..
            } => OutboundMail {
                to: self.recipient.clone(),
                subject: "New Contact Message - SparkNest Services".to_string(),
                body: contact_body(message, *received_at),
                reply_to: message.email.clone(),
            },
        }
    }
}

fn or_not_specified(value: Option<&String>) -> &str {
    value.map_or("Not specified", String::as_str)
}

fn booking_body(booking: &NewBooking, received_at: NaiveDateTime) -> String {
    let mut body = String::from("New booking request received:\n\n");
    // Writing into a String cannot fail
    let _ = writeln!(body, "Customer: {}", booking.customer_name());
    let _ = writeln!(body, "Email: {}", booking.email);
    let _ = writeln!(body, "Phone: {}", booking.phone);
    let _ = writeln!(body, "Address: {}", booking.address);
    let _ = writeln!(body, "Service Type: {}", booking.service_type);
    let _ = writeln!(body, "Preferred Date: {}", booking.preferred_date.format("%Y-%m-%d"));
    let _ = writeln!(body, "Preferred Time: {}", or_not_specified(booking.preferred_time.as_ref()));
    let _ = writeln!(body, "Property Type: {}", or_not_specified(booking.property_type.as_ref()));
    let _ = writeln!(body, "Property Size: {}", or_not_specified(booking.property_size.as_ref()));
    let _ = writeln!(body, "Urgency: {}", or_not_specified(booking.urgency.as_ref()));
    let _ = writeln!(
        body,
        "Frequency: {}",
        booking.frequency.as_deref().unwrap_or("One-time")
    );
    if !booking.additional_services.is_empty() {
        let services: Vec<&str> = booking.additional_services.iter().collect();
        let _ = writeln!(body, "Additional Services: {}", services.join(", "));
    }
    if let Some(requirements) = &booking.special_requirements {
        let _ = writeln!(body, "Special Requirements: {requirements}");
    }
    if let Some(instructions) = &booking.access_instructions {
        let _ = writeln!(body, "Access Instructions: {instructions}");
    }
    let _ = write!(body, "\nReceived at: {}", received_at.format(RECEIVED_AT_FORMAT));
    body
}

fn contact_body(message: &NewContactMessage, received_at: NaiveDateTime) -> String {
    format!(
        "New contact message received:\n\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Subject: {}\n\
         Message: {}\n\
         \nReceived at: {}",
        message.name,
        message.email,
        message.phone.as_deref().unwrap_or("Not provided"),
        message.subject,
        message.message,
        received_at.format(RECEIVED_AT_FORMAT)
    )
}

/// Where notifications end up
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Emits composed mail to the log instead of a mail transport
#[derive(Debug, Clone, Default)]
pub struct LogMailer {
    composer: MailComposer,
}

impl LogMailer {
    #[must_use]
    pub fn new(composer: MailComposer) -> Self {
        Self { composer }
    }
}

#[async_trait::async_trait]
impl NotificationSink for LogMailer {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError> {
        let mail = self.composer.compose(notification);
        info!(
            to = %mail.to,
            reply_to = %mail.reply_to,
            subject = %mail.subject,
            record_id = notification.record_id(),
            body = %mail.body,
            "staff notification"
        );
        Ok(())
    }
}

/// Sending half of the notification queue; cheap to clone
#[derive(Debug, Clone)]
pub struct NotificationHandle {
    sender: mpsc::Sender<Notification>,
}

impl NotificationHandle {
    /// Enqueue without waiting. Safe to call from synchronous code.
    pub fn enqueue(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sender.try_send(notification).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => NotificationError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotificationError::QueueClosed,
        })
    }
}

/// Background delivery task
pub struct NotificationQueue;

impl NotificationQueue {
    /// Start the delivery task on the current runtime
    ///
    /// The task ends once every [`NotificationHandle`] has been dropped and
    /// the queue is drained.
    pub fn spawn(
        sink: Arc<dyn NotificationSink>,
        capacity: usize,
    ) -> (NotificationHandle, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<Notification>(capacity.max(1));
        let task = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                let record_id = notification.record_id();
                match sink.deliver(&notification).await {
                    Ok(()) => debug!(record_id, "notification delivered"),
                    Err(err) => warn!(record_id, error = %err, "notification delivery failed"),
                }
            }
            debug!("notification queue drained");
        });
        (NotificationHandle { sender }, task)
    }
}

//! Outbound notification capability.

use tp25_protocol::RawNotification;

use crate::error::SendError;

/// Something that can deliver notifications to the host.
///
/// The device calls this synchronously from within command and timer
/// processing. Implementations must not block; a transport that cannot take
/// the notification right now reports a [`SendError`] and the notification
/// is dropped.
pub trait NotificationSink {
    /// Deliver one notification.
    fn send_notification(&mut self, notification: &RawNotification) -> Result<(), SendError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &mut T {
    fn send_notification(&mut self, notification: &RawNotification) -> Result<(), SendError> {
        (**self).send_notification(notification)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn send_notification(&mut self, notification: &RawNotification) -> Result<(), SendError> {
        (**self).send_notification(notification)
    }
}

/// Sink that keeps every notification it accepts.
///
/// Starts subscribed; clear [`RecordingSink::subscribed`] to simulate a host
/// that has not enabled notifications.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    /// Notifications accepted so far.
    pub sent: Vec<RawNotification>,
    /// Whether sends are accepted.
    pub subscribed: bool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        RecordingSink {
            sent: Vec::new(),
            subscribed: true,
        }
    }
}

impl RecordingSink {
    /// Create a subscribed, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<RawNotification> {
        std::mem::take(&mut self.sent)
    }
}

impl NotificationSink for RecordingSink {
    fn send_notification(&mut self, notification: &RawNotification) -> Result<(), SendError> {
        if !self.subscribed {
            return Err(SendError::NotSubscribed);
        }
        self.sent.push(*notification);
        Ok(())
    }
}

//! Device error types.

use thiserror::Error;
use tp25_protocol::ProtocolError;

/// Why a notification could not be handed to the transport.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No client has notifications enabled.
    #[error("no subscriber for notifications")]
    NotSubscribed,

    /// The outbound queue is full.
    #[error("notification queue full")]
    QueueFull,

    /// The transport has shut down.
    #[error("transport closed")]
    Closed,
}

impl SendError {
    /// Short, stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SendError::NotSubscribed => "not_subscribed",
            SendError::QueueFull => "queue_full",
            SendError::Closed => "closed",
        }
    }
}

/// Errors raised by device operations outside the command path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Invalid device configuration.
    #[error("invalid device configuration: {0}")]
    InvalidConfig(String),

    /// Protocol-level validation failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

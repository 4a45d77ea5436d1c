//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with the TP25 protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Command buffer is empty.
    #[error("empty command")]
    Empty,

    /// Command is too short for its opcode.
    #[error("command 0x{opcode:02X} too short: expected at least {expected} bytes, got {actual}")]
    CommandTooShort {
        /// Opcode of the command.
        opcode: u8,
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Command exceeds the characteristic size.
    #[error("command too long: maximum {max} bytes, got {actual}")]
    CommandTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Declared payload length does not match the opcode.
    #[error("opcode 0x{opcode:02X} declares length {actual}, expected {expected}")]
    BadDeclaredLength {
        /// Opcode of the message.
        opcode: u8,
        /// Length the opcode requires.
        expected: u8,
        /// Length found in the message.
        actual: u8,
    },

    /// Probe index outside 1..=6.
    #[error("probe index {0} out of range")]
    ProbeOutOfRange(u8),

    /// Notification is not exactly 20 bytes.
    #[error("notification must be 20 bytes, got {actual}")]
    NotificationLength {
        /// Actual length received.
        actual: usize,
    },

    /// Unknown notification code.
    #[error("unknown notification code: 0x{0:02X}")]
    UnknownNotification(u8),

    /// A field that must be BCD is not.
    #[error("invalid BCD value: 0x{0:04X}")]
    InvalidBcd(u16),

    /// Checksum byte does not match the content.
    #[error("checksum mismatch: computed 0x{expected:02X}, found 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum computed over the content.
        expected: u8,
        /// Checksum carried by the message.
        actual: u8,
    },
}

impl ProtocolError {
    /// Short, stable label for this error kind, suitable for metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::Empty => "empty",
            ProtocolError::CommandTooShort { .. } => "too_short",
            ProtocolError::CommandTooLong { .. } => "too_long",
            ProtocolError::BadDeclaredLength { .. } => "bad_declared_length",
            ProtocolError::ProbeOutOfRange(_) => "probe_out_of_range",
            ProtocolError::NotificationLength { .. } => "notification_length",
            ProtocolError::UnknownNotification(_) => "unknown_notification",
            ProtocolError::InvalidBcd(_) => "invalid_bcd",
            ProtocolError::ChecksumMismatch { .. } => "checksum",
        }
    }
}

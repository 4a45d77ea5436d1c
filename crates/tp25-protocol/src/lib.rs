//! ThermoPro TP25 notification protocol
//!
//! This crate provides types and utilities for the application-layer protocol
//! spoken by a TP25 BLE thermometer. The host writes short binary commands to a
//! command characteristic and the device answers with fixed 20-byte
//! notifications on a notify characteristic.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → device): 3 to 20 bytes, first byte is a `CMD_*` opcode,
//!   second byte a declared payload length.
//! - **Notifications** (device → host): always 20 bytes. Byte 0 is a `RESP_CODE_*`
//!   opcode, byte 1 the declared payload length, followed by the payload and a
//!   one-byte additive checksum. Bytes after the checksum keep the values of
//!   [`NOTIFICATION_TEMPLATE`].
//! - Temperatures and alarm thresholds are carried as 4-digit packed BCD in
//!   tenths of a degree.
//!
//! # Example
//!
//! ```rust
//! use tp25_protocol::{Command, Notification, NotificationContent, ProbeIndex};
//!
//! // Host side: build a command
//! let probe = ProbeIndex::new(2).unwrap();
//! let frame = Command::ReportProfile { probe }.encode();
//! assert_eq!(frame, vec![0x24, 0x01, 0x02, 0x27]);
//!
//! // Device side: decode it
//! let command = Command::decode(&frame).unwrap();
//! assert!(matches!(command, Command::ReportProfile { .. }));
//!
//! // Device side: answer, host side: decode the answer
//! let raw = tp25_protocol::report_profile_response(2, 0, 0xFFFF, 0xFFFF);
//! let notification = Notification::decode(raw.as_bytes()).unwrap();
//! assert!(matches!(notification.content, NotificationContent::ProfileReport { .. }));
//! ```

mod bcd;
mod checksum;
mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod types;

pub use bcd::*;
pub use checksum::*;
pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use types::*;

//! Notifications sent by the device.
//!
//! Every notification starts from [`NOTIFICATION_TEMPLATE`], overwrites a
//! prefix with the opcode-specific body and writes the additive checksum of
//! that body right after it. The template tail is sent unchanged.

use crate::bcd::{bcd_to_decimal, decimal_to_bcd};
use crate::checksum::{checksum, verify_checksum};
use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::*;

/// A complete 20-byte notification as sent over the notify characteristic.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawNotification(pub [u8; NOTIFICATION_SIZE]);

impl RawNotification {
    /// The notification bytes.
    pub fn as_bytes(&self) -> &[u8; NOTIFICATION_SIZE] {
        &self.0
    }

    /// Notification code (byte 0).
    pub fn code(&self) -> u8 {
        self.0[0]
    }

    /// Declared payload length (byte 1).
    pub fn declared_len(&self) -> u8 {
        self.0[1]
    }

    /// Offset of the checksum byte implied by the declared length.
    pub fn checksum_offset(&self) -> usize {
        2 + usize::from(self.declared_len())
    }
}

impl std::fmt::Debug for RawNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawNotification(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl AsRef<[u8]> for RawNotification {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Copy `body` over the template and append its checksum.
fn build(body: &[u8]) -> RawNotification {
    debug_assert!(body.len() < NOTIFICATION_SIZE);
    let mut value = NOTIFICATION_TEMPLATE;
    value[..body.len()].copy_from_slice(body);
    value[body.len()] = checksum(body);
    RawNotification(value)
}

// ============================================================================
// Builders
// ============================================================================

/// Answer to SETUP: `01 01 0a` + checksum.
pub fn setup_response() -> RawNotification {
    build(&SETUP_RESPONSE_BODY)
}

/// Answer to SET_PROFILE: `23 02 <probe> <alarm index>` + checksum.
pub fn set_profile_response(probe_index: u8, alarm_index: u8) -> RawNotification {
    build(&[RESP_CODE_SET_PROFILE, 0x02, probe_index, alarm_index])
}

/// Answer to REPORT_PROFILE: `24 06 <probe> <alarm index> <high BE> <low BE>` + checksum.
pub fn report_profile_response(
    probe_index: u8,
    alarm_index: u8,
    high_bcd: u16,
    low_bcd: u16,
) -> RawNotification {
    let [high_hi, high_lo] = high_bcd.to_be_bytes();
    let [low_hi, low_lo] = low_bcd.to_be_bytes();
    build(&[
        RESP_CODE_REPORT_PROFILE,
        0x06,
        probe_index,
        alarm_index,
        high_hi,
        high_lo,
        low_hi,
        low_lo,
    ])
}

/// Fixed answer to command 0x26.
pub fn unknown_a_response() -> RawNotification {
    build(&UNKNOWN_A_RESPONSE_BODY)
}

/// Fixed answer to command 0x41.
pub fn unknown_b_response() -> RawNotification {
    build(&UNKNOWN_B_RESPONSE_BODY)
}

/// Periodic temperature report for four probes.
///
/// Layout: `30 0f 5a 0c <alarms>`, four BCD temperatures (big-endian),
/// `ff ff ff ff`, checksum at offset 17. The alarm byte is always zero.
pub fn temp_report_response(probes: &[Probe; REPORTED_PROBE_COUNT]) -> RawNotification {
    let mut body = [0u8; 17];
    body[0] = RESP_CODE_TEMP_REPORT;
    body[1] = TEMP_REPORT_DECLARED_LEN;
    body[2] = TEMP_REPORT_MARKER;
    body[3] = UNIT_CELSIUS;
    body[4] = 0x00;

    for (i, probe) in probes.iter().enumerate() {
        let offset = 5 + i * 2;
        body[offset..offset + 2].copy_from_slice(&decimal_to_bcd(probe.temperature).to_be_bytes());
    }
    body[13..17].copy_from_slice(&TEMP_REPORT_FILLER);

    build(&body)
}

// ============================================================================
// Decoding (host side)
// ============================================================================

/// Typed content of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum NotificationContent {
    /// Setup acknowledgement.
    SetupAck,

    /// Alarm profile stored.
    ProfileSet {
        /// Probe that was configured.
        probe: u8,
        /// Alarm profile selector echoed back.
        alarm_index: u8,
    },

    /// Alarm profile of a probe.
    ProfileReport {
        /// Reported probe.
        probe: u8,
        /// Alarm profile selector.
        alarm_index: u8,
        /// High threshold, packed BCD or 0xFFFF.
        high: u16,
        /// Low threshold, packed BCD or 0xFFFF.
        low: u16,
    },

    /// Fixed answer to command 0x26.
    UnknownA,

    /// Fixed answer to command 0x41.
    UnknownB,

    /// Temperature report.
    Temperatures {
        /// Unit of the readings.
        unit: TempUnit,
        /// Alarm flags.
        alarms: u8,
        /// Readings in tenths of a degree, `None` for an absent probe.
        temps: [Option<u16>; REPORTED_PROBE_COUNT],
    },
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The raw bytes.
    pub raw: RawNotification,
    /// Decoded content.
    pub content: NotificationContent,
}

impl Notification {
    /// Decode a notification received from the device.
    ///
    /// The checksum is verified at the offset implied by the declared length.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let bytes: [u8; NOTIFICATION_SIZE] = data
            .try_into()
            .map_err(|_| ProtocolError::NotificationLength { actual: data.len() })?;
        let raw = RawNotification(bytes);

        let expected_len = match raw.code() {
            RESP_CODE_SETUP => SETUP_RESPONSE_BODY[1],
            RESP_CODE_SET_PROFILE => 0x02,
            RESP_CODE_REPORT_PROFILE => 0x06,
            RESP_CODE_UNKNOWN_A => UNKNOWN_A_RESPONSE_BODY[1],
            RESP_CODE_UNKNOWN_B => UNKNOWN_B_RESPONSE_BODY[1],
            RESP_CODE_TEMP_REPORT => TEMP_REPORT_DECLARED_LEN,
            other => return Err(ProtocolError::UnknownNotification(other)),
        };
        if raw.declared_len() != expected_len {
            return Err(ProtocolError::BadDeclaredLength {
                opcode: raw.code(),
                expected: expected_len,
                actual: raw.declared_len(),
            });
        }

        let offset = raw.checksum_offset();
        if verify_checksum(&bytes, offset) != Some(true) {
            return Err(ProtocolError::ChecksumMismatch {
                expected: checksum(&bytes[..offset]),
                actual: bytes[offset],
            });
        }

        let content = match raw.code() {
            RESP_CODE_SETUP => NotificationContent::SetupAck,
            RESP_CODE_SET_PROFILE => NotificationContent::ProfileSet {
                probe: bytes[2],
                alarm_index: bytes[3],
            },
            RESP_CODE_REPORT_PROFILE => NotificationContent::ProfileReport {
                probe: bytes[2],
                alarm_index: bytes[3],
                high: u16::from_be_bytes([bytes[4], bytes[5]]),
                low: u16::from_be_bytes([bytes[6], bytes[7]]),
            },
            RESP_CODE_UNKNOWN_A => NotificationContent::UnknownA,
            RESP_CODE_UNKNOWN_B => NotificationContent::UnknownB,
            _ => decode_temperatures(&bytes)?,
        };

        log::trace!("decoded notification {:?}", content);
        Ok(Notification { raw, content })
    }
}

fn decode_temperatures(bytes: &[u8; NOTIFICATION_SIZE]) -> Result<NotificationContent, ProtocolError> {
    let mut temps = [None; REPORTED_PROBE_COUNT];
    for (i, temp) in temps.iter_mut().enumerate() {
        let offset = 5 + i * 2;
        let field = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
        if field == NO_PROBE {
            continue;
        }
        let decimal = bcd_to_decimal(field);
        if decimal == crate::bcd::INVALID_BCD {
            return Err(ProtocolError::InvalidBcd(field));
        }
        *temp = Some(decimal);
    }

    Ok(NotificationContent::Temperatures {
        unit: TempUnit::from(bytes[3]),
        alarms: bytes[4],
        temps,
    })
}

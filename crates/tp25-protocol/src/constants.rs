//! Protocol constants
//!
//! These constants define the command codes, notification codes, fixed field
//! values and sizes used by the TP25 protocol.

// ============================================================================
// Command Codes (host → device)
// ============================================================================

/// Handshake command, answered with the setup acknowledgement.
pub const CMD_SETUP: u8 = 0x01;
/// Configure the alarm profile of a probe.
pub const CMD_SET_PROFILE: u8 = 0x23;
/// Read back the alarm profile of a probe.
pub const CMD_REPORT_PROFILE: u8 = 0x24;
/// Alternate temperature report request. Ignored by the device.
pub const CMD_ALT_TEMP_REPORT: u8 = 0x25;
/// Unidentified command, answered with a fixed payload.
pub const CMD_UNKNOWN_A: u8 = 0x26;
/// Alarm acknowledgement. Ignored by the device.
pub const CMD_ALARM_ACK: u8 = 0x27;
/// Temperature report. Only the device emits these; received ones are dropped.
pub const CMD_TEMP_REPORT: u8 = 0x30;
/// Unidentified command, answered with a fixed payload.
pub const CMD_UNKNOWN_B: u8 = 0x41;
/// Error report. Ignored by the device.
pub const CMD_ERROR: u8 = 0xE0;

// ============================================================================
// Notification Codes (device → host)
// ============================================================================

/// Setup acknowledgement.
pub const RESP_CODE_SETUP: u8 = 0x01;
/// Alarm profile stored.
pub const RESP_CODE_SET_PROFILE: u8 = 0x23;
/// Alarm profile of one probe.
pub const RESP_CODE_REPORT_PROFILE: u8 = 0x24;
/// Answer to [`CMD_UNKNOWN_A`].
pub const RESP_CODE_UNKNOWN_A: u8 = 0x26;
/// Periodic temperature report.
pub const RESP_CODE_TEMP_REPORT: u8 = 0x30;
/// Answer to [`CMD_UNKNOWN_B`].
pub const RESP_CODE_UNKNOWN_B: u8 = 0x41;

// ============================================================================
// Sizes
// ============================================================================

/// Every notification is exactly this long.
pub const NOTIFICATION_SIZE: usize = 20;
/// Shortest command the command characteristic accepts.
pub const MIN_COMMAND_SIZE: usize = 3;
/// Longest command the command characteristic accepts.
pub const MAX_COMMAND_SIZE: usize = 20;
/// Number of addressable probes (indices 1..=6).
pub const PROBE_COUNT: usize = 6;
/// Number of probes carried by a temperature report.
pub const REPORTED_PROBE_COUNT: usize = 4;

/// Minimum length and declared payload length of a SET_PROFILE command.
pub const SET_PROFILE_MIN_LEN: usize = 8;
/// Declared payload length of a SET_PROFILE command.
pub const SET_PROFILE_DECLARED_LEN: u8 = 6;
/// Minimum length of a REPORT_PROFILE command.
pub const REPORT_PROFILE_MIN_LEN: usize = 4;
/// Declared payload length of a REPORT_PROFILE command.
pub const REPORT_PROFILE_DECLARED_LEN: u8 = 1;

// ============================================================================
// Field Values
// ============================================================================

/// Base buffer of every notification. Builders overwrite a prefix and the
/// checksum; the remaining bytes are sent as-is.
pub const NOTIFICATION_TEMPLATE: [u8; NOTIFICATION_SIZE] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
    0x17, 0x18, 0x19, 0x20,
];

/// Body of the setup acknowledgement (code, length, payload).
pub const SETUP_RESPONSE_BODY: [u8; 3] = [RESP_CODE_SETUP, 0x01, 0x0A];
/// Body of the [`RESP_CODE_UNKNOWN_A`] notification.
pub const UNKNOWN_A_RESPONSE_BODY: [u8; 7] = [RESP_CODE_UNKNOWN_A, 0x05, 0x0C, 0x0C, 0x5A, 0x03, 0x0F];
/// Body of the [`RESP_CODE_UNKNOWN_B`] notification.
pub const UNKNOWN_B_RESPONSE_BODY: [u8; 4] = [RESP_CODE_UNKNOWN_B, 0x02, 0x31, 0x11];

/// Payload the stock app sends with its setup command.
pub const SETUP_TOKEN: [u8; 9] = [0x70, 0x32, 0xE2, 0xC1, 0x79, 0x9D, 0xB4, 0xD1, 0xC7];

/// Declared payload length of a temperature report.
pub const TEMP_REPORT_DECLARED_LEN: u8 = 0x0F;
/// Constant byte following the length in a temperature report.
pub const TEMP_REPORT_MARKER: u8 = 0x5A;
/// Unit byte for Celsius readings.
pub const UNIT_CELSIUS: u8 = 0x0C;
/// Unit byte for Fahrenheit readings.
pub const UNIT_FAHRENHEIT: u8 = 0x0F;
/// Filler written after the probe temperatures of a temperature report.
pub const TEMP_REPORT_FILLER: [u8; 4] = [0xFF; 4];

/// Default probe temperature, 20.0 degrees in tenths.
pub const DEFAULT_TEMPERATURE: u16 = 200;
/// Threshold sentinel meaning "no alarm configured".
pub const THRESHOLD_UNSET: u16 = 0xFFFF;
/// Temperature field value meaning "no probe plugged in".
pub const NO_PROBE: u16 = 0xFFFF;

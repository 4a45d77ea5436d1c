//! Commands written by the host to the command characteristic.

use crate::checksum::checksum;
use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::ProbeIndex;

/// Opcodes the device recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// [`CMD_SETUP`]
    Setup,
    /// [`CMD_SET_PROFILE`]
    SetProfile,
    /// [`CMD_REPORT_PROFILE`]
    ReportProfile,
    /// [`CMD_ALT_TEMP_REPORT`]
    AltTempReport,
    /// [`CMD_UNKNOWN_A`]
    UnknownA,
    /// [`CMD_ALARM_ACK`]
    AlarmAck,
    /// [`CMD_TEMP_REPORT`]
    TempReport,
    /// [`CMD_UNKNOWN_B`]
    UnknownB,
    /// [`CMD_ERROR`]
    Error,
}

impl CommandCode {
    /// Every recognized opcode.
    pub const ALL: [CommandCode; 9] = [
        CommandCode::Setup,
        CommandCode::SetProfile,
        CommandCode::ReportProfile,
        CommandCode::AltTempReport,
        CommandCode::UnknownA,
        CommandCode::AlarmAck,
        CommandCode::TempReport,
        CommandCode::UnknownB,
        CommandCode::Error,
    ];

    /// Look up a wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_SETUP => Some(CommandCode::Setup),
            CMD_SET_PROFILE => Some(CommandCode::SetProfile),
            CMD_REPORT_PROFILE => Some(CommandCode::ReportProfile),
            CMD_ALT_TEMP_REPORT => Some(CommandCode::AltTempReport),
            CMD_UNKNOWN_A => Some(CommandCode::UnknownA),
            CMD_ALARM_ACK => Some(CommandCode::AlarmAck),
            CMD_TEMP_REPORT => Some(CommandCode::TempReport),
            CMD_UNKNOWN_B => Some(CommandCode::UnknownB),
            CMD_ERROR => Some(CommandCode::Error),
            _ => None,
        }
    }

    /// The wire byte.
    pub fn byte(self) -> u8 {
        match self {
            CommandCode::Setup => CMD_SETUP,
            CommandCode::SetProfile => CMD_SET_PROFILE,
            CommandCode::ReportProfile => CMD_REPORT_PROFILE,
            CommandCode::AltTempReport => CMD_ALT_TEMP_REPORT,
            CommandCode::UnknownA => CMD_UNKNOWN_A,
            CommandCode::AlarmAck => CMD_ALARM_ACK,
            CommandCode::TempReport => CMD_TEMP_REPORT,
            CommandCode::UnknownB => CMD_UNKNOWN_B,
            CommandCode::Error => CMD_ERROR,
        }
    }

    /// Human-readable name, also used as a metric label.
    pub fn name(self) -> &'static str {
        match self {
            CommandCode::Setup => "setup",
            CommandCode::SetProfile => "set_profile",
            CommandCode::ReportProfile => "report_profile",
            CommandCode::AltTempReport => "alt_temp_report",
            CommandCode::UnknownA => "unknown_a",
            CommandCode::AlarmAck => "alarm_ack",
            CommandCode::TempReport => "temp_report",
            CommandCode::UnknownB => "unknown_b",
            CommandCode::Error => "error",
        }
    }
}

/// First byte of a command: either a recognized opcode or the raw byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// A recognized opcode.
    Known(CommandCode),
    /// Any other byte.
    Unknown(u8),
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        match CommandCode::from_byte(byte) {
            Some(code) => Opcode::Known(code),
            None => Opcode::Unknown(byte),
        }
    }
}

impl Opcode {
    /// The wire byte.
    pub fn byte(self) -> u8 {
        match self {
            Opcode::Known(code) => code.byte(),
            Opcode::Unknown(byte) => byte,
        }
    }

    /// Metric label: the opcode name, or `unknown`.
    pub fn label(self) -> &'static str {
        match self {
            Opcode::Known(code) => code.name(),
            Opcode::Unknown(_) => "unknown",
        }
    }
}

/// Commands the host can write to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Handshake. The payload is not inspected by the device.
    Setup,

    /// Configure the alarm profile of a probe.
    SetProfile {
        /// Probe to configure.
        probe: ProbeIndex,
        /// Alarm profile selector.
        alarm_index: u8,
        /// High threshold as sent (packed BCD tenths, anything else means unset).
        high: u16,
        /// Low threshold as sent (packed BCD tenths, anything else means unset).
        low: u16,
    },

    /// Read back the alarm profile of a probe.
    ReportProfile {
        /// Probe to report.
        probe: ProbeIndex,
    },

    /// Alternate temperature report request.
    AltTempReport,

    /// Unidentified command 0x26.
    UnknownA,

    /// Alarm acknowledgement.
    AlarmAck,

    /// Temperature report.
    TempReport,

    /// Unidentified command 0x41.
    UnknownB,

    /// Error report.
    Error,

    /// Unrecognized opcode.
    Unknown(u8),
}

impl Command {
    /// The opcode of this command.
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Setup => Opcode::Known(CommandCode::Setup),
            Command::SetProfile { .. } => Opcode::Known(CommandCode::SetProfile),
            Command::ReportProfile { .. } => Opcode::Known(CommandCode::ReportProfile),
            Command::AltTempReport => Opcode::Known(CommandCode::AltTempReport),
            Command::UnknownA => Opcode::Known(CommandCode::UnknownA),
            Command::AlarmAck => Opcode::Known(CommandCode::AlarmAck),
            Command::TempReport => Opcode::Known(CommandCode::TempReport),
            Command::UnknownB => Opcode::Known(CommandCode::UnknownB),
            Command::Error => Opcode::Known(CommandCode::Error),
            Command::Unknown(byte) => Opcode::from(*byte),
        }
    }

    /// Decode a command buffer as written to the command characteristic.
    ///
    /// The trailing checksum is not verified; the device never did.
    pub fn decode(buffer: &[u8]) -> Result<Self, ProtocolError> {
        let Some(&first) = buffer.first() else {
            return Err(ProtocolError::Empty);
        };
        if buffer.len() > MAX_COMMAND_SIZE {
            return Err(ProtocolError::CommandTooLong {
                max: MAX_COMMAND_SIZE,
                actual: buffer.len(),
            });
        }

        let code = match Opcode::from(first) {
            Opcode::Known(code) => code,
            Opcode::Unknown(byte) => return Ok(Command::Unknown(byte)),
        };

        let command = match code {
            CommandCode::Setup => Command::Setup,
            CommandCode::SetProfile => {
                check_header(buffer, SET_PROFILE_MIN_LEN, SET_PROFILE_DECLARED_LEN)?;
                Command::SetProfile {
                    probe: ProbeIndex::new(buffer[2])?,
                    alarm_index: buffer[3],
                    high: u16::from_be_bytes([buffer[4], buffer[5]]),
                    low: u16::from_be_bytes([buffer[6], buffer[7]]),
                }
            }
            CommandCode::ReportProfile => {
                check_header(buffer, REPORT_PROFILE_MIN_LEN, REPORT_PROFILE_DECLARED_LEN)?;
                Command::ReportProfile {
                    probe: ProbeIndex::new(buffer[2])?,
                }
            }
            CommandCode::AltTempReport => Command::AltTempReport,
            CommandCode::UnknownA => Command::UnknownA,
            CommandCode::AlarmAck => Command::AlarmAck,
            CommandCode::TempReport => Command::TempReport,
            CommandCode::UnknownB => Command::UnknownB,
            CommandCode::Error => Command::Error,
        };

        log::trace!("decoded command {:?}", command);
        Ok(command)
    }

    /// Encode the command as the host writes it: opcode, declared length,
    /// payload and trailing checksum.
    ///
    /// Commands without a payload are sent as `opcode, 0x00, checksum`.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MAX_COMMAND_SIZE);
        buf.push(self.opcode().byte());

        match self {
            Command::Setup => {
                buf.push(SETUP_TOKEN.len() as u8);
                buf.extend_from_slice(&SETUP_TOKEN);
            }
            Command::SetProfile {
                probe,
                alarm_index,
                high,
                low,
            } => {
                buf.push(SET_PROFILE_DECLARED_LEN);
                buf.push(probe.get());
                buf.push(*alarm_index);
                buf.extend_from_slice(&high.to_be_bytes());
                buf.extend_from_slice(&low.to_be_bytes());
            }
            Command::ReportProfile { probe } => {
                buf.push(REPORT_PROFILE_DECLARED_LEN);
                buf.push(probe.get());
            }
            _ => buf.push(0x00),
        }

        buf.push(checksum(&buf));
        buf
    }
}

fn check_header(buffer: &[u8], min_len: usize, declared: u8) -> Result<(), ProtocolError> {
    if buffer.len() < min_len {
        return Err(ProtocolError::CommandTooShort {
            opcode: buffer[0],
            expected: min_len,
            actual: buffer.len(),
        });
    }
    if buffer[1] != declared {
        return Err(ProtocolError::BadDeclaredLength {
            opcode: buffer[0],
            expected: declared,
            actual: buffer[1],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(index: u8) -> ProbeIndex {
        ProbeIndex::new(index).unwrap()
    }

    #[test]
    fn test_opcode_known_and_unknown() {
        assert_eq!(Opcode::from(0x23), Opcode::Known(CommandCode::SetProfile));
        assert_eq!(Opcode::from(0x99), Opcode::Unknown(0x99));
        for code in CommandCode::ALL {
            assert_eq!(Opcode::from(code.byte()), Opcode::Known(code));
        }
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(Command::decode(&[]), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_decode_too_long() {
        let buffer = [CMD_SETUP; 21];
        assert!(matches!(
            Command::decode(&buffer),
            Err(ProtocolError::CommandTooLong { max: 20, actual: 21 })
        ));
    }

    #[test]
    fn test_decode_setup_any_length() {
        assert_eq!(Command::decode(&[0x01]), Ok(Command::Setup));
        assert_eq!(Command::decode(&[0x01, 0x00, 0x01]), Ok(Command::Setup));
    }

    #[test]
    fn test_decode_set_profile() {
        let buffer = [0x23, 0x06, 0x02, 0x05, 0x12, 0x34, 0xFA, 0xFA, 0x00];
        assert_eq!(
            Command::decode(&buffer),
            Ok(Command::SetProfile {
                probe: probe(2),
                alarm_index: 0x05,
                high: 0x1234,
                low: 0xFAFA,
            })
        );
    }

    #[test]
    fn test_decode_set_profile_rejections() {
        // Too short
        assert!(matches!(
            Command::decode(&[0x23, 0x06, 0x01, 0x00, 0x12, 0x34, 0x00]),
            Err(ProtocolError::CommandTooShort { expected: 8, actual: 7, .. })
        ));
        // Wrong declared length
        assert!(matches!(
            Command::decode(&[0x23, 0x05, 0x01, 0x00, 0x12, 0x34, 0x00, 0x50]),
            Err(ProtocolError::BadDeclaredLength { expected: 6, actual: 5, .. })
        ));
        // Probe index out of range
        assert_eq!(
            Command::decode(&[0x23, 0x06, 0x00, 0x00, 0x12, 0x34, 0x00, 0x50]),
            Err(ProtocolError::ProbeOutOfRange(0))
        );
        assert_eq!(
            Command::decode(&[0x23, 0x06, 0x07, 0x00, 0x12, 0x34, 0x00, 0x50]),
            Err(ProtocolError::ProbeOutOfRange(7))
        );
    }

    #[test]
    fn test_decode_report_profile() {
        assert_eq!(
            Command::decode(&[0x24, 0x01, 0x06, 0x2B]),
            Ok(Command::ReportProfile { probe: probe(6) })
        );
        assert!(Command::decode(&[0x24, 0x01, 0x06]).is_err());
        assert!(Command::decode(&[0x24, 0x02, 0x06, 0x00]).is_err());
        assert_eq!(
            Command::decode(&[0x24, 0x01, 0x07, 0x2C]),
            Err(ProtocolError::ProbeOutOfRange(7))
        );
        assert_eq!(
            Command::decode(&[0x24, 0x01, 0xFF, 0x24]),
            Err(ProtocolError::ProbeOutOfRange(0xFF))
        );
    }

    #[test]
    fn test_decode_single_byte_of_every_opcode_never_panics() {
        for byte in 0..=u8::MAX {
            let _ = Command::decode(&[byte]);
            let _ = Command::decode(&[byte, 0x06]);
        }
    }

    #[test]
    fn test_decode_unknown() {
        assert_eq!(Command::decode(&[0x99, 0x00, 0x99]), Ok(Command::Unknown(0x99)));
    }

    #[test]
    fn test_encode_setup_matches_stock_app() {
        let encoded = Command::Setup.encode();
        assert_eq!(hex::encode(&encoded), "01097032e2c1799db4d1c7b1");
    }

    #[test]
    fn test_encode_set_profile() {
        let command = Command::SetProfile {
            probe: probe(1),
            alarm_index: 2,
            high: 0x1234,
            low: 0xFAFA,
        };
        let encoded = command.encode();
        assert_eq!(encoded, vec![0x23, 0x06, 0x01, 0x02, 0x12, 0x34, 0xFA, 0xFA, 0x66]);
        assert_eq!(Command::decode(&encoded), Ok(command));
    }

    #[test]
    fn test_encode_without_payload() {
        assert_eq!(Command::UnknownA.encode(), vec![0x26, 0x00, 0x26]);
        assert_eq!(Command::Unknown(0x99).encode(), vec![0x99, 0x00, 0x99]);
    }
}

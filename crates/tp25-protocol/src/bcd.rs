//! Binary-coded decimal conversion.
//!
//! Temperatures and alarm thresholds travel as four packed BCD digits, one per
//! nibble, most significant nibble first (e.g. 123.4° = 1234 tenths = `0x1234`).
//!
//! Two validation rules exist. [`BcdCheck::Nibble`] checks every nibble and is
//! what the codec uses by default. [`BcdCheck::ByteField`] reproduces the stock
//! firmware, which inspects the value as four byte-wide fields of a widened
//! integer: only the two low bytes can be non-zero and each must be at most 9.

use crate::constants::THRESHOLD_UNSET;

/// Value returned by the decoders when the input is not BCD.
pub const INVALID_BCD: u16 = THRESHOLD_UNSET;

/// Which digit layout a BCD validation assumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BcdCheck {
    /// Four nibble-wide digits.
    #[default]
    Nibble,
    /// Four byte-wide fields of the value widened to 32 bits (firmware parity).
    ByteField,
}

impl BcdCheck {
    /// Whether `value` is valid under this rule.
    pub fn is_bcd(self, value: u16) -> bool {
        match self {
            BcdCheck::Nibble => is_bcd(value),
            BcdCheck::ByteField => is_bcd_byte_field(value),
        }
    }

    /// Decode `value` under this rule, [`INVALID_BCD`] if it is not valid.
    pub fn to_decimal(self, value: u16) -> u16 {
        match self {
            BcdCheck::Nibble => bcd_to_decimal(value),
            BcdCheck::ByteField => bcd_to_decimal_byte_field(value),
        }
    }
}

/// Encode `value` as four packed BCD digits.
///
/// Digits above the thousands place are truncated, so `12345` encodes as `0x2345`.
pub const fn decimal_to_bcd(value: u16) -> u16 {
    let units = value % 10;
    let tens = (value / 10) % 10;
    let hundreds = (value / 100) % 10;
    let thousands = (value / 1000) % 10;

    (thousands << 12) | (hundreds << 8) | (tens << 4) | units
}

fn nibbles(value: u16) -> [u16; 4] {
    [value & 0xF, (value >> 4) & 0xF, (value >> 8) & 0xF, value >> 12]
}

fn byte_fields(value: u16) -> [u32; 4] {
    let wide = u32::from(value);
    [wide & 0xFF, (wide >> 8) & 0xFF, (wide >> 16) & 0xFF, wide >> 24]
}

/// Whether every nibble of `value` is a decimal digit.
pub fn is_bcd(value: u16) -> bool {
    nibbles(value).iter().all(|&digit| digit <= 9)
}

/// Decode four packed BCD digits, [`INVALID_BCD`] if any nibble exceeds 9.
pub fn bcd_to_decimal(value: u16) -> u16 {
    if !is_bcd(value) {
        return INVALID_BCD;
    }
    let [units, tens, hundreds, thousands] = nibbles(value);
    units + tens * 10 + hundreds * 100 + thousands * 1000
}

/// Firmware-parity check: every byte-wide field of the widened value is at most 9.
pub fn is_bcd_byte_field(value: u16) -> bool {
    byte_fields(value).iter().all(|&field| field <= 9)
}

/// Firmware-parity decode using byte-wide fields with place values 1, 10, 100, 1000.
pub fn bcd_to_decimal_byte_field(value: u16) -> u16 {
    if !is_bcd_byte_field(value) {
        return INVALID_BCD;
    }
    let [units, tens, hundreds, thousands] = byte_fields(value);
    // Every field is at most 9 here, so the sum fits in u16.
    (units + tens * 10 + hundreds * 100 + thousands * 1000) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_to_bcd() {
        assert_eq!(decimal_to_bcd(0), 0x0000);
        assert_eq!(decimal_to_bcd(7), 0x0007);
        assert_eq!(decimal_to_bcd(200), 0x0200);
        assert_eq!(decimal_to_bcd(4321), 0x4321);
        assert_eq!(decimal_to_bcd(9999), 0x9999);
    }

    #[test]
    fn test_decimal_to_bcd_truncates_overflow() {
        assert_eq!(decimal_to_bcd(12345), 0x2345);
        assert_eq!(decimal_to_bcd(10000), 0x0000);
        assert_eq!(decimal_to_bcd(u16::MAX), 0x5535);
    }

    #[test]
    fn test_nibble_roundtrip_all_values() {
        for d in 0..=9999u16 {
            assert_eq!(bcd_to_decimal(decimal_to_bcd(d)), d, "value {}", d);
        }
    }

    #[test]
    fn test_is_bcd_nibbles() {
        assert!(is_bcd(0x1234));
        assert!(is_bcd(0x9999));
        assert!(!is_bcd(0x12A4));
        assert!(!is_bcd(0xFAFA));
        assert!(!is_bcd(THRESHOLD_UNSET));
        assert_eq!(bcd_to_decimal(0xFAFA), INVALID_BCD);
    }

    #[test]
    fn test_byte_field_check() {
        // Only the two low bytes are populated and each must be <= 9
        assert!(is_bcd_byte_field(0x0000));
        assert!(is_bcd_byte_field(0x0905));
        assert!(!is_bcd_byte_field(0x0012));
        assert!(!is_bcd_byte_field(0x1234));
        assert!(!is_bcd_byte_field(0x0A00));
    }

    #[test]
    fn test_byte_field_matches_definition_exhaustively() {
        for value in 0..=u16::MAX {
            let low = value & 0xFF;
            let high = value >> 8;
            assert_eq!(is_bcd_byte_field(value), low <= 9 && high <= 9, "value 0x{:04X}", value);
        }
    }

    #[test]
    fn test_byte_field_decode() {
        assert_eq!(bcd_to_decimal_byte_field(0x0903), 93);
        assert_eq!(bcd_to_decimal_byte_field(0x1234), INVALID_BCD);
    }

    #[test]
    fn test_check_dispatch() {
        assert!(BcdCheck::Nibble.is_bcd(0x1234));
        assert!(!BcdCheck::ByteField.is_bcd(0x1234));
        assert_eq!(BcdCheck::default(), BcdCheck::Nibble);
        assert_eq!(BcdCheck::Nibble.to_decimal(0x0250), 250);
        assert_eq!(BcdCheck::ByteField.to_decimal(0x0205), 25);
    }
}

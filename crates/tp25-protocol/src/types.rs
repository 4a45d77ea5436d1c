//! Common types used in the TP25 protocol.

use crate::constants::*;
use crate::error::ProtocolError;

/// 1-based probe address as carried on the wire (1..=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct ProbeIndex(u8);

impl ProbeIndex {
    /// Validate a wire probe index.
    pub fn new(index: u8) -> Result<Self, ProtocolError> {
        if (1..=PROBE_COUNT as u8).contains(&index) {
            Ok(ProbeIndex(index))
        } else {
            Err(ProtocolError::ProbeOutOfRange(index))
        }
    }

    /// The wire value (1..=6).
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based storage slot for this probe.
    pub fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All addressable probes in order.
    pub fn all() -> impl Iterator<Item = ProbeIndex> {
        (1..=PROBE_COUNT as u8).map(ProbeIndex)
    }
}

impl TryFrom<u8> for ProbeIndex {
    type Error = ProtocolError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        ProbeIndex::new(index)
    }
}

impl From<ProbeIndex> for u8 {
    fn from(index: ProbeIndex) -> u8 {
        index.0
    }
}

impl std::fmt::Display for ProbeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one temperature probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Probe {
    /// Temperature in tenths of a degree.
    pub temperature: u16,
    /// Alarm profile selector.
    pub alarm_index: u8,
    /// High alarm threshold, packed BCD tenths or [`THRESHOLD_UNSET`].
    pub high_alarm: u16,
    /// Low alarm threshold, packed BCD tenths or [`THRESHOLD_UNSET`].
    pub low_alarm: u16,
}

impl Default for Probe {
    fn default() -> Self {
        Probe {
            temperature: DEFAULT_TEMPERATURE,
            alarm_index: 0,
            high_alarm: THRESHOLD_UNSET,
            low_alarm: THRESHOLD_UNSET,
        }
    }
}

impl Probe {
    /// Probe with the given temperature and no alarms configured.
    pub fn with_temperature(temperature: u16) -> Self {
        Probe {
            temperature,
            ..Default::default()
        }
    }
}

/// Unit flag carried by temperature reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TempUnit {
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
    /// Unrecognized unit byte.
    Unknown(u8),
}

impl From<u8> for TempUnit {
    fn from(byte: u8) -> Self {
        match byte {
            UNIT_CELSIUS => TempUnit::Celsius,
            UNIT_FAHRENHEIT => TempUnit::Fahrenheit,
            other => TempUnit::Unknown(other),
        }
    }
}

impl From<TempUnit> for u8 {
    fn from(unit: TempUnit) -> u8 {
        match unit {
            TempUnit::Celsius => UNIT_CELSIUS,
            TempUnit::Fahrenheit => UNIT_FAHRENHEIT,
            TempUnit::Unknown(byte) => byte,
        }
    }
}

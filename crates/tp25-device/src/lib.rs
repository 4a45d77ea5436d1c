//! # tp25-device
//!
//! Emulated ThermoPro TP25 BLE thermometer.
//!
//! The [`Device`] owns the state of six probes and answers commands written to
//! its command characteristic with 20-byte notifications handed to a
//! [`NotificationSink`]. A periodic scheduler drives [`Device::receive_timer`]
//! to emit unsolicited temperature reports. Transport, advertising and
//! subscription handling live outside this crate.
//!
//! ## Usage
//!
//! ```
//! use tp25_device::{Device, DeviceConfig, RecordingSink};
//!
//! let mut device = Device::new(&DeviceConfig::default(), RecordingSink::new())?;
//!
//! // SETUP is answered with the setup acknowledgement
//! device.receive_command(&[0x01, 0x00, 0x01]);
//! // A timer tick reports the first four probes
//! device.receive_timer();
//!
//! assert_eq!(device.sink().sent.len(), 2);
//! # Ok::<(), tp25_device::DeviceError>(())
//! ```

mod config;
mod device;
mod error;
mod probes;
mod sink;

pub use config::DeviceConfig;
pub use device::{assign_thresholds, Device, Outcome};
pub use error::{DeviceError, SendError};
pub use probes::ProbeStore;
pub use sink::{NotificationSink, RecordingSink};

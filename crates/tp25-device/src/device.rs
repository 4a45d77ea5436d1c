//! Command dispatcher and protocol state machine.

use tp25_metrics::{metric_defs, DeviceLabels};
use tp25_protocol::{
    report_profile_response, set_profile_response, setup_response, temp_report_response,
    unknown_a_response, unknown_b_response, BcdCheck, Command, Opcode, Probe, ProbeIndex,
    ProtocolError, RawNotification, THRESHOLD_UNSET,
};
use tracing::{debug, info, trace, warn};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, SendError};
use crate::probes::ProbeStore;
use crate::sink::NotificationSink;

/// What the device did with a command or timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A notification was built and handed to the sink.
    Notified {
        /// The notification.
        notification: RawNotification,
        /// Whether the sink accepted it.
        delivery: Result<(), SendError>,
    },
    /// The opcode calls for no action.
    Ignored(Opcode),
    /// The command was malformed; nothing changed and nothing was sent.
    Rejected(ProtocolError),
}

impl Outcome {
    /// The notification handed to the sink, if any.
    pub fn notification(&self) -> Option<&RawNotification> {
        match self {
            Outcome::Notified { notification, .. } => Some(notification),
            _ => None,
        }
    }
}

/// The emulated thermometer.
///
/// Owns the probe state and the outbound [`NotificationSink`]. All entry
/// points take `&mut self`; callers sharing a device between a transport and a
/// scheduler must serialize access (e.g. behind a mutex) so that a command and
/// a timer tick never run concurrently.
#[derive(Debug)]
pub struct Device<S> {
    probes: ProbeStore,
    bcd_check: BcdCheck,
    sink: S,
    labels: DeviceLabels,
}

impl<S: NotificationSink> Device<S> {
    /// Build a device from a validated configuration.
    pub fn new(config: &DeviceConfig, sink: S) -> Result<Self, DeviceError> {
        config.validate()?;
        info!(
            "Device[{}]: starting with {} preset probe temperatures, {:?} BCD check",
            config.name,
            config.initial_temperatures.len(),
            config.bcd_check
        );
        let device = Device {
            probes: ProbeStore::with_temperatures(&config.initial_temperatures),
            bcd_check: config.bcd_check,
            sink,
            labels: DeviceLabels::new(config.name.clone()),
        };
        for (index, probe) in device.probes.iter() {
            device.record_temperature(index, probe.temperature);
        }
        Ok(device)
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.labels.device
    }

    /// Current probe state.
    pub fn probes(&self) -> &ProbeStore {
        &self.probes
    }

    /// State of one probe.
    pub fn probe(&self, index: ProbeIndex) -> &Probe {
        self.probes.get(index)
    }

    /// The notification sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the notification sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Handle a command written to the command characteristic.
    ///
    /// Malformed commands are dropped without a response or state change; the
    /// returned [`Outcome`] says why.
    pub fn receive_command(&mut self, buffer: &[u8]) -> Outcome {
        trace!("Device[{}]: command {:02x?}", self.name(), buffer);

        let command = match Command::decode(buffer) {
            Ok(command) => command,
            Err(err) => {
                debug!("Device[{}]: dropping command: {}", self.name(), err);
                self.count_dropped(err.kind());
                return Outcome::Rejected(err);
            }
        };

        let opcode = command.opcode();
        metrics::counter!(
            metric_defs::COMMANDS_RECEIVED.name,
            &self.labels.with(&[("opcode", opcode.label().to_string())])
        )
        .increment(1);

        match command {
            Command::Setup => self.notify(setup_response()),
            Command::SetProfile {
                probe,
                alarm_index,
                high,
                low,
            } => self.set_profile(probe, alarm_index, high, low),
            Command::ReportProfile { probe } => {
                let state = *self.probes.get(probe);
                self.notify(report_profile_response(
                    probe.get(),
                    state.alarm_index,
                    state.high_alarm,
                    state.low_alarm,
                ))
            }
            Command::UnknownA => self.notify(unknown_a_response()),
            Command::UnknownB => self.notify(unknown_b_response()),
            Command::AltTempReport | Command::AlarmAck | Command::TempReport | Command::Error => {
                debug!("Device[{}]: {} command, no action", self.name(), opcode.label());
                Outcome::Ignored(opcode)
            }
            Command::Unknown(byte) => {
                debug!("Device[{}]: unknown command 0x{:02X}", self.name(), byte);
                Outcome::Ignored(opcode)
            }
        }
    }

    /// Periodic tick: emit a temperature report for probes 1..=4.
    pub fn receive_timer(&mut self) -> Outcome {
        trace!("Device[{}]: timer", self.name());
        let reported = self.probes.reported();
        self.notify(temp_report_response(&reported))
    }

    /// Update the temperature of one probe (tenths of a degree).
    ///
    /// This is the sensor feed; it is not reachable from the command path.
    pub fn set_temperature(&mut self, probe_index: u8, temperature: u16) -> Result<(), DeviceError> {
        let index = ProbeIndex::new(probe_index)?;
        self.probes.get_mut(index).temperature = temperature;
        self.record_temperature(index, temperature);
        Ok(())
    }

    fn set_profile(&mut self, probe: ProbeIndex, alarm_index: u8, high: u16, low: u16) -> Outcome {
        let (high_alarm, low_alarm) = assign_thresholds(self.bcd_check, high, low);
        {
            let state = self.probes.get_mut(probe);
            state.alarm_index = alarm_index;
            state.high_alarm = high_alarm;
            state.low_alarm = low_alarm;
        }
        debug!(
            "Device[{}]: probe {} profile {} high=0x{:04X} low=0x{:04X}",
            self.name(),
            probe,
            alarm_index,
            high_alarm,
            low_alarm
        );
        self.notify(set_profile_response(probe.get(), alarm_index))
    }

    fn notify(&mut self, notification: RawNotification) -> Outcome {
        let opcode = Opcode::from(notification.code()).label();
        let delivery = self.sink.send_notification(&notification);
        match delivery {
            Ok(()) => {
                trace!("Device[{}]: notified {:?}", self.name(), notification);
                metrics::counter!(
                    metric_defs::NOTIFICATIONS_SENT.name,
                    &self.labels.with(&[("opcode", opcode.to_string())])
                )
                .increment(1);
            }
            Err(err) => {
                // No retry and no queueing: the notification is lost.
                if err == SendError::NotSubscribed {
                    debug!("Device[{}]: {} notification dropped: {}", self.name(), opcode, err);
                } else {
                    warn!("Device[{}]: {} notification dropped: {}", self.name(), opcode, err);
                }
                metrics::counter!(
                    metric_defs::NOTIFICATIONS_FAILED.name,
                    &self.labels.with(&[("reason", err.kind().to_string())])
                )
                .increment(1);
            }
        }
        Outcome::Notified {
            notification,
            delivery,
        }
    }

    fn count_dropped(&self, reason: &'static str) {
        metrics::counter!(
            metric_defs::COMMANDS_DROPPED.name,
            &self.labels.with(&[("reason", reason.to_string())])
        )
        .increment(1);
    }

    fn record_temperature(&self, index: ProbeIndex, temperature: u16) {
        metrics::gauge!(
            metric_defs::PROBE_TEMPERATURE.name,
            &self.labels.with(&[("probe", index.to_string())])
        )
        .set(f64::from(temperature));
    }
}

/// Alarm assignment for SET_PROFILE: each threshold is stored as sent when it
/// passes `check`, otherwise it becomes [`THRESHOLD_UNSET`].
pub fn assign_thresholds(check: BcdCheck, high: u16, low: u16) -> (u16, u16) {
    let validated = |value: u16| if check.is_bcd(value) { value } else { THRESHOLD_UNSET };
    (validated(high), validated(low))
}

//! Metrics infrastructure for the TP25 emulator.
//!
//! This crate declares every metric the emulator records as a structured
//! [`Metric`] constant and re-exports the `metrics` crate for convenience.
//!
//! # Example
//!
//! ```rust,ignore
//! use tp25_metrics::{metric_defs, describe_metrics, DeviceLabels};
//!
//! describe_metrics();
//!
//! let labels = DeviceLabels::new("Thermopro");
//! metrics::counter!(
//!     metric_defs::COMMANDS_RECEIVED.name,
//!     &labels.with(&[("opcode", "setup".to_string())])
//! )
//! .increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, Unit};

/// Whether a metric only grows or is set to a current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic count of events.
    Counter,
    /// Last observed value.
    Gauge,
}

/// Static declaration of a recorded metric.
///
/// ```rust
/// use tp25_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const SENT: Metric = Metric::counter("tp25.demo.sent")
///     .with_description("Demo counter")
///     .with_unit(Unit::Count)
///     .with_labels(&["device"]);
///
/// assert_eq!(SENT.name, "tp25.demo.sent");
/// assert_eq!(SENT.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// Registered name, e.g. `tp25.commands.received`.
    pub name: &'static str,
    /// Counter or gauge.
    pub kind: MetricKind,
    /// Help text exported with the metric.
    pub description: &'static str,
    /// Unit, if any.
    pub unit: Option<Unit>,
    /// Label keys every recording site supplies.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Declare a counter.
    pub const fn counter(name: &'static str) -> Self {
        Metric {
            name,
            kind: MetricKind::Counter,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Declare a gauge.
    pub const fn gauge(name: &'static str) -> Self {
        Metric {
            kind: MetricKind::Gauge,
            ..Metric::counter(name)
        }
    }

    /// Attach help text.
    pub const fn with_description(self, description: &'static str) -> Self {
        Metric { description, ..self }
    }

    /// Attach a unit.
    pub const fn with_unit(self, unit: Unit) -> Self {
        Metric {
            unit: Some(unit),
            ..self
        }
    }

    /// Attach the label keys.
    pub const fn with_labels(self, labels: &'static [&'static str]) -> Self {
        Metric { labels, ..self }
    }

    /// Register the description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => describe_counter!(self.name, unit, self.description),
            (MetricKind::Counter, None) => describe_counter!(self.name, self.description),
            (MetricKind::Gauge, Some(unit)) => describe_gauge!(self.name, unit, self.description),
            (MetricKind::Gauge, None) => describe_gauge!(self.name, self.description),
        }
    }
}

/// All metric definitions for the emulator.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Label present on every device-scoped metric.
    pub const DEVICE_LABELS: &[&str] = &["device"];

    // ========================================================================
    // Command Path
    // ========================================================================

    /// Commands handed to the dispatcher.
    ///
    /// Labels: device, opcode
    pub const COMMANDS_RECEIVED: Metric = Metric::counter("tp25.commands.received")
        .with_description("Commands handed to the dispatcher")
        .with_unit(Unit::Count)
        .with_labels(&["device", "opcode"]);

    /// Commands dropped without a response.
    ///
    /// Labels: device, reason
    pub const COMMANDS_DROPPED: Metric = Metric::counter("tp25.commands.dropped")
        .with_description("Commands dropped without a response")
        .with_unit(Unit::Count)
        .with_labels(&["device", "reason"]);

    // ========================================================================
    // Notification Path
    // ========================================================================

    /// Notifications accepted by the transport.
    ///
    /// Labels: device, opcode
    pub const NOTIFICATIONS_SENT: Metric = Metric::counter("tp25.notifications.sent")
        .with_description("Notifications accepted by the transport")
        .with_unit(Unit::Count)
        .with_labels(&["device", "opcode"]);

    /// Notifications the transport refused.
    ///
    /// Labels: device, reason
    pub const NOTIFICATIONS_FAILED: Metric = Metric::counter("tp25.notifications.failed")
        .with_description("Notifications the transport refused")
        .with_unit(Unit::Count)
        .with_labels(&["device", "reason"]);

    // ========================================================================
    // Device State
    // ========================================================================

    /// Current probe temperature in tenths of a degree.
    ///
    /// Labels: device, probe
    pub const PROBE_TEMPERATURE: Metric = Metric::gauge("tp25.probe.temperature")
        .with_description("Current probe temperature in tenths of a degree")
        .with_labels(&["device", "probe"]);

    // ========================================================================
    // Transport
    // ========================================================================

    /// Connected transport clients.
    ///
    /// Labels: device
    pub const TRANSPORT_CLIENTS: Metric = Metric::gauge("tp25.transport.clients")
        .with_description("Connected transport clients")
        .with_unit(Unit::Count)
        .with_labels(DEVICE_LABELS);

    /// Bytes received from transport clients.
    ///
    /// Labels: device
    pub const TRANSPORT_RX_BYTES: Metric = Metric::counter("tp25.transport.rx_bytes")
        .with_description("Bytes received from transport clients")
        .with_unit(Unit::Bytes)
        .with_labels(DEVICE_LABELS);

    /// All defined metrics.
    pub const ALL: &[&Metric] = &[
        &COMMANDS_RECEIVED,
        &COMMANDS_DROPPED,
        &NOTIFICATIONS_SENT,
        &NOTIFICATIONS_FAILED,
        &PROBE_TEMPERATURE,
        &TRANSPORT_CLIENTS,
        &TRANSPORT_RX_BYTES,
    ];
}

/// Labels identifying the emulated device.
///
/// ```rust
/// use tp25_metrics::DeviceLabels;
///
/// let labels = DeviceLabels::new("Thermopro");
/// let extended = labels.with(&[("opcode", "setup".to_string())]);
/// assert!(extended.contains(&("device", "Thermopro".to_string())));
/// assert_eq!(extended.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DeviceLabels {
    /// Device name.
    pub device: String,
}

impl DeviceLabels {
    /// Creates labels for the named device.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Converts the labels to the metrics crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![("device", self.device.clone())]
    }

    /// Returns labels with additional key-value pairs.
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Describes all metrics. Call once at startup, after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

/// Install a Prometheus exporter listening on `addr` and describe all metrics.
#[cfg(feature = "prometheus")]
pub fn install_prometheus(
    addr: std::net::SocketAddr,
) -> Result<(), metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    describe_metrics();
    Ok(())
}

//! TP25 emulator runner.
//!
//! Wires a [`tp25_device::Device`] to a TCP transport and a periodic
//! temperature report scheduler. The `tp25sim` binary is a thin CLI over
//! [`Emulator`].
//!
//! ```no_run
//! use tp25_runner::{Emulator, RunnerConfig};
//!
//! # async fn demo() -> Result<(), tp25_runner::RunnerError> {
//! let emulator = Emulator::start(&RunnerConfig::default()).await?;
//! println!("listening on {}", emulator.local_addr());
//! emulator.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod scheduler;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tp25_device::{Device, DeviceError};
use tracing::info;

pub use config::{RunnerConfig, TransportConfig};
pub use error::RunnerError;
pub use transport::{ChannelSink, TcpTransport};

/// The device shared between the transport and the scheduler.
///
/// The mutex serializes command handling against timer ticks.
pub type SharedDevice = Arc<Mutex<Device<ChannelSink>>>;

/// A running emulator: transport listener plus report scheduler.
pub struct Emulator {
    device: SharedDevice,
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Emulator {
    /// Validate `config`, bind the listener and start both tasks.
    pub async fn start(config: &RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;

        let (sink, outbound, subscribed) =
            transport::notification_channel(config.transport.queue_depth);
        let device: SharedDevice = Arc::new(Mutex::new(Device::new(&config.device, sink)?));

        let listener =
            TcpListener::bind((config.transport.bind.as_str(), config.transport.port)).await?;
        let transport = TcpTransport::new(listener, device.clone(), outbound, subscribed);
        let local_addr = transport.local_addr()?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let tasks = vec![
            tokio::spawn(transport.run(shutdown_rx.clone())),
            scheduler::spawn_timer(device.clone(), config.notify_interval(), shutdown_rx),
        ];

        info!(
            "Emulator: {} listening on {} (reports every {} ms)",
            config.device.name, local_addr, config.notify_interval_ms
        );

        Ok(Emulator {
            device,
            local_addr,
            shutdown,
            tasks,
        })
    }

    /// Address the transport is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Update a probe reading, as the sensor front end would.
    pub fn set_temperature(&self, probe_index: u8, temperature: u16) -> Result<(), DeviceError> {
        self.device.lock().set_temperature(probe_index, temperature)
    }

    /// Stop both tasks and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
        info!("Emulator: stopped");
    }
}

//! TCP transport standing in for the BLE link.
//!
//! A single client connects at a time, as a BLE peripheral accepts one
//! central. Both directions are framed with [`FrameCodec`]: the client writes
//! `'<'` frames that are handed to the device as characteristic writes, and
//! notifications come back as `'>'` frames. A connected client counts as
//! subscribed; with no client attached every notification fails with
//! [`SendError::NotSubscribed`].

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tp25_device::{NotificationSink, SendError};
use tp25_metrics::{metric_defs, DeviceLabels};
use tp25_protocol::{Direction, FrameCodec, RawNotification, MAX_COMMAND_SIZE, MIN_COMMAND_SIZE};
use tracing::{debug, info, warn};

use crate::SharedDevice;

// ============================================================================
// Notification sink
// ============================================================================

/// [`NotificationSink`] that queues notifications for the connected client.
///
/// Never blocks: a full queue fails the send with [`SendError::QueueFull`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<RawNotification>,
    subscribed: Arc<AtomicBool>,
}

impl ChannelSink {
    /// Create a sink feeding `tx`, gated on `subscribed`.
    pub fn new(tx: mpsc::Sender<RawNotification>, subscribed: Arc<AtomicBool>) -> Self {
        ChannelSink { tx, subscribed }
    }

    /// Whether a client is currently attached.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }
}

impl NotificationSink for ChannelSink {
    fn send_notification(&mut self, notification: &RawNotification) -> Result<(), SendError> {
        if !self.is_subscribed() {
            return Err(SendError::NotSubscribed);
        }
        self.tx.try_send(*notification).map_err(|e| match e {
            TrySendError::Full(_) => SendError::QueueFull,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

/// Build a connected sink/receiver pair and the subscription flag they share.
pub fn notification_channel(
    depth: usize,
) -> (ChannelSink, mpsc::Receiver<RawNotification>, Arc<AtomicBool>) {
    let (tx, rx) = mpsc::channel(depth);
    let subscribed = Arc::new(AtomicBool::new(false));
    (ChannelSink::new(tx, subscribed.clone()), rx, subscribed)
}

// ============================================================================
// Server
// ============================================================================

/// TCP listener serving one client at a time.
pub struct TcpTransport {
    listener: TcpListener,
    device: SharedDevice,
    outbound: mpsc::Receiver<RawNotification>,
    subscribed: Arc<AtomicBool>,
    labels: DeviceLabels,
}

impl TcpTransport {
    /// Wrap a bound listener.
    pub fn new(
        listener: TcpListener,
        device: SharedDevice,
        outbound: mpsc::Receiver<RawNotification>,
        subscribed: Arc<AtomicBool>,
    ) -> Self {
        let labels = DeviceLabels::new(device.lock().name());
        TcpTransport {
            listener,
            device,
            outbound,
            subscribed,
            labels,
        }
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve clients until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Transport: accept failed: {}", e);
                        continue;
                    }
                },
                _ = shutdown.changed() => break,
            };

            info!("Transport: client {} connected", peer);
            // Anything queued before this client subscribed belongs to nobody.
            while self.outbound.try_recv().is_ok() {}
            self.set_subscribed(true);

            let result = self.serve(stream, &mut shutdown).await;

            self.set_subscribed(false);
            match result {
                Ok(()) => info!("Transport: client {} disconnected", peer),
                Err(e) => warn!("Transport: connection error with {}: {}", peer, e),
            }

            if *shutdown.borrow() {
                break;
            }
        }
        debug!("Transport: stopped");
    }

    fn set_subscribed(&self, subscribed: bool) {
        self.subscribed.store(subscribed, Ordering::Release);
        metrics::gauge!(metric_defs::TRANSPORT_CLIENTS.name, &self.labels.to_labels())
            .set(if subscribed { 1.0 } else { 0.0 });
    }

    /// Pump one connection until it closes or `shutdown` fires.
    async fn serve(
        &mut self,
        mut stream: TcpStream,
        shutdown: &mut watch::Receiver<bool>,
    ) -> io::Result<()> {
        let (mut reader, mut writer) = stream.split();
        let mut codec = FrameCodec::new(Direction::HostToDevice);
        let mut read_buf = [0u8; 1024];
        let device = &self.device;
        let labels = &self.labels;
        let outbound = &mut self.outbound;

        loop {
            tokio::select! {
                // Client -> characteristic write
                result = reader.read(&mut read_buf) => {
                    let n = result?;
                    if n == 0 {
                        return Ok(());
                    }
                    metrics::counter!(metric_defs::TRANSPORT_RX_BYTES.name, &labels.to_labels())
                        .increment(n as u64);
                    codec.push(&read_buf[..n]);
                    while let Some(payload) = codec.decode() {
                        write_characteristic(device, labels, &payload);
                    }
                }

                // Notification -> client
                Some(notification) = outbound.recv() => {
                    writer
                        .write_all(&FrameCodec::encode(Direction::DeviceToHost, notification.as_bytes()))
                        .await?;
                    writer.flush().await?;
                }

                _ = shutdown.changed() => return Ok(()),
            }
        }
    }
}

/// Deliver one characteristic write to the device.
///
/// Writes outside `MIN_COMMAND_SIZE..=MAX_COMMAND_SIZE` never reach the
/// device, like a GATT server rejecting an invalid attribute length.
fn write_characteristic(device: &SharedDevice, labels: &DeviceLabels, payload: &[u8]) {
    if !(MIN_COMMAND_SIZE..=MAX_COMMAND_SIZE).contains(&payload.len()) {
        debug!("Transport: rejected {} byte write", payload.len());
        metrics::counter!(
            metric_defs::COMMANDS_DROPPED.name,
            &labels.with(&[("reason", "invalid_length".to_string())])
        )
        .increment(1);
        return;
    }
    let outcome = device.lock().receive_command(payload);
    debug!("Transport: write {} -> {:?}", hex::encode(payload), outcome);
}

//! Periodic temperature reports.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::SharedDevice;

/// Spawn a task that fires the device timer every `period` until `shutdown`
/// fires. The first tick lands one full period after spawning.
pub fn spawn_timer(
    device: SharedDevice,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    device.lock().receive_timer();
                }
                _ = shutdown.changed() => break,
            }
        }
        debug!("Scheduler: stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::notification_channel;
    use parking_lot::Mutex;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tp25_device::{Device, DeviceConfig};
    use tp25_protocol::CMD_TEMP_REPORT;

    #[tokio::test(start_paused = true)]
    async fn test_timer_reports_each_period() {
        let (sink, mut rx, subscribed) = notification_channel(8);
        subscribed.store(true, Ordering::Release);
        let device = Arc::new(Mutex::new(
            Device::new(&DeviceConfig::default(), sink).unwrap(),
        ));
        let (stop, stop_rx) = watch::channel(false);

        let handle = spawn_timer(device, Duration::from_millis(100), stop_rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(260)).await;
        let mut reports = 0;
        while let Ok(notification) = rx.try_recv() {
            assert_eq!(notification.code(), CMD_TEMP_REPORT);
            reports += 1;
        }
        assert_eq!(reports, 3);

        stop.send(true).unwrap();
        handle.await.unwrap();
    }
}

//! Background sensor polling
//!
//! A worker thread owns the registry, updates it every interval and publishes
//! the snapshots of every pass over a bounded channel. The render loop drains
//! the channel and keeps the newest batch. Capture requests travel the other
//! way over a second channel and are served between passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::{debug, info, warn};

use crate::error::StartupError;
use crate::registry::SensorRegistry;
use crate::sensors::{Hardware, SensorSnapshot};

/// Snapshot batches buffered between the worker and the render loop.
const SNAPSHOT_CAPACITY: usize = 4;

/// Pending capture requests.
const COMMAND_CAPACITY: usize = 8;

/// Requests from the render loop to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerCommand {
    /// Capture on the camera sensor at this registry index
    TakePicture(usize),
}

type SnapshotChannel =
    Channel<CriticalSectionRawMutex, Vec<SensorSnapshot>, SNAPSHOT_CAPACITY>;
type CommandChannel = Channel<CriticalSectionRawMutex, PollerCommand, COMMAND_CAPACITY>;

/// Handle to the polling thread. Dropping it stops and joins the thread.
pub struct Poller {
    snapshots: Arc<SnapshotChannel>,
    commands: Arc<CommandChannel>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Move `registry` onto a new thread that polls it every `interval`.
    pub fn spawn<H: Hardware + 'static>(
        registry: SensorRegistry<H>,
        interval: Duration,
    ) -> Result<Self, StartupError> {
        let snapshots = Arc::new(SnapshotChannel::new());
        let commands = Arc::new(CommandChannel::new());
        let stop = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            registry,
            interval,
            snapshots: snapshots.clone(),
            commands: commands.clone(),
            stop: stop.clone(),
        };
        let handle = thread::Builder::new()
            .name("sensor-poller".into())
            .spawn(move || worker.run())?;

        info!("Background polling started ({} ms interval)", interval.as_millis());
        Ok(Self {
            snapshots,
            commands,
            stop,
            handle: Some(handle),
        })
    }

    /// The newest published batch, discarding older ones.
    pub fn latest(&self) -> Option<Vec<SensorSnapshot>> {
        let mut latest = None;
        while let Ok(batch) = self.snapshots.try_receive() {
            latest = Some(batch);
        }
        latest
    }

    /// Queue a command for the worker. Returns `false` if the queue is full.
    pub fn send(&self, command: PollerCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                warn!("Poller command queue full, dropping {:?}", command);
                false
            }
        }
    }

    /// Stop the worker and wait for it to finish its current pass.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        handle.thread().unpark();
        if handle.join().is_err() {
            warn!("Sensor poller thread panicked");
        }
        info!("Background polling stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker<H: Hardware> {
    registry: SensorRegistry<H>,
    interval: Duration,
    snapshots: Arc<SnapshotChannel>,
    commands: Arc<CommandChannel>,
    stop: Arc<AtomicBool>,
}

impl<H: Hardware> Worker<H> {
    fn run(mut self) {
        while !self.stop.load(Ordering::Acquire) {
            while let Ok(command) = self.commands.try_receive() {
                match command {
                    PollerCommand::TakePicture(index) => {
                        self.registry.take_picture(index);
                    }
                }
            }

            self.registry.update_all();
            self.publish(self.registry.snapshots());

            // Woken early by shutdown.
            thread::park_timeout(self.interval);
        }
        debug!("Sensor poller exiting");
    }

    /// Send a batch, making room by dropping the oldest one if needed.
    fn publish(&self, batch: Vec<SensorSnapshot>) {
        if let Err(TrySendError::Full(batch)) = self.snapshots.try_send(batch) {
            let _ = self.snapshots.try_receive();
            if self.snapshots.try_send(batch).is_err() {
                debug!("Snapshot channel still full, dropping batch");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::gpio::Polarity;
    use crate::sensors::{CameraSensor, GasSensor, Reading, SensorWrapper};
    use crate::sim::{SimCamera, SimHardware, SimInput};

    fn wait_for<T>(mut poll: impl FnMut() -> Option<T>) -> Option<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(value) = poll() {
                return Some(value);
            }
            thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn publishes_snapshots_and_serves_captures() {
        let gas = SimInput::new(false);
        let camera = SimCamera::new(8, 6);
        let mut registry = SensorRegistry::<SimHardware>::new();
        registry.register(SensorWrapper::Gas(GasSensor::new(
            "gas",
            gas.clone(),
            Polarity::ActiveLow,
        )));
        registry.register(SensorWrapper::Camera(CameraSensor::new("cam", camera.clone())));

        let mut poller = Poller::spawn(registry, Duration::from_millis(1)).unwrap();

        let warned = wait_for(|| {
            poller
                .latest()
                .filter(|batch| batch[0].warning)
        });
        assert!(warned.is_some(), "gas detection never published");

        assert!(poller.send(PollerCommand::TakePicture(1)));
        let captured = wait_for(|| {
            poller.latest().filter(|batch| match &batch[1].reading {
                Reading::Camera(image) => !image.is_empty(),
                _ => false,
            })
        });
        assert!(captured.is_some(), "capture never published");
        assert_eq!(camera.captures(), 1);

        poller.shutdown();
        poller.shutdown();
    }

    #[test]
    fn drop_joins_worker_with_long_interval() {
        let registry = SensorRegistry::<SimHardware>::new();
        let started = Instant::now();
        drop(Poller::spawn(registry, Duration::from_secs(10)).unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

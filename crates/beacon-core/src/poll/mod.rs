//! Shared-slot updater: producers overwrite, a display thread polls.
//!
//! ## Model
//! - One display thread owns the [`Surface`]; it is created *on* that thread.
//! - Any number of producer threads call [`PollingUpdater::update`] / [`PollingUpdater::publish`],
//!   which replace the single pending text (last write wins, nothing is queued).
//! - Every tick the display thread pumps surface events and, if the text changed since the previous tick,
//!   shows the newest one. Updates landing between two ticks are never shown.
//!
//! The slot is a `watch` channel, so a reader always sees a complete string.
//!
//! ## Shutdown
//! [`PollingUpdater::stop`] cancels and joins. [`PollingUpdater::wait`] joins without cancelling and returns
//! only once the surface was closed from its own UI. Dropping the updater cancels without joining.
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use beacon_model::{StatusMessage, WorkerId};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    error::{CoreError, SurfaceError},
    surface::Surface,
};

/// Default delay between two display ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Sleep between ticks of the display loop.
    pub interval: Duration,
    /// Name of the display thread.
    pub thread_name: String,
}

impl PollConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval.is_zero() {
            return Err(CoreError::InvalidConfig("poll interval must be non-zero".into()));
        }
        if self.thread_name.trim().is_empty() {
            return Err(CoreError::InvalidConfig("thread name is empty".into()));
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            thread_name: "beacon-display".to_string(),
        }
    }
}

/// Why the display loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// Stopped through the cancellation token.
    Cancelled,
    /// The surface reported itself closed.
    Closed,
}

pub struct PollingUpdater {
    slot: watch::Sender<String>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<PollExit, CoreError>>>,
}

impl PollingUpdater {
    /// Start the display thread.
    ///
    /// `open` runs on the display thread and builds the surface there. If it fails, the error is returned
    /// from here and no thread is left running.
    #[instrument(level = "debug", skip(cfg, open), fields(interval_ms = cfg.interval.as_millis() as u64))]
    pub fn spawn<S, F>(cfg: PollConfig, open: F) -> Result<Self, CoreError>
    where
        S: Surface + 'static,
        F: FnOnce() -> Result<S, SurfaceError> + Send + 'static,
    {
        cfg.validate()?;

        let (slot, rx) = watch::channel(String::new());
        let cancel = CancellationToken::new();
        let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<Result<(), SurfaceError>>(1);

        let token = cancel.clone();
        let interval = cfg.interval;
        let handle = thread::Builder::new()
            .name(cfg.thread_name.clone())
            .spawn(move || {
                let mut surface = match open() {
                    Ok(surface) => surface,
                    Err(e) => {
                        // Reported to the caller of `spawn`; a surface that never opened counts as closed.
                        let _ = ready_tx.send(Err(e));
                        return Ok(PollExit::Closed);
                    }
                };
                let _ = ready_tx.send(Ok(()));
                info!(target: "beacon.core.poll", surface = surface.name(), "display loop started");

                let exit = run_loop(&mut surface, rx, &token, interval);
                match &exit {
                    Ok(reason) => info!(target: "beacon.core.poll", ?reason, "display loop finished"),
                    Err(e) => warn!(target: "beacon.core.poll", error = %e, "display loop failed"),
                }
                exit
            })
            .map_err(|e| CoreError::Spawn(format!("display thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                slot,
                cancel,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(CoreError::Surface(e))
            }
            // The thread dropped the sender without reporting: `open` panicked.
            Err(_) => {
                let _ = handle.join();
                Err(CoreError::WorkerPanicked)
            }
        }
    }

    /// Publish a fresh random status for `worker` and return it.
    pub fn update(&self, worker: WorkerId) -> StatusMessage {
        let msg = StatusMessage::random(worker);
        self.publish(&msg);
        msg
    }

    /// Replace the pending text with `msg`.
    pub fn publish(&self, msg: &StatusMessage) {
        trace!(target: "beacon.core.poll", worker = ?msg.worker(), "status published");
        self.slot.send_replace(msg.text().to_string());
    }

    /// Text currently waiting in the slot (shown already or about to be).
    pub fn latest(&self) -> String {
        self.slot.borrow().clone()
    }

    /// `true` while the display thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the display loop and wait for the thread to exit.
    pub fn stop(mut self) -> Result<PollExit, CoreError> {
        debug!(target: "beacon.core.poll", "stop requested");
        self.cancel.cancel();
        self.join()
    }

    /// Wait for the display loop to end on its own (surface closed or failed).
    pub fn wait(mut self) -> Result<PollExit, CoreError> {
        self.join()
    }

    fn join(&mut self) -> Result<PollExit, CoreError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| CoreError::WorkerPanicked)?,
            None => Ok(PollExit::Cancelled),
        }
    }
}

impl Drop for PollingUpdater {
    fn drop(&mut self) {
        if self.handle.is_some() {
            debug!(target: "beacon.core.poll", "updater dropped without stop; display thread detached");
            self.cancel.cancel();
        }
    }
}

fn run_loop<S: Surface>(
    surface: &mut S,
    mut rx: watch::Receiver<String>,
    cancel: &CancellationToken,
    interval: Duration,
) -> Result<PollExit, CoreError> {
    loop {
        if cancel.is_cancelled() {
            return Ok(PollExit::Cancelled);
        }
        surface.pump()?;
        if !surface.is_open() {
            return Ok(PollExit::Closed);
        }
        if rx.has_changed().unwrap_or(false) {
            let text = rx.borrow_and_update().clone();
            surface.show(&text)?;
        }
        thread::sleep(interval);
    }
}

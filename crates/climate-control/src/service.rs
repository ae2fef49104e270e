//! Async host adapter for the controller
//!
//! The decision core is synchronous; this adapter owns a controller inside
//! a tokio task, feeds it events from an mpsc channel, and injects the
//! periodic keep-alive tick that re-runs the evaluation even when no event
//! arrives. Event delivery is strictly sequential, so the core never sees
//! concurrent mutation.

use chrono::Utc;
use climate_core::ClimateEvent;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::controller::ClimateController;

/// Default depth of the inbound event channel
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Handle to a running climate service task
pub struct ClimateService {
    event_tx: mpsc::Sender<ClimateEvent>,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<ClimateController>,
}

impl ClimateService {
    /// Spawn the service task around a controller
    ///
    /// `tick_interval` drives the keep-alive tick; sensor and mode events
    /// are sent through the handle returned by [`Self::sender`].
    pub fn spawn(
        mut controller: ClimateController,
        tick_interval: std::time::Duration,
    ) -> Self {
        let (event_tx, mut event_rx) = mpsc::channel::<ClimateEvent>(DEFAULT_EVENT_CAPACITY);
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            info!("starting climate service");
            let mut ticker = tokio::time::interval(tick_interval);
            // The first interval tick fires immediately; skip it so the
            // keep-alive cadence starts one interval from now.
            ticker.tick().await;

            loop {
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        match maybe_event {
                            Some(event) => {
                                debug!(?event, "processing climate event");
                                controller.handle_event(event);
                            }
                            None => {
                                info!("event channel closed, stopping climate service");
                                break;
                            }
                        }
                    }
                    _ = ticker.tick() => {
                        controller.handle_event(ClimateEvent::Tick { now: Utc::now() });
                    }
                    _ = shutdown_rx.recv() => {
                        // Close the intake and keep looping: recv() still
                        // yields already-queued events, then returns None.
                        info!("received shutdown signal, draining queued events");
                        event_rx.close();
                    }
                }
            }

            info!("climate service stopped");
            controller
        });

        Self {
            event_tx,
            shutdown_tx,
            handle,
        }
    }

    /// Sender for delivering events to the controller
    pub fn sender(&self) -> mpsc::Sender<ClimateEvent> {
        self.event_tx.clone()
    }

    /// Signal the service task to stop
    ///
    /// Events already queued at that point are still processed before the
    /// task finishes.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Stop the service and get the controller back for inspection
    pub async fn join(self) -> Result<ClimateController, tokio::task::JoinError> {
        self.shutdown();
        self.handle.await
    }
}

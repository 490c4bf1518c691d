//! The tick scheduler
//!
//! Fixed-interval loop with a manual trigger channel: derived state
//! advances at tick boundaries regardless of event volume, and tests
//! or admin tooling can force an immediate tick. Stopping flips the
//! running flag and the loop exits at the next wakeup.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::pipeline::TickPipeline;

/// Drives the pipeline at a fixed interval.
pub struct TickScheduler {
    pipeline: Arc<Mutex<TickPipeline>>,
    tick_interval: Duration,
    trigger_tx: mpsc::Sender<()>,
    running: Arc<RwLock<bool>>,
}

impl TickScheduler {
    /// Create a scheduler; pass the receiver back to [`Self::start`].
    pub fn new(
        pipeline: Arc<Mutex<TickPipeline>>,
        tick_interval: Duration,
    ) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (trigger_tx, trigger_rx) = mpsc::channel(8);
        let scheduler = Arc::new(Self {
            pipeline,
            tick_interval,
            trigger_tx,
            running: Arc::new(RwLock::new(false)),
        });
        (scheduler, trigger_rx)
    }

    /// Request an immediate tick outside the fixed cadence.
    pub async fn trigger_tick(&self) {
        let _ = self.trigger_tx.send(()).await;
    }

    /// Spawn the tick loop.
    pub async fn start(self: Arc<Self>, mut trigger_rx: mpsc::Receiver<()>) -> JoinHandle<()> {
        {
            let mut running = self.running.write().await;
            *running = true;
        }
        tracing::info!(interval_ms = self.tick_interval.as_millis() as u64, "tick scheduler started");

        let scheduler = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(scheduler.tick_interval);
            // The first interval tick fires immediately; skip it so the
            // first real tick lands one interval after start.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        scheduler.run_once();
                    }
                    Some(_) = trigger_rx.recv() => {
                        scheduler.run_once();
                    }
                    else => break,
                }

                if !*scheduler.running.read().await {
                    break;
                }
            }
            tracing::info!("tick scheduler stopped");
        })
    }

    fn run_once(&self) {
        let summary = self.pipeline.lock().run_tick();
        tracing::trace!(tick = summary.tick, "scheduled tick ran");
    }

    /// Stop the loop; takes effect at the next wakeup.
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        // Nudge the loop so it observes the flag promptly.
        let _ = self.trigger_tx.try_send(());
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

use crate::core::sync_engine::SyncEngine;
use crate::interface::runnable::Runnable;
use async_trait::async_trait;
use macros::log;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::select;
use tokio::sync::oneshot::Receiver;
use tokio::time::{MissedTickBehavior, interval};

/// Drives one engine on a fixed period.
///
/// The interval runs start to start. A cycle is awaited before the next tick
/// is polled, so a slow cycle delays the schedule instead of overlapping it.
pub struct SyncTimer {
    engine: SyncEngine,
    completed_cycles: AtomicU64,
}

impl SyncTimer {
    pub fn new(engine: SyncEngine) -> Self {
        Self {
            engine,
            completed_cycles: AtomicU64::new(0),
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Cycles finished so far, failed ones included.
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Runnable for SyncTimer {
    async fn run_impl(self: Arc<Self>, mut shutdown_rx: Receiver<()>) {
        let mut ticker = interval(self.engine.job().interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                biased;
                _ = &mut shutdown_rx => { break; }
                _ = ticker.tick() => {}
            }
            if let Err(err) = self.engine.run_once().await {
                log!(err);
            }
            self.completed_cycles.fetch_add(1, Ordering::AcqRel);
        }
    }
}

//! Periodic driver of the per-world draw queues.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::config::DrawConfig;
use crate::voxel::World;

/// Ticks every registered world on a fixed interval
///
/// Each tick runs on the blocking pool because it holds the map write locks
/// for its whole duration.
#[derive(Debug)]
pub struct DrawScheduler {
    worlds: Vec<Arc<World>>,
    interval: Duration,
}

impl DrawScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            worlds: Vec::new(),
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn from_config(config: &DrawConfig) -> Self {
        Self::new(config.tick_interval())
    }

    pub fn with_world(mut self, world: Arc<World>) -> Self {
        self.worlds.push(world);
        self
    }

    pub fn add_world(&mut self, world: Arc<World>) {
        self.worlds.push(world);
    }

    pub fn worlds(&self) -> &[Arc<World>] {
        &self.worlds
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One synchronous pass over every world. Returns blocks updated.
    pub fn tick_all(&self) -> usize {
        tick_worlds(&self.worlds)
    }

    /// Tick until `shutdown` turns true or its sender is dropped, then cancel
    /// and drain every queued operation.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Draw scheduler started: {} world(s), tick every {:?}",
            self.worlds.len(),
            self.interval
        );
        let worlds = Arc::new(self.worlds);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let worlds = Arc::clone(&worlds);
                    match tokio::task::spawn_blocking(move || tick_worlds(&worlds)).await {
                        Ok(0) => {}
                        Ok(updated) => log::debug!("Draw tick updated {} blocks", updated),
                        Err(e) => log::error!("Draw tick panicked: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let drained = tokio::task::spawn_blocking(move || {
            worlds.iter().map(|world| world.cancel_draw_ops()).sum::<usize>()
        })
        .await;
        match drained {
            Ok(cancelled) => log::info!("Draw scheduler stopped, {} operation(s) cancelled", cancelled),
            Err(e) => log::error!("Draw scheduler shutdown panicked: {}", e),
        }
    }
}

fn tick_worlds(worlds: &[Arc<World>]) -> usize {
    worlds.iter().map(|world| world.tick()).sum()
}

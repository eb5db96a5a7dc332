//! A named map with its draw queue, event hooks and network observers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::config::DrawConfig;
use crate::core::types::IVec3;
use crate::draw::{DrawEvents, DrawOpHandle, DrawOperation};
use super::block::Block;
use super::map::Map;

/// Receives block changes to forward to connected clients
pub trait BlockBroadcast: Send + Sync {
    /// Fire-and-forget, low priority
    fn send_block_change(&self, coord: IVec3, block: Block);
}

/// A world shared between the command, update and network threads
///
/// The update thread holds the map write lock and the draw queue lock for a
/// whole tick. Observers and `block_placed` hooks run during that tick and
/// must not lock the map or touch the draw queue (`queue_draw_op`,
/// `queued_draw_ops`, `draw_op_handles`, `cancel_draw_ops`); doing so
/// deadlocks the tick.
pub struct World {
    name: String,
    map: RwLock<Map>,
    flushing: AtomicBool,
    observers: RwLock<Vec<Arc<dyn BlockBroadcast>>>,
    draw_ops: Mutex<Vec<DrawOperation>>,
    events: Arc<DrawEvents>,
    config: Arc<DrawConfig>,
}

impl World {
    pub fn new(name: impl Into<String>, map: Map) -> Self {
        Self {
            name: name.into(),
            map: RwLock::new(map),
            flushing: AtomicBool::new(false),
            observers: RwLock::new(Vec::new()),
            draw_ops: Mutex::new(Vec::new()),
            events: Arc::new(DrawEvents::new()),
            config: Arc::new(DrawConfig::default()),
        }
    }

    pub fn with_config(mut self, config: DrawConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Event hooks raised by every draw operation in this world
    pub fn with_events(mut self, events: DrawEvents) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn events(&self) -> Arc<DrawEvents> {
        Arc::clone(&self.events)
    }

    pub fn map(&self) -> RwLockReadGuard<'_, Map> {
        self.map.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn map_mut(&self) -> RwLockWriteGuard<'_, Map> {
        self.map.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// While flushing, clients get the whole map afterwards instead of
    /// individual block changes
    pub fn is_flushing(&self) -> bool {
        self.flushing.load(Ordering::Relaxed)
    }

    pub fn set_flushing(&self, flushing: bool) {
        self.flushing.store(flushing, Ordering::Relaxed);
    }

    pub fn add_observer(&self, observer: Arc<dyn BlockBroadcast>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn broadcast_block_change(&self, coord: IVec3, block: Block) {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer.send_block_change(coord, block);
        }
    }

    fn ops(&self) -> MutexGuard<'_, Vec<DrawOperation>> {
        self.draw_ops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a started operation to the draw queue
    pub fn queue_draw_op(&self, op: DrawOperation) {
        log::debug!("Queued {} by {} in world {}", op.description(), op.player().name(), self.name);
        self.ops().push(op);
    }

    /// Number of operations waiting for or in the middle of drawing
    pub fn queued_draw_ops(&self) -> usize {
        self.ops().len()
    }

    pub fn draw_op_handles(&self) -> Vec<DrawOpHandle> {
        self.ops().iter().map(DrawOperation::handle).collect()
    }

    /// Draw one batch of every queued operation and end the ones that finished.
    ///
    /// `blocks_per_tick` is split evenly across the queue. Returns the number
    /// of blocks updated.
    pub fn tick(&self) -> usize {
        let mut updated = 0;
        let finished = {
            let mut ops = self.ops();
            if ops.is_empty() {
                return 0;
            }
            let budget = (self.config.blocks_per_tick / ops.len()).max(1);
            {
                let mut map = self.map_mut();
                for op in ops.iter_mut() {
                    updated += op.draw_batch(&mut map, budget);
                }
            }
            let (finished, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut *ops)
                .into_iter()
                .partition(DrawOperation::is_done);
            *ops = pending;
            finished
        };
        for mut op in finished {
            op.end();
        }
        updated
    }

    /// Cancel every queued operation and drain the queue
    pub fn cancel_draw_ops(&self) -> usize {
        let cancelled = {
            let ops = self.ops();
            for op in ops.iter() {
                op.cancel();
            }
            ops.len()
        };
        if cancelled > 0 {
            log::info!("Cancelling {} draw operation(s) in world {}", cancelled, self.name);
        }
        while self.queued_draw_ops() > 0 {
            self.tick();
        }
        cancelled
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("name", &self.name)
            .field("flushing", &self.is_flushing())
            .field("draw_ops", &self.queued_draw_ops())
            .finish()
    }
}

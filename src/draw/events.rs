//! Ordered observers of draw operation lifecycle events.

use std::sync::Arc;

use crate::core::types::IVec3;
use crate::player::BlockChangeContext;
use crate::voxel::Block;
use super::operation::DrawOperation;

/// Payload of the block placed event
#[derive(Clone, Copy, Debug)]
pub struct BlockPlacedEvent<'a> {
    pub player: &'a str,
    pub world: &'a str,
    pub coord: IVec3,
    pub old_block: Block,
    pub new_block: Block,
    pub context: BlockChangeContext,
}

/// Receives draw operation events
///
/// All methods default to doing nothing, so audit or logging integrations
/// implement only what they need.
pub trait DrawObserver: Send + Sync {
    /// Before an operation begins. Returning false cancels it.
    fn beginning(&self, _op: &DrawOperation) -> bool {
        true
    }

    /// After an operation began, before it is queued
    fn began(&self, _op: &DrawOperation) {}

    /// After an operation finished or was cancelled
    fn ended(&self, _op: &DrawOperation) {}

    /// After a block was written to the map. Runs with the world's map and
    /// draw queue locked, see [`World`](crate::voxel::World).
    fn block_placed(&self, _event: &BlockPlacedEvent<'_>) {}
}

/// Observer list dispatched in priority order (highest first, ties in
/// subscription order)
#[derive(Clone, Default)]
pub struct DrawEvents {
    observers: Vec<(i32, Arc<dyn DrawObserver>)>,
}

impl DrawEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer
    pub fn subscribe(&mut self, priority: i32, observer: Arc<dyn DrawObserver>) -> &mut Self {
        let position = self.observers.partition_point(|(p, _)| *p >= priority);
        self.observers.insert(position, (priority, observer));
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Dispatch the beginning event. Stops at the first observer that vetoes.
    pub fn raise_beginning(&self, op: &DrawOperation) -> bool {
        self.observers.iter().all(|(_, observer)| observer.beginning(op))
    }

    pub fn raise_began(&self, op: &DrawOperation) {
        for (_, observer) in &self.observers {
            observer.began(op);
        }
    }

    pub fn raise_ended(&self, op: &DrawOperation) {
        for (_, observer) in &self.observers {
            observer.ended(op);
        }
    }

    pub fn raise_block_placed(&self, event: &BlockPlacedEvent<'_>) {
        for (_, observer) in &self.observers {
            observer.block_placed(event);
        }
    }
}

impl std::fmt::Debug for DrawEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEvents")
            .field("observers", &self.observers.len())
            .finish()
    }
}

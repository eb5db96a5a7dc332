//! Bounded undo journal of a draw operation.
//!
//! The drawing thread appends while undo/redo commands may read from another
//! thread, so every access goes through one internal lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::voxel::Block;
use super::operation::DrawOpHandle;

/// One journal record: a coordinate and the block it held before the draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoBlock {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub block: Block,
}

impl UndoBlock {
    pub fn new(coord: IVec3, block: Block) -> Self {
        Self {
            x: coord.x as i16,
            y: coord.y as i16,
            z: coord.z as i16,
            block,
        }
    }

    pub fn coord(&self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }
}

#[derive(Default)]
struct UndoBuffer {
    records: Vec<UndoBlock>,
    too_large: bool,
}

/// Append-only journal capped at `max_blocks` records
///
/// The add that would exceed the cap empties the journal and flags it as too
/// large to undo. The flag never resets.
pub struct UndoState {
    buffer: Mutex<UndoBuffer>,
    max_blocks: usize,
    operation: Option<DrawOpHandle>,
}

impl UndoState {
    /// Create a detached journal (no associated operation)
    pub fn new(max_blocks: usize) -> Self {
        Self {
            buffer: Mutex::new(UndoBuffer::default()),
            max_blocks,
            operation: None,
        }
    }

    /// Create a journal recording the effects of `op`
    pub fn for_operation(max_blocks: usize, op: DrawOpHandle) -> Self {
        Self {
            operation: Some(op),
            ..Self::new(max_blocks)
        }
    }

    fn lock(&self) -> MutexGuard<'_, UndoBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the original block at `coord`.
    ///
    /// Returns false once the journal is too large to undo; the call that
    /// crosses the cap clears every record.
    pub fn add(&self, coord: IVec3, block: Block) -> bool {
        let mut buffer = self.lock();
        if buffer.too_large {
            return false;
        }
        if buffer.records.len() < self.max_blocks {
            buffer.records.push(UndoBlock::new(coord, block));
            true
        } else {
            buffer.records = Vec::new();
            buffer.too_large = true;
            false
        }
    }

    /// Record at `index`, in the order records were added
    pub fn get(&self, index: usize) -> Option<UndoBlock> {
        self.lock().records.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn is_too_large_to_undo(&self) -> bool {
        self.lock().too_large
    }

    pub fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    /// Operation whose effects this journal records, if any
    pub fn operation(&self) -> Option<&DrawOpHandle> {
        self.operation.as_ref()
    }

    /// Copy of the records in the order they were added
    pub fn snapshot(&self) -> Vec<UndoBlock> {
        self.lock().records.clone()
    }

    /// Minimal box enclosing every recorded coordinate, `BoundingBox::EMPTY` if none
    pub fn calculate_bounds(&self) -> BoundingBox {
        let buffer = self.lock();
        let mut bounds = BoundingBox::EMPTY;
        for record in &buffer.records {
            bounds.expand(record.coord());
        }
        bounds
    }
}

impl std::fmt::Debug for UndoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let buffer = self.lock();
        f.debug_struct("UndoState")
            .field("records", &buffer.records.len())
            .field("too_large", &buffer.too_large)
            .field("max_blocks", &self.max_blocks)
            .finish()
    }
}

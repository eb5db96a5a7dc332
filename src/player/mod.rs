//! Player-side collaborators of draw operations: permissions, feedback
//! messages, statistics, the undo slot and clipboards.

pub mod permission;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::config::DrawConfig;
use crate::core::types::IVec3;
use crate::draw::{CopyState, DrawOpHandle, UndoState};
use crate::voxel::{Block, Map};

pub use permission::{
    AllowAll, BlockChangeContext, CanPlaceResult, DeniedBlocks, PlacementPolicy, ProtectedZone,
};

/// The most recent draw operation of a player, kept for undo
#[derive(Clone, Debug)]
pub struct LastDrawOp {
    pub handle: DrawOpHandle,
    pub undo_state: Arc<UndoState>,
}

/// What a draw operation needs from the player who issued it
pub trait PlayerContext: Send + Sync {
    fn name(&self) -> &str;

    /// Permission check for a single block change
    fn can_place(&self, map: &Map, coord: IVec3, block: Block, context: BlockChangeContext) -> CanPlaceResult;

    /// Queue a chat message
    fn message(&self, text: &str);

    /// Send a chat message ahead of anything queued
    fn message_now(&self, text: &str);

    /// Add to the cumulative "blocks drawn" statistic
    fn add_blocks_drawn(&self, count: u64);

    /// Start journaling a new operation. The operation becomes the player's last draw op.
    fn draw_begin(&self, op: &DrawOpHandle) -> Arc<UndoState>;

    fn last_draw_op(&self) -> Option<LastDrawOp>;

    /// Number of clipboard slots; valid slots are `0..clipboard_slots()`
    fn clipboard_slots(&self) -> usize;

    /// Store a copy in the clipboard slot named by `copy.slot`.
    /// Returns false, storing nothing, if there is no such slot.
    fn set_clipboard(&self, copy: CopyState) -> bool;

    fn clipboard(&self, slot: usize) -> Option<CopyState>;
}

/// A chat message waiting for the session layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    /// Sent ahead of the regular queue
    pub immediate: bool,
}

/// In-memory player
///
/// Messages accumulate in an outbox that the session layer (or a test) drains
/// with [`Player::take_messages`].
pub struct Player {
    name: String,
    policy: Box<dyn PlacementPolicy>,
    max_undo_blocks: usize,
    outbox: Mutex<Vec<OutgoingMessage>>,
    blocks_drawn: AtomicU64,
    last_draw_op: Mutex<Option<LastDrawOp>>,
    clipboards: Mutex<Vec<Option<CopyState>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Player {
    pub fn new(name: impl Into<String>, config: &DrawConfig) -> Self {
        Self {
            name: name.into(),
            policy: Box::new(AllowAll),
            max_undo_blocks: config.max_undo_blocks,
            outbox: Mutex::new(Vec::new()),
            blocks_drawn: AtomicU64::new(0),
            last_draw_op: Mutex::new(None),
            clipboards: Mutex::new(vec![None; config.clipboard_slots.max(1)]),
        }
    }

    /// Replace the placement policy
    pub fn with_policy(mut self, policy: impl PlacementPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Drain queued messages, oldest first
    pub fn take_messages(&self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut *lock(&self.outbox))
    }

    pub fn blocks_drawn(&self) -> u64 {
        self.blocks_drawn.load(Ordering::Relaxed)
    }

    /// Forget the last draw op, e.g. after it was undone by someone else
    pub fn clear_last_draw_op(&self) {
        *lock(&self.last_draw_op) = None;
    }
}

impl PlayerContext for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_place(&self, map: &Map, coord: IVec3, block: Block, context: BlockChangeContext) -> CanPlaceResult {
        self.policy.can_place(&self.name, map, coord, block, context)
    }

    fn message(&self, text: &str) {
        lock(&self.outbox).push(OutgoingMessage {
            text: text.to_string(),
            immediate: false,
        });
    }

    fn message_now(&self, text: &str) {
        lock(&self.outbox).push(OutgoingMessage {
            text: text.to_string(),
            immediate: true,
        });
    }

    fn add_blocks_drawn(&self, count: u64) {
        self.blocks_drawn.fetch_add(count, Ordering::Relaxed);
    }

    fn draw_begin(&self, op: &DrawOpHandle) -> Arc<UndoState> {
        let undo_state = Arc::new(UndoState::for_operation(self.max_undo_blocks, op.clone()));
        *lock(&self.last_draw_op) = Some(LastDrawOp {
            handle: op.clone(),
            undo_state: Arc::clone(&undo_state),
        });
        undo_state
    }

    fn last_draw_op(&self) -> Option<LastDrawOp> {
        lock(&self.last_draw_op).clone()
    }

    fn clipboard_slots(&self) -> usize {
        lock(&self.clipboards).len()
    }

    fn set_clipboard(&self, copy: CopyState) -> bool {
        let mut slots = lock(&self.clipboards);
        match slots.get_mut(copy.slot) {
            Some(slot) => {
                *slot = Some(copy);
                true
            }
            None => false,
        }
    }

    fn clipboard(&self, slot: usize) -> Option<CopyState> {
        lock(&self.clipboards).get(slot).cloned().flatten()
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("blocks_drawn", &self.blocks_drawn())
            .finish()
    }
}

//! Supplies the journaled blocks of an undo operation.

use std::sync::Arc;

use crate::player::PlayerContext;
use crate::voxel::Block;
use crate::draw::operation::DrawOperation;
use crate::draw::undo::UndoBlock;
use super::{Brush, BrushContext};

/// Pairs with the undo shape, which visits the same records newest first:
/// the n-th coordinate processed takes record `len - 1 - n`.
#[derive(Clone, Debug)]
pub struct UndoBrush {
    records: Arc<Vec<UndoBlock>>,
    too_large: bool,
}

impl UndoBrush {
    pub fn new(records: Arc<Vec<UndoBlock>>, too_large: bool) -> Self {
        Self { records, too_large }
    }
}

impl Brush for UndoBrush {
    fn factory_name(&self) -> &'static str {
        "Undo"
    }

    fn description(&self) -> String {
        format!("{} blocks", self.records.len())
    }

    fn begin(&mut self, player: &dyn PlayerContext, _op: &DrawOperation) -> bool {
        if self.too_large {
            player.message("Your last draw command was too large to undo.");
            return false;
        }
        if self.records.is_empty() {
            player.message("There is currently nothing to undo.");
            return false;
        }
        true
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let ordinal = usize::try_from(ctx.ordinal).ok()?;
        let index = self.records.len().checked_sub(ordinal + 1)?;
        self.records.get(index).map(|record| record.block)
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(self.clone())
    }
}

//! Reads blocks out of a clipboard for paste operations.

use std::sync::Arc;

use crate::core::types::IVec3;
use crate::player::PlayerContext;
use crate::voxel::Block;
use crate::draw::copy_state::CopyState;
use crate::draw::operation::DrawOperation;
use super::{Brush, BrushContext};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PasteMode {
    /// Write every clipboard block, air included
    #[default]
    Overwrite,
    /// Leave the world alone where the clipboard holds air
    Merge,
}

#[derive(Clone, Debug)]
pub struct ClipboardBrush {
    copy: Arc<CopyState>,
    mode: PasteMode,
    anchor: IVec3,
}

impl ClipboardBrush {
    pub fn new(copy: Arc<CopyState>, mode: PasteMode) -> Self {
        Self {
            copy,
            mode,
            anchor: IVec3::ZERO,
        }
    }
}

impl Brush for ClipboardBrush {
    fn factory_name(&self) -> &'static str {
        "Clipboard"
    }

    fn description(&self) -> String {
        match self.mode {
            PasteMode::Overwrite => format!("Clipboard(#{})", self.copy.slot + 1),
            PasteMode::Merge => format!("Clipboard(#{}, merge)", self.copy.slot + 1),
        }
    }

    fn begin(&mut self, player: &dyn PlayerContext, op: &DrawOperation) -> bool {
        let Some(&anchor) = op.marks().first() else {
            player.message("Paste needs a mark to anchor the clipboard.");
            return false;
        };
        self.anchor = anchor;
        true
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let block = self.copy.get(self.copy.to_local(self.anchor, ctx.coords))?;
        match (self.mode, block) {
            (PasteMode::Merge, Block::Air) => None,
            _ => Some(block),
        }
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(self.clone())
    }
}

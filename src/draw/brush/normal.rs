//! Single-block brush with an optional alternate block.

use crate::player::PlayerContext;
use crate::voxel::Block;
use crate::draw::enumeration::Fill;
use super::args::parse_block;
use super::{Brush, BrushContext, BrushFactory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalBrush {
    pub block: Block,
    /// Used where a shape asks for its alternate fill (e.g. hollow interiors)
    pub alternate: Option<Block>,
}

impl NormalBrush {
    pub fn new(block: Block) -> Self {
        Self { block, alternate: None }
    }

    pub fn with_alternate(block: Block, alternate: Block) -> Self {
        Self {
            block,
            alternate: Some(alternate),
        }
    }
}

impl Brush for NormalBrush {
    fn factory_name(&self) -> &'static str {
        "Normal"
    }

    fn description(&self) -> String {
        match self.alternate {
            Some(alt) => format!("Normal({},{})", self.block, alt),
            None => format!("Normal({})", self.block),
        }
    }

    fn alternate_blocks(&self) -> usize {
        self.alternate.is_some() as usize
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        match ctx.fill {
            Fill::Primary => Some(self.block),
            Fill::Alternate => self.alternate,
        }
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(*self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NormalBrushFactory;

impl BrushFactory for NormalBrushFactory {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["default", "="]
    }

    fn help(&self) -> &'static str {
        "Normal brush: fills with a single block. Usage: normal <block> [alternate]"
    }

    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>> {
        match args {
            [block] => Some(Box::new(NormalBrush::new(parse_block(player, "Normal", block)?))),
            [block, alternate] => Some(Box::new(NormalBrush::with_alternate(
                parse_block(player, "Normal", block)?,
                parse_block(player, "Normal", alternate)?,
            ))),
            _ => {
                player.message(self.help());
                None
            }
        }
    }
}

//! Two blocks alternating like a 3D checkerboard.

use crate::player::PlayerContext;
use crate::voxel::Block;
use super::args::parse_block;
use super::{Brush, BrushContext, BrushFactory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckeredBrush {
    pub even: Block,
    pub odd: Block,
}

impl Brush for CheckeredBrush {
    fn factory_name(&self) -> &'static str {
        "Checkered"
    }

    fn description(&self) -> String {
        format!("Checkered({},{})", self.even, self.odd)
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let c = ctx.coords;
        if (c.x + c.y + c.z).rem_euclid(2) == 0 {
            Some(self.even)
        } else {
            Some(self.odd)
        }
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(*self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CheckeredBrushFactory;

impl BrushFactory for CheckeredBrushFactory {
    fn name(&self) -> &'static str {
        "Checkered"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["check", "checkerboard"]
    }

    fn help(&self) -> &'static str {
        "Checkered brush: alternates two blocks in a 3D checkerboard. Usage: checkered <block1> <block2>"
    }

    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>> {
        let [even, odd] = args else {
            player.message(self.help());
            return None;
        };
        Some(Box::new(CheckeredBrush {
            even: parse_block(player, "Checkered", even)?,
            odd: parse_block(player, "Checkered", odd)?,
        }))
    }
}

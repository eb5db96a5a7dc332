//! Configuration-free brush cycling through seven colours.
//!
//! The type is its own factory: every `make_brush` yields a fresh instance
//! starting at red.

use crate::player::PlayerContext;
use crate::voxel::Block;
use super::{Brush, BrushContext, BrushFactory};

const COLORS: [Block; 7] = [
    Block::Red,
    Block::Orange,
    Block::Yellow,
    Block::Green,
    Block::Aqua,
    Block::Blue,
    Block::Violet,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainbowBrush {
    next: usize,
}

impl Brush for RainbowBrush {
    fn factory_name(&self) -> &'static str {
        "Rainbow"
    }

    fn description(&self) -> String {
        "Rainbow".to_string()
    }

    fn next_block(&mut self, _ctx: &BrushContext<'_>) -> Option<Block> {
        let block = COLORS[self.next];
        self.next = (self.next + 1) % COLORS.len();
        Some(block)
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(*self)
    }
}

impl BrushFactory for RainbowBrush {
    fn name(&self) -> &'static str {
        "Rainbow"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn help(&self) -> &'static str {
        "Rainbow brush: cycles red, orange, yellow, green, aqua, blue and violet. Takes no arguments."
    }

    fn make_brush(&self, _player: &dyn PlayerContext, _args: &[&str]) -> Option<Box<dyn Brush>> {
        self.make_default()
    }

    fn make_default(&self) -> Option<Box<dyn Brush>> {
        Some(Box::new(RainbowBrush::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::draw::enumeration::Fill;
    use crate::voxel::Map;

    #[test]
    fn test_cycle_and_independent_clones() {
        let map = Map::new(1, 1, 1).unwrap();
        let ctx = BrushContext {
            coords: IVec3::ZERO,
            map: &map,
            marks: &[],
            bounds: None,
            fill: Fill::Primary,
            ordinal: 0,
        };
        let mut brush = RainbowBrush::default().make_default().unwrap();
        let first: Vec<_> = (0..8).map(|_| brush.next_block(&ctx).unwrap()).collect();
        assert_eq!(&first[..7], &COLORS);
        assert_eq!(first[7], Block::Red);

        let mut copy = brush.clone_brush();
        assert_eq!(brush.next_block(&ctx), Some(Block::Orange));
        assert_eq!(copy.next_block(&ctx), Some(Block::Orange));
    }
}

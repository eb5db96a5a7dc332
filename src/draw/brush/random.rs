//! Weighted random blocks from a seeded coordinate hash.
//!
//! The same seed paints the same pattern, so a draw can be reproduced.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::player::PlayerContext;
use crate::voxel::Block;
use super::args::{describe_weighted, parse_option, parse_weighted_blocks, pick_weighted, split_options, total_weight};
use super::{Brush, BrushContext, BrushFactory};

/// Deterministic 3D hash
pub(crate) fn hash_3d(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed;
    h ^= x as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= y as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= z as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h
}

/// Seed for brushes configured without one
pub(crate) fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomBrush {
    blocks: Vec<(Block, u32)>,
    total: u64,
    seed: u32,
}

impl RandomBrush {
    /// `blocks` must not be empty and every weight must be positive
    pub fn new(blocks: Vec<(Block, u32)>, seed: u32) -> Self {
        let total = total_weight(&blocks).max(1);
        Self { blocks, total, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Brush for RandomBrush {
    fn factory_name(&self) -> &'static str {
        "Random"
    }

    fn description(&self) -> String {
        format!("Random({})", describe_weighted(&self.blocks))
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let c = ctx.coords;
        let roll = hash_3d(c.x, c.y, c.z, self.seed) as u64 % self.total;
        Some(pick_weighted(&self.blocks, roll))
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomBrushFactory;

impl BrushFactory for RandomBrushFactory {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rand"]
    }

    fn help(&self) -> &'static str {
        "Random brush: scatters weighted blocks. Usage: random <block[/weight]> [block[/weight]...] [seed=N]"
    }

    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>> {
        let (positional, options) = split_options(args);
        if positional.is_empty() {
            player.message(self.help());
            return None;
        }
        let mut blocks = parse_weighted_blocks(player, "Random", &positional)?;
        if blocks.len() == 1 {
            // One block scatters against air
            blocks.push((Block::Air, 1));
        }
        let mut seed = time_seed();
        for (key, value) in options {
            match key.to_ascii_lowercase().as_str() {
                "seed" => seed = parse_option(player, "Random", key, value)?,
                _ => {
                    player.message(&format!("Random brush: unknown option \"{key}\""));
                    return None;
                }
            }
        }
        Some(Box::new(RandomBrush::new(blocks, seed)))
    }
}

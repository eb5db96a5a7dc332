//! Weighted blocks laid out along fractal Perlin noise, giving soft clumps
//! instead of per-block scatter.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::player::PlayerContext;
use crate::voxel::Block;
use super::args::{describe_weighted, parse_option, parse_weighted_blocks, pick_weighted, split_options, total_weight};
use super::random::time_seed;
use super::{Brush, BrushContext, BrushFactory};

const DEFAULT_FREQUENCY: f64 = 0.08;
const DEFAULT_OCTAVES: usize = 3;

#[derive(Clone, Debug)]
pub struct CloudyBrush {
    blocks: Vec<(Block, u32)>,
    total: u64,
    seed: u32,
    frequency: f64,
    octaves: usize,
    noise: Fbm<Perlin>,
}

impl CloudyBrush {
    pub fn new(blocks: Vec<(Block, u32)>, seed: u32, frequency: f64, octaves: usize) -> Self {
        let total = total_weight(&blocks).max(1);
        let noise = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves.clamp(1, 8))
            .set_frequency(frequency)
            .set_persistence(0.5)
            .set_lacunarity(2.0);
        Self {
            blocks,
            total,
            seed,
            frequency,
            octaves,
            noise,
        }
    }
}

impl Brush for CloudyBrush {
    fn factory_name(&self) -> &'static str {
        "Cloudy"
    }

    fn description(&self) -> String {
        format!("Cloudy({})", describe_weighted(&self.blocks))
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let c = ctx.coords.as_dvec3();
        let value = self.noise.get([c.x, c.y, c.z]);
        let t = ((value + 1.0) * 0.5).clamp(0.0, 1.0 - f64::EPSILON);
        let roll = (t * self.total as f64) as u64;
        Some(pick_weighted(&self.blocks, roll))
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(self.clone())
    }
}

impl PartialEq for CloudyBrush {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
            && self.seed == other.seed
            && self.frequency == other.frequency
            && self.octaves == other.octaves
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CloudyBrushFactory;

impl BrushFactory for CloudyBrushFactory {
    fn name(&self) -> &'static str {
        "Cloudy"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cloud", "clouds"]
    }

    fn help(&self) -> &'static str {
        "Cloudy brush: clumps of weighted blocks. Usage: cloudy <block[/weight]> [block[/weight]...] [seed=N] [frequency=F] [octaves=N]"
    }

    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>> {
        let (positional, options) = split_options(args);
        if positional.is_empty() {
            player.message(self.help());
            return None;
        }
        let mut blocks = parse_weighted_blocks(player, "Cloudy", &positional)?;
        if blocks.len() == 1 {
            blocks.push((Block::Air, 1));
        }
        let mut seed = time_seed();
        let mut frequency = DEFAULT_FREQUENCY;
        let mut octaves = DEFAULT_OCTAVES;
        for (key, value) in options {
            match key.to_ascii_lowercase().as_str() {
                "seed" => seed = parse_option(player, "Cloudy", key, value)?,
                "frequency" | "freq" => frequency = parse_option(player, "Cloudy", key, value)?,
                "octaves" => octaves = parse_option(player, "Cloudy", key, value)?,
                _ => {
                    player.message(&format!("Cloudy brush: unknown option \"{key}\""));
                    return None;
                }
            }
        }
        if frequency.is_nan() || frequency <= 0.0 || octaves == 0 {
            player.message("Cloudy brush: frequency and octaves must be positive");
            return None;
        }
        Some(Box::new(CloudyBrush::new(blocks, seed, frequency, octaves)))
    }
}

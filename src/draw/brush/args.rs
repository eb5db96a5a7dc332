//! Parsing helpers shared by brush factories.
//!
//! Arguments are whitespace-separated tokens: block names or ids, optionally
//! weighted as `block/weight`, and `key=value` options.

use crate::player::PlayerContext;
use crate::voxel::Block;

/// Split tokens into positional arguments and `key=value` options
pub fn split_options<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<(&'a str, &'a str)>) {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    for &arg in args {
        match arg.split_once('=') {
            Some((key, value)) => options.push((key, value)),
            None => positional.push(arg),
        }
    }
    (positional, options)
}

/// Parse one block, messaging the player on failure
pub fn parse_block(player: &dyn PlayerContext, brush: &str, token: &str) -> Option<Block> {
    match token.parse::<Block>() {
        Ok(block) => Some(block),
        Err(e) => {
            player.message(&format!("{brush} brush: {e}"));
            None
        }
    }
}

/// Parse `block` or `block/weight` tokens. Weight defaults to 1 and must be positive.
pub fn parse_weighted_blocks(
    player: &dyn PlayerContext,
    brush: &str,
    tokens: &[&str],
) -> Option<Vec<(Block, u32)>> {
    let mut blocks = Vec::with_capacity(tokens.len());
    for token in tokens {
        let (name, weight) = match token.split_once('/') {
            Some((name, weight)) => match weight.parse::<u32>() {
                Ok(w) if w > 0 => (name, w),
                _ => {
                    player.message(&format!("{brush} brush: invalid weight in \"{token}\""));
                    return None;
                }
            },
            None => (*token, 1),
        };
        blocks.push((parse_block(player, brush, name)?, weight));
    }
    Some(blocks)
}

/// Parse a numeric option value, messaging the player on failure
pub fn parse_option<T: std::str::FromStr>(
    player: &dyn PlayerContext,
    brush: &str,
    key: &str,
    value: &str,
) -> Option<T> {
    match value.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            player.message(&format!("{brush} brush: invalid value \"{value}\" for {key}"));
            None
        }
    }
}

/// Pick from weighted blocks with `roll` in `0..total_weight`
pub fn pick_weighted(blocks: &[(Block, u32)], mut roll: u64) -> Block {
    for &(block, weight) in blocks {
        if roll < weight as u64 {
            return block;
        }
        roll -= weight as u64;
    }
    blocks.last().map(|&(b, _)| b).unwrap_or(Block::Air)
}

/// Sum of weights
pub fn total_weight(blocks: &[(Block, u32)]) -> u64 {
    blocks.iter().map(|&(_, w)| w as u64).sum()
}

/// Describe weighted blocks as `stone/3,dirt`
pub fn describe_weighted(blocks: &[(Block, u32)]) -> String {
    blocks
        .iter()
        .map(|&(b, w)| if w == 1 { b.to_string() } else { format!("{b}/{w}") })
        .collect::<Vec<_>>()
        .join(",")
}

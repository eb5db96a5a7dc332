//! Replace listed blocks, or everything except listed blocks.

use crate::player::PlayerContext;
use crate::voxel::Block;
use crate::draw::operation::DrawOperation;
use super::args::parse_block;
use super::{Brush, BrushContext, BrushFactory};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceBrush {
    pub targets: Vec<Block>,
    pub replacement: Block,
    /// Replace every block except the targets
    pub invert: bool,
}

impl Brush for ReplaceBrush {
    fn factory_name(&self) -> &'static str {
        if self.invert { "ReplaceNot" } else { "Replace" }
    }

    fn description(&self) -> String {
        let targets: Vec<String> = self.targets.iter().map(Block::to_string).collect();
        format!("{}({} -> {})", self.factory_name(), targets.join(","), self.replacement)
    }

    fn begin(&mut self, player: &dyn PlayerContext, _op: &DrawOperation) -> bool {
        if !self.invert && self.targets.contains(&self.replacement) {
            player.message(&format!(
                "Replace brush: cannot replace {} with itself.",
                self.replacement
            ));
            return false;
        }
        true
    }

    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block> {
        let listed = self.targets.contains(&ctx.current_block());
        (listed != self.invert).then_some(self.replacement)
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(self.clone())
    }
}

/// Factory for both `replace` and `replacenot`
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceBrushFactory {
    pub invert: bool,
}

impl ReplaceBrushFactory {
    pub fn replace() -> Self {
        Self { invert: false }
    }

    pub fn replace_not() -> Self {
        Self { invert: true }
    }
}

impl BrushFactory for ReplaceBrushFactory {
    fn name(&self) -> &'static str {
        if self.invert { "ReplaceNot" } else { "Replace" }
    }

    fn aliases(&self) -> &'static [&'static str] {
        if self.invert { &["rn"] } else { &["r"] }
    }

    fn help(&self) -> &'static str {
        if self.invert {
            "ReplaceNot brush: replaces every block except the listed ones. Usage: replacenot <block> [block...] <replacement>"
        } else {
            "Replace brush: replaces the listed blocks. Usage: replace <block> [block...] <replacement>"
        }
    }

    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>> {
        let Some((replacement, targets)) = args.split_last().filter(|(_, t)| !t.is_empty()) else {
            player.message(self.help());
            return None;
        };
        let targets = targets
            .iter()
            .map(|t| parse_block(player, self.name(), t))
            .collect::<Option<Vec<_>>>()?;
        Some(Box::new(ReplaceBrush {
            targets,
            replacement: parse_block(player, self.name(), replacement)?,
            invert: self.invert,
        }))
    }
}

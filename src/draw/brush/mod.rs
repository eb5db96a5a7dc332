//! Brushes decide which block, if any, goes at each coordinate of a draw
//! operation.
//!
//! A [`BrushFactory`] is registered once by name and turns player arguments
//! into configured [`Brush`] instances. Each instance belongs to exactly one
//! draw operation.

pub mod args;
pub mod manager;
pub mod normal;
pub mod checkered;
pub mod random;
pub mod cloudy;
pub mod rainbow;
pub mod replace;
pub mod clipboard;
pub mod undo;

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::player::PlayerContext;
use crate::voxel::{Block, Map};
use super::enumeration::Fill;
use super::operation::DrawOperation;

pub use manager::BrushManager;
pub use normal::{NormalBrush, NormalBrushFactory};
pub use checkered::{CheckeredBrush, CheckeredBrushFactory};
pub use random::{RandomBrush, RandomBrushFactory};
pub use cloudy::{CloudyBrush, CloudyBrushFactory};
pub use rainbow::RainbowBrush;
pub use replace::{ReplaceBrush, ReplaceBrushFactory};
pub use clipboard::{ClipboardBrush, PasteMode};
pub use undo::UndoBrush;

/// What a brush sees of the coordinate being drawn
#[derive(Clone, Copy, Debug)]
pub struct BrushContext<'a> {
    /// Coordinate being drawn
    pub coords: IVec3,
    /// Map as it is before this coordinate is written
    pub map: &'a Map,
    pub marks: &'a [IVec3],
    pub bounds: Option<BoundingBox>,
    pub fill: Fill,
    /// Number of coordinates the operation processed before this one
    pub ordinal: u64,
}

impl BrushContext<'_> {
    /// Block currently at the coordinate being drawn
    pub fn current_block(&self) -> Block {
        self.map.get_block(self.coords).unwrap_or(Block::Air)
    }
}

/// A configured brush bound to one draw operation
pub trait Brush: Send {
    /// Name of the factory that made this brush
    fn factory_name(&self) -> &'static str;

    /// Short description of the configuration, e.g. `Checkered(red,white)`
    fn description(&self) -> String;

    /// Number of alternate blocks this brush can produce for [`Fill::Alternate`]
    fn alternate_blocks(&self) -> usize {
        0
    }

    /// Validate against the operation and acquire resources.
    ///
    /// Returning false aborts the operation's prepare; the brush tells the
    /// player why.
    fn begin(&mut self, _player: &dyn PlayerContext, _op: &DrawOperation) -> bool {
        true
    }

    /// Block for the coordinate in `ctx`, `None` to leave it untouched
    fn next_block(&mut self, ctx: &BrushContext<'_>) -> Option<Block>;

    /// Release resources acquired in `begin`
    fn end(&mut self) {}

    /// Independent copy for use by another operation
    fn clone_brush(&self) -> Box<dyn Brush>;
}

/// Creates brushes of one kind from player arguments
pub trait BrushFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn help(&self) -> &'static str;

    /// Configured brush, or `None` after messaging the player about bad arguments
    fn make_brush(&self, player: &dyn PlayerContext, args: &[&str]) -> Option<Box<dyn Brush>>;

    /// Brush with no configuration, if this kind has a sensible default
    fn make_default(&self) -> Option<Box<dyn Brush>> {
        None
    }
}

impl Clone for Box<dyn Brush> {
    fn clone(&self) -> Self {
        self.clone_brush()
    }
}

impl std::fmt::Debug for dyn Brush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

//! Shapes choose which coordinates a draw operation visits.

pub mod cuboid;
pub mod ellipsoid;
pub mod line;
pub mod clipboard;
pub mod undo;

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::player::{BlockChangeContext, PlayerContext};
use crate::voxel::Map;
use super::enumeration::{DrawPlan, Fill};

pub use cuboid::{Cuboid, CuboidKind};
pub use ellipsoid::Ellipsoid;
pub use line::Line;
pub use clipboard::{Cut, Paste};
pub use undo::Undo;

/// Inputs available to a shape while the operation is prepared
pub struct PrepareContext<'a> {
    pub marks: &'a [IVec3],
    /// Envelope of the marks when there are exactly two
    pub bounds: Option<BoundingBox>,
    pub map: &'a Map,
    pub player: &'a dyn PlayerContext,
    pub world_name: &'a str,
    /// Alternate blocks the operation's brush offers
    pub alternate_blocks: usize,
}

/// Coordinate selection policy of one kind of draw operation
pub trait DrawShape: Send {
    fn name(&self) -> &'static str;

    fn expected_marks(&self) -> usize {
        2
    }

    /// Reason reported to permission checks and observers
    fn context(&self) -> BlockChangeContext {
        BlockChangeContext::Drawn
    }

    /// Plan the coordinates to visit. `None` refuses the operation after
    /// messaging the player.
    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan>;

    /// Whether and how to draw a visited coordinate
    fn fill_at(&self, _coord: IVec3) -> Option<Fill> {
        Some(Fill::Primary)
    }
}

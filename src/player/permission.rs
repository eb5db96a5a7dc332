//! Per-block placement permissions.

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::voxel::{Block, Map};

/// Why a block is being changed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockChangeContext {
    /// Drawn by a shape (cuboid, sphere, line, ...)
    Drawn,
    /// Cleared by a cut
    Cut,
    /// Written from a clipboard
    Pasted,
    /// Restored by undo or redo
    Undone,
}

/// Outcome of a permission check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanPlaceResult {
    Allowed,
    BlockTypeDenied,
    ZoneDenied,
    WorldDenied,
}

impl CanPlaceResult {
    pub fn is_allowed(self) -> bool {
        self == CanPlaceResult::Allowed
    }
}

/// Decides whether a player may place a block
///
/// Called from the world update thread once per changed coordinate.
pub trait PlacementPolicy: Send + Sync {
    fn can_place(
        &self,
        player: &str,
        map: &Map,
        coord: IVec3,
        block: Block,
        context: BlockChangeContext,
    ) -> CanPlaceResult;
}

/// Allows every placement
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PlacementPolicy for AllowAll {
    fn can_place(&self, _: &str, _: &Map, _: IVec3, _: Block, _: BlockChangeContext) -> CanPlaceResult {
        CanPlaceResult::Allowed
    }
}

/// Denies changes inside a box except for listed players
#[derive(Clone, Debug)]
pub struct ProtectedZone {
    pub name: String,
    pub bounds: BoundingBox,
    pub builders: Vec<String>,
}

impl ProtectedZone {
    pub fn new(name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bounds,
            builders: Vec::new(),
        }
    }

    pub fn with_builder(mut self, player: impl Into<String>) -> Self {
        self.builders.push(player.into());
        self
    }
}

impl PlacementPolicy for ProtectedZone {
    fn can_place(&self, player: &str, _: &Map, coord: IVec3, _: Block, _: BlockChangeContext) -> CanPlaceResult {
        if self.bounds.contains(coord) && !self.builders.iter().any(|b| b.eq_ignore_ascii_case(player)) {
            CanPlaceResult::ZoneDenied
        } else {
            CanPlaceResult::Allowed
        }
    }
}

/// Denies placing the listed block types
#[derive(Clone, Debug, Default)]
pub struct DeniedBlocks(pub Vec<Block>);

impl PlacementPolicy for DeniedBlocks {
    fn can_place(&self, _: &str, _: &Map, _: IVec3, block: Block, _: BlockChangeContext) -> CanPlaceResult {
        if self.0.contains(&block) {
            CanPlaceResult::BlockTypeDenied
        } else {
            CanPlaceResult::Allowed
        }
    }
}

//! Clipboard contents captured by cut/copy and consumed by paste.

use std::time::SystemTime;

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::voxel::{Block, Map};

/// Axis for clipboard flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A captured box of blocks
///
/// Blocks are stored in clipboard-local coordinates: local `(0, 0, 0)` is the
/// first mark (the corner the player clicked first) and local axis `i` runs
/// along `orientation[i]` in world space. Pasting at an anchor therefore
/// reproduces the region with the same handedness it was copied with.
#[derive(Clone, Debug)]
pub struct CopyState {
    blocks: Vec<Block>,
    bounds: BoundingBox,
    orientation: IVec3,
    /// Clipboard slot this copy is stored in
    pub slot: usize,
    /// Name of the world the blocks were copied from
    pub origin_world: Option<String>,
    pub copy_time: SystemTime,
}

impl CopyState {
    /// Empty (all air) clipboard spanning two marks
    pub fn from_marks(mark1: IVec3, mark2: IVec3) -> Self {
        let bounds = BoundingBox::from_points(mark1, mark2);
        let orientation = IVec3::new(
            if mark1.x <= mark2.x { 1 } else { -1 },
            if mark1.y <= mark2.y { 1 } else { -1 },
            if mark1.z <= mark2.z { 1 } else { -1 },
        );
        Self {
            blocks: vec![Block::Air; bounds.volume() as usize],
            bounds,
            orientation,
            slot: 0,
            origin_world: None,
            copy_time: SystemTime::now(),
        }
    }

    /// Copy the region between two marks out of a map. Out-of-map blocks read as air.
    pub fn capture(map: &Map, mark1: IVec3, mark2: IVec3) -> Self {
        let mut copy = Self::from_marks(mark1, mark2);
        let dims = copy.dimensions();
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let local = IVec3::new(x, y, z);
                    let block = map.get_block(mark1 + local * copy.orientation).unwrap_or(Block::Air);
                    copy.set(local, block);
                }
            }
        }
        copy
    }

    /// Copy with a replacement buffer, keeping orientation, slot, world and time.
    ///
    /// Bounds stay anchored at the original's minimum corner and take the
    /// replacement buffer's dimensions. `blocks` must hold `dims.x * dims.y * dims.z`
    /// entries in local X-fastest order.
    pub fn with_buffer(original: &CopyState, dims: IVec3, blocks: Vec<Block>) -> Self {
        debug_assert_eq!(blocks.len(), (dims.x * dims.y * dims.z) as usize);
        Self {
            blocks,
            bounds: BoundingBox::new(original.bounds.min, original.bounds.min + dims - IVec3::ONE),
            orientation: original.orientation,
            slot: original.slot,
            origin_world: original.origin_world.clone(),
            copy_time: original.copy_time,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Size along each local axis
    pub fn dimensions(&self) -> IVec3 {
        self.bounds.dimensions()
    }

    /// Direction of each local axis in world space, components are +1 or -1
    pub fn orientation(&self) -> IVec3 {
        self.orientation
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    fn local_index(&self, local: IVec3) -> Option<usize> {
        let dims = self.dimensions();
        let inside = local.x >= 0 && local.x < dims.x &&
            local.y >= 0 && local.y < dims.y &&
            local.z >= 0 && local.z < dims.z;
        inside.then(|| ((local.z * dims.y + local.y) * dims.x + local.x) as usize)
    }

    /// Block at a clipboard-local coordinate
    pub fn get(&self, local: IVec3) -> Option<Block> {
        self.local_index(local).map(|i| self.blocks[i])
    }

    /// Overwrite the block at a clipboard-local coordinate. Returns false when outside.
    pub fn set(&mut self, local: IVec3, block: Block) -> bool {
        match self.local_index(local) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    /// World coordinate a local coordinate lands on when pasted at `anchor`
    pub fn to_world(&self, anchor: IVec3, local: IVec3) -> IVec3 {
        anchor + local * self.orientation
    }

    /// Local coordinate of a world coordinate when pasted at `anchor`
    pub fn to_local(&self, anchor: IVec3, world: IVec3) -> IVec3 {
        // orientation components are ±1, so multiplying inverts them
        (world - anchor) * self.orientation
    }

    /// Box covered when pasted at `anchor`
    pub fn paste_bounds(&self, anchor: IVec3) -> BoundingBox {
        let far = self.to_world(anchor, self.dimensions() - IVec3::ONE);
        BoundingBox::from_points(anchor, far)
    }

    /// Which corner of the copied box was clicked first, e.g. "bottom-north-west"
    pub fn origin_corner(&self) -> String {
        format!(
            "{}-{}-{}",
            if self.orientation.z > 0 { "bottom" } else { "top" },
            if self.orientation.y > 0 { "north" } else { "south" },
            if self.orientation.x > 0 { "west" } else { "east" },
        )
    }

    /// Rotate around the vertical axis by `quarter_turns` x 90° counterclockwise
    pub fn rotated_z(&self, quarter_turns: i32) -> CopyState {
        let turns = quarter_turns.rem_euclid(4);
        let mut current = self.clone();
        for _ in 0..turns {
            let dims = current.dimensions();
            let new_dims = IVec3::new(dims.y, dims.x, dims.z);
            let mut blocks = vec![Block::Air; current.volume()];
            for z in 0..dims.z {
                for y in 0..dims.y {
                    for x in 0..dims.x {
                        let target = IVec3::new(dims.y - 1 - y, x, z);
                        let index = ((target.z * new_dims.y + target.y) * new_dims.x + target.x) as usize;
                        blocks[index] = current.blocks[((z * dims.y + y) * dims.x + x) as usize];
                    }
                }
            }
            current = CopyState::with_buffer(&current, new_dims, blocks);
        }
        current
    }

    /// Mirror along one local axis
    pub fn flipped(&self, axis: Axis) -> CopyState {
        let dims = self.dimensions();
        let a = axis.index();
        let mut blocks = vec![Block::Air; self.volume()];
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let source = IVec3::new(x, y, z);
                    let mut target = source;
                    target[a] = dims[a] - 1 - source[a];
                    let index = ((target.z * dims.y + target.y) * dims.x + target.x) as usize;
                    blocks[index] = self.blocks[((z * dims.y + y) * dims.x + x) as usize];
                }
            }
        }
        CopyState::with_buffer(self, dims, blocks)
    }
}

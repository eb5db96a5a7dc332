//! Dense block storage for one world

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::math::BoundingBox;
use super::block::Block;

/// Largest map side length; undo records store coordinates as i16.
pub const MAX_MAP_SIDE: i32 = i16::MAX as i32;

/// Dense 3D grid of blocks
///
/// X and Y are horizontal (width, length), Z is height. Blocks are laid out
/// X-fastest, then Y, then Z.
#[derive(Clone, Debug)]
pub struct Map {
    width: i32,
    length: i32,
    height: i32,
    blocks: Vec<Block>,
}

impl Map {
    /// Create a map filled with air
    pub fn new(width: i32, length: i32, height: i32) -> Result<Self> {
        Self::filled(width, length, height, Block::Air)
    }

    /// Create a map filled with one block type
    pub fn filled(width: i32, length: i32, height: i32, block: Block) -> Result<Self> {
        let valid = |side: i32| side > 0 && side <= MAX_MAP_SIDE;
        if !valid(width) || !valid(length) || !valid(height) {
            return Err(Error::InvalidMapSize(width, length, height));
        }
        let volume = width as usize * length as usize * height as usize;
        Ok(Self {
            width,
            length,
            height,
            blocks: vec![block; volume],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Box covering every valid coordinate
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(IVec3::ZERO, IVec3::new(self.width - 1, self.length - 1, self.height - 1))
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Check if a coordinate lies inside the map
    pub fn in_bounds(&self, coord: IVec3) -> bool {
        coord.x >= 0 && coord.x < self.width &&
        coord.y >= 0 && coord.y < self.length &&
        coord.z >= 0 && coord.z < self.height
    }

    /// Storage index of an in-bounds coordinate
    pub fn index(&self, coord: IVec3) -> usize {
        debug_assert!(self.in_bounds(coord), "coordinate {coord} out of map bounds");
        ((coord.z as usize * self.length as usize) + coord.y as usize) * self.width as usize
            + coord.x as usize
    }

    /// Raw block read by storage index
    pub fn block_at(&self, index: usize) -> Block {
        self.blocks[index]
    }

    /// Raw block write by storage index
    pub fn set_block_at(&mut self, index: usize, block: Block) {
        self.blocks[index] = block;
    }

    /// Block at a coordinate, `None` when out of bounds
    pub fn get_block(&self, coord: IVec3) -> Option<Block> {
        self.in_bounds(coord).then(|| self.blocks[self.index(coord)])
    }

    /// Set the block at a coordinate. Returns false when out of bounds.
    pub fn set_block(&mut self, coord: IVec3, block: Block) -> bool {
        if !self.in_bounds(coord) {
            return false;
        }
        let index = self.index(coord);
        self.blocks[index] = block;
        true
    }

    /// Number of blocks of the given type
    pub fn count(&self, block: Block) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }
}

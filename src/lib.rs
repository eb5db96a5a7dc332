//! Voxdraw - batched, undoable draw operations for a multiplayer voxel world server

pub mod core;
pub mod math;
pub mod voxel;
pub mod player;
pub mod draw;

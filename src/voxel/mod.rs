//! Block storage: block types, maps and worlds

pub mod block;
pub mod map;
pub mod world;

pub use block::{Block, UnknownBlock};
pub use map::Map;
pub use world::{BlockBroadcast, World};

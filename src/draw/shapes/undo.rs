//! Undo and redo: replay a journal's original blocks, newest first.

use std::sync::Arc;

use crate::draw::brush::UndoBrush;
use crate::draw::enumeration::DrawPlan;
use crate::draw::operation::DrawOperation;
use crate::draw::undo::{UndoBlock, UndoState};
use crate::math::BoundingBox;
use crate::player::{BlockChangeContext, PlayerContext};
use crate::voxel::World;
use super::{DrawShape, PrepareContext};

/// Visits the coordinates of a journal snapshot in reverse order
///
/// The undo records its own journal, so undoing an undo is a redo.
#[derive(Clone, Debug)]
pub struct Undo {
    records: Arc<Vec<UndoBlock>>,
    redo: bool,
}

impl Undo {
    pub fn new(records: Arc<Vec<UndoBlock>>, redo: bool) -> Self {
        Self { records, redo }
    }
}

impl DrawShape for Undo {
    fn name(&self) -> &'static str {
        if self.redo { "Redo" } else { "Undo" }
    }

    fn expected_marks(&self) -> usize {
        0
    }

    fn context(&self) -> BlockChangeContext {
        BlockChangeContext::Undone
    }

    fn plan(&mut self, _ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        let mut bounds = BoundingBox::EMPTY;
        for record in self.records.iter() {
            bounds.expand(record.coord());
        }
        let records = Arc::clone(&self.records);
        let coords = (0..records.len()).rev().map(move |i| records[i].coord());
        Some(DrawPlan::sequence(coords, self.records.len() as u64).with_bounds(bounds))
    }
}

impl DrawOperation {
    /// Restore the blocks recorded in `source` as of now
    pub fn undo(player: Arc<dyn PlayerContext>, world: Arc<World>, source: &UndoState) -> Self {
        let records = Arc::new(source.snapshot());
        let redo = source.operation().is_some_and(|op| op.name() == "Undo");
        let brush = UndoBrush::new(Arc::clone(&records), source.is_too_large_to_undo());
        DrawOperation::new(Undo::new(records, redo), player, world).with_brush(Box::new(brush))
    }

    /// Undo the player's last draw operation. `None` (after messaging the
    /// player) if there is none.
    pub fn undo_last(player: Arc<dyn PlayerContext>, world: Arc<World>) -> Option<Self> {
        let Some(last) = player.last_draw_op() else {
            player.message("There is currently nothing to undo.");
            return None;
        };
        if !last.handle.is_done() {
            last.handle.cancel();
            player.message(&format!("Cancelled {} before undoing it.", last.handle.description()));
        }
        Some(DrawOperation::undo(player, world, &last.undo_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DrawConfig;
    use crate::core::types::IVec3;
    use crate::draw::brush::NormalBrush;
    use crate::draw::shapes::Cuboid;
    use crate::player::Player;
    use crate::voxel::{Block, Map};

    fn setup(max_undo_blocks: usize) -> (Arc<World>, Arc<Player>) {
        let config = DrawConfig {
            log_completion: false,
            announce_completion: false,
            max_undo_blocks,
            ..DrawConfig::default()
        };
        let mut map = Map::new(8, 8, 8).unwrap();
        map.set_block(IVec3::new(1, 0, 0), Block::Dirt);
        let world = Arc::new(World::new("undo", map).with_config(config.clone()));
        (world, Arc::new(Player::new("erin", &config)))
    }

    fn run(op: &mut DrawOperation, marks: &[IVec3], world: &World) -> bool {
        if !op.prepare(marks).unwrap() {
            return false;
        }
        assert!(op.start().unwrap());
        while !op.is_done() {
            op.draw_batch(&mut world.map_mut(), usize::MAX);
        }
        op.end();
        true
    }

    fn snapshot(world: &World) -> Vec<Block> {
        let map = world.map();
        (0..map.volume()).map(|i| map.block_at(i)).collect()
    }

    #[test]
    fn test_undo_restores_and_redo_reapplies() {
        let (world, player) = setup(1000);
        let before = snapshot(&world);

        let mut draw = DrawOperation::new(Cuboid::solid(), player.clone(), world.clone())
            .with_brush(Box::new(NormalBrush::new(Block::Stone)));
        run(&mut draw, &[IVec3::ZERO, IVec3::new(3, 3, 0)], &world);
        let after = snapshot(&world);
        assert_ne!(before, after);

        let mut undo = DrawOperation::undo_last(player.clone(), world.clone()).unwrap();
        assert_eq!(undo.name(), "Undo");
        assert!(run(&mut undo, &[], &world));
        assert_eq!(undo.blocks_updated(), 16);
        assert_eq!(undo.context(), BlockChangeContext::Undone);
        assert_eq!(snapshot(&world), before);
        assert_eq!(world.map().get_block(IVec3::new(1, 0, 0)), Some(Block::Dirt));

        let mut redo = DrawOperation::undo_last(player.clone(), world.clone()).unwrap();
        assert_eq!(redo.name(), "Redo");
        assert!(run(&mut redo, &[], &world));
        assert_eq!(snapshot(&world), after);
    }

    #[test]
    fn test_undo_reverse_order_restores_oldest_value() {
        let (world, player) = setup(1000);
        let state = UndoState::new(10);
        // The same coordinate journaled twice: the first record holds the original
        state.add(IVec3::new(2, 2, 2), Block::Sand);
        state.add(IVec3::new(2, 2, 2), Block::Glass);

        let mut undo = DrawOperation::undo(player.clone(), world.clone(), &state);
        assert!(run(&mut undo, &[], &world));
        assert_eq!(world.map().get_block(IVec3::new(2, 2, 2)), Some(Block::Sand));
        assert_eq!(undo.bounds(), Some(BoundingBox::new(IVec3::splat(2), IVec3::splat(2))));
    }

    #[test]
    fn test_nothing_to_undo() {
        let (world, player) = setup(1000);
        assert!(DrawOperation::undo_last(player.clone(), world.clone()).is_none());

        let mut undo = DrawOperation::undo(player.clone(), world.clone(), &UndoState::new(10));
        assert!(!run(&mut undo, &[], &world));
        assert!(player.take_messages().iter().any(|m| m.text.contains("nothing to undo")));
    }

    #[test]
    fn test_too_large_to_undo() {
        let (world, player) = setup(3);
        let mut draw = DrawOperation::new(Cuboid::solid(), player.clone(), world.clone())
            .with_brush(Box::new(NormalBrush::new(Block::Stone)));
        run(&mut draw, &[IVec3::ZERO, IVec3::new(1, 1, 1)], &world);
        player.take_messages();

        let mut undo = DrawOperation::undo_last(player.clone(), world.clone()).unwrap();
        assert!(!run(&mut undo, &[], &world));
        assert!(player.take_messages().iter().any(|m| m.text.contains("too large")));
    }
}

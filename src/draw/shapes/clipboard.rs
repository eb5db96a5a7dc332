//! Cut and paste through the player's clipboard slots.

use std::sync::Arc;

use crate::draw::brush::{ClipboardBrush, NormalBrush, PasteMode};
use crate::draw::copy_state::CopyState;
use crate::draw::enumeration::DrawPlan;
use crate::draw::operation::DrawOperation;
use crate::player::{BlockChangeContext, PlayerContext};
use crate::voxel::{Block, World};
use super::{DrawShape, PrepareContext};

/// Copy a box into a clipboard slot, then clear it with the brush
#[derive(Clone, Copy, Debug, Default)]
pub struct Cut {
    slot: usize,
}

impl Cut {
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }
}

impl DrawShape for Cut {
    fn name(&self) -> &'static str {
        "Cut"
    }

    fn context(&self) -> BlockChangeContext {
        BlockChangeContext::Cut
    }

    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        let bounds = ctx.bounds?;
        let slots = ctx.player.clipboard_slots();
        if self.slot >= slots {
            ctx.player.message(&format!(
                "There is no clipboard slot #{}, pick one from 1 to {}.",
                self.slot + 1,
                slots
            ));
            return None;
        }
        if bounds.volume() > ctx.map.volume() as u64 {
            ctx.player.message(&format!(
                "Cannot cut {} blocks, that is more than the whole map holds.",
                bounds.volume()
            ));
            return None;
        }
        let mut copy = CopyState::capture(ctx.map, ctx.marks[0], ctx.marks[1]);
        copy.slot = self.slot;
        copy.origin_world = Some(ctx.world_name.to_string());
        let message = format!(
            "{} blocks cut into slot #{}, origin at {} corner. You can now paste.",
            copy.volume(),
            self.slot + 1,
            copy.origin_corner()
        );
        if !ctx.player.set_clipboard(copy) {
            return None;
        }
        ctx.player.message(&message);
        Some(DrawPlan::box_scan(bounds.volume()))
    }
}

/// Write a clipboard at the single mark
#[derive(Clone, Debug)]
pub struct Paste {
    copy: Arc<CopyState>,
}

impl Paste {
    pub fn new(copy: Arc<CopyState>) -> Self {
        Self { copy }
    }
}

impl DrawShape for Paste {
    fn name(&self) -> &'static str {
        "Paste"
    }

    fn expected_marks(&self) -> usize {
        1
    }

    fn context(&self) -> BlockChangeContext {
        BlockChangeContext::Pasted
    }

    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        let bounds = self.copy.paste_bounds(ctx.marks[0]);
        Some(DrawPlan::box_scan(bounds.volume()).with_bounds(bounds))
    }
}

impl DrawOperation {
    /// Cut into `slot`, leaving air behind
    pub fn cut(player: Arc<dyn PlayerContext>, world: Arc<World>, slot: usize) -> Self {
        DrawOperation::new(Cut::new(slot), player, world).with_brush(Box::new(NormalBrush::new(Block::Air)))
    }

    /// Paste the clipboard in `slot`. `None` (after messaging the player) if the slot is empty.
    pub fn paste(player: Arc<dyn PlayerContext>, world: Arc<World>, slot: usize, mode: PasteMode) -> Option<Self> {
        let Some(copy) = player.clipboard(slot) else {
            player.message(&format!("Nothing to paste, clipboard slot #{} is empty.", slot + 1));
            return None;
        };
        let copy = Arc::new(copy);
        let brush = ClipboardBrush::new(Arc::clone(&copy), mode);
        Some(DrawOperation::new(Paste::new(copy), player, world).with_brush(Box::new(brush)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DrawConfig;
    use crate::core::types::IVec3;
    use crate::player::Player;
    use crate::voxel::Map;

    fn setup() -> (Arc<World>, Arc<Player>) {
        let config = DrawConfig {
            log_completion: false,
            announce_completion: false,
            ..DrawConfig::default()
        };
        let world = Arc::new(World::new("build", Map::new(16, 16, 16).unwrap()).with_config(config.clone()));
        (world, Arc::new(Player::new("dave", &config)))
    }

    fn run(mut op: DrawOperation, marks: &[IVec3], world: &World) -> DrawOperation {
        assert!(op.prepare(marks).unwrap());
        assert!(op.start().unwrap());
        while !op.is_done() {
            op.draw_batch(&mut world.map_mut(), usize::MAX);
        }
        op.end();
        op
    }

    #[test]
    fn test_cut_stores_clipboard_and_clears() {
        let (world, player) = setup();
        world.map_mut().set_block(IVec3::new(1, 1, 1), Block::Gold);
        world.map_mut().set_block(IVec3::new(2, 1, 1), Block::Iron);

        let op = run(
            DrawOperation::cut(player.clone(), world.clone(), 0),
            &[IVec3::new(1, 1, 1), IVec3::new(2, 1, 1)],
            &world,
        );
        assert_eq!(op.context(), BlockChangeContext::Cut);
        assert_eq!(op.blocks_updated(), 2);
        assert_eq!(world.map().count(Block::Gold), 0);

        let copy = player.clipboard(0).unwrap();
        assert_eq!(copy.get(IVec3::ZERO), Some(Block::Gold));
        assert_eq!(copy.get(IVec3::new(1, 0, 0)), Some(Block::Iron));
        assert_eq!(copy.origin_world.as_deref(), Some("build"));
    }

    #[test]
    fn test_paste_follows_orientation() {
        let (world, player) = setup();
        world.map_mut().set_block(IVec3::new(5, 5, 5), Block::Gold);
        world.map_mut().set_block(IVec3::new(4, 5, 5), Block::Iron);

        // First mark on the +x side: local x runs towards -x
        run(
            DrawOperation::cut(player.clone(), world.clone(), 1),
            &[IVec3::new(5, 5, 5), IVec3::new(4, 5, 5)],
            &world,
        );
        let op = DrawOperation::paste(player.clone(), world.clone(), 1, PasteMode::Overwrite).unwrap();
        let op = run(op, &[IVec3::new(10, 2, 2)], &world);
        assert_eq!(op.context(), BlockChangeContext::Pasted);
        assert_eq!(world.map().get_block(IVec3::new(10, 2, 2)), Some(Block::Gold));
        assert_eq!(world.map().get_block(IVec3::new(9, 2, 2)), Some(Block::Iron));
    }

    #[test]
    fn test_paste_merge_keeps_existing() {
        let (world, player) = setup();
        world.map_mut().set_block(IVec3::new(0, 0, 0), Block::Gold);
        run(
            DrawOperation::cut(player.clone(), world.clone(), 0),
            &[IVec3::new(0, 0, 0), IVec3::new(1, 0, 0)],
            &world,
        );
        world.map_mut().set_block(IVec3::new(6, 0, 0), Block::Glass);
        world.map_mut().set_block(IVec3::new(7, 0, 0), Block::Glass);

        let op = DrawOperation::paste(player.clone(), world.clone(), 0, PasteMode::Merge).unwrap();
        run(op, &[IVec3::new(6, 0, 0)], &world);
        assert_eq!(world.map().get_block(IVec3::new(6, 0, 0)), Some(Block::Gold));
        assert_eq!(world.map().get_block(IVec3::new(7, 0, 0)), Some(Block::Glass));
    }

    #[test]
    fn test_cut_into_missing_slot_refused() {
        let (world, player) = setup();
        world.map_mut().set_block(IVec3::ZERO, Block::Gold);
        run(
            DrawOperation::cut(player.clone(), world.clone(), 4),
            &[IVec3::ZERO, IVec3::ZERO],
            &world,
        );
        player.take_messages();

        let mut op = DrawOperation::cut(player.clone(), world.clone(), 7);
        assert!(!op.prepare(&[IVec3::new(2, 2, 2), IVec3::new(3, 3, 3)]).unwrap());
        let messages = player.take_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("no clipboard slot #8"));
        assert!(player.clipboard(7).is_none());
        assert_eq!(player.clipboard(4).map(|c| c.volume()), Some(1));
        assert!(DrawOperation::paste(player.clone(), world, 7, PasteMode::Overwrite).is_none());
    }

    #[test]
    fn test_cut_larger_than_map_refused() {
        let (world, player) = setup();
        let mut op = DrawOperation::cut(player.clone(), world, 0);
        assert!(!op.prepare(&[IVec3::new(-100, -100, -100), IVec3::new(100, 100, 100)]).unwrap());
        assert!(player.clipboard(0).is_none());
        assert!(player.take_messages()[0].text.contains("more than the whole map"));
    }

    #[test]
    fn test_paste_empty_slot() {
        let (world, player) = setup();
        assert!(DrawOperation::paste(player.clone(), world, 3, PasteMode::Overwrite).is_none());
        assert!(player.take_messages()[0].text.contains("empty"));
    }
}

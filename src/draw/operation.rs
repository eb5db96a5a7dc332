//! Draw operations: a shape, a brush and the batch state machine that applies
//! them to a world over many scheduler ticks.
//!
//! Lifecycle: [`DrawOperation::prepare`] validates marks and plans the
//! coordinates, [`DrawOperation::begin`] allocates the undo journal and queues
//! the op on its world, [`DrawOperation::draw_batch`] advances it a bounded
//! amount per tick and [`DrawOperation::end`] reports the result exactly once.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::math::BoundingBox;
use crate::player::{BlockChangeContext, PlayerContext};
use crate::voxel::{Map, World};
use super::brush::{Brush, BrushContext};
use super::enumeration::{box_exhausted, next_in_box, CoordSource, Fill};
use super::events::{BlockPlacedEvent, DrawEvents};
use super::shapes::{DrawShape, PrepareContext};
use super::summary::DrawSummary;
use super::undo::UndoState;

static NEXT_OP_ID: AtomicU64 = AtomicU64::new(1);

/// Progress shared with other threads without locking the operation
#[derive(Debug, Default)]
pub struct OpStatus {
    cancelled: AtomicBool,
    done: AtomicBool,
    percent: AtomicU8,
    updated: AtomicU64,
}

/// Cheap, thread-safe reference to a draw operation
#[derive(Clone, Debug)]
pub struct DrawOpHandle {
    id: u64,
    name: &'static str,
    description: String,
    status: Arc<OpStatus>,
}

impl DrawOpHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Shape name, e.g. `Cuboid`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Request cancellation. Observed at the next coordinate of the next batch.
    pub fn cancel(&self) {
        self.status.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.cancelled.load(Ordering::Relaxed)
    }

    pub fn is_done(&self) -> bool {
        self.status.done.load(Ordering::Acquire)
    }

    /// Percent done as of the last finished batch
    pub fn percent_done(&self) -> u8 {
        self.status.percent.load(Ordering::Relaxed)
    }

    /// Blocks updated as of the last finished batch
    pub fn blocks_updated(&self) -> u64 {
        self.status.updated.load(Ordering::Relaxed)
    }
}

/// A shape drawn with a brush into a world
pub struct DrawOperation {
    id: u64,
    shape: Box<dyn DrawShape>,
    brush: Option<Box<dyn Brush>>,
    /// Description while the brush is lent out to its own `begin`
    lent_description: Option<String>,
    player: Arc<dyn PlayerContext>,
    world: Arc<World>,
    events: Arc<DrawEvents>,
    context: BlockChangeContext,

    marks: Vec<IVec3>,
    bounds: Option<BoundingBox>,
    /// Box-scan cursor, or the last coordinate taken from a sequence
    coords: IVec3,
    source: Option<CoordSource>,

    blocks_processed: u64,
    blocks_updated: u64,
    blocks_denied: u64,
    blocks_skipped: u64,
    blocks_total_estimate: u64,

    undo_state: Option<Arc<UndoState>>,
    undo_overflowed: bool,
    start_time: Option<Instant>,
    elapsed: Duration,

    prepared: bool,
    has_begun: bool,
    is_done: bool,
    /// A batch stopped because of a cancel request, not because it finished
    stopped_by_cancel: bool,
    ended: bool,
    status: Arc<OpStatus>,

    /// Message the player a summary in `end`
    pub announce_completion: bool,
    /// Log a summary line in `end`
    pub log_completion: bool,
    /// Coordinates visited per batch at most, regardless of the caller's budget
    pub max_blocks_per_batch: usize,
}

impl DrawOperation {
    pub fn new(shape: impl DrawShape + 'static, player: Arc<dyn PlayerContext>, world: Arc<World>) -> Self {
        Self::from_boxed(Box::new(shape), player, world)
    }

    /// Operation for a shape chosen at runtime
    pub fn from_boxed(shape: Box<dyn DrawShape>, player: Arc<dyn PlayerContext>, world: Arc<World>) -> Self {
        let config = world.config();
        Self {
            id: NEXT_OP_ID.fetch_add(1, Ordering::Relaxed),
            context: shape.context(),
            shape,
            brush: None,
            lent_description: None,
            player,
            events: world.events(),
            announce_completion: config.announce_completion,
            log_completion: config.log_completion,
            max_blocks_per_batch: config.max_blocks_per_batch.max(1),
            world,
            marks: Vec::new(),
            bounds: None,
            coords: IVec3::ZERO,
            source: None,
            blocks_processed: 0,
            blocks_updated: 0,
            blocks_denied: 0,
            blocks_skipped: 0,
            blocks_total_estimate: 0,
            undo_state: None,
            undo_overflowed: false,
            start_time: None,
            elapsed: Duration::ZERO,
            prepared: false,
            has_begun: false,
            is_done: false,
            stopped_by_cancel: false,
            ended: false,
            status: Arc::new(OpStatus::default()),
        }
    }

    pub fn with_brush(mut self, brush: Box<dyn Brush>) -> Self {
        self.brush = Some(brush);
        self
    }

    /// Assign the brush. Has no effect once prepared.
    pub fn set_brush(&mut self, brush: Box<dyn Brush>) {
        if !self.prepared {
            self.brush = Some(brush);
        }
    }

    /// Validate marks, plan coordinates and let the brush inspect the operation.
    ///
    /// Returns `Ok(false)` when the shape or brush refuses; they tell the
    /// player why.
    pub fn prepare(&mut self, marks: &[IVec3]) -> Result<bool> {
        let expected = self.shape.expected_marks();
        if marks.len() != expected {
            return Err(Error::WrongMarkCount {
                operation: self.shape.name(),
                expected,
                actual: marks.len(),
            });
        }
        let Some(mut brush) = self.brush.take() else {
            return Err(Error::MissingBrush(self.shape.name()));
        };

        self.marks = marks.to_vec();
        self.bounds = (marks.len() == 2).then(|| BoundingBox::from_points(marks[0], marks[1]));
        let marks_drawable = marks
            .iter()
            .all(|&mark| BoundingBox::new(mark, mark).is_drawable())
            && self.bounds.is_none_or(|b| b.is_drawable());
        if !marks_drawable {
            self.refuse_too_large();
            self.brush = Some(brush);
            return Ok(false);
        }

        let plan = {
            let map = self.world.map();
            let ctx = PrepareContext {
                marks: &self.marks,
                bounds: self.bounds,
                map: &map,
                player: self.player.as_ref(),
                world_name: self.world.name(),
                alternate_blocks: brush.alternate_blocks(),
            };
            self.shape.plan(&ctx)
        };
        let Some(plan) = plan else {
            self.brush = Some(brush);
            return Ok(false);
        };

        if let Some(bounds) = plan.bounds {
            if !bounds.is_empty() && !bounds.is_drawable() {
                self.refuse_too_large();
                self.brush = Some(brush);
                return Ok(false);
            }
            self.bounds = Some(bounds);
        }
        self.coords = self.bounds.map_or(IVec3::ZERO, |b| b.min);
        self.blocks_total_estimate = plan.estimate;
        self.source = Some(plan.source);

        self.lent_description = Some(format!("{}({})", self.shape.name(), brush.description()));
        let accepted = brush.begin(self.player.as_ref(), self);
        self.brush = Some(brush);
        self.lent_description = None;
        if !accepted {
            self.source = None;
            return Ok(false);
        }
        self.prepared = true;
        Ok(true)
    }

    fn refuse_too_large(&self) {
        self.player.message(&format!(
            "{}: the marked area is too large to draw.",
            self.shape.name()
        ));
        log::warn!(
            "{} by {} in world {} refused, marks {:?} out of drawable range",
            self.shape.name(),
            self.player.name(),
            self.world.name(),
            self.marks
        );
    }

    /// Begin without queueing: raise the beginning event, allocate the undo
    /// journal and raise the began event.
    ///
    /// Returns `Ok(false)` if an observer vetoed. For callers that drive
    /// [`draw_batch`](Self::draw_batch) themselves.
    pub fn start(&mut self) -> Result<bool> {
        if !self.prepared {
            return Err(Error::NotPrepared(self.shape.name()));
        }
        if self.has_begun {
            return Ok(true);
        }
        if !self.events.raise_beginning(self) {
            log::warn!(
                "{} by {} in world {} was cancelled by an observer",
                self.description(),
                self.player.name(),
                self.world.name()
            );
            return Ok(false);
        }
        let handle = self.handle();
        self.undo_state = Some(self.player.draw_begin(&handle));
        self.start_time = Some(Instant::now());
        self.has_begun = true;
        self.events.raise_began(self);
        Ok(true)
    }

    /// Start the operation and queue it on its world.
    ///
    /// Returns the handle of the queued op, or `None` if an observer vetoed.
    pub fn begin(mut self) -> Result<Option<DrawOpHandle>> {
        if !self.start()? {
            return Ok(None);
        }
        let handle = self.handle();
        let world = Arc::clone(&self.world);
        world.queue_draw_op(self);
        Ok(Some(handle))
    }

    /// Draw until `max_blocks_to_draw` blocks were updated, the per-batch
    /// ceiling of visited coordinates is reached or the coordinates run out.
    ///
    /// Returns the number of blocks updated by this call.
    pub fn draw_batch(&mut self, map: &mut Map, max_blocks_to_draw: usize) -> usize {
        if !self.has_begun || self.is_done {
            return 0;
        }
        let Some(mut source) = self.source.take() else {
            self.is_done = true;
            self.publish_status();
            return 0;
        };

        let mut updated = 0;
        let mut visited = 0;
        loop {
            if self.is_cancelled() {
                self.is_done = true;
                self.stopped_by_cancel = true;
                break;
            }
            if updated >= max_blocks_to_draw || visited >= self.max_blocks_per_batch {
                break;
            }
            let next = match &mut source {
                CoordSource::BoxScan => match self.bounds {
                    Some(bounds) => next_in_box(&bounds, &mut self.coords),
                    None => None,
                },
                CoordSource::Sequence(iter) => iter.next().inspect(|&coord| self.coords = coord),
            };
            let Some(coord) = next else {
                self.is_done = true;
                break;
            };
            visited += 1;
            let Some(fill) = self.shape.fill_at(coord) else {
                continue;
            };
            if self.draw_one_block(map, coord, fill) {
                updated += 1;
            }
        }

        if !self.is_done {
            self.is_done = match &mut source {
                CoordSource::BoxScan => self.bounds.is_none_or(|b| box_exhausted(&b, self.coords)),
                CoordSource::Sequence(iter) => iter.peek().is_none(),
            };
        }
        self.source = Some(source);
        self.publish_status();
        log::debug!(
            "{} #{}: batch updated {} of {} visited ({}%)",
            self.shape.name(),
            self.id,
            updated,
            visited,
            self.percent_done()
        );
        updated
    }

    /// Apply the brush at one coordinate. Returns true if the block changed.
    fn draw_one_block(&mut self, map: &mut Map, coord: IVec3, fill: Fill) -> bool {
        self.blocks_processed += 1;
        if !map.in_bounds(coord) {
            self.blocks_skipped += 1;
            return false;
        }
        let index = map.index(coord);
        let old_block = map.block_at(index);

        let Some(brush) = self.brush.as_mut() else {
            return false;
        };
        let ctx = BrushContext {
            coords: coord,
            map,
            marks: &self.marks,
            bounds: self.bounds,
            fill,
            ordinal: self.blocks_processed - 1,
        };
        let Some(new_block) = brush.next_block(&ctx) else {
            return false;
        };
        if new_block == old_block {
            self.blocks_skipped += 1;
            return false;
        }
        if !self.player.can_place(map, coord, new_block, self.context).is_allowed() {
            self.blocks_denied += 1;
            return false;
        }

        map.set_block_at(index, new_block);
        if !self.world.is_flushing() {
            self.world.broadcast_block_change(coord, new_block);
        }
        self.events.raise_block_placed(&BlockPlacedEvent {
            player: self.player.name(),
            world: self.world.name(),
            coord,
            old_block,
            new_block,
            context: self.context,
        });
        if !self.undo_overflowed {
            if let Some(undo) = &self.undo_state {
                if !undo.add(coord, old_block) {
                    self.undo_overflowed = true;
                    self.player.message_now("NOTE: This draw command is too massive to undo.");
                    log::warn!(
                        "{} by {} exceeded the undo limit of {} blocks",
                        self.description(),
                        self.player.name(),
                        undo.max_blocks()
                    );
                }
            }
        }
        self.blocks_updated += 1;
        true
    }

    /// Request cancellation. Lock-free; takes effect at the next coordinate.
    pub fn cancel(&self) {
        self.status.cancelled.store(true, Ordering::Relaxed);
    }

    /// Report the result. Only the first call after the op is done has an effect.
    pub fn end(&mut self) -> Option<DrawSummary> {
        if !self.is_done || self.ended {
            return None;
        }
        self.ended = true;
        if let Some(start) = self.start_time {
            self.elapsed = start.elapsed();
        }

        let summary = self.summary();
        if self.announce_completion {
            self.player.message(&summary.message());
        }
        if self.log_completion {
            log::info!("{}", summary.log_line());
        }
        self.player.add_blocks_drawn(self.blocks_updated);
        if let Some(brush) = self.brush.as_mut() {
            brush.end();
        }
        self.source = None;
        self.events.raise_ended(self);
        Some(summary)
    }

    /// 0 before the op began, 100 once done, otherwise capped at 99
    pub fn percent_done(&self) -> u8 {
        if !self.has_begun {
            0
        } else if self.is_done || self.blocks_total_estimate == 0 {
            100
        } else {
            self.progress()
        }
    }

    /// Share of the estimate processed so far, capped at 99
    fn progress(&self) -> u8 {
        match self.blocks_total_estimate {
            0 => 0,
            estimate => (self.blocks_processed * 100 / estimate).min(99) as u8,
        }
    }

    pub fn summary(&self) -> DrawSummary {
        DrawSummary {
            player: self.player.name().to_string(),
            description: self.description(),
            world: self.world.name().to_string(),
            bounds: self.bounds,
            processed: self.blocks_processed,
            updated: self.blocks_updated,
            skipped: self.blocks_skipped,
            denied: self.blocks_denied,
            percent_done: if self.stopped_by_cancel { self.progress() } else { self.percent_done() },
            elapsed: self.elapsed,
            cancelled: self.stopped_by_cancel,
        }
    }

    pub fn handle(&self) -> DrawOpHandle {
        DrawOpHandle {
            id: self.id,
            name: self.shape.name(),
            description: self.description(),
            status: Arc::clone(&self.status),
        }
    }

    fn publish_status(&self) {
        self.status.percent.store(self.percent_done(), Ordering::Relaxed);
        self.status.updated.store(self.blocks_updated, Ordering::Relaxed);
        self.status.done.store(self.is_done, Ordering::Release);
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.shape.name()
    }

    /// Shape and brush, e.g. `Cuboid(Normal(stone))`
    pub fn description(&self) -> String {
        match &self.brush {
            Some(brush) => format!("{}({})", self.shape.name(), brush.description()),
            None => self
                .lent_description
                .clone()
                .unwrap_or_else(|| self.shape.name().to_string()),
        }
    }

    pub fn player(&self) -> &Arc<dyn PlayerContext> {
        &self.player
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn context(&self) -> BlockChangeContext {
        self.context
    }

    pub fn marks(&self) -> &[IVec3] {
        &self.marks
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Resumption cursor of the coordinate source
    pub fn coords(&self) -> IVec3 {
        self.coords
    }

    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    pub fn blocks_updated(&self) -> u64 {
        self.blocks_updated
    }

    pub fn blocks_denied(&self) -> u64 {
        self.blocks_denied
    }

    pub fn blocks_skipped(&self) -> u64 {
        self.blocks_skipped
    }

    pub fn blocks_total_estimate(&self) -> u64 {
        self.blocks_total_estimate
    }

    pub fn undo_state(&self) -> Option<&Arc<UndoState>> {
        self.undo_state.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn has_begun(&self) -> bool {
        self.has_begun
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.cancelled.load(Ordering::Relaxed)
    }

    /// True if a batch observed a cancel request before the coordinates ran out
    pub fn stopped_by_cancel(&self) -> bool {
        self.stopped_by_cancel
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }
}

impl std::fmt::Debug for DrawOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawOperation")
            .field("id", &self.id)
            .field("description", &self.description())
            .field("player", &self.player.name())
            .field("world", &self.world.name())
            .field("bounds", &self.bounds)
            .field("processed", &self.blocks_processed)
            .field("updated", &self.blocks_updated)
            .field("skipped", &self.blocks_skipped)
            .field("denied", &self.blocks_denied)
            .field("done", &self.is_done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::core::DrawConfig;
    use crate::draw::brush::{BrushFactory, NormalBrush, RainbowBrush};
    use crate::draw::events::DrawObserver;
    use crate::draw::shapes::{Cuboid, Line};
    use crate::player::{DeniedBlocks, Player, ProtectedZone};
    use crate::voxel::{Block, BlockBroadcast};

    #[derive(Default)]
    struct CountingBroadcast {
        changes: Mutex<Vec<(IVec3, Block)>>,
    }

    impl BlockBroadcast for CountingBroadcast {
        fn send_block_change(&self, coord: IVec3, block: Block) {
            self.changes.lock().unwrap().push((coord, block));
        }
    }

    /// Remembers the operation description it saw in `begin`
    #[derive(Clone, Default)]
    struct DescribingBrush {
        seen: Arc<Mutex<Option<String>>>,
    }

    impl Brush for DescribingBrush {
        fn factory_name(&self) -> &'static str {
            "Describing"
        }

        fn description(&self) -> String {
            "Describing".to_string()
        }

        fn begin(&mut self, _player: &dyn PlayerContext, op: &DrawOperation) -> bool {
            *self.seen.lock().unwrap() = Some(op.description());
            true
        }

        fn next_block(&mut self, _ctx: &BrushContext<'_>) -> Option<Block> {
            Some(Block::Stone)
        }

        fn clone_brush(&self) -> Box<dyn Brush> {
            Box::new(self.clone())
        }
    }

    struct Veto;

    impl DrawObserver for Veto {
        fn beginning(&self, _op: &DrawOperation) -> bool {
            false
        }
    }

    fn config() -> DrawConfig {
        DrawConfig {
            log_completion: false,
            ..DrawConfig::default()
        }
    }

    fn world_with(config: DrawConfig) -> Arc<World> {
        let map = Map::new(16, 16, 16).unwrap();
        Arc::new(World::new("test", map).with_config(config))
    }

    fn player() -> Arc<Player> {
        Arc::new(Player::new("alice", &config()))
    }

    fn cuboid(world: &Arc<World>, player: &Arc<Player>, block: Block) -> DrawOperation {
        DrawOperation::new(Cuboid::solid(), player.clone(), world.clone())
            .with_brush(Box::new(NormalBrush::new(block)))
    }

    fn run_to_completion(op: &mut DrawOperation, world: &World) {
        while !op.is_done() {
            op.draw_batch(&mut world.map_mut(), usize::MAX);
        }
    }

    fn assert_accounting(op: &DrawOperation) {
        assert!(op.blocks_processed() >= op.blocks_updated() + op.blocks_denied() + op.blocks_skipped());
    }

    #[test]
    fn test_wrong_mark_count() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        let err = op.prepare(&[IVec3::ZERO]).unwrap_err();
        assert!(matches!(err, Error::WrongMarkCount { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_missing_brush() {
        let world = world_with(config());
        let mut op = DrawOperation::new(Cuboid::solid(), player(), world);
        assert!(matches!(op.prepare(&[IVec3::ZERO, IVec3::ONE]), Err(Error::MissingBrush(_))));
    }

    #[test]
    fn test_start_requires_prepare() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        assert!(matches!(op.start(), Err(Error::NotPrepared(_))));
    }

    #[test]
    fn test_draw_cuboid() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        assert!(op.prepare(&[IVec3::new(1, 1, 1), IVec3::new(3, 3, 3)]).unwrap());
        assert_eq!(op.percent_done(), 0);
        assert!(op.start().unwrap());
        assert_eq!(op.blocks_total_estimate(), 27);

        run_to_completion(&mut op, &world);
        assert_eq!(op.blocks_updated(), 27);
        assert_eq!(op.percent_done(), 100);
        assert_eq!(world.map().count(Block::Stone), 27);
        assert_accounting(&op);

        let summary = op.end().unwrap();
        assert!(!summary.cancelled);
        assert!(op.end().is_none());
        assert_eq!(player.blocks_drawn(), 27);
        let messages = player.take_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("drew 27 blocks"));
    }

    #[test]
    fn test_undo_records_original_blocks() {
        let world = world_with(config());
        world.map_mut().set_block(IVec3::new(2, 2, 2), Block::Dirt);
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::new(2, 2, 2), IVec3::new(2, 2, 3)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);

        let undo = op.undo_state().unwrap();
        assert_eq!(undo.len(), 2);
        assert_eq!(undo.get(0).unwrap().block, Block::Dirt);
        assert_eq!(undo.get(1).unwrap().block, Block::Air);
        let last = player.last_draw_op().unwrap();
        assert_eq!(last.handle.id(), op.id());
    }

    #[test]
    fn test_out_of_bounds_skipped() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::new(14, 0, 0), IVec3::new(17, 0, 0)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);
        assert_eq!(op.blocks_processed(), 4);
        assert_eq!(op.blocks_updated(), 2);
        assert_eq!(op.blocks_skipped(), 2);
    }

    #[test]
    fn test_out_of_bounds_leaves_no_trace() {
        let world = world_with(config());
        let broadcast = Arc::new(CountingBroadcast::default());
        world.add_observer(broadcast.clone());
        let player = player();
        let mut op = DrawOperation::new(Cuboid::solid(), player.clone(), world.clone())
            .with_brush(RainbowBrush::default().make_default().unwrap());
        op.prepare(&[IVec3::new(-2, 0, 0), IVec3::new(1, 0, 0)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);

        assert_eq!(op.blocks_processed(), 4);
        assert_eq!(op.blocks_skipped(), 2);
        assert_eq!(op.blocks_updated(), 2);
        // The brush only saw the in-bounds coordinates, so the cycle starts there
        assert_eq!(world.map().get_block(IVec3::ZERO), Some(Block::Red));
        assert_eq!(world.map().get_block(IVec3::new(1, 0, 0)), Some(Block::Orange));
        assert_eq!(
            *broadcast.changes.lock().unwrap(),
            vec![(IVec3::ZERO, Block::Red), (IVec3::new(1, 0, 0), Block::Orange)]
        );
        let undo = op.undo_state().unwrap();
        assert_eq!(undo.len() as u64, op.blocks_updated());
        assert!(undo.snapshot().iter().all(|record| record.coord().x >= 0));
    }

    #[test]
    fn test_extreme_marks_refused() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        assert!(!op.prepare(&[IVec3::new(i32::MIN, 0, 0), IVec3::new(i32::MAX, 0, 0)]).unwrap());
        assert!(!op.is_prepared());
        let messages = player.take_messages();
        assert!(messages[0].text.contains("too large to draw"));

        let mut line = DrawOperation::new(Line, player.clone(), world.clone())
            .with_brush(Box::new(NormalBrush::new(Block::Stone)));
        assert!(!line.prepare(&[IVec3::ZERO, IVec3::splat(i32::MAX)]).unwrap());

        let mut sphere = DrawOperation::new(crate::draw::shapes::Ellipsoid::sphere(), player.clone(), world.clone())
            .with_brush(Box::new(NormalBrush::new(Block::Stone)));
        // Marks in range, but the sphere around the first one pokes past the limit
        let limit = BoundingBox::MAX_DRAW_COORD;
        assert!(!sphere.prepare(&[IVec3::new(limit, 0, 0), IVec3::new(limit - 1, 0, 0)]).unwrap());

        // The refused op can still be prepared with sensible marks
        assert!(op.prepare(&[IVec3::ZERO, IVec3::ONE]).unwrap());
    }

    #[test]
    fn test_equal_block_skipped_without_permission_check() {
        let world = world_with(config());
        // Air is denied, but air over air never reaches the permission check
        let player = Arc::new(Player::new("bob", &config()).with_policy(DeniedBlocks(vec![Block::Air])));
        let mut op = cuboid(&world, &player, Block::Air);
        op.prepare(&[IVec3::ZERO, IVec3::new(1, 1, 1)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);
        assert_eq!(op.blocks_skipped(), 8);
        assert_eq!(op.blocks_denied(), 0);
        assert_eq!(op.blocks_updated(), 0);
    }

    #[test]
    fn test_denied_blocks_unchanged() {
        let world = world_with(config());
        let zone = ProtectedZone::new("spawn", BoundingBox::new(IVec3::ZERO, IVec3::new(0, 3, 3)));
        let player = Arc::new(Player::new("bob", &config()).with_policy(zone));
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::new(1, 0, 0)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);

        assert_eq!(op.blocks_denied(), 1);
        assert_eq!(op.blocks_updated(), 1);
        assert_eq!(world.map().get_block(IVec3::ZERO), Some(Block::Air));
        assert_eq!(world.map().get_block(IVec3::new(1, 0, 0)), Some(Block::Stone));
        assert_accounting(&op);
    }

    #[test]
    fn test_budget_and_ceiling_preserve_position() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.max_blocks_per_batch = 7;
        op.prepare(&[IVec3::ZERO, IVec3::new(3, 3, 3)]).unwrap();
        op.start().unwrap();

        assert_eq!(op.draw_batch(&mut world.map_mut(), 5), 5);
        assert_eq!(op.blocks_processed(), 5);
        assert_eq!(op.draw_batch(&mut world.map_mut(), usize::MAX), 7);
        assert_eq!(op.blocks_processed(), 12);

        let mut last = op.percent_done();
        while !op.is_done() {
            op.draw_batch(&mut world.map_mut(), usize::MAX);
            assert!(op.percent_done() >= last);
            last = op.percent_done();
        }
        assert_eq!(op.blocks_updated(), 64);
        assert_eq!(world.map().count(Block::Stone), 64);
    }

    #[test]
    fn test_done_when_exhausted_exactly_at_ceiling() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::new(0, 0, 3)]).unwrap();
        op.start().unwrap();
        assert_eq!(op.draw_batch(&mut world.map_mut(), 4), 4);
        assert!(op.is_done());
        assert!(op.handle().is_done());
    }

    #[test]
    fn test_cancel() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::new(7, 7, 7)]).unwrap();
        op.start().unwrap();
        op.draw_batch(&mut world.map_mut(), 10);
        let handle = op.handle();
        handle.cancel();
        assert_eq!(op.draw_batch(&mut world.map_mut(), usize::MAX), 0);
        assert!(op.is_done());
        assert!(op.is_cancelled());
        assert_eq!(op.blocks_updated(), 10);

        let summary = op.end().unwrap();
        assert!(summary.cancelled);
        assert!(op.stopped_by_cancel());
        let messages = player.take_messages();
        assert!(messages[0].text.contains("cancelled"));
    }

    #[test]
    fn test_cancel_after_finishing_reports_completion() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::ONE]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);

        op.handle().cancel();
        assert!(op.is_cancelled());
        assert!(!op.stopped_by_cancel());
        let summary = op.end().unwrap();
        assert!(!summary.cancelled);
        assert_eq!(summary.percent_done, 100);
        let messages = player.take_messages();
        assert!(messages[0].text.contains("drew 8 blocks"));
        assert!(!messages[0].text.contains("cancelled"));
    }

    #[test]
    fn test_brush_begin_sees_full_description() {
        let world = world_with(config());
        let player = player();
        let brush = DescribingBrush::default();
        let seen = Arc::clone(&brush.seen);
        let mut op = DrawOperation::new(Cuboid::solid(), player.clone(), world.clone()).with_brush(Box::new(brush));
        op.prepare(&[IVec3::ZERO, IVec3::ONE]).unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Cuboid(Describing)"));
        assert_eq!(op.description(), "Cuboid(Describing)");
    }

    #[test]
    fn test_undo_overflow_warns_once() {
        let world = world_with(config());
        let player = Arc::new(Player::new(
            "carol",
            &DrawConfig {
                max_undo_blocks: 5,
                ..config()
            },
        ));
        let mut op = cuboid(&world, &player, Block::Stone);
        op.announce_completion = false;
        op.prepare(&[IVec3::ZERO, IVec3::new(2, 2, 2)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);

        assert_eq!(op.blocks_updated(), 27);
        let undo = op.undo_state().unwrap();
        assert!(undo.is_too_large_to_undo());
        assert!(undo.is_empty());
        let messages = player.take_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].immediate);
        assert_eq!(messages[0].text, "NOTE: This draw command is too massive to undo.");
    }

    #[test]
    fn test_broadcast_suppressed_while_flushing() {
        let world = world_with(config());
        let broadcast = Arc::new(CountingBroadcast::default());
        world.add_observer(broadcast.clone());
        let player = player();

        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::new(0, 0, 2)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);
        assert_eq!(broadcast.changes.lock().unwrap().len(), 3);

        world.set_flushing(true);
        let mut op = cuboid(&world, &player, Block::Dirt);
        op.prepare(&[IVec3::ZERO, IVec3::new(0, 0, 2)]).unwrap();
        op.start().unwrap();
        run_to_completion(&mut op, &world);
        assert_eq!(broadcast.changes.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_observer_veto() {
        let mut events = DrawEvents::new();
        events.subscribe(0, Arc::new(Veto));
        let map = Map::new(8, 8, 8).unwrap();
        let world = Arc::new(World::new("vetoed", map).with_config(config()).with_events(events));
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::ONE]).unwrap();
        assert!(!op.start().unwrap());
        assert!(op.undo_state().is_none());
        assert!(player.last_draw_op().is_none());
        assert_eq!(op.draw_batch(&mut world.map_mut(), usize::MAX), 0);
    }

    #[test]
    fn test_begin_queues_on_world() {
        let world = world_with(config());
        let player = player();
        let mut op = cuboid(&world, &player, Block::Stone);
        op.prepare(&[IVec3::ZERO, IVec3::ONE]).unwrap();
        let handle = op.begin().unwrap().unwrap();
        assert_eq!(world.queued_draw_ops(), 1);
        world.tick();
        assert!(handle.is_done());
        assert_eq!(handle.blocks_updated(), 8);
        assert_eq!(world.queued_draw_ops(), 0);
    }

    #[test]
    fn test_line_sequence() {
        let world = world_with(config());
        let player = player();
        let mut op = DrawOperation::new(Line, player.clone(), world.clone())
            .with_brush(RainbowBrush::default().make_default().unwrap());
        op.max_blocks_per_batch = 3;
        op.prepare(&[IVec3::ZERO, IVec3::new(9, 4, 2)]).unwrap();
        op.start().unwrap();
        assert_eq!(op.blocks_total_estimate(), 10);
        op.draw_batch(&mut world.map_mut(), usize::MAX);
        assert_eq!(op.blocks_processed(), 3);
        assert!(!op.is_done());
        run_to_completion(&mut op, &world);
        assert_eq!(op.blocks_updated(), 10);
        assert_eq!(op.coords(), IVec3::new(9, 4, 2));
        assert_eq!(world.map().get_block(IVec3::ZERO), Some(Block::Red));
    }
}

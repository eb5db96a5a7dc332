//! Straight lines between two marks.

use crate::math::LineIter;
use crate::draw::enumeration::DrawPlan;
use super::{DrawShape, PrepareContext};

/// Bresenham line from the first mark to the second, both included
#[derive(Clone, Copy, Debug, Default)]
pub struct Line;

impl DrawShape for Line {
    fn name(&self) -> &'static str {
        "Line"
    }

    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        let (start, end) = (ctx.marks[0], ctx.marks[1]);
        Some(DrawPlan::sequence(LineIter::new(start, end), LineIter::block_count(start, end)))
    }
}

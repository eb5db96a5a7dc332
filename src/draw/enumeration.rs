//! Resumable coordinate sources for draw operations.
//!
//! A draw operation walks its coordinates over many batches. Each source keeps
//! its position between batches: box scans in the operation's `coords` cursor,
//! sequences in the iterator itself.

use std::iter::Peekable;

use crate::core::types::IVec3;
use crate::math::BoundingBox;

/// How a shape treats a coordinate of its box scan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Draw with the brush's primary block
    Primary,
    /// Draw with the brush's alternate block (e.g. interior of a hollow shape)
    Alternate,
}

/// Lazy, finite, non-restartable coordinate sequence
pub type CoordSequence = Box<dyn Iterator<Item = IVec3> + Send>;

/// Where a draw operation's coordinates come from
pub enum CoordSource {
    /// X/Y/Z scan of the operation bounds, Z fastest
    BoxScan,
    /// Externally produced sequence (lines, undo records)
    Sequence(Peekable<CoordSequence>),
}

impl CoordSource {
    pub fn sequence(iter: impl Iterator<Item = IVec3> + Send + 'static) -> Self {
        let boxed: CoordSequence = Box::new(iter);
        CoordSource::Sequence(boxed.peekable())
    }
}

impl std::fmt::Debug for CoordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordSource::BoxScan => f.write_str("BoxScan"),
            CoordSource::Sequence(_) => f.write_str("Sequence"),
        }
    }
}

/// A shape's answer to prepare: coordinates, their expected count and
/// optionally bounds that replace the ones derived from the marks
#[derive(Debug)]
pub struct DrawPlan {
    pub source: CoordSource,
    pub estimate: u64,
    pub bounds: Option<BoundingBox>,
}

impl DrawPlan {
    pub fn box_scan(estimate: u64) -> Self {
        Self {
            source: CoordSource::BoxScan,
            estimate,
            bounds: None,
        }
    }

    pub fn sequence(iter: impl Iterator<Item = IVec3> + Send + 'static, estimate: u64) -> Self {
        Self {
            source: CoordSource::sequence(iter),
            estimate,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Take the coordinate under a box-scan cursor and advance the cursor.
///
/// Z advances fastest, wrapping into Y, then X. Returns `None` once the cursor
/// has left the box; the cursor then stays exhausted.
pub fn next_in_box(bounds: &BoundingBox, cursor: &mut IVec3) -> Option<IVec3> {
    if bounds.is_empty() || box_exhausted(bounds, *cursor) {
        return None;
    }
    let current = *cursor;
    cursor.z += 1;
    if cursor.z > bounds.max.z {
        cursor.z = bounds.min.z;
        cursor.y += 1;
        if cursor.y > bounds.max.y {
            cursor.y = bounds.min.y;
            cursor.x += 1;
        }
    }
    Some(current)
}

/// True once a box-scan cursor has passed the last coordinate
pub fn box_exhausted(bounds: &BoundingBox, cursor: IVec3) -> bool {
    cursor.x > bounds.max.x
}

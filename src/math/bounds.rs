//! Integer axis-aligned bounding box

use crate::core::types::IVec3;

/// Axis-aligned box of block coordinates, inclusive on both corners
///
/// X and Y span the horizontal plane, Z is height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min: IVec3,
    pub max: IVec3,
}

/// Blocks between two inclusive bounds, computed without overflow
fn extent(lo: i32, hi: i32) -> u64 {
    (hi as i64 - lo as i64 + 1).max(0) as u64
}

impl BoundingBox {
    /// Largest absolute coordinate a drawable box may reach on any axis
    pub const MAX_DRAW_COORD: i32 = i32::MAX / 2;

    /// Box that contains nothing. `max < min` on every axis.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: IVec3::ZERO,
        max: IVec3::splat(-1),
    };

    /// Create box from min and max corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing two corner points given in any order
    pub fn from_points(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box centered on a point, extending `radius` blocks along each axis
    pub fn around(center: IVec3, radius: i32) -> Self {
        Self {
            min: center.saturating_sub(IVec3::splat(radius)),
            max: center.saturating_add(IVec3::splat(radius)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Number of blocks along each axis, exact for any corners
    pub fn extents(&self) -> [u64; 3] {
        [
            extent(self.min.x, self.max.x),
            extent(self.min.y, self.max.y),
            extent(self.min.z, self.max.z),
        ]
    }

    /// Number of blocks along X, saturating at `i32::MAX`
    pub fn width(&self) -> i32 {
        i32::try_from(self.extents()[0]).unwrap_or(i32::MAX)
    }

    /// Number of blocks along Y, saturating at `i32::MAX`
    pub fn length(&self) -> i32 {
        i32::try_from(self.extents()[1]).unwrap_or(i32::MAX)
    }

    /// Number of blocks along Z, saturating at `i32::MAX`
    pub fn height(&self) -> i32 {
        i32::try_from(self.extents()[2]).unwrap_or(i32::MAX)
    }

    /// Dimensions as a vector (width, length, height)
    pub fn dimensions(&self) -> IVec3 {
        IVec3::new(self.width(), self.length(), self.height())
    }

    /// Number of blocks inside the box, saturating at `u64::MAX`
    pub fn volume(&self) -> u64 {
        self.checked_volume().unwrap_or(u64::MAX)
    }

    /// Number of blocks inside the box, `None` if it does not fit a `u64`
    pub fn checked_volume(&self) -> Option<u64> {
        let [x, y, z] = self.extents();
        x.checked_mul(y)?.checked_mul(z)
    }

    /// True if the box lies within `MAX_DRAW_COORD` of the origin on every
    /// axis, so scanning and measuring it cannot overflow
    pub fn is_drawable(&self) -> bool {
        let limit = IVec3::splat(Self::MAX_DRAW_COORD);
        !self.is_empty()
            && self.min.cmpge(-limit).all()
            && self.max.cmple(limit).all()
            && self.checked_volume().is_some()
    }

    /// Check if point is inside the box
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Check if two boxes share at least one block
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty() && !other.is_empty() &&
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Expand box to include point. Expanding `EMPTY` yields the single point.
    pub fn expand(&mut self, point: IVec3) {
        if self.is_empty() {
            *self = Self::new(point, point);
        } else {
            self.min = self.min.min(point);
            self.max = self.max.max(point);
        }
    }

    /// Number of faces of the box a point lies on (0 for interior or outside points)
    pub fn faces_touching(&self, p: IVec3) -> u32 {
        let on = |v: i32, lo: i32, hi: i32| (v == lo || v == hi) as u32;
        on(p.x, self.min.x, self.max.x) + on(p.y, self.min.y, self.max.y) + on(p.z, self.min.z, self.max.z)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(
                f,
                "({},{},{})-({},{},{})",
                self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
            )
        }
    }
}

//! Axis-aligned boxes: solid, hollow shell and edge frame.

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::draw::enumeration::{DrawPlan, Fill};
use super::{DrawShape, PrepareContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CuboidKind {
    Solid,
    /// Outer shell; the interior takes the brush's alternate block if it has one
    Hollow,
    /// The twelve edges
    Wireframe,
}

#[derive(Clone, Debug)]
pub struct Cuboid {
    kind: CuboidKind,
    bounds: BoundingBox,
    fill_interior: bool,
}

impl Cuboid {
    pub fn new(kind: CuboidKind) -> Self {
        Self {
            kind,
            bounds: BoundingBox::EMPTY,
            fill_interior: false,
        }
    }

    pub fn solid() -> Self {
        Self::new(CuboidKind::Solid)
    }

    pub fn hollow() -> Self {
        Self::new(CuboidKind::Hollow)
    }

    pub fn wireframe() -> Self {
        Self::new(CuboidKind::Wireframe)
    }

    pub fn kind(&self) -> CuboidKind {
        self.kind
    }

    /// Coordinates the shape draws inside `bounds`
    fn count(&self, bounds: &BoundingBox) -> u64 {
        let dims = bounds.dimensions();
        let edge = |d: i32| d.min(2) as u64;
        let inner = |d: i32| (d - d.min(2)).max(0) as u64;
        let (ex, ey, ez) = (edge(dims.x), edge(dims.y), edge(dims.z));
        let (ix, iy, iz) = (inner(dims.x), inner(dims.y), inner(dims.z));
        match self.kind {
            CuboidKind::Solid => bounds.volume(),
            CuboidKind::Hollow if self.fill_interior => bounds.volume(),
            CuboidKind::Hollow => bounds.volume() - ix * iy * iz,
            CuboidKind::Wireframe => ex * ey * ez + ex * ey * iz + ex * iy * ez + ix * ey * ez,
        }
    }
}

impl DrawShape for Cuboid {
    fn name(&self) -> &'static str {
        match self.kind {
            CuboidKind::Solid => "Cuboid",
            CuboidKind::Hollow => "CuboidH",
            CuboidKind::Wireframe => "CuboidW",
        }
    }

    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        self.bounds = ctx.bounds?;
        self.fill_interior = ctx.alternate_blocks > 0;
        Some(DrawPlan::box_scan(self.count(&self.bounds)))
    }

    fn fill_at(&self, coord: IVec3) -> Option<Fill> {
        let faces = self.bounds.faces_touching(coord);
        match self.kind {
            CuboidKind::Solid => Some(Fill::Primary),
            CuboidKind::Hollow if faces > 0 => Some(Fill::Primary),
            CuboidKind::Hollow => self.fill_interior.then_some(Fill::Alternate),
            CuboidKind::Wireframe => (faces >= 2).then_some(Fill::Primary),
        }
    }
}

//! Ellipsoids inscribed in the marked box, and spheres around a centre mark.

use glam::DVec3;

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::draw::enumeration::{DrawPlan, Fill};
use super::{DrawShape, PrepareContext};

/// Solid ellipsoid
///
/// `Ellipsoid::inscribed` fills the largest ellipsoid that fits the marked
/// box. `Ellipsoid::sphere` treats the first mark as the centre and the
/// second as a point on the surface.
#[derive(Clone, Debug)]
pub struct Ellipsoid {
    sphere: bool,
    center: DVec3,
    inv_radii_sq: DVec3,
}

impl Ellipsoid {
    pub fn inscribed() -> Self {
        Self {
            sphere: false,
            center: DVec3::ZERO,
            inv_radii_sq: DVec3::ZERO,
        }
    }

    pub fn sphere() -> Self {
        Self {
            sphere: true,
            ..Self::inscribed()
        }
    }

    fn set_radii(&mut self, center: DVec3, radii: DVec3) {
        self.center = center;
        self.inv_radii_sq = radii.map(|r| 1.0 / (r * r).max(0.25));
    }

    fn contains(&self, coord: IVec3) -> bool {
        let d = coord.as_dvec3() - self.center;
        (d * d * self.inv_radii_sq).element_sum() <= 1.0
    }
}

impl DrawShape for Ellipsoid {
    fn name(&self) -> &'static str {
        if self.sphere { "Sphere" } else { "Ellipsoid" }
    }

    fn plan(&mut self, ctx: &PrepareContext<'_>) -> Option<DrawPlan> {
        let (bounds, radii) = if self.sphere {
            let center = ctx.marks[0];
            let radius = ctx.marks[1].as_dvec3().distance(center.as_dvec3());
            self.set_radii(center.as_dvec3(), DVec3::splat(radius));
            (BoundingBox::around(center, radius.ceil() as i32), DVec3::splat(radius))
        } else {
            let bounds = ctx.bounds?;
            let radii = bounds.dimensions().as_dvec3() / 2.0;
            let center = (bounds.min + bounds.max).as_dvec3() / 2.0;
            self.set_radii(center, radii);
            (bounds, radii)
        };
        let volume = 4.0 / 3.0 * std::f64::consts::PI * radii.x * radii.y * radii.z;
        let estimate = (volume.ceil() as u64).clamp(1, bounds.volume());
        Some(DrawPlan::box_scan(estimate).with_bounds(bounds))
    }

    fn fill_at(&self, coord: IVec3) -> Option<Fill> {
        self.contains(coord).then_some(Fill::Primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block_ellipsoid() {
        let mut shape = Ellipsoid::inscribed();
        shape.set_radii(DVec3::splat(3.0), DVec3::splat(0.5));
        assert!(shape.contains(IVec3::splat(3)));
        assert!(!shape.contains(IVec3::new(4, 3, 3)));
    }

    #[test]
    fn test_inscribed_touches_face_centres() {
        let mut shape = Ellipsoid::inscribed();
        // Box (0,0,0)-(6,4,2)
        shape.set_radii(DVec3::new(3.0, 2.0, 1.0), DVec3::new(3.5, 2.5, 1.5));
        assert!(shape.contains(IVec3::new(3, 2, 1)));
        assert!(shape.contains(IVec3::new(0, 2, 1)));
        assert!(shape.contains(IVec3::new(6, 2, 1)));
        assert!(!shape.contains(IVec3::new(0, 0, 0)));
        assert!(!shape.contains(IVec3::new(6, 4, 2)));
    }

    #[test]
    fn test_sphere_radius() {
        let mut shape = Ellipsoid::sphere();
        shape.set_radii(DVec3::ZERO, DVec3::splat(2.0));
        assert!(shape.contains(IVec3::new(2, 0, 0)));
        assert!(shape.contains(IVec3::new(1, 1, 1)));
        assert!(!shape.contains(IVec3::new(2, 1, 1)));
        assert_eq!(shape.name(), "Sphere");
    }
}

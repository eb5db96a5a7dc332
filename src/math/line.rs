//! Lazy 3D line enumeration
//!
//! Integer Bresenham walk driven by the axis of greatest delta: every step
//! advances the major axis by one and the minor axes whenever their
//! accumulated error crosses zero.

use glam::I64Vec3;

use crate::core::types::IVec3;

/// Iterator over the blocks of a straight line, both endpoints included
#[derive(Clone, Debug)]
pub struct LineIter {
    current: [i64; 3],
    step: [i64; 3],
    delta: [i64; 3],
    major: usize,
    error: [i64; 3],
    remaining: u64,
    started: bool,
}

impl LineIter {
    pub fn new(start: IVec3, end: IVec3) -> Self {
        // i64 so that deltas and doubled error terms of far-apart endpoints fit
        let diff = end.as_i64vec3() - start.as_i64vec3();
        let d = diff.abs().to_array();
        let step = diff.signum().to_array();

        let major = if d[0] >= d[1] && d[0] >= d[2] {
            0
        } else if d[1] >= d[2] {
            1
        } else {
            2
        };

        let mut error = [0; 3];
        for axis in 0..3 {
            if axis != major {
                error[axis] = 2 * d[axis] - d[major];
            }
        }

        Self {
            current: start.as_i64vec3().to_array(),
            step,
            delta: d,
            major,
            error,
            remaining: d[major] as u64,
            started: false,
        }
    }

    /// Number of blocks the line covers
    pub fn block_count(start: IVec3, end: IVec3) -> u64 {
        let d = (end.as_i64vec3() - start.as_i64vec3()).abs();
        d.max_element() as u64 + 1
    }

    fn point(&self) -> IVec3 {
        // Every point lies between the two i32 endpoints
        I64Vec3::from_array(self.current).as_ivec3()
    }
}

impl Iterator for LineIter {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if !self.started {
            self.started = true;
            return Some(self.point());
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let major = self.major;
        for axis in 0..3 {
            if axis == major {
                continue;
            }
            if self.error[axis] > 0 {
                self.current[axis] += self.step[axis];
                self.error[axis] -= 2 * self.delta[major];
            }
            self.error[axis] += 2 * self.delta[axis];
        }
        self.current[major] += self.step[major];

        Some(self.point())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.remaining as usize).saturating_add(usize::from(!self.started));
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point() {
        let points: Vec<_> = LineIter::new(IVec3::splat(4), IVec3::splat(4)).collect();
        assert_eq!(points, vec![IVec3::splat(4)]);
    }

    #[test]
    fn test_axis_aligned() {
        let points: Vec<_> = LineIter::new(IVec3::new(0, 0, 0), IVec3::new(0, 0, -3)).collect();
        assert_eq!(
            points,
            vec![IVec3::ZERO, IVec3::new(0, 0, -1), IVec3::new(0, 0, -2), IVec3::new(0, 0, -3)]
        );
    }

    #[test]
    fn test_endpoints_and_count() {
        let start = IVec3::new(1, 2, 3);
        let end = IVec3::new(11, -4, 7);
        let points: Vec<_> = LineIter::new(start, end).collect();
        assert_eq!(points.len() as u64, LineIter::block_count(start, end));
        assert_eq!(points.first(), Some(&start));
        assert_eq!(points.last(), Some(&end));
    }

    #[test]
    fn test_consecutive_points_touch() {
        let points: Vec<_> = LineIter::new(IVec3::new(-5, 0, 9), IVec3::new(7, 13, -2)).collect();
        for pair in points.windows(2) {
            let step = (pair[1] - pair[0]).abs();
            assert!(step.max_element() == 1, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut line = LineIter::new(IVec3::ZERO, IVec3::new(4, 1, 0));
        assert_eq!(line.size_hint(), (5, Some(5)));
        line.next();
        line.next();
        assert_eq!(line.size_hint(), (3, Some(3)));
    }
    #[test]
    fn test_extreme_endpoints() {
        let start = IVec3::new(i32::MIN, 0, i32::MAX);
        let end = IVec3::new(i32::MAX, 1, i32::MIN);
        assert_eq!(LineIter::block_count(start, end), 1 << 32);
        let mut line = LineIter::new(start, end);
        assert_eq!(line.next(), Some(start));
        assert_eq!(line.next(), Some(IVec3::new(i32::MIN + 1, 0, i32::MAX - 1)));
    }
}

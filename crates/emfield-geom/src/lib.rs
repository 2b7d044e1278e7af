//! Geometry for the field kernel: vectors, boxes, segment occlusion and the local frame.
#![forbid(unsafe_code)]

use core::ops::{Add, Div, Mul, Sub};

mod frame;

pub use frame::{EARTH_RADIUS_M, LocalFrame, project};

/// Stand-in for an exactly-zero direction component in the slab test.
pub const DIRECTION_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    #[inline]
    fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned box in the local frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box standing on the ground plane (z = 0) with its footprint centred on `(cx, cy)`.
    ///
    /// `length` runs along x, `width` along y.
    pub fn grounded(cx: f64, cy: f64, length: f64, width: f64, height: f64) -> Self {
        let half_len = length / 2.0;
        let half_wid = width / 2.0;
        Self {
            min: Vec3::new(cx - half_len, cy - half_wid, 0.0),
            max: Vec3::new(cx + half_len, cy + half_wid, height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Slab test: does the bounded segment `a -> b` pass through this box?
    ///
    /// Zero direction components are replaced with [`DIRECTION_EPSILON`], so segments lying
    /// exactly in a face plane are classified approximately. Only a boolean is produced.
    pub fn segment_intersects(&self, a: Vec3, b: Vec3) -> bool {
        // Fixed endpoint order makes the result exactly symmetric under swap.
        let (p1, p2) = if a.to_array() <= b.to_array() { (a, b) } else { (b, a) };
        let dir = (p2 - p1).to_array();
        let origin = p1.to_array();
        let lo = self.min.to_array();
        let hi = self.max.to_array();

        let mut t0 = f64::NEG_INFINITY;
        let mut t1 = f64::INFINITY;
        for axis in 0..3 {
            let d = if dir[axis] == 0.0 { DIRECTION_EPSILON } else { dir[axis] };
            let t_near = (lo[axis] - origin[axis]) / d;
            let t_far = (hi[axis] - origin[axis]) / d;
            t0 = t0.max(t_near.min(t_far));
            t1 = t1.min(t_near.max(t_far));
        }
        t0 < t1 && t0 < 1.0 && t1 > 0.0
    }
}

/// Free-function form of [`Aabb::segment_intersects`] taking raw corners.
#[inline]
pub fn segment_intersects_box(p1: Vec3, p2: Vec3, box_min: Vec3, box_max: Vec3) -> bool {
    Aabb::new(box_min, box_max).segment_intersects(p1, p2)
}

//! Cartesian point type and polyline utilities.
//!
//! Poses are reduced to the tool-centre-point translation; orientation is
//! left to the collision predicate's geometry handle.

use std::ops::{Add, Sub};

/// A 3-D Cartesian point in the cell frame (units are caller-defined, usually mm).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point3) -> f64 {
        let d = other - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    /// Linear interpolation: `s = 0` → `self`, `s = 1` → `other`.
    #[inline]
    pub fn lerp(self, other: Point3, s: f64) -> Point3 {
        Point3 {
            x: self.x + (other.x - self.x) * s,
            y: self.y + (other.y - self.y) * s,
            z: self.z + (other.z - self.z) * s,
        }
    }

    /// The same point raised by `dz` along the cell z axis.
    #[inline]
    pub fn raised(self, dz: f64) -> Point3 {
        Point3 { z: self.z + dz, ..self }
    }

    /// Uniform scale about the origin.
    #[inline]
    pub fn scaled(self, factor: f64) -> Point3 {
        Point3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Sum of the distances between consecutive points.  `0.0` for fewer than
/// two points.
pub fn path_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

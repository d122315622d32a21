// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical scene frame
//!
//! All massing geometry lives in one right-handed, y-up frame measured in feet:
//!
//! - [`right`] (+x): along the lot width
//! - [`up`] (+y): height above grade
//! - [`forward`] (+z): along the lot depth, away from the front street
//!
//! Ground polygons are authored as `(x, z)` pairs and stored in `Point2`
//! with `p.x = x` and `p.y = z`. [`ground`] is the only place they are
//! lifted into 3D.

use nalgebra::{Point2, Point3, Vector3};

/// Lot width direction
#[inline]
pub fn right() -> Vector3<f64> {
    Vector3::x()
}

/// Height direction
#[inline]
pub fn up() -> Vector3<f64> {
    Vector3::y()
}

/// Lot depth direction
#[inline]
pub fn forward() -> Vector3<f64> {
    Vector3::z()
}

/// Lift a ground point `(x, z)` to `elevation` feet above grade
#[inline]
pub fn ground(p: Point2<f64>, elevation: f64) -> Point3<f64> {
    Point3::new(p.x, elevation, p.y)
}

/// Convert a `[x, z]` payload pair into a ground point
#[inline]
pub fn point([x, z]: [f64; 2]) -> Point2<f64> {
    Point2::new(x, z)
}

/// Axis-aligned bounds on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundBounds {
    /// Minimum corner (x, z)
    pub min: Point2<f64>,
    /// Maximum corner (x, z)
    pub max: Point2<f64>,
}

impl GroundBounds {
    /// Create bounds from two corners
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Rectangle from the origin spanning `width` x `depth`
    pub fn from_size(width: f64, depth: f64) -> Self {
        Self::new(Point2::origin(), Point2::new(width, depth))
    }

    /// Bounds of a point set, `None` when empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2<f64>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    /// Extent along x
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along z
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Grow the bounds by `margin` on every side
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            Point2::new(self.min.x - margin, self.min.y - margin),
            Point2::new(self.max.x + margin, self.max.y + margin),
        )
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &GroundBounds) -> Self {
        Self::new(
            Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// Shift along x and z
    pub fn translate(&self, dx: f64, dz: f64) -> Self {
        Self::new(
            Point2::new(self.min.x + dx, self.min.y + dz),
            Point2::new(self.max.x + dx, self.max.y + dz),
        )
    }

    /// Corners counter-clockwise from the minimum corner
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// Whether the bounds enclose a non-zero area
    pub fn has_area(&self) -> bool {
        self.width() > 0.0 && self.depth() > 0.0
    }
}

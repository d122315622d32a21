// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground-plane profiles and their filled-shape triangulation

use crate::error::{Error, Result};
use crate::frame::{self, GroundBounds};
use crate::polygon::{compute_signed_area, distinct_vertex_count, ensure_ccw};
use crate::triangulation::triangulate_polygon;
use nalgebra::Point2;

/// 2D profile on the ground plane, with optional holes
#[derive(Debug, Clone)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Build a profile from a payload ring of `[x, z]` pairs.
    ///
    /// A repeated closing vertex is dropped and the ring is made
    /// counter-clockwise. Returns `None` for rings with fewer than three
    /// distinct vertices so callers can skip the element instead of failing.
    pub fn from_ring(ring: &[[f64; 2]]) -> Option<Self> {
        let mut outer: Vec<Point2<f64>> = ring.iter().copied().map(frame::point).collect();

        if outer.len() > 1 && outer.first() == outer.last() {
            outer.pop();
        }

        if distinct_vertex_count(&outer) < 3 {
            return None;
        }

        Some(Self::new(ensure_ccw(&outer)))
    }

    /// Axis-aligned rectangle covering `bounds`
    pub fn rectangle(bounds: &GroundBounds) -> Self {
        Self::new(bounds.corners().to_vec())
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Bounds of the outer ring
    pub fn bounds(&self) -> Option<GroundBounds> {
        GroundBounds::from_points(&self.outer)
    }

    /// Enclosed area (outer minus holes)
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| compute_signed_area(h).abs()).sum();
        compute_signed_area(&self.outer).abs() - holes
    }

    /// Triangulate the profile
    /// Returns triangle indices into the flattened vertex array (outer, then holes)
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidProfile(
                "Profile must have at least 3 vertices".to_string(),
            ));
        }

        if self.holes.is_empty() {
            let indices = triangulate_polygon(&self.outer)?;
            return Ok(Triangulation {
                points: self.outer.clone(),
                indices,
            });
        }

        // Flatten vertices for earcutr
        let mut vertices = Vec::with_capacity(
            (self.outer.len() + self.holes.iter().map(|h| h.len()).sum::<usize>()) * 2,
        );

        for p in &self.outer {
            vertices.push(p.x);
            vertices.push(p.y);
        }

        let mut hole_indices = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            hole_indices.push(vertices.len() / 2);
            for p in hole {
                vertices.push(p.x);
                vertices.push(p.y);
            }
        }

        let indices = earcutr::earcut(&vertices, &hole_indices, 2)
            .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

        let points = vertices
            .chunks_exact(2)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();

        Ok(Triangulation { points, indices })
    }
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// All vertices (outer + holes)
    pub points: Vec<Point2<f64>>,
    /// Triangle indices
    pub indices: Vec<usize>,
}

impl Triangulation {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Sum of triangle areas
    pub fn area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (self.points[t[0]], self.points[t[1]], self.points[t[2]]);
                ((b - a).perp(&(c - a)) / 2.0).abs()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_ring_drops_closing_vertex() {
        let ring = [[0.0, 0.0], [50.0, 0.0], [50.0, 100.0], [0.0, 100.0], [0.0, 0.0]];
        let profile = Profile2D::from_ring(&ring).unwrap();
        assert_eq!(profile.outer.len(), 4);
        assert_relative_eq!(profile.area(), 5000.0);
    }

    #[test]
    fn test_from_ring_makes_ccw() {
        let clockwise = [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]];
        let profile = Profile2D::from_ring(&clockwise).unwrap();
        assert!(compute_signed_area(&profile.outer) > 0.0);
    }

    #[test]
    fn test_degenerate_ring_is_skipped() {
        assert!(Profile2D::from_ring(&[]).is_none());
        assert!(Profile2D::from_ring(&[[0.0, 0.0], [1.0, 0.0]]).is_none());
        assert!(Profile2D::from_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 0.0]]).is_none());
    }

    #[test]
    fn test_triangulate_rectangle() {
        let profile = Profile2D::rectangle(&GroundBounds::from_size(50.0, 100.0));
        let tri = profile.triangulate().unwrap();

        assert_eq!(tri.points.len(), 4);
        assert_eq!(tri.triangle_count(), 2);
        assert_relative_eq!(tri.area(), 5000.0);
    }

    #[test]
    fn test_triangulate_with_hole() {
        let mut profile = Profile2D::rectangle(&GroundBounds::from_size(20.0, 20.0));
        profile.add_hole(vec![
            Point2::new(5.0, 5.0),
            Point2::new(5.0, 15.0),
            Point2::new(15.0, 15.0),
            Point2::new(15.0, 5.0),
        ]);
        let tri = profile.triangulate().unwrap();

        assert_eq!(tri.points.len(), 8);
        assert_relative_eq!(tri.area(), 300.0, epsilon = 1e-9);
        assert_relative_eq!(profile.area(), 300.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ring utilities and 2D boolean operations
//!
//! Setback-stepped floors are footprints with a rectangular notch cut out.
//! The notch is subtracted with the i_overlay crate before extrusion, which
//! keeps the result a single simple ring that earcutr can fill.

use crate::error::{Error, Result};
use crate::frame::GroundBounds;
use crate::profile::Profile2D;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Two vertices closer than this are the same vertex
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Closed boundary for outline drawing: the ring with its first point repeated.
/// Rings with fewer than three points yield an empty boundary.
pub fn closed_boundary(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if ring.len() < 3 {
        return Vec::new();
    }
    let mut closed = Vec::with_capacity(ring.len() + 1);
    closed.extend_from_slice(ring);
    closed.push(ring[0]);
    closed
}

/// Count vertices not coincident with an earlier vertex
pub fn distinct_vertex_count(ring: &[Point2<f64>]) -> usize {
    let mut distinct: Vec<&Point2<f64>> = Vec::with_capacity(ring.len());
    for p in ring {
        if !distinct.iter().any(|q| (*q - p).norm() < EPSILON_2D) {
            distinct.push(p);
        }
    }
    distinct.len()
}

/// Check if a contour is valid (enough vertices, non-zero area)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    distinct_vertex_count(contour) >= 3 && compute_signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let n = contour.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (&contour[i], &contour[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();

    twice * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Perform 2D boolean difference: profile - cutter
///
/// When the cutter splits the profile, the largest remaining piece is kept.
pub fn subtract_2d(profile: &Profile2D, cutter: &[Point2<f64>]) -> Result<Profile2D> {
    if cutter.len() < 3 {
        return Err(Error::InvalidProfile(
            "Cutter contour must have at least 3 vertices".to_string(),
        ));
    }

    if profile.outer.len() < 3 {
        return Err(Error::InvalidProfile(
            "Profile must have at least 3 vertices".to_string(),
        ));
    }

    let subject = profile_to_paths(profile);
    let clip = vec![contour_to_path(&ensure_ccw(cutter))];

    // Vec of shapes, each shape is Vec of contours (first is outer, rest are holes)
    let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::EvenOdd);

    largest_shape_to_profile(&result)
}

/// Rectangle covering `bounds` with the `notch` rectangle cut out of it.
///
/// This is the stepped footprint of a floor that sets back from one corner or
/// side. The notch must touch or sit inside the rectangle; a notch that
/// removes everything is an error.
pub fn notched_rectangle(bounds: &GroundBounds, notch: &GroundBounds) -> Result<Profile2D> {
    let base = Profile2D::rectangle(bounds);
    subtract_2d(&base, &notch.corners())
}

/// Convert Profile2D to i_overlay path format
fn profile_to_paths(profile: &Profile2D) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + profile.holes.len());

    // Outer boundary counter-clockwise, holes clockwise (EvenOdd fill either way)
    paths.push(contour_to_path(&ensure_ccw(&profile.outer)));
    for hole in &profile.holes {
        paths.push(contour_to_path(&ensure_cw(hole)));
    }

    paths
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Pick the largest resulting shape and convert it back to a profile
fn largest_shape_to_profile(shapes: &[Vec<Vec<[f64; 2]>>]) -> Result<Profile2D> {
    let to_points = |contour: &Vec<[f64; 2]>| -> Vec<Point2<f64>> {
        contour.iter().map(|p| Point2::new(p[0], p[1])).collect()
    };

    let best = shapes
        .iter()
        .filter_map(|shape| {
            let outer = to_points(shape.first()?);
            is_valid_contour(&outer).then(|| (compute_signed_area(&outer).abs(), shape, outer))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0));

    let Some((_, shape, outer)) = best else {
        return Err(Error::InvalidProfile(
            "Boolean difference left no area".to_string(),
        ));
    };

    let mut profile = Profile2D::new(ensure_ccw(&outer));
    for hole in shape.iter().skip(1) {
        let hole = to_points(hole);
        if is_valid_contour(&hole) {
            profile.add_hole(ensure_cw(&hole));
        }
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn test_closed_boundary() {
        let ring = square(10.0);
        let closed = closed_boundary(&ring);
        assert_eq!(closed.len(), 5);
        assert_eq!(closed.first(), closed.last());
        assert!(closed_boundary(&ring[..2]).is_empty());
    }

    #[test]
    fn test_signed_area_and_winding() {
        let ccw = square(10.0);
        assert_relative_eq!(compute_signed_area(&ccw), 100.0);
        let cw = ensure_cw(&ccw);
        assert_relative_eq!(compute_signed_area(&cw), -100.0);
        assert_relative_eq!(compute_signed_area(&ensure_ccw(&cw)), 100.0);
    }

    #[test]
    fn test_distinct_vertices() {
        let mut ring = square(10.0);
        ring.push(Point2::new(0.0, 0.0));
        assert_eq!(distinct_vertex_count(&ring), 4);
        assert!(!is_valid_contour(&[
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ]));
    }

    #[test]
    fn test_notched_rectangle() {
        // 50 x 100 lot footprint with the rear-right 20 x 30 corner removed
        let bounds = GroundBounds::from_size(50.0, 100.0);
        let notch = GroundBounds::new(Point2::new(30.0, 70.0), Point2::new(50.0, 100.0));
        let profile = notched_rectangle(&bounds, &notch).unwrap();

        assert!(profile.holes.is_empty());
        assert_relative_eq!(profile.area(), 5000.0 - 600.0, epsilon = 1e-6);

        let tri = profile.triangulate().unwrap();
        assert_relative_eq!(tri.area(), 4400.0, epsilon = 1e-6);
    }

    #[test]
    fn test_subtract_everything_fails() {
        let profile = Profile2D::new(square(10.0));
        let cutter = vec![
            Point2::new(-1.0, -1.0),
            Point2::new(11.0, -1.0),
            Point2::new(11.0, 11.0),
            Point2::new(-1.0, 11.0),
        ];
        assert!(subtract_2d(&profile, &cutter).is_err());
    }
}

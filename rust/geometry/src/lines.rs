// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line geometry: outlines, reference lines and edge sets

use crate::frame::ground;
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;

/// A single straight segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment {
    #[inline]
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Vertical segment over ground point `p` from `bottom` to `top`
    pub fn vertical(p: Point2<f64>, bottom: f64, top: f64) -> Self {
        Self::new(ground(p, bottom), ground(p, top))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Connected run of points, optionally closed back to the first
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: SmallVec<[Point3<f64>; 8]>,
    pub closed: bool,
}

impl Polyline {
    /// Open polyline through `points`
    pub fn open<I: IntoIterator<Item = Point3<f64>>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
            closed: false,
        }
    }

    /// Closed loop through `points`; the first point is not repeated
    pub fn closed<I: IntoIterator<Item = Point3<f64>>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
            closed: true,
        }
    }

    /// Ground ring lifted to `elevation`, closed
    pub fn ring_at(ring: &[Point2<f64>], elevation: f64) -> Self {
        Self::closed(ring.iter().map(|p| ground(*p, elevation)))
    }

    /// Ground points lifted to `elevation`, open
    pub fn polyline_at(points: &[Point2<f64>], elevation: f64) -> Self {
        Self::open(points.iter().map(|p| ground(*p, elevation)))
    }

    /// Segments making up the line, including the closing one for loops
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        let count = match (n, self.closed) {
            (0 | 1, _) => 0,
            (2, _) | (_, false) => n - 1,
            (_, true) => n,
        };
        (0..count).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Vertices as drawn, with the first point repeated for loops
    pub fn drawn_points(&self) -> Vec<Point3<f64>> {
        let mut pts: Vec<Point3<f64>> = self.points.to_vec();
        if self.closed && self.points.len() > 2 {
            pts.push(self.points[0]);
        }
        pts
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        for p in self.points.iter_mut() {
            *p += offset;
        }
    }
}

/// Unordered collection of polylines drawn with one style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    pub lines: Vec<Polyline>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Polyline) {
        if line.points.len() >= 2 {
            self.lines.push(line);
        }
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.lines.push(Polyline::open([segment.start, segment.end]));
    }

    pub fn extend(&mut self, other: LineSet) {
        self.lines.extend(other.lines);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every segment across all lines
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.lines.iter().flat_map(|l| l.segments())
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        for line in &mut self.lines {
            line.translate(offset);
        }
    }
}

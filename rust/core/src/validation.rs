// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payload consistency checks
//!
//! The viewer renders whatever it can; these checks only report what it will
//! have to skip or what looks inconsistent, so callers can log it.

use crate::model::{GroundPoint, MassingData, Scenario};
use crate::FLOOR_GAP_FT;
use std::fmt;

/// Tolerance for comparing elevations in feet
const ELEVATION_EPSILON: f64 = 1e-6;

/// Ring vertices closer than this, in feet, count as one. Same tolerance and
/// Euclidean test as the geometry crate's profile construction, so a ring
/// reported degenerate here is exactly a ring the viewer skips.
pub const COINCIDENT_EPSILON_FT: f64 = 1e-9;

/// A broken invariant in a massing payload
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A ring with fewer than 3 distinct vertices
    DegeneratePolygon { context: String, distinct_vertices: usize },
    /// Floor too short to survive the rendering seam
    FloorHeightBelowGap { scenario: usize, floor_num: i32, height_ft: f64 },
    DuplicateFloorNum { scenario: usize, floor_num: i32 },
    UnsortedFloors { scenario: usize },
    /// Elevation decreases although `floor_num` increases
    ElevationNotMonotonic { scenario: usize, floor_num: i32 },
    /// Rendered spans of two consecutive floors intersect
    FloorsOverlap { scenario: usize, lower: i32, upper: i32 },
    NetExceedsGross { scenario: usize, floor_num: i32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegeneratePolygon { context, distinct_vertices } => write!(
                f,
                "{} has {} distinct vertices (need at least 3)",
                context, distinct_vertices
            ),
            Self::FloorHeightBelowGap { scenario, floor_num, height_ft } => write!(
                f,
                "scenario {} floor {} height {:.2} ft does not exceed the {:.1} ft seam",
                scenario, floor_num, height_ft, FLOOR_GAP_FT
            ),
            Self::DuplicateFloorNum { scenario, floor_num } => {
                write!(f, "scenario {} repeats floor {}", scenario, floor_num)
            }
            Self::UnsortedFloors { scenario } => {
                write!(f, "scenario {} floors are not sorted by floor_num", scenario)
            }
            Self::ElevationNotMonotonic { scenario, floor_num } => write!(
                f,
                "scenario {} floor {} sits below the floor before it",
                scenario, floor_num
            ),
            Self::FloorsOverlap { scenario, lower, upper } => write!(
                f,
                "scenario {} floors {} and {} overlap vertically",
                scenario, lower, upper
            ),
            Self::NetExceedsGross { scenario, floor_num } => write!(
                f,
                "scenario {} floor {} net area exceeds gross area",
                scenario, floor_num
            ),
        }
    }
}

/// Check a whole payload. An empty result means every invariant holds.
pub fn validate(data: &MassingData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_ring("lot polygon", &data.lot.polygon, &mut issues);

    for (index, scenario) in data.scenarios.iter().enumerate() {
        issues.extend(validate_scenario(index, scenario));
    }

    issues
}

/// Check one scenario's floors and bulkhead
pub fn validate_scenario(index: usize, scenario: &Scenario) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let floors = &scenario.floors;

    if floors.windows(2).any(|w| w[0].floor_num > w[1].floor_num) {
        issues.push(ValidationIssue::UnsortedFloors { scenario: index });
    }

    for floor in floors {
        check_ring(
            &format!("scenario {} floor {} footprint", index, floor.floor_num),
            &floor.footprint,
            &mut issues,
        );

        if floor.height_ft <= FLOOR_GAP_FT {
            issues.push(ValidationIssue::FloorHeightBelowGap {
                scenario: index,
                floor_num: floor.floor_num,
                height_ft: floor.height_ft,
            });
        }

        if floor.net_area_sf > floor.gross_area_sf {
            issues.push(ValidationIssue::NetExceedsGross {
                scenario: index,
                floor_num: floor.floor_num,
            });
        }
    }

    // Pairwise checks run in floor_num order regardless of payload order
    let mut ordered: Vec<_> = floors.iter().collect();
    ordered.sort_by_key(|f| f.floor_num);

    for pair in ordered.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);

        if lower.floor_num == upper.floor_num {
            issues.push(ValidationIssue::DuplicateFloorNum {
                scenario: index,
                floor_num: upper.floor_num,
            });
            continue;
        }

        if upper.elevation_ft + ELEVATION_EPSILON < lower.elevation_ft {
            issues.push(ValidationIssue::ElevationNotMonotonic {
                scenario: index,
                floor_num: upper.floor_num,
            });
            continue;
        }

        // Rendered spans are [e + gap/2, e + h - gap/2]
        let lower_top = lower.top_ft() - FLOOR_GAP_FT / 2.0;
        let upper_base = upper.elevation_ft + FLOOR_GAP_FT / 2.0;
        if upper_base + ELEVATION_EPSILON < lower_top {
            issues.push(ValidationIssue::FloorsOverlap {
                scenario: index,
                lower: lower.floor_num,
                upper: upper.floor_num,
            });
        }
    }

    if let Some(bulkhead) = &scenario.bulkhead {
        check_ring(
            &format!("scenario {} bulkhead footprint", index),
            &bulkhead.footprint,
            &mut issues,
        );
    }

    issues
}

fn check_ring(context: &str, ring: &[GroundPoint], issues: &mut Vec<ValidationIssue>) {
    let distinct = distinct_vertex_count(ring);
    if distinct < 3 {
        issues.push(ValidationIssue::DegeneratePolygon {
            context: context.to_string(),
            distinct_vertices: distinct,
        });
    }
}

/// Count vertices that differ from every vertex before them
fn distinct_vertex_count(ring: &[GroundPoint]) -> usize {
    let mut seen: Vec<GroundPoint> = Vec::with_capacity(ring.len());
    for p in ring {
        let duplicate = seen
            .iter()
            .any(|q| (q[0] - p[0]).hypot(q[1] - p[1]) < COINCIDENT_EPSILON_FT);
        if !duplicate {
            seen.push(*p);
        }
    }
    seen.len()
}

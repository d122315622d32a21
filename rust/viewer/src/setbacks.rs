// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Required-yard shading and the backend's buildable footprint
//!
//! Yard depths come from the envelope (`front_yard_ft`, `rear_yard_ft`).
//! The front yard runs along the lot's street side (min z), the rear yard
//! along the far side (max z). A missing or non-positive depth draws
//! nothing for that yard.

use crate::drawable::{Lines, Material, Surface, GRADE_LIFT_FT};
use crate::lot::LotGeometry;
use crate::palette;
use massing_lite_core::{BuildableFootprint, ZoningEnvelope};
use massing_lite_geometry::{
    cap_mesh, subtract_2d, GroundBounds, Point2, Polyline, Profile2D, Vector3,
};
use tracing::debug;

const YARD_OPACITY: f32 = 0.2;
const BUILDABLE_OPACITY: f32 = 0.2;
/// Sits above the lot fill
const BUILDABLE_LIFT_FT: f64 = 2.0 * GRADE_LIFT_FT;

/// Shaded yard strips and the buildable area left between them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YardShading {
    pub front: Option<Surface>,
    pub rear: Option<Surface>,
    /// Lot outline minus the yards
    pub buildable_outline: Option<Lines>,
}

impl YardShading {
    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.rear.is_none()
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.front.iter().chain(self.rear.iter())
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        for surface in [&mut self.front, &mut self.rear].into_iter().flatten() {
            surface.translate(offset);
        }
        if let Some(outline) = &mut self.buildable_outline {
            outline.translate(offset);
        }
    }
}

/// Shade the required yards of `lot` using the envelope's yard depths
pub fn shade_yards(envelope: Option<&ZoningEnvelope>, lot: &LotGeometry) -> YardShading {
    let Some(envelope) = envelope else {
        return YardShading::default();
    };
    let bounds = &lot.bounds;
    if !bounds.has_area() {
        return YardShading::default();
    }

    let front = yard_depth(envelope.front_yard_ft, bounds).map(|d| {
        GroundBounds::new(bounds.min, Point2::new(bounds.max.x, bounds.min.y + d))
    });
    let rear = yard_depth(envelope.rear_yard_ft, bounds).map(|d| {
        GroundBounds::new(Point2::new(bounds.min.x, bounds.max.y - d), bounds.max)
    });

    let mut shading = YardShading {
        front: front.and_then(|strip| yard_surface("yard.front", &strip)),
        rear: rear.and_then(|strip| yard_surface("yard.rear", &strip)),
        buildable_outline: None,
    };

    if let Some(lot_profile) = &lot.profile {
        shading.buildable_outline = buildable_area(lot_profile, [front, rear]).map(|area| {
            Lines::single(
                "yard.buildable",
                Polyline::ring_at(&area.outer, GRADE_LIFT_FT),
                palette::rgba(palette::YARD, 1.0),
            )
            .dashed()
        });
    }

    shading
}

/// Buildable footprint as computed by the backend, flat at grade
#[derive(Debug, Clone, PartialEq)]
pub struct BuildableOverlay {
    pub fill: Surface,
    pub outline: Lines,
    pub area_sf: f64,
}

impl BuildableOverlay {
    /// `None` when the polygon has fewer than three distinct vertices
    pub fn build(footprint: &BuildableFootprint) -> Option<Self> {
        let Some(profile) = Profile2D::from_ring(&footprint.polygon) else {
            debug!("Skipping degenerate buildable footprint");
            return None;
        };
        let mesh = match cap_mesh(&profile, BUILDABLE_LIFT_FT) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(%err, "Skipping buildable footprint");
                return None;
            }
        };

        Some(Self {
            fill: Surface::overlay(
                "buildable.fill",
                mesh,
                Material::translucent(palette::BUILDABLE, BUILDABLE_OPACITY),
            ),
            outline: Lines::single(
                "buildable.outline",
                Polyline::ring_at(&profile.outer, BUILDABLE_LIFT_FT),
                palette::rgba(palette::BUILDABLE, 0.5),
            )
            .dashed(),
            area_sf: footprint.area_sf,
        })
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.fill.translate(offset);
        self.outline.translate(offset);
    }
}

/// Positive yard depth, clamped to the lot depth
fn yard_depth(depth: Option<f64>, bounds: &GroundBounds) -> Option<f64> {
    depth.filter(|d| *d > 0.0).map(|d| d.min(bounds.depth()))
}

fn yard_surface(name: &'static str, strip: &GroundBounds) -> Option<Surface> {
    match cap_mesh(&Profile2D::rectangle(strip), GRADE_LIFT_FT) {
        Ok(mesh) => Some(Surface::overlay(
            name,
            mesh,
            Material::translucent(palette::YARD, YARD_OPACITY),
        )),
        Err(err) => {
            debug!(%err, name, "Skipping yard strip");
            None
        }
    }
}

/// Lot profile with each yard strip cut away; `None` when no yard applies
/// or the yards consume the lot
fn buildable_area(lot: &Profile2D, yards: [Option<GroundBounds>; 2]) -> Option<Profile2D> {
    let mut area: Option<Profile2D> = None;
    for strip in yards.into_iter().flatten() {
        let current = area.as_ref().unwrap_or(lot);
        match subtract_2d(current, &strip.corners()) {
            Ok(rest) => area = Some(rest),
            Err(err) => {
                debug!(%err, "Yards leave no buildable area");
                return None;
            }
        }
    }
    area
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zoning envelope projection
//!
//! Turns a [`ZoningEnvelope`] and the lot extent into translucent overlay
//! surfaces and reference lines. Nothing produced here is pickable.

use crate::drawable::{Lines, Material, Surface, GRADE_LIFT_FT};
use crate::lot::LotGeometry;
use crate::palette;
use massing_lite_core::ZoningEnvelope;
use massing_lite_geometry::{
    cap_mesh, frame, GroundBounds, LineSet, Mesh, Point2, Polyline, Profile2D, Segment, Vector3,
};
use tracing::debug;

/// Visual margin, in feet, added around the lot extent for envelope planes
pub const ENVELOPE_MARGIN_FT: f64 = 5.0;

/// Highest far-edge elevation drawn for a sky exposure plane.
///
/// This is a rendering clamp that keeps steep planes from producing
/// degenerate, far-off geometry. It is not a zoning rule.
pub const SKY_EXPOSURE_RENDER_CAP_FT: f64 = 300.0;

const PLANE_OPACITY: f32 = 0.12;
const EDGE_OPACITY: f32 = 0.5;
const SKY_OPACITY: f32 = 0.15;

/// Horizontal height-limit plane with its outline
#[derive(Debug, Clone, PartialEq)]
pub struct HeightPlane {
    pub elevation: f64,
    pub surface: Surface,
    pub outline: Lines,
}

/// Setback line drawn at grade and, when a base height exists, again at the
/// base height with a vertical connector at its first vertex
#[derive(Debug, Clone, PartialEq)]
pub struct SetbackLines {
    pub at_grade: Lines,
    pub at_base: Option<Lines>,
    pub connector: Option<Lines>,
}

/// Sloped sky exposure plane
#[derive(Debug, Clone, PartialEq)]
pub struct SkyExposureSurface {
    pub start_height: f64,
    /// Far-edge elevation after the render clamp
    pub far_height: f64,
    pub surface: Surface,
}

/// Everything drawn for one zoning envelope
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeOverlay {
    pub max_height: HeightPlane,
    pub base_height: Option<HeightPlane>,
    pub corner_edges: Lines,
    pub setback: Option<SetbackLines>,
    pub sky_exposure: Option<SkyExposureSurface>,
}

impl EnvelopeOverlay {
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.max_height.translate(offset);
        if let Some(base) = &mut self.base_height {
            base.translate(offset);
        }
        self.corner_edges.translate(offset);
        if let Some(setback) = &mut self.setback {
            setback.at_grade.translate(offset);
            for lines in [&mut setback.at_base, &mut setback.connector].into_iter().flatten() {
                lines.translate(offset);
            }
        }
        if let Some(sky) = &mut self.sky_exposure {
            sky.surface.translate(offset);
        }
    }

    /// Surfaces in draw order
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        std::iter::once(&self.max_height.surface)
            .chain(self.base_height.as_ref().map(|b| &b.surface))
            .chain(self.sky_exposure.as_ref().map(|s| &s.surface))
    }

    /// Line overlays in draw order
    pub fn lines(&self) -> impl Iterator<Item = &Lines> {
        let setback = self.setback.as_ref();
        std::iter::once(&self.max_height.outline)
            .chain(self.base_height.as_ref().map(|b| &b.outline))
            .chain(std::iter::once(&self.corner_edges))
            .chain(setback.map(|s| &s.at_grade))
            .chain(setback.and_then(|s| s.at_base.as_ref()))
            .chain(setback.and_then(|s| s.connector.as_ref()))
    }
}

impl HeightPlane {
    fn new(name: &'static str, bounds: &GroundBounds, elevation: f64, hex: u32) -> Option<Self> {
        let profile = Profile2D::rectangle(bounds);
        let mesh = match cap_mesh(&profile, elevation) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(%err, name, "Skipping height plane");
                return None;
            }
        };

        Some(Self {
            elevation,
            surface: Surface::overlay(name, mesh, Material::translucent(hex, PLANE_OPACITY)),
            outline: Lines::single(
                name,
                Polyline::ring_at(&profile.outer, elevation),
                palette::rgba(hex, EDGE_OPACITY),
            ),
        })
    }

    fn translate(&mut self, offset: Vector3<f64>) {
        self.surface.translate(offset);
        self.outline.translate(offset);
    }
}

/// Project a zoning envelope over the lot.
///
/// Returns `None` when the lot has no extent or the envelope has no
/// positive maximum height; there is nothing meaningful to draw then.
pub fn project_envelope(envelope: &ZoningEnvelope, lot: &LotGeometry) -> Option<EnvelopeOverlay> {
    if !lot.bounds.has_area() {
        debug!("Skipping envelope: lot has no extent");
        return None;
    }
    if envelope.max_height_ft.is_nan() || envelope.max_height_ft <= 0.0 {
        debug!(max_height_ft = envelope.max_height_ft, "Skipping envelope: no height limit");
        return None;
    }

    let outer = lot.bounds.expand(ENVELOPE_MARGIN_FT);
    let max_height = HeightPlane::new(
        "envelope.max_height",
        &outer,
        envelope.max_height_ft,
        palette::ENVELOPE,
    )?;

    let base_height = envelope.base_height_step().and_then(|base| {
        HeightPlane::new("envelope.base_height", &outer, base, palette::BASE_HEIGHT)
    });

    let mut corners = LineSet::new();
    for corner in outer.corners() {
        corners.push_segment(Segment::vertical(corner, 0.0, envelope.max_height_ft));
    }
    let corner_edges = Lines::new(
        "envelope.corners",
        corners,
        palette::rgba(palette::ENVELOPE, EDGE_OPACITY),
    );

    Some(EnvelopeOverlay {
        max_height,
        base_height,
        corner_edges,
        setback: setback_lines(envelope),
        sky_exposure: sky_exposure_surface(envelope, &lot.bounds),
    })
}

fn setback_lines(envelope: &ZoningEnvelope) -> Option<SetbackLines> {
    let points: Vec<_> = envelope
        .setback_line
        .as_deref()?
        .iter()
        .copied()
        .map(frame::point)
        .collect();

    if points.len() < 2 {
        debug!(points = points.len(), "Skipping setback line");
        return None;
    }

    let color = palette::rgba(palette::ENVELOPE, 1.0);
    let at_grade = Lines::single(
        "setback.grade",
        Polyline::polyline_at(&points, GRADE_LIFT_FT),
        color,
    )
    .dashed();

    // Without a positive base height there is no step to show
    let base = envelope.base_height_max_ft.filter(|b| *b > 0.0);
    let at_base = base.map(|b| {
        Lines::single("setback.base", Polyline::polyline_at(&points, b), color).dashed()
    });
    let connector = base.map(|b| {
        Lines::single(
            "setback.connector",
            Polyline::open([
                frame::ground(points[0], GRADE_LIFT_FT),
                frame::ground(points[0], b),
            ]),
            color,
        )
    });

    Some(SetbackLines {
        at_grade,
        at_base,
        connector,
    })
}

/// Far-edge elevation of a sky exposure plane over `depth` feet
pub fn sky_exposure_far_height(start_height: f64, rise_per_foot: f64, depth: f64) -> f64 {
    (start_height + depth * rise_per_foot).min(SKY_EXPOSURE_RENDER_CAP_FT)
}

fn sky_exposure_surface(
    envelope: &ZoningEnvelope,
    bounds: &GroundBounds,
) -> Option<SkyExposureSurface> {
    let plane = envelope.sky_exposure_plane.as_ref()?;
    let start = plane.start_height;
    let far = sky_exposure_far_height(start, plane.rise_per_foot(), bounds.depth());

    // Rises from the street side (min z) toward the rear (max z)
    let (min, max) = (bounds.min, bounds.max);
    let mesh = Mesh::from_quad([
        frame::ground(min, start),
        frame::ground(Point2::new(min.x, max.y), far),
        frame::ground(max, far),
        frame::ground(Point2::new(max.x, min.y), start),
    ]);

    Some(SkyExposureSurface {
        start_height: start,
        far_height: far,
        surface: Surface::overlay(
            "envelope.sky_exposure",
            mesh,
            Material::translucent(palette::SKY_EXPOSURE, SKY_OPACITY),
        ),
    })
}

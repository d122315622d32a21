// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderable scene elements handed to the host 3D engine

use crate::palette::{self, Rgba};
use massing_lite_geometry::{LineSet, Mesh, Point3, Polyline, Vector3};
use serde::Serialize;

/// Grade-level overlays sit this far above y = 0 to avoid z-fighting with
/// the ground plane
pub const GRADE_LIFT_FT: f64 = 0.05;

/// Whether a surface takes part in pointer picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickBehavior {
    /// Pointer rays pass straight through
    Ignore,
    /// Hit-testable floor solid
    Solid,
    /// Stops rays without being reported (the bulkhead)
    Occluder,
}

/// Surface appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    pub color: Rgba,
    pub opacity: f32,
    pub emissive: Option<Rgba>,
    /// Render both faces (flat translucent planes)
    pub double_sided: bool,
}

impl Material {
    /// Opaque single-sided material
    pub fn solid(color: Rgba) -> Self {
        Self {
            color,
            opacity: 1.0,
            emissive: None,
            double_sided: false,
        }
    }

    /// Translucent double-sided material
    pub fn translucent(hex: u32, opacity: f32) -> Self {
        Self {
            color: palette::rgba(hex, opacity),
            opacity,
            emissive: None,
            double_sided: true,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Filled triangle surface
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: &'static str,
    pub mesh: Mesh,
    pub material: Material,
    pub pick: PickBehavior,
}

impl Surface {
    /// Non-interactive overlay surface
    pub fn overlay(name: &'static str, mesh: Mesh, material: Material) -> Self {
        Self {
            name,
            mesh,
            material,
            pick: PickBehavior::Ignore,
        }
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.mesh.translate(offset);
    }
}

/// Line overlay drawn with one color
#[derive(Debug, Clone, PartialEq)]
pub struct Lines {
    pub name: &'static str,
    pub lines: LineSet,
    pub color: Rgba,
    pub dashed: bool,
}

impl Lines {
    pub fn new(name: &'static str, lines: LineSet, color: Rgba) -> Self {
        Self {
            name,
            lines,
            color,
            dashed: false,
        }
    }

    /// Single polyline overlay
    pub fn single(name: &'static str, line: Polyline, color: Rgba) -> Self {
        let mut lines = LineSet::new();
        lines.push(line);
        Self::new(name, lines, color)
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.lines.translate(offset);
    }
}

/// Floating text anchored in world space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub anchor: [f64; 3],
    pub color: Rgba,
}

impl Label {
    pub fn new(text: impl Into<String>, anchor: Point3<f64>) -> Self {
        Self {
            text: text.into(),
            anchor: [anchor.x, anchor.y, anchor.z],
            color: palette::rgba(palette::ANNOTATION, 1.0),
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn anchor(&self) -> Point3<f64> {
        Point3::new(self.anchor[0], self.anchor[1], self.anchor[2])
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.anchor[0] += offset.x;
        self.anchor[1] += offset.y;
        self.anchor[2] += offset.z;
    }
}

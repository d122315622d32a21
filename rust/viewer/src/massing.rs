// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing builder
//!
//! One extruded solid per floor plus one for the bulkhead. Floors are
//! shortened by [`FLOOR_GAP_FT`] and lifted by half of it so stacked floors
//! keep a visible seam:
//!
//! ```text
//! top    = elevation_ft + height_ft - GAP/2
//! bottom = elevation_ft + GAP/2
//! ```

use crate::drawable::{Label, Lines, Material, PickBehavior};
use crate::interaction::{FloorEvent, FloorInteraction, FloorKey, HoverState};
use crate::palette::{self, Rgba};
use crate::picking::{ray_mesh, Ray};
use massing_lite_core::{Bulkhead, Floor, FloorUse, Scenario, FLOOR_GAP_FT};
use massing_lite_geometry::{
    extrude_profile, extrusion_edges, GroundBounds, Mesh, Point3, Profile2D, Vector3,
};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Distance, in feet, between a floor label and the footprint's min-x edge
pub const LABEL_OFFSET_FT: f64 = 2.0;

/// Extruded solid for one floor
#[derive(Debug, Clone, PartialEq)]
pub struct FloorSolid {
    pub key: FloorKey,
    pub use_type: FloorUse,
    pub mesh: Mesh,
    /// Edges-only overlay of the same solid
    pub wireframe: Lines,
    pub label: Label,
    pub color: Rgba,
    pub hover: HoverState,
    pub footprint_bounds: GroundBounds,
}

impl FloorSolid {
    /// Build the solid for `floor`, or `None` when its footprint or height
    /// cannot produce a volume
    pub fn build(scenario: usize, floor: &Floor) -> Option<Self> {
        let Some(profile) = Profile2D::from_ring(&floor.footprint) else {
            debug!(floor_num = floor.floor_num, "Skipping floor with degenerate footprint");
            return None;
        };

        let base = floor.elevation_ft + FLOOR_GAP_FT / 2.0;
        let height = floor.height_ft - FLOOR_GAP_FT;
        let mesh = match extrude_profile(&profile, base, height) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(floor_num = floor.floor_num, %err, "Skipping floor");
                return None;
            }
        };

        let footprint_bounds = profile.bounds()?;
        let anchor = Point3::new(
            footprint_bounds.min.x - LABEL_OFFSET_FT,
            floor.elevation_ft + floor.height_ft / 2.0,
            footprint_bounds.center().y,
        );

        Some(Self {
            key: FloorKey::new(scenario, floor.floor_num),
            use_type: floor.use_type.clone(),
            mesh,
            wireframe: Lines::new(
                "floor.wireframe",
                extrusion_edges(&profile, base, height),
                palette::rgba(palette::WIREFRAME, palette::WIREFRAME_OPACITY),
            ),
            label: Label::new(format!("F{}", floor.floor_num), anchor),
            color: palette::use_color(&floor.use_type),
            hover: HoverState::default(),
            footprint_bounds,
        })
    }

    #[inline]
    pub fn floor_num(&self) -> i32 {
        self.key.floor_num
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.hover.is_highlighted()
    }

    /// Current surface material, reflecting the highlight state
    pub fn material(&self) -> Material {
        let mut material = Material::solid(self.color);
        if self.is_highlighted() {
            material.opacity = palette::HIGHLIGHT_OPACITY;
            material.color[3] = palette::HIGHLIGHT_OPACITY;
            material.emissive = Some(palette::HIGHLIGHT_EMISSIVE);
        }
        material
    }

    pub fn pick_behavior(&self) -> PickBehavior {
        PickBehavior::Solid
    }

    fn translate(&mut self, offset: Vector3<f64>) {
        self.mesh.translate(offset);
        self.wireframe.translate(offset);
        self.label.translate(offset);
        self.footprint_bounds = self.footprint_bounds.translate(offset.x, offset.z);
    }
}

impl FloorInteraction for FloorSolid {
    fn floor_key(&self) -> FloorKey {
        self.key
    }

    fn on_hover_change(&mut self, hovered: bool) -> FloorEvent {
        self.hover.locally_hovered = hovered;
        if hovered {
            FloorEvent::HoverBegin(self.key)
        } else {
            FloorEvent::HoverEnd(self.key)
        }
    }
}

/// Rooftop bulkhead volume; no gap, occludes but is never reported
#[derive(Debug, Clone, PartialEq)]
pub struct BulkheadSolid {
    pub mesh: Mesh,
    pub wireframe: Lines,
    pub color: Rgba,
}

impl BulkheadSolid {
    pub fn pick_behavior(&self) -> PickBehavior {
        PickBehavior::Occluder
    }

    pub fn build(bulkhead: &Bulkhead) -> Option<Self> {
        let Some(profile) = Profile2D::from_ring(&bulkhead.footprint) else {
            debug!("Skipping bulkhead with degenerate footprint");
            return None;
        };

        let mesh = match extrude_profile(&profile, bulkhead.elevation_ft, bulkhead.height_ft) {
            Ok(mesh) => mesh,
            Err(err) => {
                debug!(%err, "Skipping bulkhead");
                return None;
            }
        };

        Some(Self {
            mesh,
            wireframe: Lines::new(
                "bulkhead.wireframe",
                extrusion_edges(&profile, bulkhead.elevation_ft, bulkhead.height_ft),
                palette::rgba(palette::WIREFRAME, palette::WIREFRAME_OPACITY),
            ),
            color: palette::use_color(&FloorUse::Mechanical),
        })
    }
}

/// Result of a pick against the building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorHit {
    pub key: FloorKey,
    pub distance: f64,
}

/// All solids derived from one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingModel {
    pub scenario: usize,
    pub floors: Vec<FloorSolid>,
    pub bulkhead: Option<BulkheadSolid>,
    by_floor_num: FxHashMap<i32, usize>,
}

impl BuildingModel {
    /// Build every floor and the bulkhead of `scenario`. Floors that cannot
    /// be extruded are skipped.
    pub fn build(scenario_index: usize, scenario: &Scenario) -> Self {
        let floors: Vec<FloorSolid> = scenario
            .floors
            .iter()
            .filter_map(|floor| FloorSolid::build(scenario_index, floor))
            .collect();

        let by_floor_num = floors
            .iter()
            .enumerate()
            .map(|(i, solid)| (solid.floor_num(), i))
            .collect();

        debug!(
            scenario = %scenario.name,
            floors = floors.len(),
            skipped = scenario.floors.len() - floors.len(),
            "Built massing"
        );

        Self {
            scenario: scenario_index,
            floors,
            bulkhead: scenario.bulkhead.as_ref().and_then(BulkheadSolid::build),
            by_floor_num,
        }
    }

    pub fn floor(&self, floor_num: i32) -> Option<&FloorSolid> {
        self.by_floor_num.get(&floor_num).map(|&i| &self.floors[i])
    }

    pub fn floor_mut(&mut self, floor_num: i32) -> Option<&mut FloorSolid> {
        let i = *self.by_floor_num.get(&floor_num)?;
        self.floors.get_mut(i)
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty() && self.bulkhead.is_none()
    }

    /// Nearest floor solid hit by `ray`.
    ///
    /// Only the nearest floor is reported, so a pointer event never reaches
    /// floors stacked behind it. The bulkhead occludes floors but is not
    /// itself reported.
    pub fn pick(&self, ray: &Ray) -> Option<FloorHit> {
        let floors = self
            .floors
            .iter()
            .map(|s| (s.pick_behavior(), Some(s.key), &s.mesh));
        let bulkhead = self
            .bulkhead
            .iter()
            .map(|b| (b.pick_behavior(), None, &b.mesh));

        // Floors come first so they win exact ties with the bulkhead
        let (behavior, key, distance) = floors
            .chain(bulkhead)
            .filter(|(behavior, _, _)| *behavior != PickBehavior::Ignore)
            .filter_map(|(behavior, key, mesh)| {
                ray_mesh(ray, mesh).map(|distance| (behavior, key, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))?;

        match (behavior, key) {
            (PickBehavior::Solid, Some(key)) => Some(FloorHit { key, distance }),
            _ => None,
        }
    }

    /// Push hover state into every solid
    pub fn sync_hover(&mut self, hovered: Option<FloorKey>, pointer: Option<FloorKey>) {
        for solid in &mut self.floors {
            solid.hover = HoverState {
                externally_highlighted: hovered == Some(solid.key),
                locally_hovered: pointer == Some(solid.key),
            };
        }
    }

    /// Ground extent of all floor footprints
    pub fn footprint_bounds(&self) -> Option<GroundBounds> {
        self.floors
            .iter()
            .map(|s| s.footprint_bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Highest point of any solid
    pub fn roof_elevation(&self) -> f64 {
        self.floors
            .iter()
            .map(|s| &s.mesh)
            .chain(self.bulkhead.as_ref().map(|b| &b.mesh))
            .filter_map(Mesh::vertical_extent)
            .map(|(_, top)| top)
            .fold(0.0, f64::max)
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        for solid in &mut self.floors {
            solid.translate(offset);
        }
        if let Some(bulkhead) = &mut self.bulkhead {
            bulkhead.mesh.translate(offset);
            bulkhead.wireframe.translate(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor(num: i32, use_type: &str, elevation: f64, height: f64) -> Floor {
        Floor {
            floor_num: num,
            use_type: FloorUse::from(use_type.to_string()),
            elevation_ft: elevation,
            height_ft: height,
            footprint: vec![[0.0, 0.0], [50.0, 0.0], [50.0, 100.0], [0.0, 100.0]],
            gross_area_sf: 5000.0,
            net_area_sf: 4250.0,
            setback_from_street_ft: 0.0,
            setback_from_rear_ft: 30.0,
            plate_area_sf: None,
            is_penthouse: false,
            color: None,
        }
    }

    #[test]
    fn test_floor_gap() {
        let solid = FloorSolid::build(0, &floor(2, "residential", 15.0, 10.0)).unwrap();
        let (bottom, top) = solid.mesh.vertical_extent().unwrap();
        assert_relative_eq!(bottom, 15.15, epsilon = 1e-5);
        assert_relative_eq!(top, 24.85, epsilon = 1e-5);
        assert_eq!(solid.color, palette::use_color(&FloorUse::Residential));
        assert_eq!(solid.pick_behavior(), PickBehavior::Solid);
    }

    #[test]
    fn test_bulkhead_occludes() {
        let bulkhead = BulkheadSolid::build(&Bulkhead {
            footprint: vec![[20.0, 40.0], [30.0, 40.0], [30.0, 50.0], [20.0, 50.0]],
            height_ft: 12.0,
            elevation_ft: 15.0,
            area_sf: None,
            color: None,
        })
        .unwrap();
        assert_eq!(bulkhead.pick_behavior(), PickBehavior::Occluder);
    }

    #[test]
    fn test_label_anchor() {
        let solid = FloorSolid::build(0, &floor(3, "residential", 25.0, 10.0)).unwrap();
        assert_eq!(solid.label.text, "F3");
        assert_eq!(solid.label.anchor, [-2.0, 30.0, 50.0]);
    }

    #[test]
    fn test_too_short_floor_skipped() {
        assert!(FloorSolid::build(0, &floor(1, "commercial", 0.0, FLOOR_GAP_FT)).is_none());
        let mut f = floor(1, "commercial", 0.0, 15.0);
        f.footprint.truncate(2);
        assert!(FloorSolid::build(0, &f).is_none());
    }

    #[test]
    fn test_highlight_material() {
        let mut solid = FloorSolid::build(0, &floor(1, "commercial", 0.0, 15.0)).unwrap();
        assert_eq!(solid.material().opacity, 1.0);

        let event = solid.on_hover_change(true);
        assert_eq!(event, FloorEvent::HoverBegin(solid.key));
        let material = solid.material();
        assert_eq!(material.opacity, palette::HIGHLIGHT_OPACITY);
        assert!(material.emissive.is_some());

        assert_eq!(solid.on_hover_change(false), FloorEvent::HoverEnd(solid.key));
        assert!(!solid.is_highlighted());
        assert_eq!(solid.on_select(), FloorEvent::Select(solid.key));
    }
}

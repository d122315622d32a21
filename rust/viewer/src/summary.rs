// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable digest of a composed scene, for export and inspection

use crate::drawable::Label;
use crate::palette;
use crate::scene::{Scene, SceneMode, ScenePanel};
use massing_lite_geometry::{GroundBounds, Mesh};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub mode: &'static str,
    pub camera_target: [f64; 3],
    pub camera_position: [f64; 3],
    pub panels: Vec<PanelSummary>,
    pub labels: Vec<Label>,
    pub legend: Vec<LegendSummary>,
    /// Total-height dimension, single mode only
    pub height_dimension_ft: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendSummary {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelSummary {
    pub scenario: usize,
    pub name: String,
    /// `[min_x, min_z, max_x, max_z]`
    pub lot_bounds: [f64; 4],
    pub buildable_area_sf: Option<f64>,
    pub floors: Vec<FloorSummary>,
    pub bulkhead: Option<VolumeSummary>,
    pub envelope: Option<EnvelopeSummary>,
    pub yards: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloorSummary {
    pub floor_num: i32,
    #[serde(rename = "use")]
    pub use_type: String,
    pub color: String,
    pub bottom_ft: f64,
    pub top_ft: f64,
    pub triangles: usize,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeSummary {
    pub bottom_ft: f64,
    pub top_ft: f64,
    pub triangles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeSummary {
    pub max_height_ft: f64,
    pub base_height_ft: Option<f64>,
    pub setback_line: bool,
    pub setback_at_base: bool,
    pub sky_exposure_far_ft: Option<f64>,
}

impl SceneSummary {
    pub fn from_scene(scene: &Scene) -> Self {
        let (target, position) = (scene.camera.target, scene.camera.position);
        Self {
            mode: match scene.mode {
                SceneMode::Single => "single",
                SceneMode::Comparison => "comparison",
            },
            camera_target: [target.x, target.y, target.z],
            camera_position: [position.x, position.y, position.z],
            panels: scene.panels.iter().map(PanelSummary::from_panel).collect(),
            labels: scene.labels().into_iter().cloned().collect(),
            legend: scene
                .legend()
                .into_iter()
                .map(|entry| LegendSummary {
                    label: entry.label,
                    color: palette::to_hex_string(entry.color),
                })
                .collect(),
            height_dimension_ft: scene
                .annotations
                .as_ref()
                .and_then(|a| a.dimensions.as_ref())
                .map(|d| d.height_ft),
        }
    }
}

impl PanelSummary {
    fn from_panel(panel: &ScenePanel) -> Self {
        let floors = panel
            .building
            .floors
            .iter()
            .map(|solid| {
                let (bottom_ft, top_ft) = extent(&solid.mesh);
                FloorSummary {
                    floor_num: solid.floor_num(),
                    use_type: solid.use_type.to_string(),
                    color: palette::to_hex_string(solid.color),
                    bottom_ft,
                    top_ft,
                    triangles: solid.mesh.triangle_count(),
                    highlighted: solid.is_highlighted(),
                }
            })
            .collect();

        let bulkhead = panel.building.bulkhead.as_ref().map(|b| {
            let (bottom_ft, top_ft) = extent(&b.mesh);
            VolumeSummary {
                bottom_ft,
                top_ft,
                triangles: b.mesh.triangle_count(),
            }
        });

        let envelope = panel.envelope.as_ref().map(|env| EnvelopeSummary {
            max_height_ft: env.max_height.elevation,
            base_height_ft: env.base_height.as_ref().map(|b| b.elevation),
            setback_line: env.setback.is_some(),
            setback_at_base: env.setback.as_ref().is_some_and(|s| s.at_base.is_some()),
            sky_exposure_far_ft: env.sky_exposure.as_ref().map(|s| s.far_height),
        });

        let mut yards = Vec::new();
        if let Some(shading) = &panel.yards {
            if shading.front.is_some() {
                yards.push("front");
            }
            if shading.rear.is_some() {
                yards.push("rear");
            }
        }

        Self {
            scenario: panel.scenario,
            name: panel.name.clone(),
            lot_bounds: bounds_array(&panel.lot_bounds),
            buildable_area_sf: panel.buildable.as_ref().map(|b| b.area_sf),
            floors,
            bulkhead,
            envelope,
            yards,
        }
    }
}

fn extent(mesh: &Mesh) -> (f64, f64) {
    mesh.vertical_extent().unwrap_or((0.0, 0.0))
}

fn bounds_array(bounds: &GroundBounds) -> [f64; 4] {
    [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y]
}

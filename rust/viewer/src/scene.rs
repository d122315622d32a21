// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene composition
//!
//! A [`Scene`] is a pure function of the payload and the [`ViewState`]
//! scenario choice and toggles. [`Composer`] memoizes the last scene so
//! re-running composition with the same inputs is free and returns the
//! same result.

use crate::annotations::{annotate, dimension_building, Annotations};
use crate::drawable::{Label, Lines, Material, Surface, GRADE_LIFT_FT};
use crate::envelope::{project_envelope, EnvelopeOverlay};
use crate::interaction::{DisplayToggles, FloorKey, ViewState};
use crate::lot::LotGeometry;
use crate::massing::{BuildingModel, FloorHit, FloorSolid};
use crate::palette::{self, Rgba};
use crate::picking::Ray;
use crate::setbacks::{shade_yards, BuildableOverlay, YardShading};
use massing_lite_core::MassingData;
use massing_lite_geometry::{cap_mesh, GroundBounds, Point3, Polyline, Profile2D, Vector3};
use tracing::debug;

/// Camera distance as a multiple of the framed extent
pub const CAMERA_DISTANCE_FACTOR: f64 = 1.8;
/// Oblique viewing direction (right, up, forward) before scaling
pub const CAMERA_DIRECTION: [f64; 3] = [1.0, 0.8, 1.0];
/// Gap between the two lots in comparison mode
pub const COMPARISON_GAP_FT: f64 = 20.0;
/// Ground plane extends this far past the framed extent
pub const GROUND_MARGIN_FT: f64 = 100.0;
/// Height of a panel's name label above its roof
const NAME_LABEL_CLEARANCE_FT: f64 = 15.0;

/// Camera placement for the host engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub target: Point3<f64>,
    pub position: Point3<f64>,
}

impl CameraFraming {
    /// Frame `bounds`: target its center at grade, back off along the
    /// oblique direction in proportion to its larger side
    pub fn frame(bounds: &GroundBounds) -> Self {
        let center = bounds.center();
        let target = Point3::new(center.x, 0.0, center.y);
        let extent = bounds.width().max(bounds.depth());
        let [dx, dy, dz] = CAMERA_DIRECTION;
        let offset = Vector3::new(dx, dy, dz) * CAMERA_DISTANCE_FACTOR * extent;
        Self {
            target,
            position: target + offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMode {
    Single,
    Comparison,
}

/// One scenario's lot, building and overlays
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePanel {
    pub scenario: usize,
    pub name: String,
    pub lot_bounds: GroundBounds,
    pub lot_fill: Option<Surface>,
    pub lot_outline: Option<Lines>,
    /// Backend buildable footprint, shown with the lot
    pub buildable: Option<BuildableOverlay>,
    pub yards: Option<YardShading>,
    pub building: BuildingModel,
    pub envelope: Option<EnvelopeOverlay>,
    /// Floating scenario name, comparison mode only
    pub name_label: Option<Label>,
}

impl ScenePanel {
    fn compose(data: &MassingData, scenario_index: usize, toggles: &DisplayToggles) -> Option<Self> {
        let scenario = data.scenario(scenario_index)?;
        let lot = LotGeometry::from_lot(&data.lot);

        let (lot_fill, lot_outline) = match (&lot.profile, toggles.show_lot) {
            (Some(profile), true) => lot_surfaces(profile),
            _ => (None, None),
        };
        let buildable = data
            .buildable_footprint
            .as_ref()
            .filter(|_| toggles.show_lot)
            .and_then(BuildableOverlay::build);

        let envelope = scenario.zoning_envelope.as_ref();
        let yards = toggles
            .show_setbacks
            .then(|| shade_yards(envelope, &lot))
            .filter(|y| !y.is_empty());

        Some(Self {
            scenario: scenario_index,
            name: scenario.name.clone(),
            lot_bounds: lot.bounds,
            lot_fill,
            lot_outline,
            buildable,
            yards,
            building: BuildingModel::build(scenario_index, scenario),
            envelope: envelope
                .filter(|_| toggles.show_envelope)
                .and_then(|env| project_envelope(env, &lot)),
            name_label: None,
        })
    }

    /// Ground extent of the lot and everything built on it
    pub fn bounds(&self) -> GroundBounds {
        match self.building.footprint_bounds() {
            Some(b) => self.lot_bounds.union(&b),
            None => self.lot_bounds,
        }
    }

    fn translate(&mut self, offset: Vector3<f64>) {
        self.lot_bounds = self.lot_bounds.translate(offset.x, offset.z);
        if let Some(fill) = &mut self.lot_fill {
            fill.translate(offset);
        }
        if let Some(outline) = &mut self.lot_outline {
            outline.translate(offset);
        }
        if let Some(buildable) = &mut self.buildable {
            buildable.translate(offset);
        }
        if let Some(yards) = &mut self.yards {
            yards.translate(offset);
        }
        self.building.translate(offset);
        if let Some(envelope) = &mut self.envelope {
            envelope.translate(offset);
        }
        if let Some(label) = &mut self.name_label {
            label.translate(offset);
        }
    }

    fn attach_name_label(&mut self) {
        let center = self.lot_bounds.center();
        let height = self.building.roof_elevation() + NAME_LABEL_CLEARANCE_FT;
        self.name_label = Some(Label::new(
            self.name.clone(),
            Point3::new(center.x, height, center.y),
        ));
    }
}

fn lot_surfaces(profile: &Profile2D) -> (Option<Surface>, Option<Lines>) {
    let fill = match cap_mesh(profile, GRADE_LIFT_FT) {
        Ok(mesh) => Some(Surface::overlay(
            "lot.fill",
            mesh,
            Material::translucent(palette::LOT_FILL, 0.3),
        )),
        Err(err) => {
            debug!(%err, "Skipping lot fill");
            None
        }
    };
    let outline = Lines::single(
        "lot.outline",
        Polyline::ring_at(&profile.outer, GRADE_LIFT_FT),
        palette::rgba(palette::LOT_EDGE, 0.8),
    );
    (fill, Some(outline))
}

/// Color key entry for one floor use, or the bulkhead
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
}

/// Everything the host engine draws for one view
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub mode: SceneMode,
    pub ground: Surface,
    pub panels: Vec<ScenePanel>,
    /// North arrow, scale bar, street label and building dimensions;
    /// single mode only
    pub annotations: Option<Annotations>,
    pub camera: CameraFraming,
    pub show_labels: bool,
}

impl Scene {
    /// Pointer events reach floors only in single mode
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.mode == SceneMode::Single
    }

    /// Combined ground extent of all panels
    pub fn bounds(&self) -> Option<GroundBounds> {
        self.panels.iter().map(ScenePanel::bounds).reduce(|a, b| a.union(&b))
    }

    /// Nearest floor under `ray`; always `None` for comparison scenes
    pub fn pick(&self, ray: &Ray) -> Option<FloorHit> {
        if !self.is_interactive() {
            return None;
        }
        self.panels
            .iter()
            .filter_map(|panel| panel.building.pick(ray))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    pub fn floor_solid(&self, key: FloorKey) -> Option<&FloorSolid> {
        self.panels
            .iter()
            .find(|p| p.scenario == key.scenario)?
            .building
            .floor(key.floor_num)
    }

    pub fn floor_solid_mut(&mut self, key: FloorKey) -> Option<&mut FloorSolid> {
        self.panels
            .iter_mut()
            .find(|p| p.scenario == key.scenario)?
            .building
            .floor_mut(key.floor_num)
    }

    /// Push the global hover and the solid under the pointer into every
    /// floor's highlight state
    pub fn sync_hover(&mut self, hovered: Option<FloorKey>, pointer: Option<FloorKey>) {
        for panel in &mut self.panels {
            panel.building.sync_hover(hovered, pointer);
        }
    }

    /// Floor uses drawn in any panel, in first-seen order, then the
    /// bulkhead if one is drawn
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut entries: Vec<LegendEntry> = Vec::new();
        let floors = self.panels.iter().flat_map(|p| p.building.floors.iter());
        for solid in floors {
            let label = solid.use_type.label();
            if !entries.iter().any(|e| e.label == label) {
                entries.push(LegendEntry {
                    label: label.to_string(),
                    color: solid.color,
                });
            }
        }
        if let Some(bulkhead) = self.panels.iter().find_map(|p| p.building.bulkhead.as_ref()) {
            entries.push(LegendEntry {
                label: "Bulkhead".to_string(),
                color: bulkhead.color,
            });
        }
        entries
    }

    /// Every floating label that is currently visible
    pub fn labels(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = Vec::new();
        if self.show_labels {
            labels.extend(
                self.panels
                    .iter()
                    .flat_map(|p| p.building.floors.iter().map(|f| &f.label)),
            );
        }
        labels.extend(self.panels.iter().filter_map(|p| p.name_label.as_ref()));
        if let Some(annotations) = &self.annotations {
            labels.extend(annotations.labels());
        }
        labels
    }
}

/// Compose the scene for the current view.
///
/// Returns `None` when the active scenario does not exist.
pub fn compose(data: &MassingData, state: &ViewState) -> Option<Scene> {
    let toggles = state.toggles;
    let active = state.active_scenario();
    let mut primary = ScenePanel::compose(data, active, &toggles)?;

    let comparison = state
        .shown_comparison(data.scenario_count())
        .and_then(|index| ScenePanel::compose(data, index, &toggles));

    let (mode, panels, annotations) = match comparison {
        Some(mut secondary) => {
            let dx = primary.lot_bounds.max.x + COMPARISON_GAP_FT - secondary.lot_bounds.min.x;
            primary.attach_name_label();
            secondary.attach_name_label();
            secondary.translate(Vector3::new(dx, 0.0, 0.0));
            (SceneMode::Comparison, vec![primary, secondary], None)
        }
        None => {
            let lot = LotGeometry::from_lot(&data.lot);
            // The payload total is measured on the first scenario
            let total_height = data.total_height_ft.filter(|_| active == 0);
            let dimensions = data
                .scenario(active)
                .and_then(|scenario| dimension_building(scenario, total_height));
            let annotations = annotate(&data.lot, &lot).with_dimensions(dimensions);
            (SceneMode::Single, vec![primary], Some(annotations))
        }
    };

    let framed = panels
        .iter()
        .map(ScenePanel::bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| GroundBounds::from_size(0.0, 0.0));

    let ground = ground_plane(&framed);

    Some(Scene {
        mode,
        ground,
        panels,
        annotations,
        camera: CameraFraming::frame(&framed),
        show_labels: toggles.show_labels,
    })
}

fn ground_plane(bounds: &GroundBounds) -> Surface {
    let extent = bounds.expand(GROUND_MARGIN_FT);
    let mesh = cap_mesh(&Profile2D::rectangle(&extent), 0.0).unwrap_or_default();
    Surface::overlay(
        "ground",
        mesh,
        Material::solid(palette::rgba(palette::GROUND, 1.0)),
    )
}

/// Inputs that determine a scene. Hover and selection are not part of it;
/// they only change highlight flags on an existing scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SceneKey {
    revision: u64,
    active: usize,
    comparison: Option<usize>,
    toggles: DisplayToggles,
}

impl SceneKey {
    fn new(revision: u64, data: &MassingData, state: &ViewState) -> Self {
        Self {
            revision,
            active: state.active_scenario(),
            comparison: state.shown_comparison(data.scenario_count()),
            toggles: state.toggles,
        }
    }
}

/// Memoizing scene composer
#[derive(Debug, Default)]
pub struct Composer {
    cached: Option<(SceneKey, Option<Scene>)>,
    compositions: u64,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose, reusing the previous scene when `revision` and the view
    /// inputs are unchanged. Bump `revision` whenever the payload changes.
    pub fn compose(
        &mut self,
        data: &MassingData,
        revision: u64,
        state: &ViewState,
    ) -> Option<&Scene> {
        let key = SceneKey::new(revision, data, state);
        let fresh = !matches!(&self.cached, Some((cached, _)) if *cached == key);
        if fresh {
            debug!(?key, "Composing scene");
            self.compositions += 1;
            self.cached = Some((key, compose(data, state)));
        }
        self.scene()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.cached.as_ref().and_then(|(_, scene)| scene.as_ref())
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.cached.as_mut().and_then(|(_, scene)| scene.as_mut())
    }

    /// Number of times a scene was actually built
    pub fn compositions(&self) -> u64 {
        self.compositions
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

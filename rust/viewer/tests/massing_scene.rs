// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use massing_lite_core::{
    validate_scenario, Floor, FloorUse, Lot, MassingData, Scenario, ValidationIssue,
    ZoningEnvelope, COINCIDENT_EPSILON_FT,
};
use massing_lite_geometry::{notched_rectangle, GroundBounds, Point2, Point3, Profile2D, Vector3};
use massing_lite_viewer::{
    compose, palette, project_envelope, BuildingModel, Composer, DisplayToggles, LotGeometry,
    PickBehavior, Ray, SceneMode, SceneSummary, ViewState,
};
use std::path::PathBuf;

fn fixture() -> MassingData {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("two_scenarios.json");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {}", path.display(), e));
    MassingData::from_json(&json).unwrap()
}

fn rectangle_lot() -> Lot {
    Lot {
        polygon: vec![[0.0, 0.0], [50.0, 0.0], [50.0, 100.0], [0.0, 100.0]],
        area_sf: 5000.0,
        frontage_ft: 50.0,
        depth_ft: 100.0,
        street_edges: Vec::new(),
    }
}

fn single_commercial_floor() -> Scenario {
    Scenario {
        name: "Single".to_string(),
        floors: vec![Floor {
            floor_num: 1,
            use_type: FloorUse::Commercial,
            elevation_ft: 0.0,
            height_ft: 15.0,
            footprint: rectangle_lot().polygon,
            gross_area_sf: 5000.0,
            net_area_sf: 4250.0,
            setback_from_street_ft: 0.0,
            setback_from_rear_ft: 0.0,
            plate_area_sf: None,
            is_penthouse: false,
            color: None,
        }],
        bulkhead: None,
        zoning_envelope: None,
        summary: Default::default(),
    }
}

#[test]
fn single_commercial_floor_end_to_end() {
    let model = BuildingModel::build(0, &single_commercial_floor());

    assert_eq!(model.floors.len(), 1);
    assert!(model.bulkhead.is_none());

    let solid = &model.floors[0];
    assert_eq!(solid.color, palette::use_color(&FloorUse::Commercial));
    assert_eq!(palette::to_hex_string(solid.color), "#4A90D9");

    let (bottom, top) = solid.mesh.vertical_extent().unwrap();
    assert_relative_eq!(bottom, 0.15, epsilon = 1e-5);
    assert_relative_eq!(top, 14.85, epsilon = 1e-5);
}

#[test]
fn every_floor_respects_the_gap() {
    let data = fixture();
    for (index, scenario) in data.scenarios.iter().enumerate() {
        let model = BuildingModel::build(index, scenario);
        assert_eq!(model.floors.len(), scenario.floors.len());
        for (solid, floor) in model.floors.iter().zip(&scenario.floors) {
            let (bottom, top) = solid.mesh.vertical_extent().unwrap();
            assert_relative_eq!(bottom, floor.elevation_ft + 0.15, epsilon = 1e-4);
            assert_relative_eq!(top - bottom, floor.height_ft - 0.3, epsilon = 1e-4);
        }
    }
}

#[test]
fn floors_sorted_with_monotonic_elevation() {
    let data = fixture();
    for scenario in &data.scenarios {
        let nums: Vec<i32> = scenario.floors.iter().map(|f| f.floor_num).collect();
        let mut sorted = nums.clone();
        sorted.sort();
        assert_eq!(nums, sorted);
        assert!(scenario
            .floors
            .windows(2)
            .all(|w| w[0].elevation_ft <= w[1].elevation_ft));
    }
    assert!(massing_lite_core::validate(&data).is_empty());
}

#[test]
fn setback_line_without_base_height() {
    let envelope = ZoningEnvelope {
        max_height_ft: 60.0,
        base_height_max_ft: None,
        setback_line: Some(vec![[0.0, 15.0], [50.0, 15.0]]),
        sky_exposure_plane: None,
        front_yard_ft: None,
        rear_yard_ft: None,
    };
    let overlay = project_envelope(&envelope, &LotGeometry::from_lot(&rectangle_lot())).unwrap();

    let setback = overlay.setback.as_ref().unwrap();
    assert_eq!(setback.at_grade.lines.segment_count(), 1);
    assert!(setback.at_base.is_none());
    assert!(setback.connector.is_none());

    assert!(overlay.base_height.is_none());
    assert_relative_eq!(overlay.max_height.elevation, 60.0);
    assert_eq!(overlay.corner_edges.lines.segment_count(), 4);
    for segment in overlay.corner_edges.lines.segments() {
        assert_relative_eq!(segment.length(), 60.0);
    }
}

#[test]
fn setback_line_with_base_height() {
    let data = fixture();
    let envelope = data.scenarios[0].zoning_envelope.as_ref().unwrap();
    let overlay = project_envelope(envelope, &LotGeometry::from_lot(&data.lot)).unwrap();

    let setback = overlay.setback.unwrap();
    let at_base = setback.at_base.unwrap();
    assert!(at_base.lines.lines[0].points.iter().all(|p| p.y == 65.0));
    let connector = setback.connector.unwrap().lines.segments().next().unwrap();
    assert_relative_eq!(connector.end.y, 65.0);
    assert_eq!((connector.start.x, connector.start.z), (0.0, 10.0));

    let base = overlay.base_height.unwrap();
    assert_relative_eq!(base.elevation, 65.0);
}

#[test]
fn base_plane_disappears_at_max_height() {
    let data = fixture();
    let lot = LotGeometry::from_lot(&data.lot);
    let mut envelope = data.scenarios[0].zoning_envelope.clone().unwrap();

    assert!(project_envelope(&envelope, &lot).unwrap().base_height.is_some());
    envelope.base_height_max_ft = Some(envelope.max_height_ft);
    let first = project_envelope(&envelope, &lot).unwrap();
    let second = project_envelope(&envelope, &lot).unwrap();
    assert!(first.base_height.is_none());
    assert_eq!(first, second);
}

#[test]
fn sky_exposure_plane_is_clamped() {
    let data = fixture();
    let envelope = data.scenarios[0].zoning_envelope.as_ref().unwrap();
    let overlay = project_envelope(envelope, &LotGeometry::from_lot(&data.lot)).unwrap();
    let sky = overlay.sky_exposure.unwrap();

    assert_relative_eq!(sky.start_height, 60.0);
    assert_relative_eq!(sky.far_height, 300.0);
    let (min, max) = sky.surface.mesh.bounds();
    assert_relative_eq!(min.y, 60.0);
    assert_relative_eq!(max.y, 300.0);
    assert_relative_eq!(max.x, 50.0);
    assert_relative_eq!(max.z, 100.0);
}

#[test]
fn notched_footprint_extrudes() {
    let notch = GroundBounds::new(Point2::new(30.0, 70.0), Point2::new(50.0, 100.0));
    let profile = notched_rectangle(&GroundBounds::from_size(50.0, 100.0), &notch).unwrap();

    let mut scenario = single_commercial_floor();
    scenario.floors[0].footprint = profile.outer.iter().map(|p| [p.x, p.y]).collect();
    let model = BuildingModel::build(0, &scenario);

    let solid = &model.floors[0];
    let (min, max) = solid.mesh.bounds();
    assert_relative_eq!(max.x, 50.0, epsilon = 1e-4);
    assert_relative_eq!(max.z, 100.0, epsilon = 1e-4);

    // Straight down into the notch misses; into the plate hits
    let into_notch = Ray::new(Point3::new(40.0, 50.0, 85.0), -Vector3::y()).unwrap();
    let into_plate = Ray::new(Point3::new(20.0, 50.0, 85.0), -Vector3::y()).unwrap();
    assert!(model.pick(&into_notch).is_none());
    assert!(model.pick(&into_plate).is_some());
    assert!(min.y > 0.0);
}

#[test]
fn pick_reports_only_nearest_floor() {
    let data = fixture();
    let model = BuildingModel::build(0, &data.scenarios[0]);

    // Looking down through the stack from above the roof, away from the bulkhead
    let ray = Ray::new(Point3::new(5.0, 200.0, 50.0), -Vector3::y()).unwrap();
    let hit = model.pick(&ray).unwrap();
    assert_eq!(hit.key.floor_num, 4);

    // Over the rear yard only the ground floor extends that far back
    let ray = Ray::new(Point3::new(8.0, 200.0, 90.0), -Vector3::y()).unwrap();
    assert_eq!(model.pick(&ray).unwrap().key.floor_num, 1);

    // The bulkhead occludes the floors below it
    let ray = Ray::new(Point3::new(24.0, 200.0, 43.0), -Vector3::y()).unwrap();
    assert!(model.pick(&ray).is_none());
}

#[test]
fn single_scene_composition() {
    let data = fixture();
    let mut state = ViewState::new();
    state.toggles.show_setbacks = true;
    state.toggles.show_labels = true;

    let scene = compose(&data, &state).unwrap();
    assert_eq!(scene.mode, SceneMode::Single);
    assert!(scene.is_interactive());
    assert_eq!(scene.panels.len(), 1);

    let camera = scene.camera;
    assert_eq!(camera.target, Point3::new(25.0, 0.0, 50.0));
    assert_relative_eq!(camera.position.x, 25.0 + 180.0, epsilon = 1e-9);
    assert_relative_eq!(camera.position.y, 144.0, epsilon = 1e-9);

    let panel = &scene.panels[0];
    assert!(panel.lot_fill.is_some());
    assert!(panel.envelope.is_some());
    let yards = panel.yards.as_ref().unwrap();
    assert!(yards.front.is_none());
    assert!(yards.rear.is_some());

    let annotations = scene.annotations.as_ref().unwrap();
    assert_eq!(annotations.street_label.as_ref().unwrap().text, "W 14th St");

    let texts: Vec<&str> = scene.labels().iter().map(|l| l.text.as_str()).collect();
    assert!(texts.contains(&"F1"));
    assert!(texts.contains(&"F4"));
}

#[test]
fn toggles_only_filter() {
    let data = fixture();
    let mut state = ViewState::with_toggles(DisplayToggles {
        show_envelope: false,
        show_lot: false,
        show_setbacks: false,
        show_labels: false,
    });

    let bare = compose(&data, &state).unwrap();
    let panel = &bare.panels[0];
    assert!(panel.envelope.is_none());
    assert!(panel.lot_fill.is_none());
    assert!(panel.lot_outline.is_none());
    assert!(panel.buildable.is_none());
    assert!(panel.yards.is_none());
    assert!(!bare.labels().iter().any(|l| l.text.starts_with('F')));

    state.toggles = DisplayToggles::default();
    let full = compose(&data, &state).unwrap();
    assert_eq!(full.panels[0].building, panel.building);
}

#[test]
fn comparison_places_panels_side_by_side() {
    let data = fixture();
    let mut state = ViewState::new();
    state.set_comparison_mode(true);
    state.set_comparison_scenario(0);

    let scene = compose(&data, &state).unwrap();
    assert_eq!(scene.mode, SceneMode::Comparison);
    assert!(!scene.is_interactive());
    assert!(scene.annotations.is_none());

    let (a, b) = (&scene.panels[0], &scene.panels[1]);
    assert_eq!((a.scenario, b.scenario), (0, 1));
    assert_relative_eq!(b.lot_bounds.min.x - a.lot_bounds.max.x, 20.0);

    let (min, _) = b.building.floors[0].mesh.bounds();
    assert_relative_eq!(min.x, 70.0);
    let (min, _) = b.buildable.as_ref().unwrap().fill.mesh.bounds();
    assert_relative_eq!(min.x, 70.0);

    assert_eq!(a.name_label.as_ref().unwrap().text, "Max Residential");
    assert_eq!(b.name_label.as_ref().unwrap().text, "Community Facility");

    // Framing covers both lots: 120 ft wide
    assert_relative_eq!(scene.camera.target.x, 60.0);

    let ray = Ray::new(Point3::new(25.0, 200.0, 50.0), -Vector3::y()).unwrap();
    assert!(scene.pick(&ray).is_none());
}

#[test]
fn composer_memoizes_identical_inputs() {
    let data = fixture();
    let mut composer = Composer::new();
    let mut state = ViewState::new();

    let first = composer.compose(&data, 1, &state).cloned();
    let second = composer.compose(&data, 1, &state).cloned();
    assert_eq!(first, second);
    assert_eq!(composer.compositions(), 1);

    // Hover is not a scene input
    state.hover_begin(massing_lite_viewer::FloorKey::new(0, 1));
    composer.compose(&data, 1, &state);
    assert_eq!(composer.compositions(), 1);

    state.toggles.show_envelope = false;
    composer.compose(&data, 1, &state);
    assert_eq!(composer.compositions(), 2);

    composer.compose(&data, 2, &state);
    assert_eq!(composer.compositions(), 3);
}

#[test]
fn summary_serializes() {
    let data = fixture();
    let scene = compose(&data, &ViewState::new()).unwrap();
    let summary = SceneSummary::from_scene(&scene);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["mode"], "single");
    let floors = json["panels"][0]["floors"].as_array().unwrap();
    assert_eq!(floors.len(), 4);
    assert_eq!(floors[0]["use"], "commercial");
    assert_eq!(floors[0]["color"], "#4A90D9");
    assert_eq!(json["panels"][0]["envelope"]["sky_exposure_far_ft"], 300.0);
    assert_eq!(json["panels"][0]["buildable_area_sf"], 3500.0);
    assert_eq!(json["height_dimension_ft"], 57.0);
    assert_eq!(json["legend"][0]["label"], "Commercial");
    assert_eq!(json["legend"][0]["color"], "#4A90D9");
}

#[test]
fn buildable_footprint_drawn_at_grade() {
    let data = fixture();
    let scene = compose(&data, &ViewState::new()).unwrap();
    let buildable = scene.panels[0].buildable.as_ref().unwrap();

    assert_eq!(buildable.fill.pick, PickBehavior::Ignore);
    assert!(buildable.outline.dashed);
    assert_relative_eq!(buildable.area_sf, 3500.0);

    let (min, max) = buildable.fill.mesh.bounds();
    assert_relative_eq!(max.z, 70.0);
    assert_relative_eq!(max.x, 50.0);
    assert!(max.y < 0.15, "overlay must sit below the ground floor");
    assert_relative_eq!(min.y, max.y);

    // Picking still reaches the floors above it
    let ray = Ray::new(Point3::new(8.0, 200.0, 60.0), -Vector3::y()).unwrap();
    assert_eq!(scene.pick(&ray).unwrap().key.floor_num, 4);
}

#[test]
fn height_dimension_and_floor_ticks() {
    let data = fixture();
    let mut state = ViewState::new();
    let scene = compose(&data, &state).unwrap();
    let dims = scene.annotations.as_ref().unwrap().dimensions.as_ref().unwrap();

    // Payload total reaches the bulkhead top
    assert_relative_eq!(dims.height_ft, 57.0);
    assert_eq!(dims.height_label.text, "57 ft");
    let anchor = dims.height_label.anchor();
    assert_relative_eq!(anchor.y, 28.5);
    assert_relative_eq!(anchor.x, 61.0);

    let floors: Vec<&str> = dims.floor_labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(floors, ["15'", "10'", "10'", "10'"]);
    let plan: Vec<&str> = dims.plan_labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(plan, ["50'", "100'"]);

    let texts: Vec<&str> = scene.labels().iter().map(|l| l.text.as_str()).collect();
    assert!(texts.contains(&"57 ft"));

    // Other scenarios measure their own roof
    state.set_active_scenario(1);
    let scene = compose(&data, &state).unwrap();
    let dims = scene.annotations.as_ref().unwrap().dimensions.as_ref().unwrap();
    assert_eq!(dims.height_label.text, "28 ft");
}

#[test]
fn legend_lists_uses_once() {
    let data = fixture();
    let scene = compose(&data, &ViewState::new()).unwrap();
    let legend_entries = scene.legend();
    let legend: Vec<&str> = legend_entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(legend, ["Commercial", "Residential", "Bulkhead"]);

    let mut state = ViewState::new();
    state.set_comparison_mode(true);
    let scene = compose(&data, &state).unwrap();
    let legend = scene.legend();
    let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["Commercial", "Residential", "Community Facility", "Bulkhead"]);
    assert_eq!(legend[2].color, palette::use_color(&FloorUse::CommunityFacility));
}

#[test]
fn validation_flags_exactly_the_skipped_footprints() {
    let near = 0.9 * COINCIDENT_EPSILON_FT;
    let rings = [
        // Within tolerance on each axis, but not by distance
        vec![[0.0, 0.0], [near, near], [50.0, 0.0]],
        vec![[0.0, 0.0], [near / 2.0, 0.0], [50.0, 0.0]],
        vec![[0.0, 0.0], [50.0, 0.0], [50.0, 0.0]],
    ];
    for ring in rings {
        let mut scenario = single_commercial_floor();
        scenario.floors[0].footprint = ring.clone();
        let flagged = validate_scenario(0, &scenario)
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::DegeneratePolygon { .. }));
        assert_eq!(flagged, Profile2D::from_ring(&ring).is_none(), "ring {:?}", ring);
    }
}

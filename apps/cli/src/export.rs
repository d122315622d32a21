// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene exports: JSON summary and Wavefront OBJ

use anyhow::Context;
use massing_lite_geometry::Mesh;
use massing_lite_viewer::{Scene, SceneSummary};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize the scene summary as pretty JSON
pub fn summary_json(scene: &Scene) -> anyhow::Result<String> {
    let summary = SceneSummary::from_scene(scene);
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Wavefront OBJ of every floor and bulkhead in the scene.
///
/// The scene frame is already y-up in feet, so positions are written as is.
/// Each floor and bulkhead becomes its own `o` object.
pub fn scene_obj(scene: &Scene) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# massing-lite scene")?;
    writeln!(out, "# units: feet, +y up")?;

    let mut base = 1u32;
    for panel in &scene.panels {
        for solid in &panel.building.floors {
            let name = format!(
                "scenario{}_floor{}_{}",
                panel.scenario,
                solid.floor_num(),
                solid.use_type.as_str()
            );
            base = write_object(&mut out, &name, &solid.mesh, base)?;
        }
        if let Some(bulkhead) = &panel.building.bulkhead {
            let name = format!("scenario{}_bulkhead", panel.scenario);
            base = write_object(&mut out, &name, &bulkhead.mesh, base)?;
        }
    }

    Ok(out)
}

/// Append one object; returns the next free vertex index
fn write_object(out: &mut String, name: &str, mesh: &Mesh, base: u32) -> Result<u32, std::fmt::Error> {
    writeln!(out, "o {}", name)?;
    for p in mesh.positions.chunks_exact(3) {
        writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for n in mesh.normals.chunks_exact(3) {
        writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    for t in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (t[0] + base, t[1] + base, t[2] + base);
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    Ok(base + mesh.vertex_count() as u32)
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use massing_lite_core::MassingData;
    use massing_lite_viewer::{compose, ViewState};

    const PAYLOAD: &str = r#"{
        "lot": {"polygon": [[0, 0], [50, 0], [50, 100], [0, 100]]},
        "scenarios": [{
            "name": "Two floors",
            "floors": [
                {"floor_num": 1, "use": "commercial", "elevation_ft": 0, "height_ft": 15,
                 "footprint": [[0, 0], [50, 0], [50, 100], [0, 100]]},
                {"floor_num": 2, "use": "residential", "elevation_ft": 15, "height_ft": 10,
                 "footprint": [[0, 0], [50, 0], [50, 70], [0, 70]]}
            ],
            "bulkhead": {"footprint": [[20, 40], [30, 40], [30, 50], [20, 50]],
                         "height_ft": 12, "elevation_ft": 25}
        }]
    }"#;

    fn scene() -> Scene {
        let data = MassingData::from_json(PAYLOAD).unwrap();
        compose(&data, &ViewState::new()).unwrap()
    }

    #[test]
    fn test_obj_objects_and_indices() {
        let obj = scene_obj(&scene()).unwrap();

        let objects: Vec<&str> = obj.lines().filter(|l| l.starts_with("o ")).collect();
        assert_eq!(
            objects,
            vec![
                "o scenario0_floor1_commercial",
                "o scenario0_floor2_residential",
                "o scenario0_bulkhead"
            ]
        );

        // Three boxes of 24 vertices and 12 triangles each
        let vertices = obj.lines().filter(|l| l.starts_with("v ")).count();
        let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(vertices, 72);
        assert_eq!(faces.len(), 36);

        let max_index = faces
            .iter()
            .flat_map(|f| f[2..].split(' '))
            .filter_map(|v| v.split("//").next()?.parse::<usize>().ok())
            .max()
            .unwrap();
        assert_eq!(max_index, vertices);
    }

    #[test]
    fn test_obj_is_y_up() {
        let obj = scene_obj(&scene()).unwrap();
        let heights: Vec<f32> = obj
            .lines()
            .filter(|l| l.starts_with("v "))
            .filter_map(|l| l.split(' ').nth(2)?.parse().ok())
            .collect();
        let top = heights.iter().cloned().fold(f32::MIN, f32::max);
        approx::assert_relative_eq!(top, 37.0);
    }

    #[test]
    fn test_summary_json() {
        let json = summary_json(&scene()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["panels"][0]["floors"].as_array().unwrap().len(), 2);
        assert!(value["panels"][0]["bulkhead"].is_object());
    }
}

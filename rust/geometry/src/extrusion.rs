// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting ground profiles to vertical solids

use crate::error::{Error, Result};
use crate::frame::{ground, up};
use crate::lines::{LineSet, Polyline, Segment};
use crate::mesh::Mesh;
use crate::profile::{Profile2D, Triangulation};
use nalgebra::{Point2, Vector3};

/// Extrude a ground profile straight up from `base_elevation` by `height`
///
/// Caps face down and up; side walls get outward flat normals. Hole walls
/// face into the hole.
pub fn extrude_profile(profile: &Profile2D, base_elevation: f64, height: f64) -> Result<Mesh> {
    if height.is_nan() || height <= 0.0 {
        return Err(Error::InvalidExtrusion(format!(
            "Height must be positive, got {}",
            height
        )));
    }

    let triangulation = profile.triangulate()?;
    let top = base_elevation + height;

    let side_vertices: usize =
        (profile.outer.len() + profile.holes.iter().map(|h| h.len()).sum::<usize>()) * 4;
    let mut mesh = Mesh::with_capacity(
        triangulation.points.len() * 2 + side_vertices,
        triangulation.indices.len() * 2 + side_vertices / 4 * 6,
    );

    create_cap_mesh(&triangulation, base_elevation, false, &mut mesh);
    create_cap_mesh(&triangulation, top, true, &mut mesh);

    create_side_walls(&profile.outer, base_elevation, top, &mut mesh);
    for hole in &profile.holes {
        create_side_walls(hole, base_elevation, top, &mut mesh);
    }

    Ok(mesh)
}

/// Flat, upward-facing fill of a profile at `elevation`
pub fn cap_mesh(profile: &Profile2D, elevation: f64) -> Result<Mesh> {
    let triangulation = profile.triangulate()?;
    let mut mesh = Mesh::with_capacity(triangulation.points.len(), triangulation.indices.len());
    create_cap_mesh(&triangulation, elevation, true, &mut mesh);
    Ok(mesh)
}

/// Silhouette edges of an extruded profile: bottom ring, top ring and one
/// vertical edge per outer vertex
pub fn extrusion_edges(profile: &Profile2D, base_elevation: f64, height: f64) -> LineSet {
    let top = base_elevation + height;
    let mut edges = LineSet::new();

    edges.push(Polyline::ring_at(&profile.outer, base_elevation));
    edges.push(Polyline::ring_at(&profile.outer, top));
    for p in &profile.outer {
        edges.push_segment(Segment::vertical(*p, base_elevation, top));
    }

    for hole in &profile.holes {
        edges.push(Polyline::ring_at(hole, base_elevation));
        edges.push(Polyline::ring_at(hole, top));
    }

    edges
}

/// Create a cap mesh (top or bottom) from triangulation
fn create_cap_mesh(triangulation: &Triangulation, elevation: f64, facing_up: bool, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let normal = if facing_up { up() } else { -up() };

    for point in &triangulation.points {
        mesh.add_vertex(ground(*point, elevation), normal);
    }

    // Counter-clockwise (x, z) triangles face down in a y-up frame
    for t in triangulation.indices.chunks_exact(3) {
        let i0 = base_index + t[0] as u32;
        let i1 = base_index + t[1] as u32;
        let i2 = base_index + t[2] as u32;

        if facing_up {
            mesh.add_triangle(i0, i2, i1);
        } else {
            mesh.add_triangle(i0, i1, i2);
        }
    }
}

/// Create side walls for a profile boundary
fn create_side_walls(boundary: &[Point2<f64>], bottom: f64, top: f64, mesh: &mut Mesh) {
    for i in 0..boundary.len() {
        let j = (i + 1) % boundary.len();

        let p0 = boundary[i];
        let p1 = boundary[j];

        // Right-hand normal of the edge; skips duplicate consecutive points
        let (dx, dz) = (p1.x - p0.x, p1.y - p0.y);
        let normal = match Vector3::new(dz, 0.0, -dx).try_normalize(1e-10) {
            Some(n) => n,
            None => continue,
        };

        let idx = mesh.add_vertex(ground(p0, bottom), normal);
        mesh.add_vertex(ground(p1, bottom), normal);
        mesh.add_vertex(ground(p1, top), normal);
        mesh.add_vertex(ground(p0, top), normal);

        mesh.add_triangle(idx, idx + 2, idx + 1);
        mesh.add_triangle(idx, idx + 3, idx + 2);
    }
}

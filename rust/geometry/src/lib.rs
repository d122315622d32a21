// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing-Lite Geometry
//!
//! Ground-plane polygon utilities and vertical extrusion for massing models,
//! using earcutr triangulation, i_overlay booleans and nalgebra math.
//!
//! Everything here works in one canonical frame (see [`frame`]): feet, with
//! `x` to the right, `y` up and `z` forward into the lot.

pub mod error;
pub mod extrusion;
pub mod frame;
pub mod lines;
pub mod mesh;
pub mod polygon;
pub mod profile;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extrusion::{cap_mesh, extrude_profile, extrusion_edges};
pub use frame::{ground, GroundBounds};
pub use lines::{LineSet, Polyline, Segment};
pub use mesh::Mesh;
pub use polygon::{closed_boundary, notched_rectangle, subtract_2d};
pub use profile::{Profile2D, Triangulation};
pub use triangulation::triangulate_polygon;

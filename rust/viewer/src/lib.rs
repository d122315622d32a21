// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Massing-Lite Viewer
//!
//! Derives renderable geometry from a [`MassingData`] payload and tracks the
//! interactive state around it. Actual GPU drawing belongs to the host 3D
//! engine; this crate hands it meshes, line sets, labels and a camera.
//!
//! ## Overview
//!
//! - **Envelope projector** ([`envelope`]): height planes, corner edges,
//!   setback line and sky exposure plane from a zoning envelope.
//! - **Massing builder** ([`massing`]): one gapped extrusion per floor, the
//!   bulkhead, per-floor wireframes, labels and ray picking.
//! - **Scene composer** ([`scene`]): lot, buildable footprint, yards,
//!   building, envelope, dimensions and a use legend framed by a camera,
//!   single or side-by-side.
//! - **Interaction** ([`interaction`]): scenario choice, hover, selection
//!   and display toggles.
//! - **Session** ([`Viewer`]): ties the above to a render surface and an
//!   outward event sink.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use massing_lite_viewer::{NullSink, Viewer};
//!
//! let mut viewer = Viewer::new(Box::new(NullSink));
//! viewer.load(MassingData::from_json(payload)?);
//! if let Some(scene) = viewer.scene() {
//!     for panel in &scene.panels {
//!         for floor in &panel.building.floors {
//!             upload(&floor.mesh, floor.material());
//!         }
//!     }
//! }
//! ```
//!
//! [`MassingData`]: massing_lite_core::MassingData

pub mod annotations;
pub mod capture;
pub mod drawable;
pub mod envelope;
pub mod error;
pub mod interaction;
pub mod lot;
pub mod massing;
pub mod palette;
pub mod picking;
pub mod scene;
pub mod setbacks;
pub mod summary;
pub mod viewer;

pub use annotations::{annotate, dimension_building, Annotations, Dimensions};
pub use capture::{capture_still_image, RenderSurface};
pub use drawable::{Label, Lines, Material, PickBehavior, Surface};
pub use envelope::{
    project_envelope, EnvelopeOverlay, ENVELOPE_MARGIN_FT, SKY_EXPOSURE_RENDER_CAP_FT,
};
pub use error::{Error, Result};
pub use interaction::{
    DisplayToggles, FloorEvent, FloorEventSink, FloorInteraction, FloorKey, HoverState,
    NullSink, ViewState,
};
pub use lot::LotGeometry;
pub use massing::{BuildingModel, BulkheadSolid, FloorHit, FloorSolid};
pub use picking::Ray;
pub use scene::{compose, CameraFraming, Composer, LegendEntry, Scene, SceneMode, ScenePanel};
pub use setbacks::{shade_yards, BuildableOverlay, YardShading};
pub use summary::SceneSummary;
pub use viewer::Viewer;

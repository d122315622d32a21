// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Massing-Lite Core
//!
//! Data model for the massing payload produced by the zoning backend
//! (`/api/v1/massing/{bbl}`), plus the defensive checks the viewer runs
//! before deriving any geometry from it.
//!
//! ## Overview
//!
//! - **Model**: [`MassingData`] with its lot, scenarios, floors, bulkhead and
//!   zoning envelope, deserialized with serde. Optional substructures stay
//!   optional; metric fields default so partial payloads still load.
//! - **Validation**: [`validate`] reports every broken invariant as a
//!   [`ValidationIssue`] instead of failing. Nothing here is fatal.
//! - **Sanity warnings**: [`sanity_warnings`] re-derives the backend's
//!   human-readable massing warnings from scenario data alone.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use massing_lite_core::{validate, MassingData};
//!
//! let data = MassingData::from_json(payload)?;
//! for issue in validate(&data) {
//!     tracing::warn!(%issue, "massing payload issue");
//! }
//! ```

pub mod error;
pub mod model;
pub mod sanity;
pub mod validation;

pub use error::{Error, Result};
pub use model::{
    BuildableFootprint, Bulkhead, Floor, FloorUse, GroundPoint, Lot, MassingData, Origin,
    Scenario, SkyExposurePlane, StreetEdge, StreetWidth, Summary, ZoningEnvelope,
};
pub use sanity::sanity_warnings;
pub use validation::{validate, validate_scenario, ValidationIssue, COINCIDENT_EPSILON_FT};

/// Vertical seam, in feet, left between stacked floor solids so floor
/// boundaries stay visible. Every floor's `height_ft` must exceed it.
pub const FLOOR_GAP_FT: f64 = 0.3;

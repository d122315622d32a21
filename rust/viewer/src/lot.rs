// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground footprint of the lot, shared by every overlay

use massing_lite_core::Lot;
use massing_lite_geometry::{GroundBounds, Profile2D};
use tracing::debug;

/// Lot outline and extent in the scene frame
#[derive(Debug, Clone)]
pub struct LotGeometry {
    /// Outline, `None` when neither the polygon nor the dimensions are usable
    pub profile: Option<Profile2D>,
    pub bounds: GroundBounds,
}

impl LotGeometry {
    /// Resolve the lot outline.
    ///
    /// A degenerate polygon falls back to a `frontage_ft x depth_ft`
    /// rectangle at the origin, which is how the backend builds lots it has
    /// no parcel geometry for.
    pub fn from_lot(lot: &Lot) -> Self {
        if let Some(profile) = Profile2D::from_ring(&lot.polygon) {
            if let Some(bounds) = profile.bounds().filter(GroundBounds::has_area) {
                return Self {
                    profile: Some(profile),
                    bounds,
                };
            }
        }

        let bounds = GroundBounds::from_size(lot.frontage_ft.max(0.0), lot.depth_ft.max(0.0));
        debug!(
            vertices = lot.polygon.len(),
            frontage_ft = lot.frontage_ft,
            depth_ft = lot.depth_ft,
            "Lot polygon unusable, falling back to frontage x depth rectangle"
        );

        Self {
            profile: bounds.has_area().then(|| Profile2D::rectangle(&bounds)),
            bounds,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    #[inline]
    pub fn depth(&self) -> f64 {
        self.bounds.depth()
    }
}

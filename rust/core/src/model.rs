// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing payload types
//!
//! These types mirror the JSON emitted by the backend massing builder and
//! must stay compatible with it. All ground coordinates are `[x, z]` pairs in
//! feet: `x` runs along the lot width, `z` along the lot depth.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ground-plane point `[x, z]` in feet
pub type GroundPoint = [f64; 2];

/// Root of a massing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassingData {
    pub lot: Lot,
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Lot minus required yards, as computed by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable_footprint: Option<BuildableFootprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_height_ft: Option<f64>,
}

impl MassingData {
    /// Parse a payload from JSON text.
    ///
    /// Floors are re-sorted by `floor_num`; a payload without any scenario is
    /// rejected since there is nothing to show.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: MassingData = serde_json::from_str(json)?;
        data.finish()
    }

    /// Parse a payload from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let data: MassingData = serde_json::from_slice(bytes)?;
        data.finish()
    }

    fn finish(mut self) -> Result<Self> {
        if self.scenarios.is_empty() {
            return Err(Error::NoScenarios);
        }
        for scenario in &mut self.scenarios {
            scenario.sort_floors();
        }
        tracing::debug!(
            scenarios = self.scenarios.len(),
            street_edges = self.lot.street_edges.len(),
            "Parsed massing payload"
        );
        Ok(self)
    }

    /// Get a scenario by index
    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Number of scenarios in the payload
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }
}

/// Geographic anchor of the local feet frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub lat: f64,
    pub lng: f64,
}

/// Tax lot (or assemblage) being analysed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    /// Ordered ring, implicitly closed
    pub polygon: Vec<GroundPoint>,
    #[serde(default)]
    pub area_sf: f64,
    #[serde(default)]
    pub frontage_ft: f64,
    #[serde(default)]
    pub depth_ft: f64,
    #[serde(default)]
    pub street_edges: Vec<StreetEdge>,
}

impl Lot {
    /// Street edge used for the street-name label: the first wide street,
    /// otherwise the first street edge.
    pub fn primary_street_edge(&self) -> Option<&StreetEdge> {
        self.street_edges
            .iter()
            .find(|e| e.width == StreetWidth::Wide)
            .or_else(|| self.street_edges.first())
    }
}

/// Lot boundary segment that faces a street
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetEdge {
    pub edge: [GroundPoint; 2],
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub width: StreetWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

impl StreetEdge {
    /// Midpoint of the edge segment
    pub fn midpoint(&self) -> GroundPoint {
        let [a, b] = self.edge;
        [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
    }
}

/// Zoning street-width class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetWidth {
    #[default]
    Narrow,
    Wide,
}

/// Buildable footprint after yards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildableFootprint {
    pub polygon: Vec<GroundPoint>,
    #[serde(default)]
    pub area_sf: f64,
}

/// One development alternative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub floors: Vec<Floor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulkhead: Option<Bulkhead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoning_envelope: Option<ZoningEnvelope>,
    #[serde(default)]
    pub summary: Summary,
}

impl Scenario {
    /// Restore ascending `floor_num` order (stable for duplicates)
    pub fn sort_floors(&mut self) {
        self.floors.sort_by_key(|f| f.floor_num);
    }

    /// Look up a floor by its number
    pub fn floor(&self, floor_num: i32) -> Option<&Floor> {
        self.floors.iter().find(|f| f.floor_num == floor_num)
    }

    /// Roof height: top of the bulkhead if any, else top of the highest floor
    pub fn roof_height_ft(&self) -> f64 {
        let floors_top = self
            .floors
            .iter()
            .map(Floor::top_ft)
            .fold(0.0_f64, f64::max);
        match &self.bulkhead {
            Some(b) => floors_top.max(b.elevation_ft + b.height_ft),
            None => floors_top,
        }
    }
}

/// Floor use classification.
///
/// Unknown backend values are kept verbatim in [`FloorUse::Other`] so they can
/// be rendered with the neutral fallback color instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FloorUse {
    Commercial,
    Residential,
    CommunityFacility,
    Parking,
    Mechanical,
    Cellar,
    Core,
    Mixed,
    Other(String),
}

impl FloorUse {
    /// Wire name used by the backend
    pub fn as_str(&self) -> &str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
            Self::CommunityFacility => "community_facility",
            Self::Parking => "parking",
            Self::Mechanical => "mechanical",
            Self::Cellar => "cellar",
            Self::Core => "core",
            Self::Mixed => "mixed",
            Self::Other(name) => name,
        }
    }

    /// Human-readable label for legends and tooltips
    pub fn label(&self) -> &str {
        match self {
            Self::Commercial => "Commercial",
            Self::Residential => "Residential",
            Self::CommunityFacility => "Community Facility",
            Self::Parking => "Parking",
            Self::Mechanical => "Mechanical",
            Self::Cellar => "Cellar",
            Self::Core => "Core",
            Self::Mixed => "Mixed Use",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FloorUse {
    fn from(value: String) -> Self {
        match value.as_str() {
            "commercial" => Self::Commercial,
            "residential" => Self::Residential,
            "community_facility" => Self::CommunityFacility,
            "parking" => Self::Parking,
            "mechanical" => Self::Mechanical,
            "cellar" => Self::Cellar,
            "core" => Self::Core,
            "mixed" => Self::Mixed,
            _ => Self::Other(value),
        }
    }
}

impl From<FloorUse> for String {
    fn from(value: FloorUse) -> Self {
        match value {
            FloorUse::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FloorUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One floor of a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub floor_num: i32,
    #[serde(rename = "use")]
    pub use_type: FloorUse,
    /// Base height above grade
    pub elevation_ft: f64,
    /// Floor-to-floor height
    pub height_ft: f64,
    pub footprint: Vec<GroundPoint>,
    #[serde(default)]
    pub gross_area_sf: f64,
    #[serde(default)]
    pub net_area_sf: f64,
    #[serde(default)]
    pub setback_from_street_ft: f64,
    #[serde(default)]
    pub setback_from_rear_ft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate_area_sf: Option<f64>,
    #[serde(default)]
    pub is_penthouse: bool,
    /// Backend-suggested hex color; the viewer palette takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Floor {
    /// Height of the floor's ceiling above grade
    #[inline]
    pub fn top_ft(&self) -> f64 {
        self.elevation_ft + self.height_ft
    }
}

/// Rooftop stair/elevator overrun. Outside floor area accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bulkhead {
    pub footprint: Vec<GroundPoint>,
    pub height_ft: f64,
    pub elevation_ft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Legal maximum buildable volume for the lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoningEnvelope {
    pub max_height_ft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_height_max_ft: Option<f64>,
    /// Polyline where the required setback begins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setback_line: Option<Vec<GroundPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sky_exposure_plane: Option<SkyExposurePlane>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_yard_ft: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_yard_ft: Option<f64>,
}

impl ZoningEnvelope {
    /// Base height when there is a base-height step to show:
    /// strictly between grade and the max height.
    pub fn base_height_step(&self) -> Option<f64> {
        self.base_height_max_ft
            .filter(|&b| b > 0.0 && b < self.max_height_ft)
    }
}

/// Sloped height limit starting at `start_height` above the street line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyExposurePlane {
    pub start_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl SkyExposurePlane {
    /// Vertical feet gained per horizontal foot of depth.
    /// `slope` wins over `ratio`; neither means a flat plane.
    pub fn rise_per_foot(&self) -> f64 {
        self.slope.or(self.ratio).unwrap_or(0.0)
    }
}

/// Aggregate scenario metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_zfa: f64,
    #[serde(default)]
    pub total_gross_sf: f64,
    #[serde(default)]
    pub max_height: f64,
    #[serde(default, rename = "floors")]
    pub floor_count: u32,
    #[serde(default)]
    pub units: u32,
    #[serde(default)]
    pub loss_factor: f64,
    #[serde(default)]
    pub parking_spaces: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far_used: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "lot": {
            "polygon": [[0, 0], [50, 0], [50, 100], [0, 100]],
            "area_sf": 5000, "frontage_ft": 50, "depth_ft": 100,
            "street_edges": [
                {"edge": [[0, 0], [50, 0]], "street_name": "W 14th St", "width": "narrow"},
                {"edge": [[50, 0], [50, 100]], "street_name": "8th Ave", "width": "wide"}
            ]
        },
        "scenarios": [{
            "name": "Max Residential",
            "floors": [
                {"floor_num": 2, "use": "residential", "elevation_ft": 15, "height_ft": 10,
                 "footprint": [[0, 0], [50, 0], [50, 70], [0, 70]],
                 "gross_area_sf": 3500, "net_area_sf": 2900,
                 "setback_from_street_ft": 0, "setback_from_rear_ft": 30},
                {"floor_num": 1, "use": "commercial", "elevation_ft": 0, "height_ft": 15,
                 "footprint": [[0, 0], [50, 0], [50, 70], [0, 70]],
                 "gross_area_sf": 3500, "net_area_sf": 3000,
                 "setback_from_street_ft": 0, "setback_from_rear_ft": 30}
            ],
            "zoning_envelope": {
                "max_height_ft": 85, "base_height_max_ft": 65,
                "sky_exposure_plane": {"start_height": 60, "ratio": 2.7, "direction": "front"},
                "wireframe": []
            },
            "summary": {"total_zfa": 7000, "max_height": 25, "floors": 2, "units": 4}
        }],
        "origin": {"lat": 40.74, "lng": -74.0},
        "warnings": []
    }"#;

    #[test]
    fn test_parse_payload_sorts_floors() {
        let data = MassingData::from_json(PAYLOAD).unwrap();
        let scenario = &data.scenarios[0];
        assert_eq!(scenario.floors.len(), 2);
        assert_eq!(scenario.floors[0].floor_num, 1);
        assert_eq!(scenario.floors[0].use_type, FloorUse::Commercial);
        assert_eq!(scenario.summary.floor_count, 2);
        assert!((scenario.roof_height_ft() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_primary_street_edge_prefers_wide() {
        let data = MassingData::from_json(PAYLOAD).unwrap();
        let edge = data.lot.primary_street_edge().unwrap();
        assert_eq!(edge.street_name, "8th Ave");
        assert_eq!(edge.midpoint(), [50.0, 50.0]);
    }

    #[test]
    fn test_unknown_use_is_preserved() {
        let use_type: FloorUse = serde_json::from_str("\"hotel\"").unwrap();
        assert_eq!(use_type, FloorUse::Other("hotel".to_string()));
        assert_eq!(serde_json::to_string(&use_type).unwrap(), "\"hotel\"");

        let known: FloorUse = serde_json::from_str("\"community_facility\"").unwrap();
        assert_eq!(known, FloorUse::CommunityFacility);
        assert_eq!(known.label(), "Community Facility");
    }

    #[test]
    fn test_sky_exposure_rise() {
        let data = MassingData::from_json(PAYLOAD).unwrap();
        let envelope = data.scenarios[0].zoning_envelope.as_ref().unwrap();
        let sep = envelope.sky_exposure_plane.as_ref().unwrap();
        assert_eq!(sep.rise_per_foot(), 2.7);
        assert_eq!(envelope.base_height_step(), Some(65.0));

        let sloped = SkyExposurePlane {
            start_height: 60.0,
            slope: Some(5.6),
            ratio: Some(2.7),
            direction: None,
        };
        assert_eq!(sloped.rise_per_foot(), 5.6);
    }

    #[test]
    fn test_base_height_step_suppressed() {
        let envelope = ZoningEnvelope {
            max_height_ft: 85.0,
            base_height_max_ft: Some(85.0),
            setback_line: None,
            sky_exposure_plane: None,
            front_yard_ft: None,
            rear_yard_ft: None,
        };
        assert_eq!(envelope.base_height_step(), None);
    }

    #[test]
    fn test_empty_scenarios_rejected() {
        let json = r#"{"lot": {"polygon": []}, "scenarios": []}"#;
        assert!(matches!(
            MassingData::from_json(json),
            Err(Error::NoScenarios)
        ));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable massing warnings derived from scenario data

use crate::model::{FloorUse, Scenario};

/// Built height may exceed the envelope by this much before warning
const HEIGHT_TOLERANCE_FT: f64 = 1.0;

/// Commercial ground floors below this read as too low for retail
const MIN_COMMERCIAL_GROUND_FT: f64 = 14.0;

/// Residential plates narrower than this need a single-loaded corridor
const MIN_RESIDENTIAL_WIDTH_FT: f64 = 12.0;

/// Re-derive the backend's sanity checks that need nothing beyond the scenario.
pub fn sanity_warnings(scenario: &Scenario) -> Vec<String> {
    let mut warnings = Vec::new();

    let (Some(ground), Some(top)) = (scenario.floors.first(), scenario.floors.last()) else {
        warnings.push("No floors could be built in the massing model.".to_string());
        return warnings;
    };

    if let Some(envelope) = &scenario.zoning_envelope {
        let built = top.top_ft();
        if built > envelope.max_height_ft + HEIGHT_TOLERANCE_FT {
            warnings.push(format!(
                "Building height ({:.0} ft) exceeds max allowed ({:.0} ft).",
                built, envelope.max_height_ft
            ));
        }
    }

    if ground.use_type == FloorUse::Commercial && ground.height_ft < MIN_COMMERCIAL_GROUND_FT {
        warnings.push(format!(
            "Commercial ground floor height ({} ft) is below typical minimum of 15 ft.",
            ground.height_ft
        ));
    }

    // Plates are assumed to be roughly 2:1
    let narrow = scenario.floors.iter().find_map(|f| {
        let plate = f.plate_area_sf.unwrap_or(0.0);
        if f.use_type != FloorUse::Residential || plate <= 0.0 {
            return None;
        }
        let width = (plate / 2.0).sqrt();
        (width < MIN_RESIDENTIAL_WIDTH_FT).then_some((f.floor_num, width))
    });
    if let Some((floor_num, width)) = narrow {
        warnings.push(format!(
            "Floor {} plate is very narrow (~{:.0} ft). Consider single-loaded corridor.",
            floor_num, width
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Floor, Summary, ZoningEnvelope};

    fn floor(num: i32, use_type: FloorUse, elevation: f64, height: f64) -> Floor {
        Floor {
            floor_num: num,
            use_type,
            elevation_ft: elevation,
            height_ft: height,
            footprint: vec![[0.0, 0.0], [20.0, 0.0], [20.0, 10.0], [0.0, 10.0]],
            gross_area_sf: 200.0,
            net_area_sf: 150.0,
            setback_from_street_ft: 0.0,
            setback_from_rear_ft: 0.0,
            plate_area_sf: Some(200.0),
            is_penthouse: false,
            color: None,
        }
    }

    #[test]
    fn test_empty_scenario_warns() {
        let scenario = Scenario {
            name: "Empty".to_string(),
            floors: vec![],
            bulkhead: None,
            zoning_envelope: None,
            summary: Summary::default(),
        };
        assert_eq!(
            sanity_warnings(&scenario),
            vec!["No floors could be built in the massing model.".to_string()]
        );
    }

    #[test]
    fn test_height_ground_floor_and_narrow_plate() {
        let scenario = Scenario {
            name: "Tight".to_string(),
            floors: vec![
                floor(1, FloorUse::Commercial, 0.0, 12.0),
                floor(2, FloorUse::Residential, 12.0, 10.0),
                floor(3, FloorUse::Residential, 22.0, 10.0),
            ],
            bulkhead: None,
            zoning_envelope: Some(ZoningEnvelope {
                max_height_ft: 25.0,
                base_height_max_ft: None,
                setback_line: None,
                sky_exposure_plane: None,
                front_yard_ft: None,
                rear_yard_ft: None,
            }),
            summary: Summary::default(),
        };

        let warnings = sanity_warnings(&scenario);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].starts_with("Building height (32 ft)"));
        assert!(warnings[1].starts_with("Commercial ground floor height (12 ft)"));
        // sqrt(200 / 2) = 10 ft, reported once for the first narrow floor
        assert!(warnings[2].starts_with("Floor 2 plate is very narrow (~10 ft)"));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimensional reference annotations: north arrow, scale bar, street label
//! and building dimensions

use crate::drawable::{Label, Lines, GRADE_LIFT_FT};
use crate::lot::LotGeometry;
use crate::palette;
use massing_lite_core::{Lot, Scenario};
use massing_lite_geometry::{frame, LineSet, Point2, Point3, Polyline, Profile2D, Vector2};

/// North arrow shaft length; north is +z
pub const NORTH_ARROW_LENGTH_FT: f64 = 20.0;
/// Offset of the north arrow from the lot's rear-right corner
pub const NORTH_ARROW_OFFSET_FT: f64 = 15.0;
/// Scale bar tick positions
pub const SCALE_BAR_TICKS_FT: [f64; 3] = [0.0, 10.0, 50.0];
/// Gap between the lot front and the scale bar
pub const SCALE_BAR_OFFSET_FT: f64 = 10.0;
/// Distance the street label is pushed away from the lot
pub const STREET_LABEL_OFFSET_FT: f64 = 8.0;

/// Gap between the building's max-x side and the height dimension line
pub const HEIGHT_DIMENSION_OFFSET_FT: f64 = 8.0;
/// Per-floor ticks sit this far inside the height dimension line
pub const FLOOR_TICK_INSET_FT: f64 = 4.0;
/// Gap between the footprint and its width / depth dimensions
pub const PLAN_DIMENSION_OFFSET_FT: f64 = 2.0;

const ARROW_HEAD_FT: f64 = 4.0;
const TICK_HALF_FT: f64 = 1.5;
const FLOOR_TICK_FT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NorthArrow {
    pub lines: Lines,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    pub lines: Lines,
    pub labels: Vec<Label>,
}

/// Building height and ground-floor plan dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Dimensions {
    pub height_ft: f64,
    /// Total-height line with end ticks
    pub height: Lines,
    pub height_label: Label,
    /// Tick at every floor boundary
    pub floor_ticks: Lines,
    /// Floor-to-floor height beside each floor
    pub floor_labels: Vec<Label>,
    /// Width along the front edge and depth along the min-x side
    pub plan: Lines,
    pub plan_labels: Vec<Label>,
}

impl Dimensions {
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        std::iter::once(&self.height_label)
            .chain(self.floor_labels.iter())
            .chain(self.plan_labels.iter())
    }

    pub fn lines(&self) -> impl Iterator<Item = &Lines> {
        [&self.height, &self.floor_ticks, &self.plan].into_iter()
    }
}

/// Annotations for a single-scenario scene
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
    pub north_arrow: NorthArrow,
    pub scale_bar: ScaleBar,
    pub street_label: Option<Label>,
    pub dimensions: Option<Dimensions>,
}

impl Annotations {
    pub fn with_dimensions(mut self, dimensions: Option<Dimensions>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        std::iter::once(&self.north_arrow.label)
            .chain(self.scale_bar.labels.iter())
            .chain(self.street_label.iter())
            .chain(self.dimensions.iter().flat_map(Dimensions::labels))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Lines> {
        [&self.north_arrow.lines, &self.scale_bar.lines]
            .into_iter()
            .chain(self.dimensions.iter().flat_map(Dimensions::lines))
    }
}

pub fn annotate(lot: &Lot, geometry: &LotGeometry) -> Annotations {
    Annotations {
        north_arrow: north_arrow(geometry),
        scale_bar: scale_bar(geometry),
        street_label: street_label(lot, geometry),
        dimensions: None,
    }
}

/// Height and plan dimensions of `scenario`.
///
/// The height line spans `total_height_ft` when given and positive, else the
/// scenario's roof height. Plan dimensions follow the lowest floor's
/// footprint. `None` without a usable ground floor or height.
pub fn dimension_building(
    scenario: &Scenario,
    total_height_ft: Option<f64>,
) -> Option<Dimensions> {
    let ground_floor = scenario.floors.first()?;
    let bounds = Profile2D::from_ring(&ground_floor.footprint)?.bounds()?;
    let height = total_height_ft
        .filter(|h| *h > 0.0)
        .unwrap_or_else(|| scenario.roof_height_ft());
    if height <= 0.0 {
        return None;
    }

    let x = bounds.max.x + HEIGHT_DIMENSION_OFFSET_FT;
    let z = bounds.center().y;
    let tick = |x: f64, half: f64, y: f64| {
        Polyline::open([Point3::new(x - half, y, z), Point3::new(x + half, y, z)])
    };

    let mut height_lines = LineSet::new();
    height_lines.push(Polyline::open([Point3::new(x, 0.0, z), Point3::new(x, height, z)]));
    height_lines.push(tick(x, TICK_HALF_FT, 0.0));
    height_lines.push(tick(x, TICK_HALF_FT, height));

    let tick_x = x - FLOOR_TICK_INSET_FT;
    let floor_tick = |y: f64| tick(tick_x + FLOOR_TICK_FT / 2.0, FLOOR_TICK_FT / 2.0, y);
    let mut floor_ticks = LineSet::new();
    let mut floor_labels = Vec::with_capacity(scenario.floors.len());
    for floor in &scenario.floors {
        floor_ticks.push(floor_tick(floor.elevation_ft));
        floor_labels.push(
            Label::new(
                format!("{:.0}'", floor.height_ft),
                Point3::new(tick_x - 1.0, floor.elevation_ft + floor.height_ft / 2.0, z),
            )
            .with_color(palette::rgba(palette::FLOOR_DIMENSION, 1.0)),
        );
    }
    floor_ticks.push(floor_tick(height));

    let front = bounds.min.y - PLAN_DIMENSION_OFFSET_FT;
    let side = bounds.min.x - PLAN_DIMENSION_OFFSET_FT;
    let mut plan = LineSet::new();
    plan.push(Polyline::polyline_at(
        &[Point2::new(bounds.min.x, front), Point2::new(bounds.max.x, front)],
        GRADE_LIFT_FT,
    ));
    plan.push(Polyline::polyline_at(
        &[Point2::new(side, bounds.min.y), Point2::new(side, bounds.max.y)],
        GRADE_LIFT_FT,
    ));
    let plan_color = palette::rgba(palette::PLAN_DIMENSION, 1.0);
    let plan_labels = vec![
        Label::new(
            format!("{:.0}'", bounds.width()),
            frame::ground(
                Point2::new(bounds.center().x, front - PLAN_DIMENSION_OFFSET_FT),
                GRADE_LIFT_FT,
            ),
        )
        .with_color(plan_color),
        Label::new(
            format!("{:.0}'", bounds.depth()),
            frame::ground(
                Point2::new(side - PLAN_DIMENSION_OFFSET_FT, bounds.center().y),
                GRADE_LIFT_FT,
            ),
        )
        .with_color(plan_color),
    ];

    let height_color = palette::rgba(palette::HEIGHT_DIMENSION, 1.0);
    Some(Dimensions {
        height_ft: height,
        height: Lines::new("dimension.height", height_lines, height_color),
        height_label: Label::new(
            format!("{:.0} ft", height),
            Point3::new(x + 3.0, height / 2.0, z),
        )
        .with_color(height_color),
        floor_ticks: Lines::new(
            "dimension.floors",
            floor_ticks,
            palette::rgba(palette::FLOOR_DIMENSION, 1.0),
        ),
        floor_labels,
        plan: Lines::new("dimension.plan", plan, plan_color),
        plan_labels,
    })
}

fn north_arrow(geometry: &LotGeometry) -> NorthArrow {
    let corner = geometry.bounds.max;
    let base = Point2::new(corner.x + NORTH_ARROW_OFFSET_FT, corner.y + NORTH_ARROW_OFFSET_FT);
    let tip = Point2::new(base.x, base.y + NORTH_ARROW_LENGTH_FT);

    let mut lines = LineSet::new();
    lines.push(Polyline::polyline_at(&[base, tip], GRADE_LIFT_FT));
    lines.push(Polyline::polyline_at(
        &[
            Point2::new(tip.x - ARROW_HEAD_FT / 2.0, tip.y - ARROW_HEAD_FT),
            tip,
            Point2::new(tip.x + ARROW_HEAD_FT / 2.0, tip.y - ARROW_HEAD_FT),
        ],
        GRADE_LIFT_FT,
    ));

    NorthArrow {
        lines: Lines::new("annotation.north", lines, palette::rgba(palette::ANNOTATION, 1.0)),
        label: Label::new(
            "N",
            frame::ground(Point2::new(tip.x, tip.y + ARROW_HEAD_FT), GRADE_LIFT_FT),
        ),
    }
}

fn scale_bar(geometry: &LotGeometry) -> ScaleBar {
    let z = geometry.bounds.min.y - SCALE_BAR_OFFSET_FT;
    let x0 = geometry.bounds.min.x;
    let length = SCALE_BAR_TICKS_FT[SCALE_BAR_TICKS_FT.len() - 1];

    let mut lines = LineSet::new();
    lines.push(Polyline::polyline_at(
        &[Point2::new(x0, z), Point2::new(x0 + length, z)],
        GRADE_LIFT_FT,
    ));

    let mut labels = Vec::with_capacity(SCALE_BAR_TICKS_FT.len());
    for tick in SCALE_BAR_TICKS_FT {
        let x = x0 + tick;
        lines.push(Polyline::polyline_at(
            &[Point2::new(x, z - TICK_HALF_FT), Point2::new(x, z + TICK_HALF_FT)],
            GRADE_LIFT_FT,
        ));
        let text = if tick == 0.0 {
            "0".to_string()
        } else {
            format!("{} ft", tick)
        };
        labels.push(Label::new(
            text,
            frame::ground(Point2::new(x, z - 2.0 * TICK_HALF_FT - 1.0), GRADE_LIFT_FT),
        ));
    }

    ScaleBar {
        lines: Lines::new("annotation.scale", lines, palette::rgba(palette::ANNOTATION, 1.0)),
        labels,
    }
}

/// Street name at the primary street edge, pushed away from the lot center
fn street_label(lot: &Lot, geometry: &LotGeometry) -> Option<Label> {
    let edge = lot.primary_street_edge()?;
    let midpoint = frame::point(edge.midpoint());
    let away: Vector2<f64> = (midpoint - geometry.bounds.center())
        .try_normalize(1e-9)
        .unwrap_or_else(|| -Vector2::y());

    let at = midpoint + away * STREET_LABEL_OFFSET_FT;
    Some(Label::new(
        edge.street_name.clone(),
        frame::ground(at, GRADE_LIFT_FT),
    ))
}

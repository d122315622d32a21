// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interaction and selection state
//!
//! [`ViewState`] owns which scenarios are shown, which floor is selected or
//! hovered, and the display toggles. Every operation here is a plain state
//! replacement, so repeated or out-of-order pointer events settle on the
//! last one received.

use massing_lite_core::Floor;
use serde::Serialize;

/// Identifies one floor of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FloorKey {
    pub scenario: usize,
    pub floor_num: i32,
}

impl FloorKey {
    pub fn new(scenario: usize, floor_num: i32) -> Self {
        Self {
            scenario,
            floor_num,
        }
    }
}

/// Rendering filters; toggling never touches scenario data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayToggles {
    pub show_envelope: bool,
    pub show_lot: bool,
    pub show_setbacks: bool,
    pub show_labels: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_envelope: true,
            show_lot: true,
            show_setbacks: false,
            show_labels: false,
        }
    }
}

/// Pointer event reported by a floor solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorEvent {
    HoverBegin(FloorKey),
    HoverEnd(FloorKey),
    Select(FloorKey),
}

/// Receives the viewer's outward floor events
///
/// `None` means the hover or selection was cleared.
pub trait FloorEventSink {
    fn floor_hovered(&mut self, floor: Option<&Floor>);
    fn floor_selected(&mut self, floor: Option<&Floor>);
}

/// Sink that drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl FloorEventSink for NullSink {
    fn floor_hovered(&mut self, _floor: Option<&Floor>) {}
    fn floor_selected(&mut self, _floor: Option<&Floor>) {}
}

/// Capability exposed by every hit-testable floor solid
pub trait FloorInteraction {
    fn floor_key(&self) -> FloorKey;

    /// Pointer entered (`true`) or left (`false`) this solid
    fn on_hover_change(&mut self, hovered: bool) -> FloorEvent;

    /// Pointer clicked this solid
    fn on_select(&self) -> FloorEvent {
        FloorEvent::Select(self.floor_key())
    }
}

/// Highlight inputs of one floor solid
///
/// `externally_highlighted` mirrors the globally hovered floor (tooltips,
/// side panels); `locally_hovered` is set by pointer hits on the solid
/// itself. [`HoverState::is_highlighted`] is the only place they combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    pub externally_highlighted: bool,
    pub locally_hovered: bool,
}

impl HoverState {
    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.externally_highlighted || self.locally_hovered
    }
}

/// Scenario choice, selection and display state of a viewer session
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    active_scenario: usize,
    comparison_scenario: usize,
    comparison_mode: bool,
    selected: Option<FloorKey>,
    hovered: Option<FloorKey>,
    pub toggles: DisplayToggles,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_scenario: 0,
            comparison_scenario: 1,
            comparison_mode: false,
            selected: None,
            hovered: None,
            toggles: DisplayToggles::default(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toggles(toggles: DisplayToggles) -> Self {
        Self {
            toggles,
            ..Self::default()
        }
    }

    #[inline]
    pub fn active_scenario(&self) -> usize {
        self.active_scenario
    }

    #[inline]
    pub fn comparison_mode(&self) -> bool {
        self.comparison_mode
    }

    #[inline]
    pub fn selected(&self) -> Option<FloorKey> {
        self.selected
    }

    #[inline]
    pub fn hovered(&self) -> Option<FloorKey> {
        self.hovered
    }

    /// Make `index` the active scenario.
    ///
    /// Selection and hover refer to floors of the previous scenario, so a
    /// real switch clears both. Returns whether anything changed.
    pub fn set_active_scenario(&mut self, index: usize) -> bool {
        if index == self.active_scenario {
            return false;
        }
        self.active_scenario = index;
        self.selected = None;
        self.hovered = None;
        true
    }

    /// Requested comparison target; see [`ViewState::comparison_scenario`]
    pub fn set_comparison_scenario(&mut self, index: usize) {
        self.comparison_scenario = index;
    }

    /// Request comparison mode. It only takes effect once the payload has a
    /// second scenario; see [`ViewState::shown_comparison`].
    pub fn set_comparison_mode(&mut self, enabled: bool) {
        self.comparison_mode = enabled;
    }

    /// Effective comparison target for a payload with `scenario_count`
    /// scenarios.
    ///
    /// A target equal to the active scenario, or past the end, falls back to
    /// scenario 0, or 1 when the active scenario is already 0. `None` when
    /// there is no second scenario to compare against.
    pub fn comparison_scenario(&self, scenario_count: usize) -> Option<usize> {
        if scenario_count < 2 {
            return None;
        }
        let requested = self.comparison_scenario;
        if requested != self.active_scenario && requested < scenario_count {
            return Some(requested);
        }
        Some(if self.active_scenario == 0 { 1 } else { 0 })
    }

    /// Scenario actually shown next to the active one: comparison mode is
    /// requested and a second scenario exists
    pub fn shown_comparison(&self, scenario_count: usize) -> Option<usize> {
        self.comparison_mode
            .then(|| self.comparison_scenario(scenario_count))
            .flatten()
    }

    /// Pointer entered a floor; replaces any previous hover
    pub fn hover_begin(&mut self, key: FloorKey) {
        self.hovered = Some(key);
    }

    /// Pointer left a floor. Only clears the hover if it still points at
    /// `key`, so a late leave from an older floor does not erase a newer
    /// hover.
    pub fn hover_end(&mut self, key: FloorKey) -> bool {
        if self.hovered == Some(key) {
            self.hovered = None;
            true
        } else {
            false
        }
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Sticky selection from a click
    pub fn select(&mut self, key: FloorKey) {
        self.selected = Some(key);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drop hover and selection without touching scenario choice
    pub fn reset_floors(&mut self) {
        self.selected = None;
        self.hovered = None;
    }

    /// Floor whose lightweight tooltip is shown: the hovered floor, only
    /// while nothing is selected
    pub fn tooltip_floor(&self) -> Option<FloorKey> {
        match self.selected {
            Some(_) => None,
            None => self.hovered,
        }
    }

    /// Floor shown in the detail panel; selection wins over hover
    pub fn detail_floor(&self) -> Option<FloorKey> {
        self.selected.or(self.hovered)
    }

    /// Apply a floor event. Returns whether the state changed.
    pub fn apply(&mut self, event: FloorEvent) -> bool {
        match event {
            FloorEvent::HoverBegin(key) => {
                let changed = self.hovered != Some(key);
                self.hover_begin(key);
                changed
            }
            FloorEvent::HoverEnd(key) => self.hover_end(key),
            FloorEvent::Select(key) => {
                let changed = self.selected != Some(key);
                self.select(key);
                changed
            }
        }
    }
}

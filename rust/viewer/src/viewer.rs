// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer session: payload, view state, memoized scene and outward events

use crate::capture::{capture_still_image, RenderSurface};
use crate::error::{Error, Result};
use crate::interaction::{
    DisplayToggles, FloorEvent, FloorEventSink, FloorInteraction, FloorKey, ViewState,
};
use crate::picking::Ray;
use crate::scene::{Composer, Scene};
use massing_lite_core::{sanity_warnings, validate, Floor, MassingData};
use tracing::{debug, info, warn};

/// One interactive massing view
///
/// Holds no scene until a payload is loaded; until then pointer input is
/// ignored and [`Viewer::scene`] returns `None`.
pub struct Viewer {
    data: Option<MassingData>,
    revision: u64,
    state: ViewState,
    composer: Composer,
    sink: Box<dyn FloorEventSink>,
    surface: Option<Box<dyn RenderSurface>>,
    /// Floor solid currently under the pointer
    pointer_over: Option<FloorKey>,
}

impl Viewer {
    pub fn new(sink: Box<dyn FloorEventSink>) -> Self {
        Self {
            data: None,
            revision: 0,
            state: ViewState::new(),
            composer: Composer::new(),
            sink,
            surface: None,
            pointer_over: None,
        }
    }

    pub fn with_toggles(mut self, toggles: DisplayToggles) -> Self {
        self.state.toggles = toggles;
        self
    }

    pub fn attach_surface(&mut self, surface: Box<dyn RenderSurface>) {
        self.surface = Some(surface);
    }

    /// Replace the payload.
    ///
    /// Invariant violations and backend sanity warnings are logged; none of
    /// them prevent rendering.
    pub fn load(&mut self, data: MassingData) {
        for issue in validate(&data) {
            warn!(%issue, "Massing payload issue");
        }
        for warning in &data.warnings {
            info!(%warning, "Backend warning");
        }
        for (index, scenario) in data.scenarios.iter().enumerate() {
            for warning in sanity_warnings(scenario) {
                info!(scenario = index, %warning, "Massing sanity check");
            }
        }

        self.clear_floor_state();
        if self.state.active_scenario() >= data.scenario_count() {
            self.state.set_active_scenario(0);
        }

        info!(
            scenarios = data.scenario_count(),
            lot_area_sf = data.lot.area_sf,
            "Loaded massing payload"
        );
        self.data = Some(data);
        self.revision += 1;
    }

    /// Drop the payload; nothing renders until the next [`Viewer::load`]
    pub fn unload(&mut self) {
        self.clear_floor_state();
        self.data = None;
        self.revision += 1;
        self.composer.invalidate();
    }

    pub fn data(&self) -> Option<&MassingData> {
        self.data.as_ref()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current scene, composed on demand and reused while its inputs are
    /// unchanged
    pub fn scene(&mut self) -> Option<&Scene> {
        let data = self.data.as_ref()?;
        self.composer.compose(data, self.revision, &self.state);
        let scene = self.composer.scene_mut()?;
        scene.sync_hover(self.state.hovered(), self.pointer_over);
        Some(&*scene)
    }

    /// How many times a scene was actually built
    pub fn compositions(&self) -> u64 {
        self.composer.compositions()
    }

    /// Switch the active scenario; hover and selection are cleared
    pub fn set_active_scenario(&mut self, index: usize) {
        let count = self.data.as_ref().map_or(0, MassingData::scenario_count);
        if index >= count {
            warn!(index, count, "Ignoring out-of-range scenario");
            return;
        }
        if self.state.active_scenario() != index {
            self.clear_floor_state();
            self.state.set_active_scenario(index);
        }
    }

    /// Enable or disable side-by-side comparison against `index`.
    ///
    /// With a single scenario the request is kept but the view stays
    /// interactive until a payload with a second scenario is loaded.
    pub fn set_comparison(&mut self, enabled: bool, index: usize) {
        self.state.set_comparison_scenario(index);
        self.state.set_comparison_mode(enabled);
        if self.comparison_shown() {
            self.pointer_over = None;
            if self.state.hovered().is_some() {
                self.state.clear_hover();
                self.sink.floor_hovered(None);
            }
        }
    }

    /// Whether the current view is a read-only comparison
    pub fn comparison_shown(&self) -> bool {
        let count = self.data.as_ref().map_or(0, MassingData::scenario_count);
        self.state.shown_comparison(count).is_some()
    }

    pub fn set_toggles(&mut self, toggles: DisplayToggles) {
        self.state.toggles = toggles;
    }

    /// Pointer moved; `ray` goes from the eye through the pointer
    pub fn pointer_move(&mut self, ray: &Ray) {
        let hit = self.scene().and_then(|s| s.pick(ray)).map(|h| h.key);
        if hit == self.pointer_over {
            return;
        }

        if let Some(previous) = self.pointer_over.take() {
            let event = self.solid_event(previous, false);
            self.dispatch(event);
        }
        if let Some(key) = hit {
            let event = self.solid_event(key, true);
            self.pointer_over = Some(key);
            self.dispatch(event);
        }
    }

    /// Pointer left the render surface
    pub fn pointer_leave(&mut self) {
        if let Some(previous) = self.pointer_over.take() {
            let event = self.solid_event(previous, false);
            self.dispatch(event);
        }
    }

    /// Pointer clicked; selects the nearest floor under `ray`
    pub fn click(&mut self, ray: &Ray) -> Option<FloorKey> {
        let key = self.scene()?.pick(ray)?.key;
        let event = self
            .composer
            .scene()
            .and_then(|s| s.floor_solid(key))
            .map_or(FloorEvent::Select(key), |solid| solid.on_select());
        self.dispatch(event);
        Some(key)
    }

    /// Apply a floor event from the host's own event dispatch.
    ///
    /// Ignored in comparison mode, for floors outside the active scenario,
    /// and before a payload is loaded.
    pub fn dispatch(&mut self, event: FloorEvent) {
        if self.comparison_shown() {
            return;
        }
        let key = match event {
            FloorEvent::HoverBegin(key) | FloorEvent::HoverEnd(key) | FloorEvent::Select(key) => key,
        };
        if key.scenario != self.state.active_scenario() {
            debug!(?event, "Ignoring event for inactive scenario");
            return;
        }
        let Some(floor) = lookup(self.data.as_ref(), key) else {
            debug!(?event, "Ignoring event for unknown floor");
            return;
        };

        if !self.state.apply(event) {
            return;
        }
        match event {
            FloorEvent::HoverBegin(_) => self.sink.floor_hovered(Some(floor)),
            FloorEvent::HoverEnd(_) => self.sink.floor_hovered(None),
            FloorEvent::Select(_) => self.sink.floor_selected(Some(floor)),
        }
    }

    pub fn clear_selection(&mut self) {
        if self.state.selected().is_some() {
            self.state.clear_selection();
            self.sink.floor_selected(None);
        }
    }

    pub fn hovered_floor(&self) -> Option<&Floor> {
        lookup(self.data.as_ref(), self.state.hovered()?)
    }

    pub fn selected_floor(&self) -> Option<&Floor> {
        lookup(self.data.as_ref(), self.state.selected()?)
    }

    /// Floor for the lightweight tooltip: hovered, and only with no selection
    pub fn tooltip_floor(&self) -> Option<&Floor> {
        lookup(self.data.as_ref(), self.state.tooltip_floor()?)
    }

    /// PNG of the current frame from the attached render surface
    pub fn capture_still_image(&self) -> Result<Vec<u8>> {
        let surface = self.surface.as_deref().ok_or(Error::NoSurface)?;
        capture_still_image(surface)
    }

    /// Hover change reported through the floor solid when it exists
    fn solid_event(&mut self, key: FloorKey, hovered: bool) -> FloorEvent {
        match self.composer.scene_mut().and_then(|s| s.floor_solid_mut(key)) {
            Some(solid) => solid.on_hover_change(hovered),
            None if hovered => FloorEvent::HoverBegin(key),
            None => FloorEvent::HoverEnd(key),
        }
    }

    fn clear_floor_state(&mut self) {
        self.pointer_over = None;
        if self.state.hovered().is_some() {
            self.sink.floor_hovered(None);
        }
        if self.state.selected().is_some() {
            self.sink.floor_selected(None);
        }
        self.state.reset_floors();
    }
}

fn lookup(data: Option<&MassingData>, key: FloorKey) -> Option<&Floor> {
    data?.scenario(key.scenario)?.floor(key.floor_num)
}

//! Engine: the top-level state machine the host drives.
//!
//! The host forwards pointer, scroll and timer events and data fetches; every
//! handler returns the [`Action`]s the host should carry out. Nothing here
//! performs I/O. Server round-trips (breakpoints, continue) leave as actions
//! and come back as a fresh snapshot.

use std::sync::Arc;
use std::time::Duration;

use crate::hit::{HitPart, hit_test_visible};
use crate::model::{Point, Snapshot};
use crate::overlay::{Overlay, Tooltip};
use crate::render::{RenderError, RenderOptions, RenderReport, RenderedDiagram, render};
use crate::text::{ArialMetrics, TextMeasurer};
use crate::viewport::{Clock, DebounceState, ScrollDebounce, Size, Viewport, ZoomFactors};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Default scroll-settle delay.
pub const DEFAULT_SCROLL_SETTLE: Duration = Duration::from_millis(200);

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    ResizeCanvas(Size),
    ShowTooltip(Tooltip),
    HideTooltip,
    /// The debugger selection changed; `None` clears it.
    SelectionChanged(Option<String>),
    /// Click-through on an element outside debugger selection.
    Navigate { id: String },
    /// Add (`set`) or remove a breakpoint on an element.
    ToggleBreakpoint { element_id: String, set: bool },
    ContinuePlanItem { plan_item_id: String },
    SetDecorationsVisible(bool),
}

/// Engine settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub render: RenderOptions,
    pub zoom: ZoomFactors,
    pub scroll_settle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { render: RenderOptions::default(), zoom: ZoomFactors::default(), scroll_settle: DEFAULT_SCROLL_SETTLE }
    }
}

/// Core engine state: the current snapshot and its rendered diagram, overlay,
/// viewport and scroll debounce.
///
/// Separated from `Engine` so time can be passed in explicitly in tests.
pub struct EngineCore {
    config: EngineConfig,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    snapshot: Option<Snapshot>,
    diagram: Option<RenderedDiagram>,
    pub overlay: Overlay,
    pub viewport: Viewport,
    pub debounce: ScrollDebounce,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_measurer(config, Arc::new(ArialMetrics))
    }

    #[must_use]
    pub fn with_measurer(config: EngineConfig, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        Self {
            config,
            measurer,
            snapshot: None,
            diagram: None,
            overlay: Overlay::new(config.render.debugger_enabled),
            viewport: Viewport::new(config.zoom),
            debounce: ScrollDebounce::new(config.scroll_settle),
        }
    }

    // --- Data inputs ---

    /// Replace the diagram with a full render of `snapshot`.
    ///
    /// The previous diagram stays in place if the pass fails. The canvas is
    /// refit only when the content area changed, so a redraw after a debugger
    /// mutation keeps the current zoom.
    ///
    /// # Errors
    ///
    /// Propagates the [`RenderError`] of a failed pass.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Vec<Action>, RenderError> {
        let mut diagram = render(&snapshot, &self.config.render, Arc::clone(&self.measurer))?;

        let mut actions = Vec::new();
        let previous_box = self.diagram.as_ref().map(|d| d.view_box);
        if previous_box != Some(diagram.view_box) {
            self.viewport.fit_to(diagram.view_box);
            actions.push(Action::ResizeCanvas(self.viewport.canvas()));
        }
        if self.overlay.hovered_id().is_some() {
            actions.push(Action::HideTooltip);
        }
        actions.extend(self.overlay.rebind(&mut diagram.scene, &diagram.targets));
        let scrolling = matches!(self.debounce.state(), DebounceState::Pending { .. });
        diagram.scene.set_decorations_visible(!scrolling);

        self.diagram = Some(diagram);
        self.snapshot = Some(snapshot);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Drop the current diagram.
    pub fn clear(&mut self) {
        self.diagram = None;
        self.snapshot = None;
        self.overlay = Overlay::new(self.config.render.debugger_enabled);
    }

    // --- Input events ---

    /// Pointer moved to `screen_pt` on the canvas.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen_pt);
        let Some(diagram) = self.diagram.as_mut() else {
            return Vec::new();
        };
        let target = hit_test_visible(&diagram.regions, world, diagram.scene.decorations_visible())
            .filter(|h| matches!(h.part, HitPart::Body | HitPart::FlowPath))
            .map(|h| h.id.to_owned());
        match target {
            Some(id) => self.overlay.pointer_enter(&mut diagram.scene, &id),
            None => self.overlay.pointer_leave(&mut diagram.scene),
        }
    }

    /// Pointer left the canvas.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        match self.diagram.as_mut() {
            Some(diagram) => self.overlay.pointer_leave(&mut diagram.scene),
            None => Vec::new(),
        }
    }

    /// Primary click at `screen_pt`.
    pub fn on_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen_pt);
        let (Some(diagram), Some(snapshot)) = (self.diagram.as_mut(), self.snapshot.as_ref()) else {
            return Vec::new();
        };
        let Some(hit) = hit_test_visible(&diagram.regions, world, diagram.scene.decorations_visible()) else {
            return Vec::new();
        };
        match hit.part {
            HitPart::Body | HitPart::FlowPath => {
                let id = hit.id.to_owned();
                self.overlay.click(&mut diagram.scene, &id)
            }
            HitPart::BreakpointMarker => match snapshot.element(hit.id) {
                Some(el) => vec![Action::ToggleBreakpoint { element_id: el.id.clone(), set: !el.breakpoint }],
                None => Vec::new(),
            },
            HitPart::ContinueMarker => match snapshot.element(hit.id).and_then(|el| el.broken_plan_item_id()) {
                Some(plan_item_id) => vec![Action::ContinuePlanItem { plan_item_id: plan_item_id.to_owned() }],
                None => Vec::new(),
            },
        }
    }

    /// A scroll event at time `now`. Hides decorations when scrolling starts.
    pub fn on_scroll(&mut self, now: Duration) -> Vec<Action> {
        if !self.debounce.on_scroll(now) {
            return Vec::new();
        }
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.scene.set_decorations_visible(false);
        }
        vec![Action::SetDecorationsVisible(false), Action::RenderNeeded]
    }

    /// Advance time. On scroll settle, restores decorations and revalidates
    /// the selection.
    pub fn tick(&mut self, now: Duration) -> Vec<Action> {
        if !self.debounce.poll(now) {
            return Vec::new();
        }
        let mut actions = vec![Action::SetDecorationsVisible(true)];
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.scene.set_decorations_visible(true);
            actions.extend(self.overlay.revalidate(&mut diagram.scene));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.viewport.zoom_in().map_or_else(Vec::new, |size| vec![Action::ResizeCanvas(size), Action::RenderNeeded])
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.viewport.zoom_out().map_or_else(Vec::new, |size| vec![Action::ResizeCanvas(size), Action::RenderNeeded])
    }

    // --- Queries ---

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.overlay.selected()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn diagram(&self) -> Option<&RenderedDiagram> {
        self.diagram.as_ref()
    }

    #[must_use]
    pub fn report(&self) -> Option<&RenderReport> {
        self.diagram.as_ref().map(|d| &d.report)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current diagram as SVG at the current canvas size.
    #[must_use]
    pub fn svg(&self) -> Option<String> {
        let diagram = self.diagram.as_ref()?;
        let canvas = self.viewport.canvas();
        Some(diagram.scene.to_svg(canvas.width, canvas.height, self.viewport.view_box()))
    }
}

/// The engine with a clock. Wraps `EngineCore` and reads time from `C`.
pub struct Engine<C: Clock> {
    clock: C,
    pub core: EngineCore,
}

impl<C: Clock> Engine<C> {
    #[must_use]
    pub fn new(config: EngineConfig, clock: C) -> Self {
        Self { clock, core: EngineCore::new(config) }
    }

    // --- Delegated data inputs ---

    /// # Errors
    ///
    /// See [`EngineCore::load_snapshot`].
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Vec<Action>, RenderError> {
        self.core.load_snapshot(snapshot)
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    // --- Input events ---

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_click(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_click(screen_pt)
    }

    pub fn on_scroll(&mut self) -> Vec<Action> {
        let now = self.clock.now();
        self.core.on_scroll(now)
    }

    pub fn tick(&mut self) -> Vec<Action> {
        let now = self.clock.now();
        self.core.tick(now)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.core.selection()
    }

    #[must_use]
    pub fn svg(&self) -> Option<String> {
        self.core.svg()
    }
}

//! Interaction overlay: hover highlighting, debugger selection, tooltips.
//!
//! The overlay never re-derives geometry. It knows each interactive target by
//! id, the handle of the node it recolors, and the color that target should
//! rest at. Hovering paints over the resting color; leaving paints it back.
//!
//! The resting color starts as the color resolved at draw time. Selection
//! changes it: the selected element rests at [`SELECTED_COLOR`], and an
//! element that loses the selection to another one rests at
//! [`BREAKABLE_COLOR`]. Deselecting by a second click restores the draw-time
//! color.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::collections::HashMap;

use crate::consts::{BREAKABLE_COLOR, FLOW_HOVER_COLOR, HOVER_COLOR, SELECTED_COLOR};
use crate::engine::Action;
use crate::scene::{Handle, Scene};

/// What kind of diagram object a target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Shape,
    Flow,
}

/// Hover details handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tooltip {
    pub id: String,
    /// Element type tag, or the flow type.
    pub kind: String,
    pub name: Option<String>,
    /// Display properties as `(name, value)` pairs.
    pub properties: Vec<(String, String)>,
}

/// One interactive object registered by a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    /// The visible node recolored on hover and selection.
    pub handle: Handle,
    /// Color resolved at draw time.
    pub base_color: &'static str,
    /// Eligible for debugger selection (breakable or currently active).
    pub selectable: bool,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone)]
struct Entry {
    target: Target,
    resting: &'static str,
}

/// Hover state of the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering {
        id: String,
    },
}

/// Hover and selection state over one rendered diagram.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    entries: HashMap<String, Entry>,
    hover: HoverState,
    selected: Option<String>,
    debugger_enabled: bool,
}

impl Overlay {
    #[must_use]
    pub fn new(debugger_enabled: bool) -> Self {
        Self { debugger_enabled, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    #[must_use]
    pub fn hovered_id(&self) -> Option<&str> {
        match &self.hover {
            HoverState::Hovering { id } => Some(id),
            HoverState::Idle => None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn debugger_enabled(&self) -> bool {
        self.debugger_enabled
    }

    #[must_use]
    pub fn target(&self, id: &str) -> Option<&Target> {
        self.entries.get(id).map(|e| &e.target)
    }

    /// The color `id` returns to when the pointer leaves it.
    #[must_use]
    pub fn resting_color(&self, id: &str) -> Option<&'static str> {
        self.entries.get(id).map(|e| e.resting)
    }

    // --- Binding ---

    /// Replace every target after a full redraw.
    ///
    /// Hover is dropped. A selection survives if its element still exists
    /// and is still selectable; otherwise it is cleared and the host told.
    pub fn rebind(&mut self, scene: &mut Scene, targets: &HashMap<String, Target>) -> Vec<Action> {
        self.entries = targets
            .iter()
            .map(|(id, target)| (id.clone(), Entry { target: target.clone(), resting: target.base_color }))
            .collect();
        self.hover = HoverState::Idle;

        let Some(id) = self.selected.take() else {
            return Vec::new();
        };
        match self.entries.get_mut(&id) {
            Some(entry) if self.debugger_enabled && entry.target.selectable => {
                entry.resting = SELECTED_COLOR;
                scene.set_stroke(entry.target.handle, SELECTED_COLOR);
                self.selected = Some(id);
                Vec::new()
            }
            _ => {
                tracing::debug!(%id, "selected element gone after redraw");
                vec![Action::SelectionChanged(None)]
            }
        }
    }

    // --- Hover ---

    /// Pointer entered `id`'s hit region.
    pub fn pointer_enter(&mut self, scene: &mut Scene, id: &str) -> Vec<Action> {
        if self.hovered_id() == Some(id) {
            return Vec::new();
        }
        let mut actions = self.pointer_leave(scene);
        let Some(entry) = self.entries.get(id) else {
            return actions;
        };
        let color = match entry.target.kind {
            TargetKind::Shape => HOVER_COLOR,
            TargetKind::Flow => FLOW_HOVER_COLOR,
        };
        scene.set_stroke(entry.target.handle, color);
        actions.push(Action::ShowTooltip(entry.target.tooltip.clone()));
        actions.push(Action::RenderNeeded);
        self.hover = HoverState::Hovering { id: id.to_owned() };
        actions
    }

    /// Pointer left whatever it was hovering.
    pub fn pointer_leave(&mut self, scene: &mut Scene) -> Vec<Action> {
        let HoverState::Hovering { id } = std::mem::take(&mut self.hover) else {
            return Vec::new();
        };
        if let Some(entry) = self.entries.get(&id) {
            scene.set_stroke(entry.target.handle, entry.resting);
        }
        vec![Action::HideTooltip, Action::RenderNeeded]
    }

    // --- Click ---

    /// Click on a shape or flow body.
    ///
    /// With the debugger enabled, selectable elements toggle selection.
    /// Any other shape click is forwarded to the host as navigation.
    pub fn click(&mut self, scene: &mut Scene, id: &str) -> Vec<Action> {
        let Some(entry) = self.entries.get(id) else {
            return Vec::new();
        };
        if entry.target.kind == TargetKind::Flow {
            return Vec::new();
        }
        if !(self.debugger_enabled && entry.target.selectable) {
            return vec![Action::Navigate { id: id.to_owned() }];
        }

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.paint_resting(scene, id, None);
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }

        if let Some(previous) = self.selected.take() {
            self.paint_resting(scene, &previous, Some(BREAKABLE_COLOR));
        }
        self.paint_resting(scene, id, Some(SELECTED_COLOR));
        self.selected = Some(id.to_owned());
        vec![Action::SelectionChanged(Some(id.to_owned())), Action::RenderNeeded]
    }

    /// Clear and immediately reapply the selection so the host revalidates
    /// it against the current viewport.
    pub fn revalidate(&mut self, scene: &mut Scene) -> Vec<Action> {
        let Some(id) = self.selected.clone() else {
            return Vec::new();
        };
        self.paint_resting(scene, &id, None);
        self.paint_resting(scene, &id, Some(SELECTED_COLOR));
        vec![Action::SelectionChanged(None), Action::SelectionChanged(Some(id))]
    }

    /// Set `id`'s resting color (`None` means its draw-time color) and paint it.
    fn paint_resting(&mut self, scene: &mut Scene, id: &str, color: Option<&'static str>) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.resting = color.unwrap_or(entry.target.base_color);
            scene.set_stroke(entry.target.handle, entry.resting);
        }
    }
}

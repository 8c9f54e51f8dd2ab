use std::sync::Arc;

use super::*;
use crate::consts::{ACTIVITY_STROKE_COLOR, COMPLETED_COLOR, CURRENT_COLOR, MAIN_STROKE_COLOR};
use crate::model::Rect;
use crate::scene::Style;
use crate::text::ArialMetrics;

// =============================================================
// Helpers
// =============================================================

struct Fixture {
    scene: Scene,
    targets: HashMap<String, Target>,
}

impl Fixture {
    fn new() -> Self {
        Self { scene: Scene::new(Arc::new(ArialMetrics)), targets: HashMap::new() }
    }

    fn add(&mut self, id: &str, kind: TargetKind, color: &'static str, selectable: bool) -> Handle {
        let handle = self.scene.rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Style::stroked(color, 1.0));
        self.targets.insert(
            id.to_owned(),
            Target {
                kind,
                handle,
                base_color: color,
                selectable,
                tooltip: Tooltip { id: id.to_owned(), kind: "UserTask".into(), ..Tooltip::default() },
            },
        );
        handle
    }

    fn overlay(&mut self, debugger_enabled: bool) -> Overlay {
        let mut overlay = Overlay::new(debugger_enabled);
        overlay.rebind(&mut self.scene, &self.targets);
        overlay
    }

    fn stroke(&self, h: Handle) -> Option<&'static str> {
        self.scene.node(h).and_then(|n| n.style.stroke)
    }
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_restores_each_state_color() {
    for color in [CURRENT_COLOR, COMPLETED_COLOR, ACTIVITY_STROKE_COLOR] {
        let mut fx = Fixture::new();
        let h = fx.add("A", TargetKind::Shape, color, false);
        let mut overlay = fx.overlay(false);

        overlay.pointer_enter(&mut fx.scene, "A");
        assert_eq!(fx.stroke(h), Some(HOVER_COLOR));
        overlay.pointer_leave(&mut fx.scene);
        assert_eq!(fx.stroke(h), Some(color));
    }
}

#[test]
fn flow_hover_uses_flow_color() {
    let mut fx = Fixture::new();
    let h = fx.add("f1", TargetKind::Flow, MAIN_STROKE_COLOR, false);
    let mut overlay = fx.overlay(false);

    overlay.pointer_enter(&mut fx.scene, "f1");
    assert_eq!(fx.stroke(h), Some(FLOW_HOVER_COLOR));
    overlay.pointer_leave(&mut fx.scene);
    assert_eq!(fx.stroke(h), Some(MAIN_STROKE_COLOR));
}

#[test]
fn enter_emits_tooltip_and_leave_hides_it() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, false);
    let mut overlay = fx.overlay(false);

    let actions = overlay.pointer_enter(&mut fx.scene, "A");
    assert!(actions.iter().any(|a| matches!(a, Action::ShowTooltip(t) if t.id == "A")));
    assert_eq!(overlay.hover(), &HoverState::Hovering { id: "A".into() });

    let actions = overlay.pointer_leave(&mut fx.scene);
    assert!(actions.contains(&Action::HideTooltip));
    assert_eq!(overlay.hover(), &HoverState::Idle);
}

#[test]
fn moving_between_targets_restores_the_first() {
    let mut fx = Fixture::new();
    let a = fx.add("A", TargetKind::Shape, CURRENT_COLOR, false);
    let b = fx.add("B", TargetKind::Shape, COMPLETED_COLOR, false);
    let mut overlay = fx.overlay(false);

    overlay.pointer_enter(&mut fx.scene, "A");
    let actions = overlay.pointer_enter(&mut fx.scene, "B");
    assert_eq!(actions.first(), Some(&Action::HideTooltip));
    assert_eq!(fx.stroke(a), Some(CURRENT_COLOR));
    assert_eq!(fx.stroke(b), Some(HOVER_COLOR));
}

#[test]
fn re_entering_same_target_is_quiet() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, false);
    let mut overlay = fx.overlay(false);
    overlay.pointer_enter(&mut fx.scene, "A");
    assert!(overlay.pointer_enter(&mut fx.scene, "A").is_empty());
}

#[test]
fn leave_while_idle_is_quiet() {
    let mut fx = Fixture::new();
    let mut overlay = fx.overlay(false);
    assert!(overlay.pointer_leave(&mut fx.scene).is_empty());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn click_without_debugger_navigates() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(false);
    assert_eq!(overlay.click(&mut fx.scene, "A"), vec![Action::Navigate { id: "A".into() }]);
    assert_eq!(overlay.selected(), None);
}

#[test]
fn click_on_ineligible_element_navigates() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, ACTIVITY_STROKE_COLOR, false);
    let mut overlay = fx.overlay(true);
    assert_eq!(overlay.click(&mut fx.scene, "A"), vec![Action::Navigate { id: "A".into() }]);
}

#[test]
fn click_on_flow_does_nothing() {
    let mut fx = Fixture::new();
    fx.add("f1", TargetKind::Flow, MAIN_STROKE_COLOR, false);
    let mut overlay = fx.overlay(true);
    assert!(overlay.click(&mut fx.scene, "f1").is_empty());
}

#[test]
fn first_click_selects_and_notifies() {
    let mut fx = Fixture::new();
    let h = fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);

    let actions = overlay.click(&mut fx.scene, "A");
    assert_eq!(actions[0], Action::SelectionChanged(Some("A".into())));
    assert_eq!(overlay.selected(), Some("A"));
    assert_eq!(fx.stroke(h), Some(SELECTED_COLOR));
}

#[test]
fn second_click_deselects_and_restores_draw_color() {
    let mut fx = Fixture::new();
    let h = fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);

    overlay.click(&mut fx.scene, "A");
    let actions = overlay.click(&mut fx.scene, "A");
    assert_eq!(actions[0], Action::SelectionChanged(None));
    assert_eq!(overlay.selected(), None);
    assert_eq!(fx.stroke(h), Some(CURRENT_COLOR));
}

#[test]
fn new_selection_turns_previous_green() {
    let mut fx = Fixture::new();
    let a = fx.add("A", TargetKind::Shape, ACTIVITY_STROKE_COLOR, true);
    let b = fx.add("B", TargetKind::Shape, ACTIVITY_STROKE_COLOR, true);
    let mut overlay = fx.overlay(true);

    overlay.click(&mut fx.scene, "A");
    overlay.click(&mut fx.scene, "B");
    assert_eq!(fx.stroke(a), Some(BREAKABLE_COLOR));
    assert_eq!(fx.stroke(b), Some(SELECTED_COLOR));
    assert_eq!(overlay.selected(), Some("B"));
}

#[test]
fn hover_over_selected_returns_to_selected_color() {
    let mut fx = Fixture::new();
    let h = fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);

    overlay.click(&mut fx.scene, "A");
    overlay.pointer_enter(&mut fx.scene, "A");
    assert_eq!(fx.stroke(h), Some(HOVER_COLOR));
    overlay.pointer_leave(&mut fx.scene);
    assert_eq!(fx.stroke(h), Some(SELECTED_COLOR));
}

#[test]
fn revalidate_clears_then_reapplies() {
    let mut fx = Fixture::new();
    let h = fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);
    overlay.click(&mut fx.scene, "A");

    let actions = overlay.revalidate(&mut fx.scene);
    assert_eq!(actions, vec![Action::SelectionChanged(None), Action::SelectionChanged(Some("A".into()))]);
    assert_eq!(fx.stroke(h), Some(SELECTED_COLOR));
    assert_eq!(overlay.selected(), Some("A"));
}

#[test]
fn revalidate_without_selection_is_quiet() {
    let mut fx = Fixture::new();
    let mut overlay = fx.overlay(true);
    assert!(overlay.revalidate(&mut fx.scene).is_empty());
}

// =============================================================
// Rebind
// =============================================================

#[test]
fn rebind_keeps_surviving_selection() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);
    overlay.click(&mut fx.scene, "A");

    let mut next = Fixture::new();
    let h = next.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    assert!(overlay.rebind(&mut next.scene, &next.targets).is_empty());
    assert_eq!(overlay.selected(), Some("A"));
    assert_eq!(next.stroke(h), Some(SELECTED_COLOR));
}

#[test]
fn rebind_clears_vanished_selection() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, true);
    let mut overlay = fx.overlay(true);
    overlay.click(&mut fx.scene, "A");

    let mut next = Fixture::new();
    next.add("B", TargetKind::Shape, CURRENT_COLOR, true);
    assert_eq!(overlay.rebind(&mut next.scene, &next.targets), vec![Action::SelectionChanged(None)]);
    assert_eq!(overlay.selected(), None);
}

#[test]
fn rebind_drops_hover() {
    let mut fx = Fixture::new();
    fx.add("A", TargetKind::Shape, CURRENT_COLOR, false);
    let mut overlay = fx.overlay(false);
    overlay.pointer_enter(&mut fx.scene, "A");
    overlay.rebind(&mut fx.scene, &fx.targets.clone());
    assert_eq!(overlay.hovered_id(), None);
}

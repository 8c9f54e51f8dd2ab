use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::consts::{BREAKABLE_COLOR, ICON_PADDING};
use crate::scene::Primitive;
use crate::text::ArialMetrics;

fn scene() -> Scene {
    Scene::new(Arc::new(ArialMetrics))
}

fn element(kind: &str, extra: serde_json::Value) -> Element {
    let mut value = json!({
        "id": "A",
        "type": kind,
        "x": 10.0,
        "y": 20.0,
        "width": 100.0,
        "height": 80.0,
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    serde_json::from_value(value).unwrap()
}

fn draw(el: &Element) -> (Scene, DrawnShape) {
    let mut s = scene();
    let kind = ShapeKind::from_tag(&el.kind).unwrap();
    let drawn = draw_element(&mut s, el, kind);
    (s, drawn)
}

fn assert_outer_bbox_is_element_box(el: &Element) {
    let (s, drawn) = draw(el);
    let outer = s.outer_bbox(drawn.handle).unwrap();
    let expected = el.bounds();
    for (got, want) in [
        (outer.x, expected.x),
        (outer.y, expected.y),
        (outer.width, expected.width),
        (outer.height, expected.height),
    ] {
        assert!((got - want).abs() < 1e-9, "{}: {outer:?} != {expected:?}", el.kind);
    }
}

// =============================================================
// Registry
// =============================================================

#[test]
fn registry_maps_families() {
    assert_eq!(ShapeKind::from_tag("UserTask"), Some(ShapeKind::Activity(ActivityKind::Task)));
    assert_eq!(ShapeKind::from_tag("HumanTask"), Some(ShapeKind::Activity(ActivityKind::Task)));
    assert_eq!(ShapeKind::from_tag("Stage"), Some(ShapeKind::Activity(ActivityKind::Stage)));
    assert_eq!(ShapeKind::from_tag("BoundaryEvent"), Some(ShapeKind::Event(EventKind::Boundary)));
    assert_eq!(ShapeKind::from_tag("EventGateway"), Some(ShapeKind::Gateway(GatewayKind::Event)));
    assert_eq!(ShapeKind::from_tag("ExitCriterion"), Some(ShapeKind::Criterion(CriterionKind::Exit)));
    assert_eq!(ShapeKind::from_tag("Milestone"), Some(ShapeKind::Milestone));
}

#[test]
fn unmapped_tag_has_no_renderer() {
    assert_eq!(ShapeKind::from_tag("Hologram"), None);
    assert_eq!(ShapeKind::from_tag("usertask"), None);
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn outer_bbox_matches_element_box_for_every_family() {
    for kind in [
        "UserTask",
        "CallActivity",
        "SubProcess",
        "EventSubProcess",
        "Stage",
        "PlanModel",
        "StartEvent",
        "EndEvent",
        "BoundaryEvent",
        "TimerEventListener",
        "ExclusiveGateway",
        "ParallelGateway",
        "InclusiveGateway",
        "EventGateway",
        "ComplexGateway",
        "EntryCriterion",
        "ExitCriterion",
        "Milestone",
    ] {
        assert_outer_bbox_is_element_box(&element(kind, json!({})));
        assert_outer_bbox_is_element_box(&element(kind, json!({ "current": true })));
        assert_outer_bbox_is_element_box(&element(kind, json!({ "completed": true })));
    }
}

#[test]
fn body_is_bound_to_element_id() {
    let (s, drawn) = draw(&element("UserTask", json!({})));
    assert_eq!(s.handles_for("A"), vec![drawn.handle]);
}

#[test]
fn event_body_is_an_ellipse() {
    let (s, drawn) = draw(&element("StartEvent", json!({})));
    assert!(matches!(s.node(drawn.handle).unwrap().primitive, Primitive::Ellipse { .. }));
}

#[test]
fn gateway_body_is_a_rhombus() {
    let (s, drawn) = draw(&element("ExclusiveGateway", json!({})));
    let Primitive::Path(cmds) = &s.node(drawn.handle).unwrap().primitive else {
        panic!("expected path");
    };
    assert_eq!(cmds.len(), 5);
    assert_eq!(cmds[4], PathCmd::Close);
}

#[test]
fn non_interrupting_boundary_is_dashed() {
    let (s, drawn) = draw(&element("BoundaryEvent", json!({ "interrupting": false })));
    assert!(s.node(drawn.handle).unwrap().style.dashed);
    let (s, drawn) = draw(&element("BoundaryEvent", json!({})));
    assert!(!s.node(drawn.handle).unwrap().style.dashed);
}

// =============================================================
// Color and stroke resolution
// =============================================================

#[test]
fn resolve_color_priority_is_exact() {
    assert_eq!(resolve_color(true, true, BREAKABLE_COLOR), CURRENT_COLOR);
    assert_eq!(resolve_color(true, false, BREAKABLE_COLOR), CURRENT_COLOR);
    assert_eq!(resolve_color(false, true, BREAKABLE_COLOR), COMPLETED_COLOR);
    assert_eq!(resolve_color(false, false, BREAKABLE_COLOR), BREAKABLE_COLOR);
}

#[test]
fn plain_element_uses_family_default_and_plain_width() {
    let (_, drawn) = draw(&element("UserTask", json!({})));
    assert_eq!(drawn.color, ACTIVITY_STROKE_COLOR);
    assert!((drawn.stroke_width - 1.0).abs() < f64::EPSILON);

    let (_, drawn) = draw(&element("EndEvent", json!({})));
    assert_eq!(drawn.color, MAIN_STROKE_COLOR);
    assert!((drawn.stroke_width - 3.0).abs() < f64::EPSILON);
}

#[test]
fn state_color_elevates_stroke_width() {
    let (s, drawn) = draw(&element("UserTask", json!({ "current": true })));
    assert_eq!(drawn.color, CURRENT_COLOR);
    assert!((drawn.stroke_width - 2.0).abs() < f64::EPSILON);
    assert_eq!(s.node(drawn.handle).unwrap().style.stroke, Some(CURRENT_COLOR));

    let (_, drawn) = draw(&element("CallActivity", json!({ "completed": true })));
    assert_eq!(drawn.color, COMPLETED_COLOR);
    assert!((drawn.stroke_width - 3.0).abs() < f64::EPSILON);
}

#[test]
fn history_flags_only_replace_default_slot() {
    let (_, drawn) = draw(&element("UserTask", json!({ "added": true })));
    assert_eq!(drawn.color, ADDED_COLOR);
    let (_, drawn) = draw(&element("UserTask", json!({ "removed": true })));
    assert_eq!(drawn.color, REMOVED_COLOR);
    let (_, drawn) = draw(&element("UserTask", json!({ "added": true, "current": true })));
    assert_eq!(drawn.color, CURRENT_COLOR);
}

// =============================================================
// Icons and labels
// =============================================================

fn glyph_origins(s: &Scene) -> Vec<Point> {
    s.iter()
        .filter(|(_, n)| matches!(n.primitive, Primitive::Glyph { .. }))
        .map(|(_, n)| n.transform.translate)
        .collect()
}

#[test]
fn task_icon_sits_at_padded_origin() {
    let (s, _) = draw(&element("UserTask", json!({})));
    assert_eq!(glyph_origins(&s), vec![Point::new(10.0 + ICON_PADDING, 20.0 + ICON_PADDING)]);
}

#[test]
fn task_type_overrides_tag_icon() {
    let (s, _) = draw(&element("ServiceTask", json!({ "taskType": "mail" })));
    let glyphs: Vec<_> = s
        .iter()
        .filter_map(|(_, n)| match &n.primitive {
            Primitive::Glyph { d, .. } => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(glyphs, vec![Icon::Mail.path()]);
}

#[test]
fn plain_task_has_no_icon() {
    let (s, _) = draw(&element("Task", json!({})));
    assert!(glyph_origins(&s).is_empty());
}

#[test]
fn event_icon_is_centered() {
    let (s, _) = draw(&element("IntermediateCatchEvent", json!({ "eventDefinition": { "type": "timer" } })));
    let c = Rect::new(10.0, 20.0, 100.0, 80.0).center();
    assert_eq!(glyph_origins(&s), vec![Point::new(c.x - ICON_SIZE / 2.0, c.y - ICON_SIZE / 2.0)]);
}

#[test]
fn task_label_is_centered_in_box() {
    let (s, drawn) = draw(&element("UserTask", json!({ "name": "Approve" })));
    let Primitive::Text { anchor, .. } = &s.node(drawn.label.unwrap()).unwrap().primitive else {
        panic!("expected text");
    };
    assert_eq!(*anchor, Point::new(60.0, 60.0));
}

#[test]
fn event_label_is_drawn_below_the_shape() {
    let (s, drawn) = draw(&element("StartEvent", json!({ "name": "Start" })));
    let bb = s.bbox(drawn.label.unwrap()).unwrap();
    assert!((bb.y - 100.0).abs() < 1e-9);
}

#[test]
fn unnamed_element_has_no_label() {
    let (_, drawn) = draw(&element("UserTask", json!({})));
    assert!(drawn.label.is_none());
}

#[test]
fn review_scenario_wraps_inside_task() {
    let (s, drawn) = draw(&element("UserTask", json!({ "name": "Review request and approve or reject it" })));
    let Primitive::Text { lines, .. } = &s.node(drawn.label.unwrap()).unwrap().primitive else {
        panic!("expected text");
    };
    assert!(lines.len() > 1);
}

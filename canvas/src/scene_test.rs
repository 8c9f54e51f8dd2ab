#![allow(clippy::float_cmp)]

use super::*;
use crate::text::ArialMetrics;

fn scene() -> Scene {
    Scene::new(Arc::new(ArialMetrics))
}

// --- Handles ---

#[test]
fn handles_are_sequential_and_stable() {
    let mut s = scene();
    let a = s.rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Style::default());
    let b = s.ellipse(Point::new(5.0, 5.0), 2.0, 2.0, Style::default());
    assert_ne!(a, b);
    assert_eq!(s.len(), 2);
    assert!(matches!(s.node(a).unwrap().primitive, Primitive::Rect { .. }));
    assert!(matches!(s.node(b).unwrap().primitive, Primitive::Ellipse { .. }));
}

#[test]
fn set_stroke_recolors_only_target() {
    let mut s = scene();
    let a = s.rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Style::stroked("#000000", 1.0));
    let b = s.rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Style::stroked("#000000", 1.0));
    assert!(s.set_stroke(a, "#ff0000"));
    assert_eq!(s.node(a).unwrap().style.stroke, Some("#ff0000"));
    assert_eq!(s.node(b).unwrap().style.stroke, Some("#000000"));
}

#[test]
fn set_stroke_on_foreign_handle_is_rejected() {
    let mut big = scene();
    big.rect(Rect::default(), 0.0, Style::default());
    let h = big.rect(Rect::default(), 0.0, Style::default());
    let mut small = scene();
    assert!(!small.set_stroke(h, "#ff0000"));
}

#[test]
fn handles_for_returns_bound_nodes() {
    let mut s = scene();
    let a = s.rect(Rect::default(), 0.0, Style::default());
    s.rect(Rect::default(), 0.0, Style::default());
    let c = s.path(vec![PathCmd::MoveTo(Point::new(0.0, 0.0))], Style::default());
    s.set_id(a, "task");
    s.set_id(c, "task");
    assert_eq!(s.handles_for("task"), vec![a, c]);
    assert!(s.handles_for("other").is_empty());
}

// --- Bounds ---

#[test]
fn outer_bbox_adds_half_stroke() {
    let mut s = scene();
    let h = s.rect(Rect::new(1.0, 1.0, 98.0, 78.0), 4.0, Style::stroked("#000000", 2.0));
    assert_eq!(s.outer_bbox(h), Some(Rect::new(0.0, 0.0, 100.0, 80.0)));
}

#[test]
fn outer_bbox_without_stroke_is_geometry() {
    let mut s = scene();
    let h = s.rect(Rect::new(1.0, 1.0, 10.0, 10.0), 0.0, Style::default());
    assert_eq!(s.outer_bbox(h), Some(Rect::new(1.0, 1.0, 10.0, 10.0)));
}

#[test]
fn path_bbox_spans_points() {
    let mut s = scene();
    let h = s.path(
        vec![
            PathCmd::MoveTo(Point::new(5.0, 0.0)),
            PathCmd::LineTo(Point::new(10.0, 5.0)),
            PathCmd::LineTo(Point::new(5.0, 10.0)),
            PathCmd::LineTo(Point::new(0.0, 5.0)),
            PathCmd::Close,
        ],
        Style::default(),
    );
    assert_eq!(s.bbox(h), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn text_bbox_centers_on_anchor() {
    let mut s = scene();
    let h = s.text(Point::new(50.0, 50.0), "ab\nc", TextAlign::Middle, 10.0);
    let bb = s.bbox(h).unwrap();
    let width = ArialMetrics.text_width("ab", 10.0);
    assert!((bb.width - width).abs() < 1e-9);
    assert!((bb.height - 24.0).abs() < 1e-9);
    assert!((bb.x - (50.0 - width / 2.0)).abs() < 1e-9);
    assert!((bb.y - 38.0).abs() < 1e-9);
}

// --- Transform ---

#[test]
fn transform_rotates_about_pivot() {
    let t = Transform { translate: Point::new(10.0, 0.0), rotate_deg: 90.0, pivot: Point::new(0.0, 0.0) };
    let p = t.apply(Point::new(1.0, 0.0));
    assert!((p.x - 10.0).abs() < 1e-9);
    assert!((p.y - 1.0).abs() < 1e-9);
}

#[test]
fn default_transform_is_identity() {
    assert!(Transform::default().is_identity());
}

// --- SVG ---

#[test]
fn num_trims_trailing_zeros() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(1.5), "1.5");
    assert_eq!(num(0.12345), "0.123");
    assert_eq!(num(-0.0001), "0");
}

#[test]
fn svg_contains_nodes_and_view_box() {
    let mut s = scene();
    let h = s.rect(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, Style::stroked("#bbbbbb", 1.0).with_fill("#f9f9f9"));
    s.set_id(h, "A");
    let svg = s.to_svg(200.0, 100.0, Rect::new(0.0, 0.0, 400.0, 200.0));
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"viewBox="0 0 400 200""#));
    assert!(svg.contains(r#"<rect x="0" y="0" width="10" height="10" rx="2""#));
    assert!(svg.contains(r#"data-id="A""#));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn svg_escapes_text() {
    let mut s = scene();
    s.text(Point::new(0.0, 0.0), "a < b & c", TextAlign::Start, 11.0);
    let svg = s.to_svg(10.0, 10.0, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(svg.contains("a &lt; b &amp; c"));
}

#[test]
fn hidden_decorations_are_not_serialized() {
    let mut s = scene();
    s.push(
        Primitive::Ellipse { center: Point::new(1.0, 1.0), rx: 1.0, ry: 1.0 },
        Style::default(),
        Layer::Decoration,
    );
    let visible = s.to_svg(10.0, 10.0, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(visible.contains("<ellipse"));
    s.set_decorations_visible(false);
    let hidden = s.to_svg(10.0, 10.0, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(!hidden.contains("<ellipse"));
}

#![allow(clippy::float_cmp)]

use std::sync::Arc;

use super::*;
use crate::consts::{LABEL_FONT_SIZE, LINE_HEIGHT_FACTOR};
use crate::scene::Primitive;

const EPSILON: f64 = 1e-9;

fn scene() -> Scene {
    Scene::new(Arc::new(ArialMetrics))
}

fn avg() -> f64 {
    average_char_width(&ArialMetrics, LABEL_FONT_SIZE)
}

fn lines_of(scene: &Scene, handle: Handle) -> Vec<String> {
    match &scene.node(handle).unwrap().primitive {
        Primitive::Text { lines, .. } => lines.clone(),
        other => panic!("expected text, got {other:?}"),
    }
}

fn anchor_of(scene: &Scene, handle: Handle) -> Point {
    match &scene.node(handle).unwrap().primitive {
        Primitive::Text { anchor, .. } => *anchor,
        other => panic!("expected text, got {other:?}"),
    }
}

// =============================================================
// Measurement
// =============================================================

#[test]
fn arial_space_and_m_widths() {
    assert!((ArialMetrics.text_width(" ", 1000.0) - 278.0).abs() < EPSILON);
    assert!((ArialMetrics.text_width("M", 1000.0) - 833.0).abs() < EPSILON);
}

#[test]
fn non_ascii_measures_like_a_digit() {
    assert_eq!(ArialMetrics.text_width("é", 10.0), ArialMetrics.text_width("0", 10.0));
}

#[test]
fn average_is_alphabet_width_over_52() {
    let expected = ArialMetrics.text_width(CALIBRATION_ALPHABET, 11.0) / 52.0;
    assert!((average_char_width(&ArialMetrics, 11.0) - expected).abs() < EPSILON);
    // 30339 / 52 thousandths of an em.
    assert!((average_char_width(&ArialMetrics, 1000.0) - 30339.0 / 52.0).abs() < 1e-6);
}

#[test]
fn average_scales_with_font_size() {
    let small = average_char_width(&ArialMetrics, 10.0);
    let large = average_char_width(&ArialMetrics, 20.0);
    assert!((large - 2.0 * small).abs() < EPSILON);
}

// =============================================================
// Wrapping
// =============================================================

#[test]
fn short_text_stays_on_one_line() {
    assert_eq!(wrap_lines("Approve", 94.0, avg()), vec!["Approve"]);
}

#[test]
fn review_request_wraps_within_box() {
    let avg = avg();
    let lines = wrap_lines("Review request and approve or reject it", 94.0, avg);
    assert_eq!(lines, vec!["Review request", "and approve or", "reject it"]);
    for line in &lines {
        assert!(estimated_width(line, avg) <= 94.0, "{line} overflows");
    }
}

#[test]
fn explicit_breaks_are_preserved_even_when_text_fits() {
    let lines = wrap_lines("a\nb", 1000.0, avg());
    assert_eq!(lines, vec!["a", "b"]);
}

#[test]
fn blank_paragraph_yields_empty_line() {
    let lines = wrap_lines("top\n\nbottom", 1000.0, avg());
    assert_eq!(lines, vec!["top", "", "bottom"]);
}

#[test]
fn overlong_word_gets_its_own_line_without_leading_blank() {
    let lines = wrap_lines("Supercalifragilistic ok", 40.0, avg());
    assert_eq!(lines, vec!["Supercalifragilistic", "ok"]);
}

#[test]
fn wrapping_is_idempotent() {
    let avg = avg();
    for text in [
        "Review request and approve or reject it",
        "Collect all the supporting documents from the customer\nthen file them",
        "Supercalifragilistic expialidocious words everywhere",
    ] {
        let first = wrap_lines(text, 94.0, avg);
        let second = wrap_lines(&first.join("\n"), 94.0, avg);
        assert_eq!(first, second, "re-wrap changed {text:?}");
    }
}

#[test]
fn wrapping_is_deterministic() {
    let a = wrap_lines("Check credit score and notify", 60.0, avg());
    let b = wrap_lines("Check credit score and notify", 60.0, avg());
    assert_eq!(a, b);
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn empty_or_absent_text_draws_nothing() {
    let mut s = scene();
    let bounds = Rect::new(0.0, 0.0, 100.0, 80.0);
    assert!(draw_multiline_text(&mut s, None, bounds, HAnchor::Middle, VAnchor::Middle, 11.0).is_none());
    assert!(draw_multiline_text(&mut s, Some(""), bounds, HAnchor::Middle, VAnchor::Middle, 11.0).is_none());
    assert!(s.is_empty());
}

#[test]
fn middle_anchor_centers_in_box() {
    let mut s = scene();
    let bounds = Rect::new(10.0, 20.0, 100.0, 80.0);
    let h = draw_multiline_text(&mut s, Some("Approve"), bounds, HAnchor::Middle, VAnchor::Middle, 11.0).unwrap();
    assert_eq!(anchor_of(&s, h), Point::new(60.0, 60.0));
    assert_eq!(lines_of(&s, h), vec!["Approve"]);
}

#[test]
fn start_anchor_is_padded() {
    let mut s = scene();
    let bounds = Rect::new(10.0, 20.0, 100.0, 80.0);
    let h = draw_multiline_text(&mut s, Some("Approve"), bounds, HAnchor::Start, VAnchor::Middle, 11.0).unwrap();
    assert_eq!(anchor_of(&s, h).x, 13.0);
}

#[test]
fn top_anchor_moves_block_to_box_top() {
    let mut s = scene();
    let bounds = Rect::new(0.0, 100.0, 100.0, 80.0);
    let h = draw_multiline_text(
        &mut s,
        Some("Review request and approve or reject it"),
        bounds,
        HAnchor::Middle,
        VAnchor::Top,
        11.0,
    )
    .unwrap();
    let block_height = 3.0 * 11.0 * LINE_HEIGHT_FACTOR;
    assert!((anchor_of(&s, h).y - (100.0 + block_height / 2.0)).abs() < EPSILON);
    let bb = s.bbox(h).unwrap();
    assert!((bb.y - 100.0).abs() < EPSILON);
}

#[test]
fn drawn_label_matches_pure_wrap() {
    let mut s = scene();
    let bounds = Rect::new(0.0, 0.0, 100.0, 80.0);
    let text = "Review request and approve or reject it";
    let h = draw_multiline_text(&mut s, Some(text), bounds, HAnchor::Middle, VAnchor::Middle, 11.0).unwrap();
    assert_eq!(lines_of(&s, h), wrap_lines(text, 94.0, avg()));
}

#[test]
fn drawing_twice_on_fresh_scenes_is_identical() {
    let bounds = Rect::new(5.0, 5.0, 120.0, 60.0);
    let text = Some("Assess the claim against the policy");
    let mut a = scene();
    let mut b = scene();
    let ha = draw_multiline_text(&mut a, text, bounds, HAnchor::Middle, VAnchor::Top, 11.0).unwrap();
    let hb = draw_multiline_text(&mut b, text, bounds, HAnchor::Middle, VAnchor::Top, 11.0).unwrap();
    assert_eq!(a.node(ha), b.node(hb));
}

//! Flow router: one connecting edge drawn from its waypoints.
//!
//! A flow becomes a single stroked path, an arrowhead on the last segment, an
//! optional condition marker at the midpoint of the last segment, an optional
//! label placed against the first segment, and an invisible wider hit path.
//! Flows never look at element geometry; their waypoints are authoritative.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use std::f64::consts::FRAC_PI_2;

use crate::consts::{
    ARROW_LENGTH, ARROW_WIDTH, CONDITION_MARKER_SIZE, EVENT_FILL_COLOR, FLOW_HIT_WIDTH, FLOW_LABEL_MARGIN, LABEL_FONT_SIZE,
    MAIN_STROKE_COLOR,
};
use crate::model::{Flow, Point, Rect};
use crate::scene::{Handle, Layer, PathCmd, Primitive, Scene, Style, TextAlign, Transform};
use crate::shapes::resolve_color;

/// Closed triangle in local space, tip at the origin pointing along `+y`
/// before rotation.
const ARROW_PATH: &str = "M0 0L-2.5 -8L2.5 -8Z";
/// Open chevron used by associations.
const OPEN_ARROW_PATH: &str = "M-2.5 -8L0 0L2.5 -8";

/// One straight piece of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Direction in radians, `atan2(dy, dx)`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// Orientation used for labels, in radians.
    ///
    /// Uses `atan(dy / dx)`, which keeps text upright on right-to-left
    /// segments. Vertical segments resolve to `±90°` by the sign of `dy`.
    #[must_use]
    pub fn label_angle(&self) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        if dx.abs() < f64::EPSILON {
            if dy < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 }
        } else {
            (dy / dx).atan()
        }
    }

    /// Distance from `p` to the closest point on this segment.
    #[must_use]
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq < f64::EPSILON {
            0.0
        } else {
            (((p.x - self.x1) * dx + (p.y - self.y1) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let cx = self.x1 + t * dx;
        let cy = self.y1 + t * dy;
        ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
    }
}

/// Ordered segments of a routed flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    segments: Vec<Segment>,
}

impl Polyline {
    /// Build from consecutive waypoint pairs. Fewer than two points gives an
    /// empty polyline.
    #[must_use]
    pub fn new(waypoints: &[Point]) -> Self {
        let segments = waypoints
            .windows(2)
            .map(|w| Segment { x1: w[0].x, y1: w[0].y, x2: w[1].x, y2: w[1].y })
            .collect();
        Self { segments }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// One continuous path through every segment.
    #[must_use]
    pub fn path(&self) -> Vec<PathCmd> {
        let Some(first) = self.segments.first() else {
            return Vec::new();
        };
        let mut cmds = Vec::with_capacity(self.segments.len() + 1);
        cmds.push(PathCmd::MoveTo(first.start()));
        cmds.extend(self.segments.iter().map(|s| PathCmd::LineTo(s.end())));
        cmds
    }
}

/// Handles and draw-time state of one routed flow.
#[derive(Debug, Clone)]
pub struct DrawnFlow {
    pub polyline: Polyline,
    /// Visible stroked path; hover recolors this node.
    pub path: Handle,
    /// Invisible wide duplicate that receives pointer events.
    pub hit: Handle,
    pub arrow: Option<Handle>,
    pub marker: Option<Handle>,
    pub label: Option<Handle>,
    /// Stroke color resolved at draw time.
    pub color: &'static str,
}

/// Arrowhead transform for `last`: translated to the endpoint, rotated by
/// `angle - 90°` so the local `+y` axis follows the segment.
#[must_use]
pub fn arrow_transform(last: &Segment, stroke_width: f64) -> Transform {
    let mut tip = last.end();
    if is_odd_integer(stroke_width) {
        tip.x += 0.5;
        tip.y += 0.5;
    }
    Transform { translate: tip, rotate_deg: last.angle().to_degrees() - 90.0, pivot: Point::default() }
}

fn is_odd_integer(w: f64) -> bool {
    w.fract().abs() < f64::EPSILON && (w % 2.0 - 1.0).abs() < f64::EPSILON
}

/// Draw `flow` into `scene`.
pub fn draw_flow(scene: &mut Scene, flow: &Flow, stroke_width: f64) -> DrawnFlow {
    let polyline = Polyline::new(&flow.waypoints);
    let color = resolve_color(flow.current, flow.completed, MAIN_STROKE_COLOR);
    let association = flow.kind == "association";

    let path = scene.path(polyline.path(), Style::stroked(color, stroke_width).dashed(association));
    scene.set_id(path, &flow.id);

    let arrow = polyline.last().map(|last| {
        let (d, fill) = if association { (OPEN_ARROW_PATH, None) } else { (ARROW_PATH, Some(color)) };
        let style = Style { fill, ..Style::stroked(color, stroke_width) };
        let bounds = Rect::new(-ARROW_WIDTH / 2.0, -ARROW_LENGTH, ARROW_WIDTH, ARROW_LENGTH);
        let h = scene.push(Primitive::Glyph { d, bounds }, style, Layer::Content);
        scene.set_transform(h, arrow_transform(last, stroke_width));
        h
    });

    let marker = match polyline.last() {
        Some(last) if flow.conditions => Some(draw_condition_marker(scene, last, color)),
        _ => None,
    };

    let label = match (flow.label(), polyline.first()) {
        (Some(text), Some(first)) => Some(place_label(scene, text, first)),
        _ => None,
    };

    let hit_style = Style { opacity: 0.0, ..Style::stroked("#000000", FLOW_HIT_WIDTH) };
    let hit = scene.push(Primitive::Path(polyline.path()), hit_style, Layer::HitRegion);
    scene.set_id(hit, &flow.id);

    DrawnFlow { polyline, path, hit, arrow, marker, label, color }
}

/// Small rhombus centered on the midpoint of `last`, aligned with it.
fn draw_condition_marker(scene: &mut Scene, last: &Segment, color: &'static str) -> Handle {
    let half = CONDITION_MARKER_SIZE / 2.0;
    let cmds = vec![
        PathCmd::MoveTo(Point::new(-half, 0.0)),
        PathCmd::LineTo(Point::new(0.0, -half / 2.0)),
        PathCmd::LineTo(Point::new(half, 0.0)),
        PathCmd::LineTo(Point::new(0.0, half / 2.0)),
        PathCmd::Close,
    ];
    let h = scene.path(cmds, Style::stroked(color, 1.0).with_fill(EVENT_FILL_COLOR));
    scene.set_transform(
        h,
        Transform { translate: last.midpoint(), rotate_deg: last.angle().to_degrees(), pivot: Point::default() },
    );
    h
}

/// Draw `text` at the first waypoint, then offset and rotate it against the
/// first segment.
fn place_label(scene: &mut Scene, text: &str, first: &Segment) -> Handle {
    let h = scene.text(first.start(), text, TextAlign::Middle, LABEL_FONT_SIZE);
    let Some(bb) = scene.bbox(h) else {
        return h;
    };
    let angle = first.label_angle();

    let mut ox = bb.width / 2.0 + FLOW_LABEL_MARGIN;
    let oy = -(bb.height / 2.0 + FLOW_LABEL_MARGIN);
    if first.x1 > first.x2 {
        ox = -ox;
    }
    let (sin, cos) = angle.sin_cos();
    let placed = Point::new(first.x1 + ox * cos - oy * sin, first.y1 + ox * sin + oy * cos);
    scene.move_text(h, placed);
    scene.set_transform(h, Transform { translate: Point::default(), rotate_deg: angle.to_degrees(), pivot: placed });
    h
}

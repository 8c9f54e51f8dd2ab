//! Shape renderers: one element body, its inner markers, icon and label.
//!
//! Type tags resolve through [`ShapeKind::from_tag`], an explicit lookup
//! table. A tag with no entry yields `None`; the caller decides whether that
//! skips the element or aborts the pass.
//!
//! Every body is inset by half its stroke width so the painted outline
//! covers exactly the element's `(x, y, width, height)` box.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use crate::consts::{
    ACTIVITY_FILL_COLOR, ACTIVITY_STROKE_COLOR, ADDED_COLOR, COMPLETED_COLOR, CURRENT_COLOR, EVENT_FILL_COLOR,
    ICON_PADDING, ICON_SIZE, LABEL_FONT_SIZE, MAIN_STROKE_COLOR, OUTSIDE_LABEL_HEIGHT, REMOVED_COLOR,
};
use crate::icons::{Icon, IconPaint, draw_icon};
use crate::model::{Element, Point, Rect};
use crate::scene::{Handle, PathCmd, Scene, Style};
use crate::text::{HAnchor, VAnchor, draw_multiline_text};

/// Rounded-rectangle family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Task,
    CallActivity,
    SubProcess,
    EventSubProcess,
    Stage,
    PlanModel,
}

/// Circle family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    End,
    Intermediate,
    Boundary,
    Listener,
}

/// Rhombus family members and their inner marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Exclusive,
    Parallel,
    Inclusive,
    Event,
    Complex,
}

/// CMMN sentries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionKind {
    Entry,
    Exit,
}

/// Renderer selected for a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Activity(ActivityKind),
    Event(EventKind),
    Gateway(GatewayKind),
    Criterion(CriterionKind),
    Milestone,
}

impl ShapeKind {
    /// Registry lookup from a type tag. `None` for unmapped tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        use ActivityKind as A;
        use EventKind as E;
        use GatewayKind as G;

        Some(match tag {
            "Task" | "UserTask" | "ServiceTask" | "ScriptTask" | "BusinessRuleTask" | "ReceiveTask" | "ManualTask"
            | "SendTask" | "MailTask" | "CamelTask" | "MuleTask" | "HttpTask" | "HttpServiceTask" | "ShellTask"
            | "HumanTask" | "CaseTask" | "ProcessTask" | "DecisionTask" => Self::Activity(A::Task),
            "CallActivity" => Self::Activity(A::CallActivity),
            "SubProcess" | "AdhocSubProcess" | "Transaction" => Self::Activity(A::SubProcess),
            "EventSubProcess" => Self::Activity(A::EventSubProcess),
            "Stage" => Self::Activity(A::Stage),
            "PlanModel" => Self::Activity(A::PlanModel),
            "StartEvent" => Self::Event(E::Start),
            "EndEvent" => Self::Event(E::End),
            "IntermediateCatchEvent" | "ThrowEvent" | "IntermediateThrowEvent" => Self::Event(E::Intermediate),
            "BoundaryEvent" => Self::Event(E::Boundary),
            "EventListener" | "TimerEventListener" | "UserEventListener" | "GenericEventListener" => {
                Self::Event(E::Listener)
            }
            "ExclusiveGateway" => Self::Gateway(G::Exclusive),
            "ParallelGateway" => Self::Gateway(G::Parallel),
            "InclusiveGateway" => Self::Gateway(G::Inclusive),
            "EventGateway" | "EventBasedGateway" => Self::Gateway(G::Event),
            "ComplexGateway" => Self::Gateway(G::Complex),
            "EntryCriterion" => Self::Criterion(CriterionKind::Entry),
            "ExitCriterion" => Self::Criterion(CriterionKind::Exit),
            "Milestone" => Self::Milestone,
            _ => return None,
        })
    }

    /// Default stroke color of the shape family.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        match self {
            Self::Activity(_) | Self::Milestone => ACTIVITY_STROKE_COLOR,
            Self::Event(_) | Self::Gateway(_) | Self::Criterion(_) => MAIN_STROKE_COLOR,
        }
    }

    /// `(plain, highlight)` stroke widths.
    #[must_use]
    pub fn stroke_widths(self) -> (f64, f64) {
        match self {
            Self::Activity(ActivityKind::CallActivity) => (2.0, 3.0),
            Self::Event(EventKind::End) => (3.0, 4.0),
            _ => (1.0, 2.0),
        }
    }

    fn corner_radius(self) -> f64 {
        match self {
            Self::Activity(ActivityKind::Stage) => 10.0,
            Self::Activity(_) => 4.0,
            _ => 0.0,
        }
    }

    fn fill(self) -> &'static str {
        match self {
            Self::Activity(_) | Self::Milestone => ACTIVITY_FILL_COLOR,
            Self::Criterion(CriterionKind::Exit) => "#000000",
            _ => EVENT_FILL_COLOR,
        }
    }
}

/// Pick a color by priority: current, then completed, then `default`.
#[must_use]
pub fn resolve_color(current: bool, completed: bool, default: &'static str) -> &'static str {
    if current {
        CURRENT_COLOR
    } else if completed {
        COMPLETED_COLOR
    } else {
        default
    }
}

/// The default slot for an element: history-compare colors override the family default.
#[must_use]
pub fn default_slot(el: &Element, family_default: &'static str) -> &'static str {
    if el.added {
        ADDED_COLOR
    } else if el.removed {
        REMOVED_COLOR
    } else {
        family_default
    }
}

/// Result of drawing one element.
#[derive(Debug, Clone, Copy)]
pub struct DrawnShape {
    /// The body node, bound to the element id.
    pub handle: Handle,
    /// Stroke color resolved at draw time.
    pub color: &'static str,
    pub stroke_width: f64,
    pub label: Option<Handle>,
}

/// Draw one element with the renderer registered for `kind`.
pub fn draw_element(scene: &mut Scene, el: &Element, kind: ShapeKind) -> DrawnShape {
    let family_default = kind.default_color();
    let color = resolve_color(el.current, el.completed, default_slot(el, family_default));
    let (plain, highlight) = kind.stroke_widths();
    let stroke_width = if color == family_default { plain } else { highlight };

    let bounds = el.bounds();
    let inner = bounds.inset(stroke_width / 2.0);
    let style = Style::stroked(color, stroke_width).with_fill(kind.fill());

    let handle = match kind {
        ShapeKind::Activity(activity) => {
            let dashed = activity == ActivityKind::EventSubProcess;
            scene.rect(inner, kind.corner_radius(), style.dashed(dashed))
        }
        ShapeKind::Milestone => scene.rect(inner, inner.height / 2.0, style),
        ShapeKind::Event(event) => {
            let dashed = event == EventKind::Boundary && !el.interrupting;
            scene.ellipse(inner.center(), inner.width / 2.0, inner.height / 2.0, style.dashed(dashed))
        }
        ShapeKind::Gateway(_) | ShapeKind::Criterion(_) => scene.path(rhombus(inner), style),
    };
    scene.set_id(handle, &el.id);

    match kind {
        ShapeKind::Event(EventKind::Intermediate | EventKind::Boundary | EventKind::Listener) => {
            let ring = inner.inset(3.0);
            let ring_style = Style::stroked(color, 1.0).dashed(!el.interrupting);
            scene.ellipse(ring.center(), ring.width / 2.0, ring.height / 2.0, ring_style);
        }
        ShapeKind::Gateway(gateway) => draw_gateway_marker(scene, inner, gateway, color),
        _ => {}
    }

    if let Some(tag) = icon_tag(el, kind) {
        let icon = Icon::from_sub_tag(tag);
        let state_colored = color != family_default;
        match kind {
            ShapeKind::Event(event) => {
                let c = inner.center();
                let origin = Point::new(c.x - ICON_SIZE / 2.0, c.y - ICON_SIZE / 2.0);
                let paint = if event == EventKind::End { IconPaint::Filled } else { IconPaint::Outline };
                draw_icon(scene, icon, origin, if state_colored { color } else { MAIN_STROKE_COLOR }, paint);
            }
            _ => {
                let origin = Point::new(el.x + ICON_PADDING, el.y + ICON_PADDING);
                let icon_color = if state_colored { color } else { MAIN_STROKE_COLOR };
                draw_icon(scene, icon, origin, icon_color, IconPaint::Outline);
            }
        }
    }

    let label = draw_label(scene, el, kind);
    DrawnShape { handle, color, stroke_width, label }
}

fn draw_label(scene: &mut Scene, el: &Element, kind: ShapeKind) -> Option<Handle> {
    let bounds = el.bounds();
    match kind {
        ShapeKind::Activity(ActivityKind::Task | ActivityKind::CallActivity) | ShapeKind::Milestone => {
            draw_multiline_text(scene, el.label(), bounds, HAnchor::Middle, VAnchor::Middle, LABEL_FONT_SIZE)
        }
        ShapeKind::Activity(_) => {
            draw_multiline_text(scene, el.label(), bounds, HAnchor::Start, VAnchor::Top, LABEL_FONT_SIZE)
        }
        ShapeKind::Event(_) | ShapeKind::Gateway(_) => {
            let below = Rect::new(el.x - el.width, el.y + el.height, el.width * 3.0, OUTSIDE_LABEL_HEIGHT);
            draw_multiline_text(scene, el.label(), below, HAnchor::Middle, VAnchor::Top, LABEL_FONT_SIZE)
        }
        ShapeKind::Criterion(_) => None,
    }
}

/// Sub-tag that selects the icon, if this element shows one.
fn icon_tag(el: &Element, kind: ShapeKind) -> Option<&str> {
    match kind {
        ShapeKind::Activity(ActivityKind::Task) => el.task_type.as_deref().or_else(|| default_task_icon(&el.kind)),
        ShapeKind::Event(_) => el
            .event_definition
            .as_ref()
            .map(|d| d.kind.as_str())
            .or_else(|| listener_icon(&el.kind)),
        _ => None,
    }
}

fn default_task_icon(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "UserTask" | "HumanTask" => "user",
        "ServiceTask" => "service",
        "ScriptTask" => "script",
        "BusinessRuleTask" | "DecisionTask" => "decision",
        "ReceiveTask" => "receive",
        "ManualTask" => "manual",
        "SendTask" | "MailTask" => "mail",
        "CamelTask" => "camel",
        "MuleTask" => "mule",
        "HttpTask" | "HttpServiceTask" => "http",
        "ShellTask" => "shell",
        "CaseTask" => "case",
        "ProcessTask" => "process",
        _ => return None,
    })
}

fn listener_icon(tag: &str) -> Option<&'static str> {
    match tag {
        "TimerEventListener" => Some("timer"),
        "UserEventListener" => Some("user"),
        _ => None,
    }
}

/// Rhombus with vertices on the midpoints of `r`'s edges.
fn rhombus(r: Rect) -> Vec<PathCmd> {
    let c = r.center();
    vec![
        PathCmd::MoveTo(Point::new(c.x, r.y)),
        PathCmd::LineTo(Point::new(r.x + r.width, c.y)),
        PathCmd::LineTo(Point::new(c.x, r.y + r.height)),
        PathCmd::LineTo(Point::new(r.x, c.y)),
        PathCmd::Close,
    ]
}

fn segment(a: Point, b: Point) -> [PathCmd; 2] {
    [PathCmd::MoveTo(a), PathCmd::LineTo(b)]
}

fn draw_gateway_marker(scene: &mut Scene, r: Rect, kind: GatewayKind, color: &'static str) {
    let c = r.center();
    let q = r.width.min(r.height) * 0.15;
    let cross = || {
        let mut cmds = Vec::new();
        cmds.extend(segment(Point::new(c.x - q, c.y - q), Point::new(c.x + q, c.y + q)));
        cmds.extend(segment(Point::new(c.x + q, c.y - q), Point::new(c.x - q, c.y + q)));
        cmds
    };
    let plus = |len: f64| {
        let mut cmds = Vec::new();
        cmds.extend(segment(Point::new(c.x, c.y - len), Point::new(c.x, c.y + len)));
        cmds.extend(segment(Point::new(c.x - len, c.y), Point::new(c.x + len, c.y)));
        cmds
    };

    match kind {
        GatewayKind::Exclusive => {
            scene.path(cross(), Style::stroked(color, 3.0));
        }
        GatewayKind::Parallel => {
            scene.path(plus(q * 1.4), Style::stroked(color, 3.0));
        }
        GatewayKind::Inclusive => {
            let radius = r.width.min(r.height) * 0.22;
            scene.ellipse(c, radius, radius, Style::stroked(color, 2.5));
        }
        GatewayKind::Event => {
            let radius = r.width.min(r.height) * 0.25;
            scene.ellipse(c, radius, radius, Style::stroked(color, 1.0));
            scene.path(pentagon(c, radius * 0.6), Style::stroked(color, 1.0));
        }
        GatewayKind::Complex => {
            let mut cmds = cross();
            cmds.extend(plus(q * 1.4));
            scene.path(cmds, Style::stroked(color, 3.0));
        }
    }
}

fn pentagon(c: Point, radius: f64) -> Vec<PathCmd> {
    let mut cmds = Vec::with_capacity(6);
    for i in 0..5 {
        let angle = (f64::from(i) * 72.0 - 90.0).to_radians();
        let p = Point::new(c.x + radius * angle.cos(), c.y + radius * angle.sin());
        cmds.push(if i == 0 { PathCmd::MoveTo(p) } else { PathCmd::LineTo(p) });
    }
    cmds.push(PathCmd::Close);
    cmds
}

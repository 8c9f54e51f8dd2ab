//! Shared colors and numeric constants for the canvas crate.

// ── Colors ──────────────────────────────────────────────────────

/// Stroke for an element or flow that is currently executing.
pub const CURRENT_COLOR: &str = "#017501";

/// Stroke for an element or flow that has already completed.
pub const COMPLETED_COLOR: &str = "#2632aa";

/// Default stroke for activities (tasks, stages, sub-processes).
pub const ACTIVITY_STROKE_COLOR: &str = "#bbbbbb";

/// Fill for activity bodies.
pub const ACTIVITY_FILL_COLOR: &str = "#f9f9f9";

/// Default stroke for events, gateways, criteria and flows.
pub const MAIN_STROKE_COLOR: &str = "#585858";

/// Fill for events, gateways and criteria.
pub const EVENT_FILL_COLOR: &str = "#ffffff";

/// Label color.
pub const TEXT_COLOR: &str = "#373e48";

/// Default slot override for elements added in a history comparison.
pub const ADDED_COLOR: &str = "#2e8b57";

/// Default slot override for elements removed in a history comparison.
pub const REMOVED_COLOR: &str = "#c0392b";

/// Shape stroke while the pointer is over it.
pub const HOVER_COLOR: &str = "#666666";

/// Visible flow stroke while the pointer is over its hit path.
pub const FLOW_HOVER_COLOR: &str = "#0000ff";

/// Stroke of the element selected in the debugger.
pub const SELECTED_COLOR: &str = "#ff0000";

/// Stroke given back to a breakable element when another one takes the selection.
pub const BREAKABLE_COLOR: &str = "#008000";

/// Fill of a breakpoint marker that is set.
pub const BREAKPOINT_COLOR: &str = "#d9534f";

/// Fill of the continue-execution arrow.
pub const CONTINUE_COLOR: &str = "#017501";

/// Pool and lane borders.
pub const POOL_STROKE_COLOR: &str = "#666666";

// ── Strokes ─────────────────────────────────────────────────────

/// Visible stroke width of a flow.
pub const FLOW_STROKE: f64 = 1.5;

/// Stroke width of the invisible flow hit path.
pub const FLOW_HIT_WIDTH: f64 = 8.0;

// ── Text ────────────────────────────────────────────────────────

/// Font size for element and flow labels.
pub const LABEL_FONT_SIZE: f64 = 11.0;

/// Font family written into the SVG output.
pub const LABEL_FONT_FAMILY: &str = "Arial";

/// Horizontal padding applied on both sides of a wrapped label box.
pub const TEXT_PADDING: f64 = 3.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Gap between a flow's first waypoint and its label.
pub const FLOW_LABEL_MARGIN: f64 = 5.0;

/// Height of the label box drawn under events and gateways.
pub const OUTSIDE_LABEL_HEIGHT: f64 = 40.0;

// ── Geometry ────────────────────────────────────────────────────

/// Width of the arrowhead base.
pub const ARROW_WIDTH: f64 = 5.0;

/// Distance from the arrowhead tip to its base.
pub const ARROW_LENGTH: f64 = 8.0;

/// Edge length of the conditional-flow midpoint marker.
pub const CONDITION_MARKER_SIZE: f64 = 10.0;

/// Offset of an activity icon from the element's top-left corner.
pub const ICON_PADDING: f64 = 5.0;

/// Nominal size of an icon glyph.
pub const ICON_SIZE: f64 = 16.0;

/// Radius of a breakpoint marker.
pub const BREAKPOINT_RADIUS: f64 = 5.0;

/// Width of the continue arrow; its height is 1.25x.
pub const CONTINUE_ARROW_SIZE: f64 = 8.0;

/// Width of the name band on the left edge of a pool or lane.
pub const POOL_LABEL_BAND: f64 = 30.0;

/// Margin added around the diagram when sizing the canvas.
pub const VIEWPORT_MARGIN: f64 = 20.0;

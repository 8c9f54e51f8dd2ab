//! Render pass: one validated snapshot in, one rendered diagram out.
//!
//! Every pass draws into a brand-new [`Scene`] in a fixed order: pools and
//! lanes, then every element, then every flow, then the debugger decorations.
//! Flows consume their own waypoints and never look at element geometry; the
//! ordering only controls visual stacking.
//!
//! The pass also registers what the interaction overlay needs: hit regions in
//! draw order and one [`Target`] per element and flow.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::sync::Arc;

use crate::consts::{
    BREAKPOINT_COLOR, BREAKPOINT_RADIUS, CONTINUE_ARROW_SIZE, CONTINUE_COLOR, EVENT_FILL_COLOR, FLOW_HIT_WIDTH,
    FLOW_STROKE, LABEL_FONT_SIZE, POOL_LABEL_BAND, POOL_STROKE_COLOR,
};
use crate::flow::draw_flow;
use crate::hit::{HitArea, HitPart, HitRegion};
use crate::model::{Element, ModelError, Point, Pool, Rect, Snapshot};
use crate::overlay::{Target, TargetKind, Tooltip};
use crate::scene::{Layer, PathCmd, Primitive, Scene, Style, TextAlign, Transform};
use crate::shapes::{ShapeKind, draw_element};
use crate::text::TextMeasurer;

/// What to do with an element whose type tag has no renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownElementPolicy {
    /// Log a warning, record the element in the report, keep drawing.
    #[default]
    Skip,
    /// Abort the pass with [`RenderError::UnknownElementType`].
    FailFast,
}

/// Options for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Draw breakpoint and continue markers and allow selection.
    pub debugger_enabled: bool,
    pub unknown_policy: UnknownElementPolicy,
    pub flow_stroke_width: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { debugger_enabled: false, unknown_policy: UnknownElementPolicy::Skip, flow_stroke_width: FLOW_STROKE }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("element {id} has unknown type {kind}")]
    UnknownElementType { id: String, kind: String },
}

impl RenderError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Model(e) => e.error_code(),
            Self::UnknownElementType { .. } => "E_RENDER_UNKNOWN_TYPE",
        }
    }
}

/// An element left out of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    pub id: String,
    pub kind: String,
}

/// Counts from one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub pools_drawn: usize,
    pub elements_drawn: usize,
    pub flows_drawn: usize,
    pub skipped: Vec<SkippedElement>,
}

/// Output of one render pass.
pub struct RenderedDiagram {
    pub scene: Scene,
    /// Interactive regions in draw order; later entries sit on top.
    pub regions: Vec<HitRegion>,
    /// Overlay targets keyed by element or flow id.
    pub targets: HashMap<String, Target>,
    pub report: RenderReport,
    /// The snapshot's logical content area.
    pub view_box: Rect,
}

/// Render `snapshot` into a fresh scene.
///
/// # Errors
///
/// Returns [`RenderError::Model`] if the snapshot fails validation, or
/// [`RenderError::UnknownElementType`] for an unmapped type tag under
/// [`UnknownElementPolicy::FailFast`].
pub fn render(
    snapshot: &Snapshot,
    options: &RenderOptions,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
) -> Result<RenderedDiagram, RenderError> {
    snapshot.validate()?;

    let mut scene = Scene::new(measurer);
    let mut regions = Vec::new();
    let mut targets = HashMap::new();
    let mut report = RenderReport::default();

    for pool in &snapshot.pools {
        draw_pool(&mut scene, pool);
        report.pools_drawn += 1;
    }

    let mut drawn_elements = Vec::with_capacity(snapshot.elements.len());
    for el in &snapshot.elements {
        let Some(kind) = ShapeKind::from_tag(&el.kind) else {
            match options.unknown_policy {
                UnknownElementPolicy::Skip => {
                    tracing::warn!(id = %el.id, kind = %el.kind, "no renderer for element type, skipping");
                    report.skipped.push(SkippedElement { id: el.id.clone(), kind: el.kind.clone() });
                    continue;
                }
                UnknownElementPolicy::FailFast => {
                    return Err(RenderError::UnknownElementType { id: el.id.clone(), kind: el.kind.clone() });
                }
            }
        };
        let drawn = draw_element(&mut scene, el, kind);
        regions.push(HitRegion { id: el.id.clone(), part: HitPart::Body, area: HitArea::Rect(el.bounds()) });
        targets.insert(
            el.id.clone(),
            Target {
                kind: TargetKind::Shape,
                handle: drawn.handle,
                base_color: drawn.color,
                selectable: el.breakable || el.current,
                tooltip: element_tooltip(el),
            },
        );
        drawn_elements.push(el);
        report.elements_drawn += 1;
    }

    for flow in &snapshot.flows {
        let drawn = draw_flow(&mut scene, flow, options.flow_stroke_width);
        regions.push(HitRegion {
            id: flow.id.clone(),
            part: HitPart::FlowPath,
            area: HitArea::Stroke { segments: drawn.polyline.segments().to_vec(), half_width: FLOW_HIT_WIDTH / 2.0 },
        });
        targets.insert(
            flow.id.clone(),
            Target {
                kind: TargetKind::Flow,
                handle: drawn.path,
                base_color: drawn.color,
                selectable: false,
                tooltip: Tooltip {
                    id: flow.id.clone(),
                    kind: flow.kind.clone(),
                    name: flow.label().map(str::to_owned),
                    properties: Vec::new(),
                },
            },
        );
        report.flows_drawn += 1;
    }

    if options.debugger_enabled {
        for el in drawn_elements {
            if el.breakable {
                regions.push(draw_breakpoint_marker(&mut scene, el));
            }
            if el.broken_plan_item_id().is_some() {
                regions.push(draw_continue_marker(&mut scene, el));
            }
        }
    }

    tracing::debug!(
        pools = report.pools_drawn,
        elements = report.elements_drawn,
        flows = report.flows_drawn,
        skipped = report.skipped.len(),
        "render pass complete"
    );

    Ok(RenderedDiagram { scene, regions, targets, report, view_box: snapshot.view_box() })
}

fn element_tooltip(el: &Element) -> Tooltip {
    Tooltip {
        id: el.id.clone(),
        kind: el.kind.clone(),
        name: el.label().map(str::to_owned),
        properties: el
            .properties
            .iter()
            .map(|p| {
                let value = match &p.value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (p.name.clone(), value)
            })
            .collect(),
    }
}

// =============================================================
// Pools and lanes
// =============================================================

fn draw_pool(scene: &mut Scene, pool: &Pool) {
    let bounds = Rect::new(pool.x, pool.y, pool.width, pool.height);
    draw_banded_box(scene, bounds, pool.name.as_deref());
    for lane in &pool.lanes {
        draw_banded_box(scene, Rect::new(lane.x, lane.y, lane.width, lane.height), lane.name.as_deref());
    }
}

/// Border, name band divider, and the name rotated along the band.
fn draw_banded_box(scene: &mut Scene, bounds: Rect, name: Option<&str>) {
    scene.rect(bounds, 0.0, Style::stroked(POOL_STROKE_COLOR, 1.0));
    let band_x = bounds.x + POOL_LABEL_BAND;
    scene.path(
        vec![PathCmd::MoveTo(Point::new(band_x, bounds.y)), PathCmd::LineTo(Point::new(band_x, bounds.y + bounds.height))],
        Style::stroked(POOL_STROKE_COLOR, 1.0),
    );
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return;
    };
    let center = Point::new(bounds.x + POOL_LABEL_BAND / 2.0, bounds.y + bounds.height / 2.0);
    let h = scene.text(center, name, TextAlign::Middle, LABEL_FONT_SIZE);
    scene.set_transform(h, Transform { translate: Point::default(), rotate_deg: -90.0, pivot: center });
}

// =============================================================
// Debugger decorations
// =============================================================

/// Circle on the element's top-right corner; filled when a breakpoint is set.
fn draw_breakpoint_marker(scene: &mut Scene, el: &Element) -> HitRegion {
    let center = Point::new(el.x + el.width, el.y);
    let fill = if el.breakpoint { BREAKPOINT_COLOR } else { EVENT_FILL_COLOR };
    scene.push(
        Primitive::Ellipse { center, rx: BREAKPOINT_RADIUS, ry: BREAKPOINT_RADIUS },
        Style::stroked(BREAKPOINT_COLOR, 1.0).with_fill(fill),
        Layer::Decoration,
    );
    HitRegion {
        id: el.id.clone(),
        part: HitPart::BreakpointMarker,
        area: HitArea::Circle { center, radius: BREAKPOINT_RADIUS },
    }
}

/// Right-pointing arrow just outside the element's right edge.
fn draw_continue_marker(scene: &mut Scene, el: &Element) -> HitRegion {
    let width = CONTINUE_ARROW_SIZE;
    let height = CONTINUE_ARROW_SIZE * 1.25;
    let bounds = Rect::new(el.x + el.width + 4.0, el.y + (el.height - height) / 2.0, width, height);
    scene.push(
        Primitive::Path(vec![
            PathCmd::MoveTo(Point::new(bounds.x, bounds.y)),
            PathCmd::LineTo(Point::new(bounds.x + width, bounds.y + height / 2.0)),
            PathCmd::LineTo(Point::new(bounds.x, bounds.y + height)),
            PathCmd::Close,
        ]),
        Style::stroked(CONTINUE_COLOR, 1.0).with_fill(CONTINUE_COLOR),
        Layer::Decoration,
    );
    HitRegion { id: el.id.clone(), part: HitPart::ContinueMarker, area: HitArea::Rect(bounds) }
}

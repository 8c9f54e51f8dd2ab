//! Scene: the retained vector drawing produced by one render pass.
//!
//! A [`Scene`] is the render context. Every drawing call receives it
//! explicitly, appends nodes, and gets back a [`Handle`] that stays valid for
//! the lifetime of the scene. Later stages (flow labels, the interaction
//! overlay) use handles to measure, move, or recolor what was drawn without
//! re-deriving geometry. A new render pass always starts from a new scene.
//!
//! Serialization to SVG is the only output path; nothing here touches a
//! windowing system.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::fmt;
use std::sync::Arc;

use crate::consts::{LABEL_FONT_FAMILY, LINE_HEIGHT_FACTOR, TEXT_COLOR};
use crate::model::{Point, Rect};
use crate::text::TextMeasurer;

/// Stable index of a node within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Which layer a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Visible diagram content.
    Content,
    /// Invisible geometry that only exists to catch pointer events.
    HitRegion,
    /// Interactive affordances hidden while the viewport scrolls.
    Decoration,
}

/// Horizontal anchoring of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
}

/// One path command in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// Geometry of a node, in its local coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect { bounds: Rect, radius: f64 },
    Ellipse { center: Point, rx: f64, ry: f64 },
    Path(Vec<PathCmd>),
    /// Fixed SVG path data with its nominal extent.
    Glyph { d: &'static str, bounds: Rect },
    /// Multi-line text; `anchor.y` is the vertical center of the block.
    Text { anchor: Point, lines: Vec<String>, align: TextAlign, font_size: f64 },
}

/// Paint attributes of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke: Option<&'static str>,
    pub stroke_width: f64,
    pub fill: Option<&'static str>,
    pub opacity: f64,
    pub dashed: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke: None, stroke_width: 1.0, fill: None, opacity: 1.0, dashed: false }
    }
}

impl Style {
    #[must_use]
    pub fn stroked(color: &'static str, width: f64) -> Self {
        Self { stroke: Some(color), stroke_width: width, ..Self::default() }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: &'static str) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn dashed(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }
}

/// Translate, then rotate by `rotate_deg` around `pivot` (in translated space).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate: Point,
    pub rotate_deg: f64,
    pub pivot: Point,
}

impl Transform {
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translate == Point::default() && self.rotate_deg.abs() < f64::EPSILON
    }

    /// Map a local point into scene coordinates.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let (sin, cos) = self.rotate_deg.to_radians().sin_cos();
        let dx = p.x - self.pivot.x;
        let dy = p.y - self.pivot.y;
        Point::new(
            self.translate.x + self.pivot.x + dx * cos - dy * sin,
            self.translate.y + self.pivot.y + dx * sin + dy * cos,
        )
    }
}

/// A drawn node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub primitive: Primitive,
    pub style: Style,
    pub transform: Transform,
    pub layer: Layer,
    /// Diagram id bound to this node, if any.
    pub id: Option<String>,
}

/// Retained drawing surface for one render pass.
pub struct Scene {
    nodes: Vec<Node>,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    decorations_visible: bool,
}

impl Scene {
    #[must_use]
    pub fn new(measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        Self { nodes: Vec::new(), measurer, decorations_visible: true }
    }

    /// The measurer used for text extents.
    #[must_use]
    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    // --- Drawing ---

    pub fn push(&mut self, primitive: Primitive, style: Style, layer: Layer) -> Handle {
        self.nodes.push(Node { primitive, style, transform: Transform::default(), layer, id: None });
        Handle(self.nodes.len() - 1)
    }

    pub fn rect(&mut self, bounds: Rect, radius: f64, style: Style) -> Handle {
        self.push(Primitive::Rect { bounds, radius }, style, Layer::Content)
    }

    pub fn ellipse(&mut self, center: Point, rx: f64, ry: f64, style: Style) -> Handle {
        self.push(Primitive::Ellipse { center, rx, ry }, style, Layer::Content)
    }

    pub fn path(&mut self, cmds: Vec<PathCmd>, style: Style) -> Handle {
        self.push(Primitive::Path(cmds), style, Layer::Content)
    }

    pub fn text(&mut self, anchor: Point, text: &str, align: TextAlign, font_size: f64) -> Handle {
        let lines = text.split('\n').map(str::to_owned).collect();
        let style = Style { fill: Some(TEXT_COLOR), ..Style::default() };
        self.push(Primitive::Text { anchor, lines, align, font_size }, style, Layer::Content)
    }

    // --- Mutation through handles ---

    #[must_use]
    pub fn node(&self, handle: Handle) -> Option<&Node> {
        self.nodes.get(handle.0)
    }

    pub fn node_mut(&mut self, handle: Handle) -> Option<&mut Node> {
        self.nodes.get_mut(handle.0)
    }

    /// Recolor a node's stroke. Returns false for a stale handle.
    pub fn set_stroke(&mut self, handle: Handle, color: &'static str) -> bool {
        let Some(node) = self.nodes.get_mut(handle.0) else {
            return false;
        };
        node.style.stroke = Some(color);
        true
    }

    pub fn set_transform(&mut self, handle: Handle, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(handle.0) {
            node.transform = transform;
        }
    }

    pub fn set_id(&mut self, handle: Handle, id: &str) {
        if let Some(node) = self.nodes.get_mut(handle.0) {
            node.id = Some(id.to_owned());
        }
    }

    /// Replace the lines of a text node.
    pub fn set_text_lines(&mut self, handle: Handle, new_lines: Vec<String>) {
        if let Some(Node { primitive: Primitive::Text { lines, .. }, .. }) = self.nodes.get_mut(handle.0) {
            *lines = new_lines;
        }
    }

    /// Move a text node's anchor.
    pub fn move_text(&mut self, handle: Handle, to: Point) {
        if let Some(Node { primitive: Primitive::Text { anchor, .. }, .. }) = self.nodes.get_mut(handle.0) {
            *anchor = to;
        }
    }

    // --- Queries ---

    /// Geometry bounds in local coordinates, ignoring stroke and transform.
    #[must_use]
    pub fn bbox(&self, handle: Handle) -> Option<Rect> {
        let node = self.nodes.get(handle.0)?;
        Some(match &node.primitive {
            Primitive::Rect { bounds, .. } | Primitive::Glyph { bounds, .. } => *bounds,
            Primitive::Ellipse { center, rx, ry } => Rect::new(center.x - rx, center.y - ry, 2.0 * rx, 2.0 * ry),
            Primitive::Path(cmds) => path_bounds(cmds)?,
            Primitive::Text { anchor, lines, align, font_size } => {
                let width = lines
                    .iter()
                    .map(|l| self.measurer.text_width(l, *font_size))
                    .fold(0.0, f64::max);
                #[allow(clippy::cast_precision_loss)]
                let height = lines.len() as f64 * font_size * LINE_HEIGHT_FACTOR;
                let x = match align {
                    TextAlign::Start => anchor.x,
                    TextAlign::Middle => anchor.x - width / 2.0,
                };
                Rect::new(x, anchor.y - height / 2.0, width, height)
            }
        })
    }

    /// Bounds including half the stroke width on every side.
    #[must_use]
    pub fn outer_bbox(&self, handle: Handle) -> Option<Rect> {
        let node = self.nodes.get(handle.0)?;
        let inner = self.bbox(handle)?;
        if node.style.stroke.is_some() {
            Some(inner.outset(node.style.stroke_width / 2.0))
        } else {
            Some(inner)
        }
    }

    /// Every node with its handle, in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (Handle(i), n))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles of every node bound to `id`, in draw order.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn handles_for(&self, id: &str) -> Vec<Handle> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.id.as_deref() == Some(id))
            .map(|(i, _)| Handle(i))
            .collect()
    }

    // --- Decorations ---

    pub fn set_decorations_visible(&mut self, visible: bool) {
        self.decorations_visible = visible;
    }

    #[must_use]
    pub fn decorations_visible(&self) -> bool {
        self.decorations_visible
    }

    // --- Output ---

    /// An SVG document of the given canvas size over `view_box`.
    #[must_use]
    pub fn svg(&self, width: f64, height: f64, view_box: Rect) -> SvgDocument<'_> {
        SvgDocument { scene: self, width, height, view_box }
    }

    /// Serialize to SVG text.
    #[must_use]
    pub fn to_svg(&self, width: f64, height: f64, view_box: Rect) -> String {
        self.svg(width, height, view_box).to_string()
    }
}

/// Display adapter that writes a scene as SVG.
pub struct SvgDocument<'a> {
    scene: &'a Scene,
    width: f64,
    height: f64,
    view_box: Rect,
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            num(self.width),
            num(self.height),
            num(self.view_box.x),
            num(self.view_box.y),
            num(self.view_box.width),
            num(self.view_box.height),
        )?;
        for node in &self.scene.nodes {
            if node.layer == Layer::Decoration && !self.scene.decorations_visible {
                continue;
            }
            write_node(f, node)?;
        }
        f.write_str("</svg>")
    }
}

fn path_bounds(cmds: &[PathCmd]) -> Option<Rect> {
    let mut pts = cmds.iter().filter_map(|c| match c {
        PathCmd::MoveTo(p) | PathCmd::LineTo(p) => Some(*p),
        PathCmd::Close => None,
    });
    let first = pts.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in pts {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// SVG path data for a command list.
#[must_use]
pub fn path_data(cmds: &[PathCmd]) -> String {
    cmds.iter()
        .map(|cmd| match cmd {
            PathCmd::MoveTo(p) => format!("M{} {}", num(p.x), num(p.y)),
            PathCmd::LineTo(p) => format!("L{} {}", num(p.x), num(p.y)),
            PathCmd::Close => "Z".to_owned(),
        })
        .collect()
}

/// Format a coordinate with at most three decimals and no trailing zeros.
#[must_use]
pub fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded.abs() < f64::EPSILON {
        return "0".to_owned();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_style(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    let s = &node.style;
    match s.stroke {
        Some(c) => write!(f, r#" stroke="{c}" stroke-width="{}""#, num(s.stroke_width))?,
        None => f.write_str(r#" stroke="none""#)?,
    }
    write!(f, r#" fill="{}""#, s.fill.unwrap_or("none"))?;
    if s.opacity < 1.0 {
        write!(f, r#" opacity="{}""#, num(s.opacity))?;
    }
    if s.dashed {
        f.write_str(r#" stroke-dasharray="4 3""#)?;
    }
    if !node.transform.is_identity() {
        let t = &node.transform;
        write!(
            f,
            r#" transform="translate({} {}) rotate({} {} {})""#,
            num(t.translate.x),
            num(t.translate.y),
            num(t.rotate_deg),
            num(t.pivot.x),
            num(t.pivot.y),
        )?;
    }
    if let Some(id) = &node.id {
        write!(f, r#" data-id="{}""#, escape(id))?;
    }
    Ok(())
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match &node.primitive {
        Primitive::Rect { bounds, radius } => {
            write!(
                f,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
                num(bounds.x),
                num(bounds.y),
                num(bounds.width),
                num(bounds.height),
                num(*radius),
            )?;
            write_style(f, node)?;
            f.write_str("/>")
        }
        Primitive::Ellipse { center, rx, ry } => {
            write!(
                f,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                num(center.x),
                num(center.y),
                num(*rx),
                num(*ry),
            )?;
            write_style(f, node)?;
            f.write_str("/>")
        }
        Primitive::Path(cmds) => {
            write!(f, r#"<path d="{}""#, path_data(cmds))?;
            write_style(f, node)?;
            f.write_str("/>")
        }
        Primitive::Glyph { d, .. } => {
            write!(f, r#"<path d="{d}""#)?;
            write_style(f, node)?;
            f.write_str("/>")
        }
        Primitive::Text { anchor, lines, align, font_size } => {
            let anchor_attr = match align {
                TextAlign::Start => "start",
                TextAlign::Middle => "middle",
            };
            let line_height = font_size * LINE_HEIGHT_FACTOR;
            write!(
                f,
                r#"<text x="{}" y="{}" text-anchor="{anchor_attr}" dominant-baseline="central" font-family="{LABEL_FONT_FAMILY}" font-size="{}""#,
                num(anchor.x),
                num(anchor.y),
                num(*font_size),
            )?;
            write_style(f, node)?;
            f.write_str(">")?;
            #[allow(clippy::cast_precision_loss)]
            let first_dy = -(lines.len().saturating_sub(1) as f64) * line_height / 2.0;
            for (i, line) in lines.iter().enumerate() {
                let dy = if i == 0 { first_dy } else { line_height };
                write!(f, r#"<tspan x="{}" dy="{}">{}</tspan>"#, num(anchor.x), num(dy), escape(line))?;
            }
            f.write_str("</text>")
        }
    }
}

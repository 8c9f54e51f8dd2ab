#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::flow::Segment;
use crate::model::{Point, Rect};

/// Which part of the diagram was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// An element body.
    Body,
    /// The widened hit path of a flow.
    FlowPath,
    /// The breakpoint toggle drawn on a breakable element.
    BreakpointMarker,
    /// The continue arrow drawn next to a halted element.
    ContinueMarker,
}

impl HitPart {
    /// Markers live on the decoration layer and vanish while scrolling.
    #[must_use]
    pub fn is_decoration(self) -> bool {
        matches!(self, Self::BreakpointMarker | Self::ContinueMarker)
    }
}

/// Geometry that receives pointer events.
#[derive(Debug, Clone, PartialEq)]
pub enum HitArea {
    Rect(Rect),
    /// A polyline widened to `half_width` on each side.
    Stroke { segments: Vec<Segment>, half_width: f64 },
    Circle { center: Point, radius: f64 },
}

impl HitArea {
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(p),
            Self::Stroke { segments, half_width } => segments.iter().any(|s| s.distance_to(p) <= *half_width),
            Self::Circle { center, radius } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

/// One registered interactive region, keyed by diagram id.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub id: String,
    pub part: HitPart,
    pub area: HitArea,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    pub id: &'a str,
    pub part: HitPart,
}

/// Find the topmost region under `world_pt`.
///
/// Regions are stored in draw order, so later registrations win.
#[must_use]
pub fn hit_test(regions: &[HitRegion], world_pt: Point) -> Option<Hit<'_>> {
    hit_test_visible(regions, world_pt, true)
}

/// Like [`hit_test`], but decoration regions only count while decorations
/// are drawn. A hidden marker neither takes the hit nor shadows what is below.
#[must_use]
pub fn hit_test_visible(regions: &[HitRegion], world_pt: Point, decorations_visible: bool) -> Option<Hit<'_>> {
    regions
        .iter()
        .rev()
        .filter(|r| decorations_visible || !r.part.is_decoration())
        .find(|r| r.area.contains(world_pt))
        .map(|r| Hit { id: &r.id, part: r.part })
}

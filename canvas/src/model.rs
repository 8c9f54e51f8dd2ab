//! Diagram model: elements, flows, pools and the snapshot that carries them.
//!
//! A [`Snapshot`] is the JSON document returned by one diagram fetch. It is
//! deserialized once, validated once, and then treated as immutable for the
//! duration of a render pass. A newer fetch replaces it wholesale; nothing in
//! this crate patches an element in place.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink by `d` on every side.
    #[must_use]
    pub fn inset(&self, d: f64) -> Self {
        Self {
            x: self.x + d,
            y: self.y + d,
            width: self.width - 2.0 * d,
            height: self.height - 2.0 * d,
        }
    }

    /// Grow by `d` on every side.
    #[must_use]
    pub fn outset(&self, d: f64) -> Self {
        self.inset(-d)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Errors raised while decoding or validating a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("snapshot JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("element {id} has non-positive size {width}x{height}")]
    NonPositiveSize { id: String, width: f64, height: f64 },
    #[error("flow {id} has {count} waypoint(s), at least 2 required")]
    TooFewWaypoints { id: String, count: usize },
    #[error("id {0} is used by more than one element, flow, pool or lane")]
    DuplicateId(String),
}

impl ModelError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_MODEL_PARSE",
            Self::NonPositiveSize { .. } => "E_MODEL_SIZE",
            Self::TooFewWaypoints { .. } => "E_MODEL_WAYPOINTS",
            Self::DuplicateId(_) => "E_MODEL_DUPLICATE_ID",
        }
    }
}

/// Event definition attached to an event element (`timer`, `message`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One name/value pair shown in an element's tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProperty {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// The `brokenPlanItem` field: either a plan-item instance id or a bare flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrokenPlanItem {
    Flag(bool),
    Id(String),
}

/// A node of the diagram (task, event, gateway, stage, criterion, ...).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique across elements, flows, pools and lanes.
    pub id: String,
    /// Type tag, e.g. `UserTask`, `ExclusiveGateway`, `Stage`.
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub added: bool,
    #[serde(default)]
    pub removed: bool,
    /// The debugger may place a breakpoint on this element.
    #[serde(default)]
    pub breakable: bool,
    /// A breakpoint is currently set on this element.
    #[serde(default)]
    pub breakpoint: bool,
    #[serde(default)]
    pub broken_plan_item: Option<BrokenPlanItem>,
    /// Task variant (`mail`, `camel`, `http`, ...).
    #[serde(default, alias = "subType")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub event_definition: Option<EventDefinition>,
    /// Boundary events only; non-interrupting ones are drawn dashed.
    #[serde(default = "default_true")]
    pub interrupting: bool,
    #[serde(default)]
    pub properties: Vec<ElementProperty>,
}

fn default_true() -> bool {
    true
}

impl Element {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Plan item the continue command targets, if execution is halted here.
    ///
    /// A bare `true` flag means the element id doubles as the plan item id.
    #[must_use]
    pub fn broken_plan_item_id(&self) -> Option<&str> {
        match &self.broken_plan_item {
            Some(BrokenPlanItem::Id(id)) if !id.is_empty() => Some(id),
            Some(BrokenPlanItem::Flag(true)) => Some(&self.id),
            _ => None,
        }
    }

    /// The label, if it has any visible content.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A connection routed through explicit waypoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub waypoints: Vec<Point>,
    #[serde(default)]
    pub name: Option<String>,
    /// Draws the conditional marker on the last segment.
    #[serde(default)]
    pub conditions: bool,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub completed: bool,
}

impl Flow {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A swimlane inside a pool.
///
/// Lanes are drawn but not interactive; `id` only takes part in the
/// duplicate-id check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A participant pool with optional lanes.
///
/// Like [`Lane`], a pool registers no hit region; `id` is checked for
/// uniqueness only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub lanes: Vec<Lane>,
}

/// One diagram fetch: everything needed for a full render pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub flows: Vec<Flow>,
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub diagram_begin_x: f64,
    #[serde(default)]
    pub diagram_begin_y: f64,
    pub diagram_width: f64,
    pub diagram_height: f64,
}

impl Snapshot {
    /// Decode and validate a snapshot from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] for malformed JSON, or any validation
    /// error from [`Snapshot::validate`].
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let snapshot: Self = serde_json::from_str(text)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the size, waypoint and id-uniqueness invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for pool in &self.pools {
            if !seen.insert(&pool.id) {
                return Err(ModelError::DuplicateId(pool.id.clone()));
            }
            for lane in &pool.lanes {
                if !seen.insert(&lane.id) {
                    return Err(ModelError::DuplicateId(lane.id.clone()));
                }
            }
        }
        for el in &self.elements {
            if !(el.width > 0.0 && el.height > 0.0) {
                return Err(ModelError::NonPositiveSize { id: el.id.clone(), width: el.width, height: el.height });
            }
            if !seen.insert(&el.id) {
                return Err(ModelError::DuplicateId(el.id.clone()));
            }
        }
        for flow in &self.flows {
            if flow.waypoints.len() < 2 {
                return Err(ModelError::TooFewWaypoints { id: flow.id.clone(), count: flow.waypoints.len() });
            }
            if !seen.insert(&flow.id) {
                return Err(ModelError::DuplicateId(flow.id.clone()));
            }
        }
        Ok(())
    }

    /// Logical content area: the view box the canvas scales onto.
    #[must_use]
    pub fn view_box(&self) -> Rect {
        Rect::new(self.diagram_begin_x, self.diagram_begin_y, self.diagram_width, self.diagram_height)
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

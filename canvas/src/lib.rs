//! Diagram rendering and interaction engine for BPMN and CMMN process models.
//!
//! The crate turns one [`model::Snapshot`] (the JSON returned by a diagram
//! fetch) into a retained vector [`scene::Scene`], serialized to SVG. It also
//! owns everything the viewer does on top of the drawing: hover highlighting,
//! debugger selection and markers, zoom, and scroll settling. The host only
//! forwards pointer and timer events and carries out the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`model`] | Snapshot, element, flow and pool types with validation |
//! | [`render`] | One full render pass over a snapshot |
//! | [`shapes`] | Element renderers keyed by type tag |
//! | [`flow`] | Flow polylines, arrowheads and label placement |
//! | [`icons`] | Fixed icon glyphs for task and event sub-tags |
//! | [`text`] | Text measurement and label wrapping |
//! | [`scene`] | Retained drawing with handles and SVG output |
//! | [`hit`] | Hit-testing against rendered regions |
//! | [`overlay`] | Hover, selection and tooltip state |
//! | [`viewport`] | Canvas size, zoom steps and scroll debounce |
//! | [`consts`] | Shared colors and numeric constants |

pub mod consts;
pub mod engine;
pub mod flow;
pub mod hit;
pub mod icons;
pub mod model;
pub mod overlay;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod viewport;

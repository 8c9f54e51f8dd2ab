//! Icon glyphs keyed by element sub-tag.
//!
//! Each icon is a fixed 16x16 vector path. Drawing translates it to the
//! requested origin and strokes (or fills) it with the element's resolved
//! color. Unknown sub-tags map to [`Icon::Generic`] instead of failing.

#[cfg(test)]
#[path = "icons_test.rs"]
mod icons_test;

use crate::consts::ICON_SIZE;
use crate::model::{Point, Rect};
use crate::scene::{Handle, Layer, Primitive, Scene, Style, Transform};

/// Overlay glyph drawn inside or on top of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Mail,
    Camel,
    Mule,
    Http,
    Shell,
    Script,
    Decision,
    Manual,
    Receive,
    User,
    Service,
    Case,
    Process,
    Timer,
    Conditional,
    Error,
    Escalation,
    Signal,
    Message,
    Generic,
}

impl Icon {
    /// Map a sub-tag (task variant or event definition kind) to its glyph.
    #[must_use]
    pub fn from_sub_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "mail" | "send" | "email" => Self::Mail,
            "camel" => Self::Camel,
            "mule" => Self::Mule,
            "http" | "rest" | "webservice" => Self::Http,
            "shell" => Self::Shell,
            "script" => Self::Script,
            "dmn" | "decision" | "businessrule" | "business-rule" => Self::Decision,
            "manual" => Self::Manual,
            "receive" => Self::Receive,
            "user" | "human" => Self::User,
            "service" => Self::Service,
            "case" => Self::Case,
            "process" => Self::Process,
            "timer" => Self::Timer,
            "conditional" => Self::Conditional,
            "error" => Self::Error,
            "escalation" => Self::Escalation,
            "signal" => Self::Signal,
            "message" => Self::Message,
            _ => Self::Generic,
        }
    }

    /// SVG path data in a 16x16 box with its origin at the top-left corner.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Mail => "M1 3H15V13H1Z M1 3L8 9L15 3",
            Self::Camel => "M1 13L3 7Q5 3 7 7Q9 3 11 7L13 7L15 5 M4 13L4 9 M11 13L11 8",
            Self::Mule => "M2 14L4 3L8 9L12 3L14 14",
            Self::Http => "M8 1A7 7 0 1 0 8.001 1Z M1 8H15 M8 1C4 5 4 11 8 15 M8 1C12 5 12 11 8 15",
            Self::Shell => "M1 2H15V14H1Z M3 5L6 8L3 11 M7 11H12",
            Self::Script => "M4 1H14C11 4 14 8 12 15H2C5 12 2 8 4 1Z M5 5H11 M5 8H11 M5 11H10",
            Self::Decision => "M1 2H15V14H1Z M1 6H15 M1 10H15 M5 6V14",
            Self::Manual => "M1 7L5 4H13V6H8 M8 6H14V8H8 M8 8H14V10H8 M8 10H13V12H3L1 10Z",
            Self::Receive => "M1 5H15V14H1Z M1 5L8 10L15 5 M8 1V4",
            Self::User => "M8 2A3 3 0 1 0 8.001 2Z M2 15C2 10 14 10 14 15Z",
            Self::Service => {
                "M8 4A4 4 0 1 0 8.001 4Z M8 0V3 M8 13V16 M0 8H3 M13 8H16 \
                 M2.3 2.3L4.4 4.4 M11.6 11.6L13.7 13.7 M2.3 13.7L4.4 11.6 M11.6 4.4L13.7 2.3"
            }
            Self::Case => "M1 4H6L7 2H12L13 4H15V14H1Z",
            Self::Process => "M1 4H10L14 8L10 12H1L5 8Z",
            Self::Timer => "M8 1A7 7 0 1 0 8.001 1Z M8 4V8L11 10",
            Self::Conditional => "M3 1H13V15H3Z M5 4H11 M5 7H11 M5 10H11 M5 13H11",
            Self::Error => "M2 14L5 4L9 10L12 2L10 12L6 7Z",
            Self::Escalation => "M8 1L13 15L8 9L3 15Z",
            Self::Signal => "M8 1L15 14H1Z",
            Self::Message => "M1 4H15V12H1Z M1 4L8 9L15 4",
            Self::Generic => "M2 2H14V14H2Z M5 8H11 M8 5V11",
        }
    }
}

/// Whether the glyph is filled or outlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPaint {
    Outline,
    Filled,
}

/// Draw `icon` with its top-left corner at `origin`.
pub fn draw_icon(scene: &mut Scene, icon: Icon, origin: Point, color: &'static str, paint: IconPaint) -> Handle {
    let mut style = Style::stroked(color, 1.0);
    if paint == IconPaint::Filled {
        style = style.with_fill(color);
    }
    let handle = scene.push(
        Primitive::Glyph { d: icon.path(), bounds: Rect::new(0.0, 0.0, ICON_SIZE, ICON_SIZE) },
        style,
        Layer::Content,
    );
    scene.set_transform(handle, Transform { translate: origin, ..Transform::default() });
    handle
}

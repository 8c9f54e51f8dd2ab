//! Text layout: glyph measurement and greedy label wrapping.
//!
//! Labels are wrapped with a single calibrated average glyph width rather
//! than per-character metrics. The average is taken by rendering the 52-letter
//! Latin alphabet at the target font size and dividing its width by 52. This
//! matches how existing diagrams were laid out, so the approximation is kept
//! even where a per-glyph metric would be more precise.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use crate::consts::TEXT_PADDING;
use crate::model::{Point, Rect};
use crate::scene::{Handle, Scene, TextAlign};

/// Calibration string for the average glyph width.
pub const CALIBRATION_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Measures rendered text width.
pub trait TextMeasurer {
    /// Width of a single line of `text` at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Deterministic measurer backed by Arial/Helvetica advance widths.
///
/// Advances are in 1/1000 em for printable ASCII; anything else measures
/// like a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArialMetrics;

/// Advance widths for `' '..='~'`.
const ARIAL_ADVANCES: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

const FALLBACK_ADVANCE: u16 = 556;

impl ArialMetrics {
    fn advance(ch: char) -> u16 {
        let code = ch as u32;
        if (0x20..=0x7e).contains(&code) {
            ARIAL_ADVANCES[(code - 0x20) as usize]
        } else {
            FALLBACK_ADVANCE
        }
    }
}

impl TextMeasurer for ArialMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(Self::advance(c))).sum();
        f64::from(units) * font_size / 1000.0
    }
}

/// Horizontal placement of a wrapped label inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAnchor {
    Start,
    Middle,
}

/// Vertical placement of a wrapped label inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAnchor {
    Top,
    Middle,
}

/// Average glyph width at `font_size`, calibrated on the full alphabet.
#[must_use]
pub fn average_char_width(measurer: &dyn TextMeasurer, font_size: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let count = CALIBRATION_ALPHABET.len() as f64;
    measurer.text_width(CALIBRATION_ALPHABET, font_size) / count
}

/// Estimated width of `line` under the average-glyph model, spaces excluded.
#[must_use]
pub fn estimated_width(line: &str, avg_char_width: f64) -> f64 {
    line.split(' ').map(|w| char_count(w) * avg_char_width).sum()
}

#[allow(clippy::cast_precision_loss)]
fn char_count(word: &str) -> f64 {
    word.chars().count() as f64
}

/// Greedy word wrap.
///
/// Splits on explicit `\n` first, then on single spaces. A word that would push
/// the running width past `max_width` starts a new line, unless the current
/// line is still empty. Every explicit line ends with a break of its own, so
/// paragraph breaks survive even when the paragraph fits. Trailing spaces are
/// trimmed from each output line.
#[must_use]
pub fn wrap_lines(text: &str, max_width: f64, avg_char_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut running = 0.0;
        for word in paragraph.split(' ') {
            let word_width = char_count(word) * avg_char_width;
            if running > 0.0 && running + word_width > max_width {
                lines.push(finish_line(&mut current));
                running = 0.0;
            }
            running += word_width;
            current.push_str(word);
            current.push(' ');
        }
        lines.push(finish_line(&mut current));
    }
    lines
}

fn finish_line(current: &mut String) -> String {
    let line = current.trim_end_matches(' ').to_owned();
    current.clear();
    line
}

/// Wrap `text` into `bounds` and draw it. Returns `None` for empty or absent text.
///
/// The label is centered vertically in the box; with [`VAnchor::Top`] the
/// wrapped block is re-measured and moved so its top sits on `bounds.y`.
pub fn draw_multiline_text(
    scene: &mut Scene,
    text: Option<&str>,
    bounds: Rect,
    h_anchor: HAnchor,
    v_anchor: VAnchor,
    font_size: f64,
) -> Option<Handle> {
    let text = text.filter(|t| !t.is_empty())?;

    let (x, align) = match h_anchor {
        HAnchor::Start => (bounds.x + TEXT_PADDING, TextAlign::Start),
        HAnchor::Middle => (bounds.x + bounds.width / 2.0, TextAlign::Middle),
    };
    let y = bounds.y + bounds.height / 2.0;

    // Calibrate on the node that will carry the label.
    let handle = scene.text(Point::new(x, y), CALIBRATION_ALPHABET, align, font_size);
    #[allow(clippy::cast_precision_loss)]
    let avg = scene
        .bbox(handle)
        .map_or(0.0, |bb| bb.width / CALIBRATION_ALPHABET.len() as f64);

    let max_width = bounds.width - 2.0 * TEXT_PADDING;
    scene.set_text_lines(handle, wrap_lines(text, max_width, avg));

    if v_anchor == VAnchor::Top {
        if let Some(bb) = scene.bbox(handle) {
            scene.move_text(handle, Point::new(x, bounds.y + bb.height / 2.0));
        }
    }
    Some(handle)
}

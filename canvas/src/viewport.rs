//! Viewport controller: canvas size versus diagram view box, zoom steps, and
//! scroll-settle detection.
//!
//! The canvas size (what the host lays out) and the view box (diagram content
//! coordinates) are kept apart. Zooming resizes the canvas only, so element
//! coordinates never change between zoom levels.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::time::{Duration, Instant};

use crate::consts::VIEWPORT_MARGIN;
use crate::model::{Point, Rect};

/// Canvas dimensions in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Divisors applied to the canvas size per zoom step.
///
/// Zoom-in divides by `zoom_in`, zoom-out divides by `zoom_out`. The default
/// pair (0.90, 1.10) matches the legacy viewer and is not a round trip: one
/// step in and one step out leaves the canvas about 1% larger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactors {
    pub zoom_in: f64,
    pub zoom_out: f64,
}

impl Default for ZoomFactors {
    fn default() -> Self {
        Self { zoom_in: 0.90, zoom_out: 1.10 }
    }
}

impl ZoomFactors {
    /// Factors where one step in followed by one step out restores the size.
    #[must_use]
    pub fn symmetric() -> Self {
        Self { zoom_in: 0.90, zoom_out: 1.0 / 0.90 }
    }
}

/// Current canvas size over a fixed view box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    canvas: Size,
    view_box: Rect,
    factors: ZoomFactors,
}

impl Viewport {
    #[must_use]
    pub fn new(factors: ZoomFactors) -> Self {
        Self { factors, ..Self::default() }
    }

    /// Frame a diagram's content area with a margin and size the canvas 1:1.
    pub fn fit_to(&mut self, content: Rect) {
        self.view_box = content.outset(VIEWPORT_MARGIN);
        self.canvas = Size::new(self.view_box.width, self.view_box.height);
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Canvas pixels per diagram unit.
    #[must_use]
    pub fn scale(&self) -> f64 {
        if self.view_box.width > 0.0 { self.canvas.width / self.view_box.width } else { 1.0 }
    }

    /// Grow the canvas by one step. `None` when the size would not change.
    pub fn zoom_in(&mut self) -> Option<Size> {
        self.resize_by(self.factors.zoom_in)
    }

    /// Shrink the canvas by one step. `None` when the size would not change.
    pub fn zoom_out(&mut self) -> Option<Size> {
        self.resize_by(self.factors.zoom_out)
    }

    fn resize_by(&mut self, divisor: f64) -> Option<Size> {
        let next = Size::new(self.canvas.width / divisor, self.canvas.height / divisor);
        if next == self.canvas {
            return None;
        }
        self.canvas = next;
        Some(next)
    }

    /// Map a canvas pixel to diagram coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let scale = self.scale();
        Point::new(self.view_box.x + screen.x / scale, self.view_box.y + screen.y / scale)
    }

    /// Map a diagram point to canvas pixels.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let scale = self.scale();
        Point::new((world.x - self.view_box.x) * scale, (world.y - self.view_box.y) * scale)
    }
}

// =============================================================
// Scroll settle
// =============================================================

/// Monotonic time source, injectable for tests.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Scroll-settle detection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    #[default]
    Idle,
    /// Scrolling; settles once the clock reaches `deadline`.
    Pending { deadline: Duration },
    /// Scrolling stopped and decorations were restored.
    Settled,
}

/// Debounce over scroll events: `Idle -> Pending -> Settled`.
///
/// Every scroll event pushes the deadline out by `delay`.
#[derive(Debug, Clone, Copy)]
pub struct ScrollDebounce {
    delay: Duration,
    state: DebounceState,
}

impl ScrollDebounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, state: DebounceState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a scroll event. Returns true when scrolling just started.
    pub fn on_scroll(&mut self, now: Duration) -> bool {
        let started = !matches!(self.state, DebounceState::Pending { .. });
        self.state = DebounceState::Pending { deadline: now + self.delay };
        started
    }

    /// Advance the clock. Returns true exactly once per settle.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Settled;
                true
            }
            _ => false,
        }
    }
}

//! Widget configuration.
//!
//! Timing and geometry constants for the ring. Every field has a default
//! matching the stock widget look.

use std::time::Duration;

/// Smallest fill value the ring ever shows. Keeps the stroke from collapsing.
pub const MIN_PROGRESS: f32 = 0.0001;

/// Stroke geometry of the accent ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Stroke width when the ring is full.
    pub min_stroke_width: f32,
    /// Extra width added as the ring empties.
    pub stroke_range: f32,
}

impl RingGeometry {
    /// Stroke width for a given fill progress.
    ///
    /// `(1 - progress) * stroke_range + min_stroke_width`
    #[inline]
    pub fn stroke_width(&self, progress: f32) -> f32 {
        (1.0 - progress).mul_add(self.stroke_range, self.min_stroke_width)
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            min_stroke_width: 4.0,
            stroke_range: 28.0,
        }
    }
}

/// Configuration for the widget core.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Ring stroke geometry.
    pub ring: RingGeometry,
    /// Duration of a one-shot fill/empty transition.
    pub transition: Duration,
    /// Duration of one leg of the processing oscillation.
    pub breathing_period: Duration,
    /// Interval between animation frames while a driver runs.
    pub frame_interval: Duration,
    /// Lower clamp for the fill progress.
    pub min_progress: f32,
    /// Duration of the hover highlight fade.
    pub hover_transition: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            ring: RingGeometry::default(),
            transition: Duration::from_secs(1),
            breathing_period: Duration::from_secs(1),
            frame_interval: Duration::from_millis(16),
            min_progress: MIN_PROGRESS,
            hover_transition: Duration::from_millis(200),
        }
    }
}

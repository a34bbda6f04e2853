//! VisualState: the parameters the renderer draws the ring from.

use crate::anim::AnimationStyle;
use crate::config::{RingGeometry, MIN_PROGRESS};

/// Ring parameters published to the rendering layer.
///
/// `stroke_width` is always derived from `fill_progress`, never set on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Fill progress in `[min_progress, 1]`.
    pub fill_progress: f32,
    /// Stroke width of the accent ring.
    pub stroke_width: f32,
    /// Value the ring is currently heading towards.
    pub target: f32,
    /// Style of the running animation.
    pub style: AnimationStyle,
    /// Whether the accent ring is drawn at all.
    pub ring_visible: bool,
}

impl VisualState {
    /// Build the state for a given fill progress.
    pub fn new(
        fill_progress: f32,
        target: f32,
        style: AnimationStyle,
        ring_visible: bool,
        ring: &RingGeometry,
    ) -> Self {
        Self {
            fill_progress,
            stroke_width: ring.stroke_width(fill_progress),
            target,
            style,
            ring_visible,
        }
    }

    /// Scale factor applied to the accent ring.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.fill_progress.max(MIN_PROGRESS)
    }
}

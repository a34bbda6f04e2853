//! C Foreign Function Interface (FFI) for Halo.
//!
//! This module exposes the widget core to a host editor process. The host
//! owns its UI thread, so there is no actor and no driver thread here: the
//! handle wraps a [`WidgetStateMachine`] on a [`ManualScheduler`] and the
//! host calls `halo_widget_advance` from its display link.
//!
//! # Safety
//!
//! All functions that accept pointers require valid pointers obtained from
//! `halo_widget_new`. A handle must only be used from one thread at a time.
//!
//! # Example (C)
//!
//! ```c
//! #include "halo.h"
//!
//! HaloWidget* widget = halo_widget_new(0, 0, 48, 48);
//!
//! halo_widget_notify_processing(widget, true);
//! halo_widget_notify_content_hash(widget, hash_of(suggestion));
//!
//! // On every display refresh
//! HaloVisual visual;
//! halo_widget_advance(widget);
//! halo_widget_visual(widget, &visual);
//! draw_ring(visual.fill_progress, visual.stroke_width);
//!
//! halo_widget_destroy(widget);
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::actor::WidgetRequest;
use crate::anim::ManualScheduler;
use crate::config::WidgetConfig;
use crate::interaction::{InteractionHandler, RingBounds};
use crate::signal::Fingerprint;
use crate::state::WidgetStateMachine;
use crossbeam_channel::{unbounded, Receiver};
use std::os::raw::c_char;
use std::time::Instant;

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a widget owned by the host's UI thread.
pub struct HaloWidget {
    machine: WidgetStateMachine<ManualScheduler>,
    interaction: InteractionHandler,
    requests: Receiver<WidgetRequest>,
}

impl HaloWidget {
    fn new(bounds: RingBounds) -> Self {
        let config = WidgetConfig::default();
        let (request_tx, requests) = unbounded();
        Self {
            machine: WidgetStateMachine::new(&config, ManualScheduler::new()),
            interaction: InteractionHandler::new(bounds, config.hover_transition, request_tx),
            requests,
        }
    }
}

// =============================================================================
// Result Codes and Plain Data
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaloResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer passed.
    NullPointer = 1,
}

/// Ring parameters for the host renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HaloVisual {
    /// Fill progress in `[0.0001, 1]`.
    pub fill_progress: f32,
    /// Stroke width of the accent ring.
    pub stroke_width: f32,
    /// Value the ring is heading towards this cycle.
    pub target: f32,
    /// Scale factor of the accent ring.
    pub scale: f32,
    /// Whether the ring is breathing.
    pub repeating: bool,
    /// Whether the accent ring is drawn.
    pub ring_visible: bool,
}

// =============================================================================
// Widget Functions
// =============================================================================

/// Create a widget occupying the given rect.
#[unsafe(no_mangle)]
pub extern "C" fn halo_widget_new(x: u16, y: u16, width: u16, height: u16) -> *mut HaloWidget {
    let widget = HaloWidget::new(RingBounds::new(x, y, width, height));
    Box::into_raw(Box::new(widget))
}

/// Tear down and destroy a widget.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_destroy(widget: *mut HaloWidget) {
    if !widget.is_null() {
        let mut widget = Box::from_raw(widget);
        widget.machine.teardown();
    }
}

/// The suggestion engine started or stopped processing.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_notify_processing(
    widget: *mut HaloWidget,
    processing: bool,
) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget)
        .machine
        .on_processing_changed(processing, Instant::now());
    HaloResult::Ok
}

/// The panel now shows content whose fingerprint is `hash`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_notify_content_hash(
    widget: *mut HaloWidget,
    hash: u64,
) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget)
        .machine
        .on_content_identity_changed(Some(Fingerprint::from_hash(hash)), Instant::now());
    HaloResult::Ok
}

/// The panel has nothing to show.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_notify_content_absent(widget: *mut HaloWidget) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget)
        .machine
        .on_content_identity_changed(None, Instant::now());
    HaloResult::Ok
}

/// The panel's chat tab became active or inactive.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_notify_chat_active(
    widget: *mut HaloWidget,
    chat_active: bool,
) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget)
        .machine
        .on_chat_active_changed(chat_active, Instant::now());
    HaloResult::Ok
}

/// Sample the ring for the current frame.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_advance(widget: *mut HaloWidget) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget).machine.advance(Instant::now());
    HaloResult::Ok
}

/// Copy the last published ring parameters into `out`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_visual(
    widget: *const HaloWidget,
    out: *mut HaloVisual,
) -> HaloResult {
    if widget.is_null() || out.is_null() {
        return HaloResult::NullPointer;
    }
    let visual = (*widget).machine.visual();
    *out = HaloVisual {
        fill_progress: visual.fill_progress,
        stroke_width: visual.stroke_width,
        target: visual.target,
        scale: visual.scale(),
        repeating: visual.style.is_repeating(),
        ring_visible: visual.ring_visible,
    };
    HaloResult::Ok
}

/// Whether the ring still needs frames.
///
/// Hosts can pause their display link while this returns false.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_is_animating(widget: *const HaloWidget) -> bool {
    if widget.is_null() {
        return false;
    }
    (*widget).machine.is_animating()
}

/// The user tapped the widget.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_tap(widget: *mut HaloWidget) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget).interaction.on_tap();
    HaloResult::Ok
}

/// Number of panel toggles requested since the last call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_take_panel_toggles(widget: *mut HaloWidget) -> u32 {
    if widget.is_null() {
        return 0;
    }
    let toggles = (*widget)
        .requests
        .try_iter()
        .filter(|request| matches!(request, WidgetRequest::TogglePanel))
        .count();
    u32::try_from(toggles).unwrap_or(u32::MAX)
}

/// The pointer entered or left the widget.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_hover(widget: *mut HaloWidget, hovering: bool) -> HaloResult {
    if widget.is_null() {
        return HaloResult::NullPointer;
    }
    (*widget)
        .interaction
        .on_hover_changed(hovering, Instant::now());
    HaloResult::Ok
}

/// Current background opacity of the widget.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn halo_widget_opacity(widget: *const HaloWidget) -> f32 {
    if widget.is_null() {
        return 0.0;
    }
    (*widget).interaction.opacity_at(Instant::now())
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the Halo version string.
#[unsafe(no_mangle)]
pub extern "C" fn halo_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast::<c_char>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::IDLE_OPACITY;
    use std::ffi::CStr;

    #[test]
    fn test_halo_version() {
        unsafe {
            let version = halo_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, "0.1.0");
        }
    }

    #[test]
    fn test_null_handles_are_rejected() {
        unsafe {
            let null: *mut HaloWidget = std::ptr::null_mut();
            assert_eq!(
                halo_widget_notify_processing(null, true),
                HaloResult::NullPointer
            );
            assert_eq!(halo_widget_advance(null), HaloResult::NullPointer);
            assert!(!halo_widget_is_animating(null));
            assert_eq!(halo_widget_take_panel_toggles(null), 0);
            halo_widget_destroy(null);
        }
    }

    #[test]
    fn test_content_fills_ring() {
        unsafe {
            let widget = halo_widget_new(0, 0, 10, 10);
            let mut visual = HaloVisual::default();

            assert_eq!(halo_widget_visual(widget, &mut visual), HaloResult::Ok);
            assert!(!visual.ring_visible);

            halo_widget_notify_content_hash(widget, 42);
            assert!(halo_widget_is_animating(widget));
            halo_widget_visual(widget, &mut visual);
            assert!((visual.target - 1.0).abs() < f32::EPSILON);
            assert!(!visual.repeating);
            assert!(visual.ring_visible);

            halo_widget_notify_content_absent(widget);
            halo_widget_advance(widget);
            halo_widget_visual(widget, &mut visual);
            assert!(visual.fill_progress >= crate::config::MIN_PROGRESS);

            halo_widget_destroy(widget);
        }
    }

    #[test]
    fn test_processing_breathes() {
        unsafe {
            let widget = halo_widget_new(0, 0, 10, 10);
            let mut visual = HaloVisual::default();

            halo_widget_notify_processing(widget, true);
            halo_widget_advance(widget);
            halo_widget_visual(widget, &mut visual);
            assert!(visual.repeating);
            assert!(halo_widget_is_animating(widget));

            halo_widget_destroy(widget);
        }
    }

    #[test]
    fn test_tap_and_hover() {
        unsafe {
            let widget = halo_widget_new(0, 0, 10, 10);

            assert_eq!(halo_widget_take_panel_toggles(widget), 0);
            halo_widget_tap(widget);
            halo_widget_tap(widget);
            assert_eq!(halo_widget_take_panel_toggles(widget), 2);
            assert_eq!(halo_widget_take_panel_toggles(widget), 0);

            assert!((halo_widget_opacity(widget) - IDLE_OPACITY).abs() < 1e-6);
            assert_eq!(halo_widget_hover(widget, true), HaloResult::Ok);

            halo_widget_destroy(widget);
        }
    }
}

//! InteractionHandler: hover highlight, taps and the context menu.

use super::pointer::{PointerButton, PointerEvent, RingBounds};
use super::settings::{ContextMenu, SettingToggle, WidgetSettings};
use crate::actor::WidgetRequest;
use crate::anim::Animation;
use crossbeam_channel::Sender;
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Background opacity while the pointer is elsewhere.
pub const IDLE_OPACITY: f32 = 0.3;

/// Background opacity while the pointer hovers the widget.
pub const HOVER_OPACITY: f32 = 0.8;

/// Cosmetic hover highlight of the widget background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// Whether the pointer is over the widget.
    pub hovering: bool,
    /// Opacity fade, sampled from the moment this highlight was published.
    pub fade: Animation,
}

impl Highlight {
    /// Background opacity `elapsed` after the highlight was published.
    #[inline]
    pub fn opacity(&self, elapsed: Duration) -> f32 {
        self.fade.sample(elapsed)
    }
}

/// Translates pointer input into highlight changes and widget requests.
#[derive(Debug)]
pub struct InteractionHandler {
    bounds: RingBounds,
    transition: Duration,
    hovering: bool,
    /// A primary press started inside the ring and has not been released.
    pressed: bool,
    fade: Animation,
    fade_started: Instant,
    requests: Sender<WidgetRequest>,
}

impl InteractionHandler {
    /// Create a handler for a widget occupying `bounds`.
    pub fn new(bounds: RingBounds, transition: Duration, requests: Sender<WidgetRequest>) -> Self {
        Self {
            bounds,
            transition,
            hovering: false,
            pressed: false,
            fade: Animation::hold(IDLE_OPACITY),
            fade_started: Instant::now(),
            requests,
        }
    }

    /// Current widget bounds.
    #[inline]
    pub const fn bounds(&self) -> RingBounds {
        self.bounds
    }

    /// Move or resize the widget.
    pub fn set_bounds(&mut self, bounds: RingBounds) {
        self.bounds = bounds;
    }

    /// Whether the pointer is over the widget.
    #[inline]
    pub const fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Background opacity at `now`.
    pub fn opacity_at(&self, now: Instant) -> f32 {
        self.fade.sample(now.saturating_duration_since(self.fade_started))
    }

    /// The pointer entered or left the widget.
    ///
    /// Returns the new highlight, or `None` if the hover state is unchanged.
    pub fn on_hover_changed(&mut self, hovering: bool, now: Instant) -> Option<Highlight> {
        if self.hovering == hovering {
            return None;
        }
        self.hovering = hovering;

        let from = self.opacity_at(now);
        let to = if hovering { HOVER_OPACITY } else { IDLE_OPACITY };
        self.fade = Animation::one_shot(from, to, self.transition);
        self.fade_started = now;

        Some(Highlight {
            hovering,
            fade: self.fade,
        })
    }

    /// A discrete tap on the widget: request exactly one panel toggle.
    pub fn on_tap(&mut self) {
        debug!("tap: toggling panel");
        self.send(WidgetRequest::TogglePanel);
    }

    /// Feed a raw pointer event.
    ///
    /// A primary press and release both inside the ring count as one tap.
    /// A secondary press inside the ring opens the context menu.
    pub fn on_pointer(
        &mut self,
        event: PointerEvent,
        settings: &WidgetSettings,
        now: Instant,
    ) -> Option<Highlight> {
        match event {
            PointerEvent::Move { x, y } => {
                let inside = self.bounds.contains(x, y);
                self.on_hover_changed(inside, now)
            }
            PointerEvent::Leave => {
                self.pressed = false;
                self.on_hover_changed(false, now)
            }
            PointerEvent::Down { x, y, button } => {
                let inside = self.bounds.contains(x, y);
                match button {
                    PointerButton::Primary => self.pressed = inside,
                    PointerButton::Secondary if inside => {
                        self.send(WidgetRequest::ShowContextMenu(ContextMenu::entries(settings)));
                    }
                    _ => {}
                }
                self.on_hover_changed(inside, now)
            }
            PointerEvent::Up { x, y, button } => {
                let inside = self.bounds.contains(x, y);
                if button == PointerButton::Primary {
                    if self.pressed && inside {
                        self.on_tap();
                    }
                    self.pressed = false;
                }
                self.on_hover_changed(inside, now)
            }
        }
    }

    /// A context menu item was chosen: flip the setting and report it.
    pub fn activate(&mut self, item: SettingToggle, settings: &mut WidgetSettings) {
        let value = item.toggle(settings);
        debug!("setting '{}' -> {value}", item.label());
        self.send(WidgetRequest::SettingsChanged(settings.clone()));
    }

    fn send(&self, request: WidgetRequest) {
        if self.requests.send(request).is_err() {
            trace!("no panel controller listening; request dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};

    fn handler() -> (InteractionHandler, Receiver<WidgetRequest>) {
        let (tx, rx) = unbounded();
        let handler = InteractionHandler::new(
            RingBounds::new(0, 0, 10, 10),
            Duration::from_millis(200),
            tx,
        );
        (handler, rx)
    }

    fn toggles(rx: &Receiver<WidgetRequest>) -> usize {
        rx.try_iter()
            .filter(|r| matches!(r, WidgetRequest::TogglePanel))
            .count()
    }

    #[test]
    fn test_tap_emits_one_toggle() {
        let (mut h, rx) = handler();
        h.on_tap();
        assert_eq!(toggles(&rx), 1);
    }

    #[test]
    fn test_press_release_is_one_tap() {
        let (mut h, rx) = handler();
        let settings = WidgetSettings::default();
        let now = Instant::now();
        let down = PointerEvent::Down {
            x: 5,
            y: 5,
            button: PointerButton::Primary,
        };
        let up = PointerEvent::Up {
            x: 5,
            y: 5,
            button: PointerButton::Primary,
        };

        h.on_pointer(down, &settings, now);
        h.on_pointer(up, &settings, now);
        // A second release without a press is not a tap
        h.on_pointer(up, &settings, now);

        assert_eq!(toggles(&rx), 1);
    }

    #[test]
    fn test_release_outside_cancels_tap() {
        let (mut h, rx) = handler();
        let settings = WidgetSettings::default();
        let now = Instant::now();

        h.on_pointer(
            PointerEvent::Down {
                x: 5,
                y: 5,
                button: PointerButton::Primary,
            },
            &settings,
            now,
        );
        h.on_pointer(
            PointerEvent::Up {
                x: 40,
                y: 40,
                button: PointerButton::Primary,
            },
            &settings,
            now,
        );

        assert_eq!(toggles(&rx), 0);
    }

    #[test]
    fn test_hover_fades_opacity() {
        let (mut h, _rx) = handler();
        let t0 = Instant::now();

        let highlight = h.on_hover_changed(true, t0).unwrap();
        assert!(highlight.hovering);
        assert!(h.on_hover_changed(true, t0).is_none());

        assert!((highlight.opacity(Duration::ZERO) - IDLE_OPACITY).abs() < 1e-6);
        assert_eq!(highlight.opacity(Duration::from_millis(200)), HOVER_OPACITY);
        assert_eq!(h.opacity_at(t0 + Duration::from_secs(1)), HOVER_OPACITY);

        let highlight = h.on_hover_changed(false, t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(highlight.fade.to(), IDLE_OPACITY);
    }

    #[test]
    fn test_move_and_leave_drive_hover() {
        let (mut h, _rx) = handler();
        let settings = WidgetSettings::default();
        let now = Instant::now();

        assert!(h.on_pointer(PointerEvent::Move { x: 5, y: 5 }, &settings, now).is_some());
        assert!(h.is_hovering());
        assert!(h.on_pointer(PointerEvent::Leave, &settings, now).is_some());
        assert!(!h.is_hovering());
    }

    #[test]
    fn test_secondary_click_opens_menu_and_activate_reports() {
        let (mut h, rx) = handler();
        let mut settings = WidgetSettings::default();
        let now = Instant::now();

        h.on_pointer(
            PointerEvent::Down {
                x: 5,
                y: 5,
                button: PointerButton::Secondary,
            },
            &settings,
            now,
        );
        match rx.try_recv() {
            Ok(WidgetRequest::ShowContextMenu(entries)) => assert_eq!(entries.len(), 5),
            other => panic!("expected context menu, got {other:?}"),
        }

        h.activate(SettingToggle::RealtimeSuggestion, &mut settings);
        assert!(!settings.realtime_suggestion);
        match rx.try_recv() {
            Ok(WidgetRequest::SettingsChanged(s)) => assert!(!s.realtime_suggestion),
            other => panic!("expected settings change, got {other:?}"),
        }
    }
}

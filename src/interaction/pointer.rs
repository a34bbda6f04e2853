//! Pointer events and hit testing.

use crossterm::event::{self, MouseEventKind};

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left / primary button.
    Primary,
    /// Right / secondary button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A pointer event in widget-host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// X coordinate (column).
        x: u16,
        /// Y coordinate (row).
        y: u16,
        /// Button pressed.
        button: PointerButton,
    },
    /// Button released.
    Up {
        /// X coordinate (column).
        x: u16,
        /// Y coordinate (row).
        y: u16,
        /// Button released.
        button: PointerButton,
    },
    /// Pointer moved (with or without a button held).
    Move {
        /// X coordinate (column).
        x: u16,
        /// Y coordinate (row).
        y: u16,
    },
    /// Pointer left the host surface.
    Leave,
}

impl PointerEvent {
    /// Convert a crossterm mouse event.
    ///
    /// Scroll events have no meaning for the widget and yield `None`.
    pub fn from_crossterm(mouse: &event::MouseEvent) -> Option<Self> {
        let (x, y) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(button) => Some(Self::Down {
                x,
                y,
                button: Self::convert_button(button),
            }),
            MouseEventKind::Up(button) => Some(Self::Up {
                x,
                y,
                button: Self::convert_button(button),
            }),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Self::Move { x, y }),
            _ => None,
        }
    }

    const fn convert_button(button: event::MouseButton) -> PointerButton {
        match button {
            event::MouseButton::Left => PointerButton::Primary,
            event::MouseButton::Right => PointerButton::Secondary,
            event::MouseButton::Middle => PointerButton::Middle,
        }
    }
}

/// Bounding box of the widget. The widget itself is the circle (ellipse,
/// in cell space) inscribed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RingBounds {
    /// X coordinate (column) of the top-left corner.
    pub x: u16,
    /// Y coordinate (row) of the top-left corner.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl RingBounds {
    /// Create bounds.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the cell at `(x, y)` lies on the ring.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let rx = f32::from(self.width) / 2.0;
        let ry = f32::from(self.height) / 2.0;
        let dx = (f32::from(x) + 0.5 - f32::from(self.x)) - rx;
        let dy = (f32::from(y) + 0.5 - f32::from(self.y)) - ry;
        (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_from_crossterm() {
        assert_eq!(
            PointerEvent::from_crossterm(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(PointerEvent::Down {
                x: 3,
                y: 4,
                button: PointerButton::Primary
            })
        );
        assert_eq!(
            PointerEvent::from_crossterm(&mouse(MouseEventKind::Up(MouseButton::Right), 1, 2)),
            Some(PointerEvent::Up {
                x: 1,
                y: 2,
                button: PointerButton::Secondary
            })
        );
        assert_eq!(
            PointerEvent::from_crossterm(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)),
            Some(PointerEvent::Move { x: 5, y: 5 })
        );
        assert_eq!(
            PointerEvent::from_crossterm(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            None
        );
    }

    #[test]
    fn test_ring_hit_test() {
        let ring = RingBounds::new(10, 10, 8, 4);

        assert!(ring.contains(13, 11));
        assert!(ring.contains(14, 12));
        // Corners of the box are outside the circle
        assert!(!ring.contains(10, 10));
        assert!(!ring.contains(17, 13));
        // Outside the box entirely
        assert!(!ring.contains(5, 5));
        assert!(!RingBounds::default().contains(0, 0));
    }
}

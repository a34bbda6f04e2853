//! Message types for actor communication.
//!
//! These enums define the protocol between the widget actor, the signal
//! sources, the renderer and the panel controller.

use crate::interaction::{Highlight, MenuEntry, PointerEvent, SettingToggle, WidgetSettings};
use crate::signal::{ContentIdentity, Sequenced};
use crate::state::{Update, VisualState};

/// Messages sent to the widget actor.
#[derive(Debug, Clone)]
pub enum WidgetMessage {
    /// The engine's processing flag.
    Processing(Sequenced<bool>),

    /// The panel content identity.
    ContentIdentity(Sequenced<ContentIdentity>),

    /// The panel's chat-active flag.
    ChatActive(Sequenced<bool>),

    /// Raw pointer input from the host.
    Pointer(PointerEvent),

    /// The host's hover recognizer changed state.
    Hover(bool),

    /// The host's tap recognizer fired.
    Tap,

    /// A context menu item was chosen.
    ActivateMenuItem(SettingToggle),

    /// Tear the widget down.
    Teardown,
}

impl WidgetMessage {
    /// The state update carried by this message, if any.
    pub const fn as_update(&self) -> Option<Update> {
        match *self {
            Self::Processing(s) => Some(Update::Processing(s)),
            Self::ContentIdentity(s) => Some(Update::ContentIdentity(s)),
            Self::ChatActive(s) => Some(Update::ChatActive(s)),
            _ => None,
        }
    }
}

/// Updates sent to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderUpdate {
    /// New ring parameters.
    Ring(VisualState),

    /// New hover highlight.
    Highlight(Highlight),
}

/// Requests sent to the panel controller and the settings layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetRequest {
    /// Show or hide the suggestion panel.
    TogglePanel,

    /// Show the context menu with these entries.
    ShowContextMenu(Vec<MenuEntry>),

    /// A setting was toggled; persist the new settings.
    SettingsChanged(WidgetSettings),
}

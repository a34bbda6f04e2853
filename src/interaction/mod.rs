//! Interaction: pointer input, hover highlight, panel toggling and the
//! settings context menu.
//!
//! None of this touches the ring state. The handler only produces cosmetic
//! [`Highlight`] updates and [`WidgetRequest`](crate::WidgetRequest)s for
//! the panel controller and the settings layer.

mod handler;
mod pointer;
mod settings;

pub use handler::{Highlight, InteractionHandler, HOVER_OPACITY, IDLE_OPACITY};
pub use pointer::{PointerButton, PointerEvent, RingBounds};
pub use settings::{ContextMenu, MenuEntry, SettingToggle, WidgetSettings};

//! Actor Model: Message-passing concurrency for the widget.
//!
//! The widget state has a single owner, the widget thread. Everything else
//! talks to it through crossbeam channels:
//! - **Signal sources**: push processing / content notifications via a
//!   [`WidgetHandle`] from any thread
//! - **Driver threads**: push animation frames
//! - **Widget thread**: applies updates, reconciles, publishes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   WidgetMessage     ┌──────────────┐   RenderUpdate    ┌──────────────┐
//! │ Engine/Panel │ ─────────────────▶  │              │ ────────────────▶ │   Renderer   │
//! └──────────────┘                     │ Widget Thread│                   └──────────────┘
//!                                      │              │
//! ┌──────────────┐       Frame         │              │   WidgetRequest   ┌──────────────┐
//! │ Driver Thread│ ─────────────────▶  │              │ ────────────────▶ │Panel/Settings│
//! └──────────────┘                     └──────────────┘                   └──────────────┘
//! ```

mod messages;
mod widget;

pub use messages::{RenderUpdate, WidgetMessage, WidgetRequest};
pub use widget::{WidgetActor, WidgetHandle};

//! # Halo
//!
//! State synchronization and ring animation core for the floating status
//! widget of an AI code-completion assistant.
//!
//! The widget shows a ring. It breathes while the suggestion engine is
//! processing, fills when the suggestion panel has something to show and
//! empties otherwise. Two independent asynchronous signals drive it: the
//! engine's processing flag and the identity of the panel content.
//!
//! ## Core Concepts
//!
//! - **Single writer**: one thread (or one host UI context) owns all state
//! - **Edge-triggered retargets**: only flips of "processing" or "content
//!   present" move the ring; duplicates and same-presence replacements don't
//! - **Owned drivers**: every animation has an explicit driver that is
//!   stopped before the next one starts, including indefinite oscillations
//! - **Last write wins**: per-source sequence numbers discard stale updates
//!
//! ## Example
//!
//! ```rust,ignore
//! use halo::{Fingerprint, RenderUpdate, RingBounds, WidgetActor};
//!
//! let widget = WidgetActor::spawn_default(RingBounds::new(0, 0, 6, 3))?;
//! let handle = widget.handle();
//!
//! // From the engine's thread
//! handle.notify_processing(true);
//! // From the panel's thread
//! handle.notify_content_identity(Some(Fingerprint::of("fn main() {}")));
//!
//! for update in widget.drain_render() {
//!     if let RenderUpdate::Ring(state) = update {
//!         draw_ring(state.fill_progress, state.stroke_width);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod anim;
pub mod config;
pub mod error;
pub mod ffi;
pub mod interaction;
pub mod signal;
pub mod state;

// Re-exports for convenience
pub use actor::{RenderUpdate, WidgetActor, WidgetHandle, WidgetMessage, WidgetRequest};
pub use anim::{
    ease_in_out, Animation, AnimationController, AnimationStyle, DriverHandle, DriverRegistry,
    ManualScheduler, Scheduler, TickerScheduler,
};
pub use config::{RingGeometry, WidgetConfig, MIN_PROGRESS};
pub use error::{Result, WidgetError};
pub use interaction::{
    ContextMenu, Highlight, InteractionHandler, MenuEntry, PointerButton, PointerEvent,
    RingBounds, SettingToggle, WidgetSettings,
};
pub use signal::{ContentIdentity, Fingerprint};
pub use state::{Phase, VisualState, WidgetStateMachine};

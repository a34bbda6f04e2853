//! Widget state: the authoritative snapshot and the state machine that
//! turns its edges into ring animations.
//!
//! The machine has exactly one writer: whoever owns it (normally the widget
//! actor thread). Observers are notified synchronously on that same context
//! after every change of the published [`VisualState`].

mod machine;
mod observable;
mod snapshot;
mod visual;

pub use machine::{Update, WidgetStateMachine};
pub use observable::{Observable, SubscriptionId};
pub use snapshot::{Changes, Inputs, Phase, Snapshot};
pub use visual::VisualState;

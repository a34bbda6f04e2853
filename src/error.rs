//! Error types for the widget's edges.
//!
//! The state machine itself has no failure modes. Errors only arise where
//! the widget touches the OS (spawning threads) or talks to an actor that
//! has already shut down.

use thiserror::Error;

/// Errors raised while setting up or talking to the widget actor.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// The OS refused to spawn a thread.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Name of the thread that could not be spawned.
        name: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The widget actor has shut down and no longer accepts messages.
    #[error("widget actor has shut down")]
    Disconnected,
}

/// Result type alias using [`WidgetError`].
pub type Result<T> = std::result::Result<T, WidgetError>;

//! Inbound signals: content fingerprints and per-source sequencing.
//!
//! Two independent sources feed the widget:
//! - the processing flag of the suggestion engine
//! - the identity of the panel content, plus its chat-active flag
//!
//! Each notification carries a per-source sequence number so a stale value
//! delivered late can never overwrite a fresher one.

mod fingerprint;
mod sequence;

pub use fingerprint::{ContentIdentity, Fingerprint};
pub use sequence::{Sequenced, SequenceClock, SequenceGate, Source};

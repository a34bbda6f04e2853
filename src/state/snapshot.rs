//! Snapshot of the two inbound signals.

use crate::signal::{ContentIdentity, Fingerprint};
use bitflags::bitflags;

bitflags! {
    /// What a single update changed.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Changes: u8 {
        /// The processing flag flipped.
        const PROCESSING = 0b0000_0001;
        /// Content presence flipped.
        const PRESENCE = 0b0000_0010;
        /// The content fingerprint changed.
        const IDENTITY = 0b0000_0100;
        /// The chat-active flag flipped.
        const CHAT = 0b0000_1000;
    }
}

impl Changes {
    /// Whether the change is an edge the ring must react to.
    #[inline]
    pub const fn is_edge(self) -> bool {
        self.intersects(Self::PROCESSING.union(Self::PRESENCE))
    }
}

/// Which of the three display phases the widget is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not processing, nothing to show.
    Idle,
    /// Not processing, the panel has content.
    HasContent,
    /// The engine is processing (takes precedence over content).
    Processing,
}

/// The two booleans that drive the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Inputs {
    /// The engine is processing.
    pub processing: bool,
    /// The panel has suggestion content or an active chat.
    pub content_present: bool,
}

impl Inputs {
    /// The display phase implied by these inputs.
    pub const fn phase(self) -> Phase {
        if self.processing {
            Phase::Processing
        } else if self.content_present {
            Phase::HasContent
        } else {
            Phase::Idle
        }
    }
}

/// Latest admitted value of every inbound signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot {
    processing: bool,
    identity: ContentIdentity,
    chat_active: bool,
}

impl Snapshot {
    /// The engine's processing flag.
    #[inline]
    pub const fn processing(&self) -> bool {
        self.processing
    }

    /// Identity of the panel content.
    #[inline]
    pub const fn identity(&self) -> ContentIdentity {
        self.identity
    }

    /// Whether the panel has an active chat.
    #[inline]
    pub const fn chat_active(&self) -> bool {
        self.chat_active
    }

    /// Suggestion content present or chat active.
    #[inline]
    pub const fn content_present(&self) -> bool {
        self.identity.is_some() || self.chat_active
    }

    /// The ring inputs derived from this snapshot.
    pub const fn inputs(&self) -> Inputs {
        Inputs {
            processing: self.processing,
            content_present: self.content_present(),
        }
    }

    /// The display phase.
    pub const fn phase(&self) -> Phase {
        self.inputs().phase()
    }

    /// Record a processing flag.
    pub fn set_processing(&mut self, processing: bool) -> Changes {
        if self.processing == processing {
            return Changes::empty();
        }
        self.processing = processing;
        Changes::PROCESSING
    }

    /// Record a content identity.
    pub fn set_identity(&mut self, identity: ContentIdentity) -> Changes {
        if !Fingerprint::changed(&self.identity, &identity) {
            return Changes::empty();
        }
        let was_present = self.content_present();
        self.identity = identity;
        Changes::IDENTITY | self.presence_change(was_present)
    }

    /// Record the chat-active flag.
    pub fn set_chat_active(&mut self, chat_active: bool) -> Changes {
        if self.chat_active == chat_active {
            return Changes::empty();
        }
        let was_present = self.content_present();
        self.chat_active = chat_active;
        Changes::CHAT | self.presence_change(was_present)
    }

    fn presence_change(&self, was_present: bool) -> Changes {
        if was_present == self.content_present() {
            Changes::empty()
        } else {
            Changes::PRESENCE
        }
    }
}

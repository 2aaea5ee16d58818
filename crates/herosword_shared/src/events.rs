//! Presentation events.
//!
//! Every session transition returns the events it produced, so the caller can
//! drive alerts and animations without re-deriving what happened.

use serde::{Deserialize, Serialize};

use crate::amount::Mist;
use crate::ids::SwordId;

/// Event type discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A base sword entered the active slot
    Minted = 0,
    /// An enhancement attempt succeeded
    Enhanced = 1,
    /// The sword reached the next tier
    Evolved = 2,
    /// An enhancement attempt failed and the sword broke
    Destroyed = 3,
    /// The sword was sold
    Sold = 4,
    /// A snapshot was saved to the collection
    Saved = 5,
    /// A snapshot left the collection
    Removed = 6,
    /// The balance was re-read from its source
    BalanceReconciled = 7,
}

/// Things the player should be told about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A fresh base sword became active.
    Minted {
        /// The new sword.
        id: SwordId,
    },

    /// Enhancement succeeded within the tier.
    Enhanced {
        /// Sword that was enhanced.
        id: SwordId,
        /// Enhancement count before the attempt.
        from_count: u32,
        /// Enhancement count after the attempt (0 after an evolution).
        to_count: u32,
        /// Fee charged for the attempt.
        cost: Mist,
    },

    /// The sword evolved into the next tier.
    Evolved {
        /// Sword that evolved.
        id: SwordId,
        /// Tier before.
        from_tier: u32,
        /// Tier after.
        to_tier: u32,
        /// Display name before.
        from_name: String,
        /// Display name after.
        to_name: String,
    },

    /// The attempt failed and the sword is gone.
    Destroyed {
        /// Sword that broke.
        id: SwordId,
        /// Fee charged for the attempt.
        cost: Mist,
    },

    /// The sword was sold.
    Sold {
        /// Sword that was sold.
        id: SwordId,
        /// Amount credited.
        earned: Mist,
    },

    /// A snapshot entered the collection.
    Saved {
        /// Saved sword.
        id: SwordId,
    },

    /// A snapshot left the collection.
    Removed {
        /// Removed sword.
        id: SwordId,
    },

    /// The balance was re-fetched from the ledger.
    BalanceReconciled {
        /// Balance before the fetch.
        before: Mist,
        /// Balance reported by the ledger.
        after: Mist,
    },
}

impl SessionEvent {
    /// Returns the event type
    #[must_use]
    pub const fn kind(&self) -> SessionEventKind {
        match self {
            Self::Minted { .. } => SessionEventKind::Minted,
            Self::Enhanced { .. } => SessionEventKind::Enhanced,
            Self::Evolved { .. } => SessionEventKind::Evolved,
            Self::Destroyed { .. } => SessionEventKind::Destroyed,
            Self::Sold { .. } => SessionEventKind::Sold,
            Self::Saved { .. } => SessionEventKind::Saved,
            Self::Removed { .. } => SessionEventKind::Removed,
            Self::BalanceReconciled { .. } => SessionEventKind::BalanceReconciled,
        }
    }

    /// Returns the sword this event is about (if any)
    #[must_use]
    pub const fn sword(&self) -> Option<SwordId> {
        match self {
            Self::Minted { id }
            | Self::Enhanced { id, .. }
            | Self::Evolved { id, .. }
            | Self::Destroyed { id, .. }
            | Self::Sold { id, .. }
            | Self::Saved { id }
            | Self::Removed { id } => Some(*id),
            Self::BalanceReconciled { .. } => None,
        }
    }
}

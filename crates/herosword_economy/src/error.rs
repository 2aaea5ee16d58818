//! # Economy Error Types
//!
//! All errors that can occur in the progression core.
//!
//! A destroyed sword is NOT an error: it is a normal outcome of
//! an enhancement attempt and is reported through
//! [`crate::progression::Outcome::Failure`].

use herosword_shared::{Mist, SwordId};
use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// The balance does not cover the enhancement fee.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// The fee for the attempt.
        required: Mist,
        /// The spendable balance.
        available: Mist,
    },

    /// The sword is already at the per-tier enhancement cap.
    ///
    /// Unreachable while the sword invariants hold. Seeing it means a logic
    /// error upstream, not a player mistake.
    #[error("enhancement cap reached at tier {tier} with count {enhancement_count}")]
    MaxTierReached {
        /// Tier of the offending sword.
        tier: u32,
        /// Its enhancement count.
        enhancement_count: u32,
    },

    /// A sword record violates the entity invariants.
    #[error("invalid sword {id}: {reason}")]
    InvalidSword {
        /// The offending sword.
        id: SwordId,
        /// Which invariant broke.
        reason: String,
    },

    /// Arithmetic overflow in a currency calculation.
    #[error("arithmetic overflow in economic calculation")]
    ArithmeticOverflow,

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The collection file could not be read or written.
    #[error("collection persistence failed: {0}")]
    Persistence(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

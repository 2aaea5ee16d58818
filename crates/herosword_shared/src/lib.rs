//! # Hero's Sword Shared
//!
//! Common types used by the economy core, the ledger bridge and the session
//! layer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - an async runtime
//! - a ledger RPC client
//!
//! If you need either, put it in `herosword_blockchain`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod amount;
pub mod constants;
pub mod events;
pub mod ids;

pub use amount::Mist;
pub use constants::{
    BASE_ATTACK_POWER, BASE_MAGIC_POWER, BASE_SUCCESS_RATE, BASE_VALUE, MAX_ENHANCEMENTS_PER_TIER,
    MIN_SUCCESS_RATE, SIMULATED_STARTING_BALANCE, SUCCESS_RATE_DECAY,
};
pub use events::{SessionEvent, SessionEventKind};
pub use ids::{ObjectId, ParseSwordIdError, SwordId};

//! # Hero's Sword Ledger Bridge
//!
//! Ledger-mode collaborators for the progression engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   MoveCall    ┌─────────────────┐
//! │  LedgerEngine   │ ───────────▶  │  SwordLedger    │ ──▶ Sui package
//! │  (herosword)    │               │  (transport)    │
//! └────────┬────────┘               └────────┬────────┘
//!          │        owned HeroSwords         │
//!          ◀─────────── + balance ───────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  OwnedSwords    │  delta → Success / Failure / Sold
//! └─────────────────┘
//! ```
//!
//! The engine never edits local state before a call settles. After every
//! confirmed call it re-reads the wallet and derives the transition from the
//! [`SyncDelta`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod contracts;
pub mod error;
pub mod ledger;
pub mod state;

pub use contracts::{hero_sword_type, CallArg, HeroSword, MoveCall, MoveFields, MoveFunction};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{Receipt, SimulatedChain, SwordLedger};
pub use state::{OwnedSwords, SyncDelta};

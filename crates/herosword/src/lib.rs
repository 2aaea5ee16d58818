//! # Hero's Sword
//!
//! Session engine for the sword upgrade game. A player holds one active
//! sword, pays to enhance it, watches it evolve every third success, and
//! loses it on a failed roll. Swords can be sold for their value or saved
//! to a local collection.
//!
//! Two engines share one capability, [`SwordEngine`]:
//!
//! - [`SimulatedEngine`] rolls locally against a local balance
//! - [`LedgerEngine`] sends every state change to the sword contract and
//!   reads the result back
//!
//! ## Example
//!
//! ```rust
//! use herosword::SimulatedEngine;
//! use herosword_economy::{EngineConfig, FixedRoll, InMemoryCollectionStore};
//!
//! let (mut engine, session) = SimulatedEngine::start_with_roll(
//!     &EngineConfig::default(),
//!     InMemoryCollectionStore::new(),
//!     FixedRoll::SUCCESS,
//! )
//! .unwrap();
//!
//! let step = engine.enhance_now(&session).unwrap();
//! assert_eq!(step.session.active().unwrap().enhancement_count(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod session;

pub use engine::{LedgerEngine, SimulatedEngine, SwordEngine, Transition};
pub use error::{EngineError, EngineResult};
pub use session::{Session, SessionSummary};

//! # Hero's Sword Economy
//!
//! Pure Rust progression logic for the sword upgrade game.
//!
//! ## Design Principles
//!
//! 1. **Integer currency** - All amounts are whole MIST, never floats
//! 2. **Immutable transitions** - Every operation returns new values
//! 3. **Injected randomness** - Rolls come from a [`PercentRoll`] source
//! 4. **External configuration** - Session settings live in TOML
//!
//! ## Example
//!
//! ```rust
//! use herosword_economy::{Balance, FixedRoll, LocalIdAllocator, Outcome, Progression};
//! use herosword_shared::Mist;
//!
//! let progression = Progression::default();
//! let mut ids = LocalIdAllocator::new();
//! let sword = progression.base_sword(&mut ids);
//! let balance = Balance::simulated(Mist::from_sui(1000).unwrap_or(Mist::ZERO));
//!
//! let step = progression
//!     .attempt_enhancement(&sword, balance, &mut FixedRoll::SUCCESS, &mut ids)
//!     .unwrap();
//! assert_eq!(step.outcome, Outcome::Success { evolved: false });
//! assert_eq!(step.sword.enhancement_count(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod balance;
pub mod collection;
pub mod config;
pub mod error;
pub mod evolution;
pub mod policy;
pub mod progression;
pub mod roll;
pub mod store;
pub mod sword;

pub use balance::{Balance, BalanceSource};
pub use collection::{Collection, SnapshotKey};
pub use config::{EngineConfig, ExecutionMode, LedgerSettings, Network};
pub use error::{EconomyError, EconomyResult};
pub use evolution::{tier_info, Element, TierInfo, TypeClass, EVOLUTION_TABLE, MAX_DEFINED_TIER};
pub use policy::{enhancement_cost, next_success_rate};
pub use progression::{Enhancement, Outcome, Progression, Sale};
pub use roll::{FixedRoll, PercentRoll, ScriptedRoll, SeededRoll};
pub use store::{CollectionStore, InMemoryCollectionStore, TomlCollectionFile};
pub use sword::{BaseStats, LocalIdAllocator, Sword, SwordParts};

//! # Progression & Network Constants
//!
//! Production values for the Hero's Sword economy and ledger deployment.
//!
//! **CRITICAL:** These values are baked into the client binary.
//! Changes require a client rebuild.

use alloy_primitives::b256;

use crate::amount::Mist;
use crate::ids::ObjectId;

// =============================================================================
// PROGRESSION
// =============================================================================

/// Successful enhancements needed within a tier before the sword evolves.
pub const MAX_ENHANCEMENTS_PER_TIER: u32 = 3;

/// Success rate (percent) of a freshly minted or freshly evolved sword.
pub const BASE_SUCCESS_RATE: u8 = 90;

/// The success rate never decays below this floor (percent).
pub const MIN_SUCCESS_RATE: u8 = 5;

/// Percentage points lost after every successful, non-evolving enhancement.
pub const SUCCESS_RATE_DECAY: u8 = 2;

/// Attack power of a base sword.
pub const BASE_ATTACK_POWER: u32 = 10;

/// Magic power of a base sword.
pub const BASE_MAGIC_POWER: u32 = 5;

/// Sale value of a base sword (1 SUI).
pub const BASE_VALUE: Mist = Mist::new(1_000_000_000);

// =============================================================================
// ECONOMY
// =============================================================================

/// Enhancement cost bands: `(exclusive upper bound on enhancement count, cost)`.
///
/// Counts at or above the last bound pay [`COST_CEILING`].
pub const COST_BANDS: [(u32, Mist); 4] = [
    (10, Mist::new(1_000_000)),   // 0.001 SUI
    (50, Mist::new(2_000_000)),   // 0.002 SUI
    (100, Mist::new(5_000_000)),  // 0.005 SUI
    (200, Mist::new(10_000_000)), // 0.01 SUI
];

/// Cost for enhancement counts beyond the last band (0.02 SUI).
pub const COST_CEILING: Mist = Mist::new(20_000_000);

/// Play money granted when a simulated session starts (1000 SUI).
pub const SIMULATED_STARTING_BALANCE: Mist = Mist::new(1_000_000_000_000);

// =============================================================================
// LEDGER DEPLOYMENT - SUI
// =============================================================================

/// Sword package deployed on Sui testnet.
pub const TESTNET_PACKAGE_ID: ObjectId =
    b256!("3631beea388033194e412f4279cf4954998ea27a7cafd4a4a760baf7c2e7f220");

/// Sword package on Sui mainnet.
///
/// **NOTE:** Not deployed yet. Ledger mode refuses to start on mainnet
/// until this is set.
pub const MAINNET_PACKAGE_ID: Option<ObjectId> = None;

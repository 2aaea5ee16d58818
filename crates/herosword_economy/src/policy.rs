//! # Cost & Rate Policy
//!
//! Pure functions. No state, no side effects, total over their inputs.

use herosword_shared::constants::{COST_BANDS, COST_CEILING};
use herosword_shared::{Mist, MIN_SUCCESS_RATE, SUCCESS_RATE_DECAY};

/// Fee for an enhancement attempt at the given enhancement count.
///
/// A five-band step function:
///
/// | count       | cost (MIST)  |
/// |-------------|--------------|
/// | `< 10`      | 1_000_000    |
/// | `< 50`      | 2_000_000    |
/// | `< 100`     | 5_000_000    |
/// | `< 200`     | 10_000_000   |
/// | otherwise   | 20_000_000   |
#[inline]
#[must_use]
pub fn enhancement_cost(enhancement_count: u32) -> Mist {
    COST_BANDS
        .iter()
        .find(|(bound, _)| enhancement_count < *bound)
        .map_or(COST_CEILING, |(_, cost)| *cost)
}

/// Success rate after a successful, non-evolving enhancement.
///
/// Returns `max(5, current - 2)`. Never applied after a failure or an
/// evolution (evolution resets to the base rate instead).
#[inline]
#[must_use]
pub const fn next_success_rate(current: u8) -> u8 {
    let decayed = current.saturating_sub(SUCCESS_RATE_DECAY);
    if decayed < MIN_SUCCESS_RATE {
        MIN_SUCCESS_RATE
    } else {
        decayed
    }
}

//! # Enhancement Rolls
//!
//! The progression machine only needs one thing from randomness: a value
//! uniformly distributed over `0..100`. Production sessions draw it from
//! ChaCha8, tests and replays feed it from a script.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Exclusive upper bound of a roll.
pub const ROLL_RANGE: u8 = 100;

/// Source of enhancement rolls.
pub trait PercentRoll {
    /// Returns a value in `0..100`.
    fn roll(&mut self) -> u8;
}

/// ChaCha8-backed roll source.
#[derive(Clone, Debug)]
pub struct SeededRoll {
    rng: ChaCha8Rng,
}

impl SeededRoll {
    /// Deterministic roll sequence for a given seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl PercentRoll for SeededRoll {
    #[inline]
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(0..ROLL_RANGE)
    }
}

/// Always rolls the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedRoll(pub u8);

impl FixedRoll {
    /// Beats every legal success rate.
    pub const SUCCESS: Self = Self(0);
    /// Loses to every legal success rate.
    pub const FAILURE: Self = Self(ROLL_RANGE - 1);
}

impl PercentRoll for FixedRoll {
    #[inline]
    fn roll(&mut self) -> u8 {
        self.0.min(ROLL_RANGE - 1)
    }
}

/// Replays a fixed script of rolls, cycling when it runs out.
///
/// An empty script always rolls 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRoll {
    script: VecDeque<u8>,
}

impl ScriptedRoll {
    /// Creates a script.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: rolls.into_iter().collect(),
        }
    }
}

impl PercentRoll for ScriptedRoll {
    fn roll(&mut self) -> u8 {
        match self.script.pop_front() {
            Some(value) => {
                self.script.push_back(value);
                value.min(ROLL_RANGE - 1)
            }
            None => 0,
        }
    }
}

impl<R: PercentRoll + ?Sized> PercentRoll for &mut R {
    #[inline]
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rolls_are_in_range() {
        let mut roll = SeededRoll::from_seed(7);
        for _ in 0..10_000 {
            assert!(roll.roll() < ROLL_RANGE);
        }
    }

    #[test]
    fn test_seeded_rolls_are_deterministic() {
        let mut a = SeededRoll::from_seed(42);
        let mut b = SeededRoll::from_seed(42);
        let first: Vec<u8> = (0..32).map(|_| a.roll()).collect();
        let second: Vec<u8> = (0..32).map(|_| b.roll()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeded_rolls_cover_the_range() {
        let mut roll = SeededRoll::from_seed(1);
        let mut seen = [false; ROLL_RANGE as usize];
        for _ in 0..20_000 {
            seen[roll.roll() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_scripted_cycles() {
        let mut roll = ScriptedRoll::new([1, 2, 3]);
        let rolls: Vec<u8> = (0..7).map(|_| roll.roll()).collect();
        assert_eq!(rolls, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert_eq!(FixedRoll(250).roll(), 99);
        assert_eq!(ScriptedRoll::new([200]).roll(), 99);
        assert_eq!(ScriptedRoll::default().roll(), 0);
    }
}

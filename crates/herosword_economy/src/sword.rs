//! # The Sword Entity
//!
//! A sword stores only what can change independently: tier, enhancement
//! progress, stats and value. Name, artwork and type class are read through
//! the evolution table on demand, so two swords of the same tier always look
//! identical.

use herosword_shared::{
    Mist, SwordId, BASE_ATTACK_POWER, BASE_MAGIC_POWER, BASE_SUCCESS_RATE, BASE_VALUE,
    MAX_ENHANCEMENTS_PER_TIER, MIN_SUCCESS_RATE,
};
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::evolution::{tier_info, TierInfo, TypeClass};

/// Stats of a freshly minted sword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    /// Starting attack power.
    pub attack_power: u32,
    /// Starting magic power.
    pub magic_power: u32,
    /// Starting success rate (percent, 5..=90).
    pub success_rate: u8,
    /// Starting sale value.
    pub value: Mist,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            attack_power: BASE_ATTACK_POWER,
            magic_power: BASE_MAGIC_POWER,
            success_rate: BASE_SUCCESS_RATE,
            value: BASE_VALUE,
        }
    }
}

/// Raw, unvalidated sword fields.
///
/// Used when a sword comes from outside the engine (collection file, ledger
/// payload). Convert with `Sword::try_from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwordParts {
    /// Identifier.
    pub id: SwordId,
    /// Evolution stage, starting at 1.
    pub tier: u32,
    /// Successful enhancements within the current tier.
    pub enhancement_count: u32,
    /// Attack power.
    pub attack_power: u32,
    /// Magic power.
    pub magic_power: u32,
    /// Success chance of the next attempt, in percent.
    pub success_rate: u8,
    /// Sale price.
    pub value: Mist,
}

/// One upgradeable sword.
///
/// Invariants (checked on every construction path):
/// - `tier >= 1`
/// - `enhancement_count < MAX_ENHANCEMENTS_PER_TIER`
/// - `success_rate` in `MIN_SUCCESS_RATE..=BASE_SUCCESS_RATE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SwordParts", into = "SwordParts")]
pub struct Sword {
    id: SwordId,
    tier: u32,
    enhancement_count: u32,
    attack_power: u32,
    magic_power: u32,
    success_rate: u8,
    value: Mist,
}

impl Sword {
    /// Creates a tier-1 sword with base stats.
    #[must_use]
    pub const fn base(id: SwordId, stats: &BaseStats) -> Self {
        Self {
            id,
            tier: 1,
            enhancement_count: 0,
            attack_power: stats.attack_power,
            magic_power: stats.magic_power,
            success_rate: stats.success_rate,
            value: stats.value,
        }
    }

    /// Identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> SwordId {
        self.id
    }

    /// Evolution stage.
    #[inline]
    #[must_use]
    pub const fn tier(&self) -> u32 {
        self.tier
    }

    /// Successful enhancements within the current tier.
    #[inline]
    #[must_use]
    pub const fn enhancement_count(&self) -> u32 {
        self.enhancement_count
    }

    /// Attack power.
    #[inline]
    #[must_use]
    pub const fn attack_power(&self) -> u32 {
        self.attack_power
    }

    /// Magic power.
    #[inline]
    #[must_use]
    pub const fn magic_power(&self) -> u32 {
        self.magic_power
    }

    /// Success chance of the next attempt, in percent.
    #[inline]
    #[must_use]
    pub const fn success_rate(&self) -> u8 {
        self.success_rate
    }

    /// Sale price.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Mist {
        self.value
    }

    /// Table entry for this sword's tier.
    #[inline]
    #[must_use]
    pub const fn tier_info(&self) -> TierInfo {
        tier_info(self.tier)
    }

    /// Name shown to the player.
    #[inline]
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.tier_info().display_name
    }

    /// Artwork path.
    #[inline]
    #[must_use]
    pub const fn artwork_ref(&self) -> &'static str {
        self.tier_info().artwork_ref
    }

    /// Type classification.
    #[inline]
    #[must_use]
    pub const fn type_class(&self) -> TypeClass {
        self.tier_info().type_class
    }

    /// Returns the raw fields.
    #[must_use]
    pub const fn parts(&self) -> SwordParts {
        SwordParts {
            id: self.id,
            tier: self.tier,
            enhancement_count: self.enhancement_count,
            attack_power: self.attack_power,
            magic_power: self.magic_power,
            success_rate: self.success_rate,
            value: self.value,
        }
    }

    /// Copy with enhancement progress and stats replaced.
    ///
    /// Crate-internal: only the progression machine moves a sword forward.
    pub(crate) const fn advanced(
        &self,
        tier: u32,
        enhancement_count: u32,
        success_rate: u8,
        value: Mist,
    ) -> Self {
        Self {
            id: self.id,
            tier,
            enhancement_count,
            attack_power: self.attack_power.saturating_add(1),
            magic_power: self.magic_power.saturating_add(1),
            success_rate,
            value,
        }
    }
}

impl TryFrom<SwordParts> for Sword {
    type Error = EconomyError;

    fn try_from(parts: SwordParts) -> EconomyResult<Self> {
        let invalid = |reason: String| EconomyError::InvalidSword {
            id: parts.id,
            reason,
        };

        if parts.tier == 0 {
            return Err(invalid("tier must be at least 1".to_string()));
        }
        if parts.enhancement_count >= MAX_ENHANCEMENTS_PER_TIER {
            return Err(invalid(format!(
                "enhancement count {} not below cap {MAX_ENHANCEMENTS_PER_TIER}",
                parts.enhancement_count
            )));
        }
        if !(MIN_SUCCESS_RATE..=BASE_SUCCESS_RATE).contains(&parts.success_rate) {
            return Err(invalid(format!(
                "success rate {} outside {MIN_SUCCESS_RATE}..={BASE_SUCCESS_RATE}",
                parts.success_rate
            )));
        }

        Ok(Self {
            id: parts.id,
            tier: parts.tier,
            enhancement_count: parts.enhancement_count,
            attack_power: parts.attack_power,
            magic_power: parts.magic_power,
            success_rate: parts.success_rate,
            value: parts.value,
        })
    }
}

impl From<Sword> for SwordParts {
    fn from(sword: Sword) -> Self {
        sword.parts()
    }
}

/// Hands out simulated-mode ids.
///
/// Ids only grow, so a fresh id never matches one already in the collection
/// or the active slot it was seeded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalIdAllocator {
    next: u64,
}

impl LocalIdAllocator {
    /// Starts counting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Starts above every local id in `existing`.
    #[must_use]
    pub fn after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = SwordId>,
    {
        let highest = existing
            .into_iter()
            .filter_map(SwordId::local)
            .max()
            .unwrap_or(0);
        Self {
            next: highest.saturating_add(1),
        }
    }

    /// Allocates the next id.
    pub fn allocate(&mut self) -> SwordId {
        let id = SwordId::Local(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

impl Default for LocalIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> SwordParts {
        Sword::base(SwordId::Local(1), &BaseStats::default()).parts()
    }

    #[test]
    fn test_base_sword() {
        let sword = Sword::base(SwordId::Local(1), &BaseStats::default());
        assert_eq!(sword.tier(), 1);
        assert_eq!(sword.enhancement_count(), 0);
        assert_eq!(sword.attack_power(), 10);
        assert_eq!(sword.magic_power(), 5);
        assert_eq!(sword.success_rate(), 90);
        assert_eq!(sword.value(), Mist::new(1_000_000_000));
        assert_eq!(sword.display_name(), "a piece of iron");
    }

    #[test]
    fn test_display_is_function_of_tier() {
        let a = Sword::try_from(SwordParts {
            tier: 7,
            attack_power: 40,
            ..parts()
        })
        .unwrap();
        let b = Sword::try_from(SwordParts {
            id: SwordId::Local(99),
            tier: 7,
            enhancement_count: 2,
            success_rate: 5,
            ..parts()
        })
        .unwrap();
        assert_eq!(a.display_name(), b.display_name());
        assert_eq!(a.artwork_ref(), b.artwork_ref());
        assert_eq!(a.type_class(), b.type_class());
    }

    #[test]
    fn test_rejects_broken_invariants() {
        assert!(Sword::try_from(SwordParts { tier: 0, ..parts() }).is_err());
        assert!(Sword::try_from(SwordParts {
            enhancement_count: MAX_ENHANCEMENTS_PER_TIER,
            ..parts()
        })
        .is_err());
        assert!(Sword::try_from(SwordParts {
            success_rate: 4,
            ..parts()
        })
        .is_err());
        assert!(Sword::try_from(SwordParts {
            success_rate: 91,
            ..parts()
        })
        .is_err());
    }

    #[test]
    fn test_local_ids_skip_existing() {
        let existing = [SwordId::Local(3), SwordId::Local(11), SwordId::Local(5)];
        let mut ids = LocalIdAllocator::after(existing);
        assert_eq!(ids.allocate(), SwordId::Local(12));
        assert_eq!(ids.allocate(), SwordId::Local(13));
    }

    #[test]
    fn test_local_ids_start_at_one() {
        let mut ids = LocalIdAllocator::new();
        assert_eq!(ids.allocate(), SwordId::Local(1));
        let mut ids = LocalIdAllocator::after(std::iter::empty());
        assert_eq!(ids.allocate(), SwordId::Local(1));
    }
}

//! # Progression State Machine
//!
//! Applies enhancement attempts and sales to a single sword.
//!
//! ```text
//!            success (count + 1 < 3)
//!          ┌───────────────────────┐
//!          ▼                       │
//!       Active ──── success (count + 1 == 3) ───▶ Evolved ──▶ Active (tier + 1)
//!          │
//!          └──── failure ───▶ Destroyed ──▶ Active (fresh tier-1 sword)
//! ```
//!
//! Every transition is a pure function of its inputs plus one roll. Nothing
//! is mutated in place: callers get a new sword and a new balance back and
//! keep the old ones if the call errors.

use herosword_shared::{Mist, SwordId, BASE_SUCCESS_RATE, MAX_ENHANCEMENTS_PER_TIER};
use tracing::{debug, error};

use crate::balance::Balance;
use crate::error::{EconomyError, EconomyResult};
use crate::policy::{enhancement_cost, next_success_rate};
use crate::roll::PercentRoll;
use crate::sword::{BaseStats, LocalIdAllocator, Sword};

/// Tagged result of an enhancement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The roll beat the success rate.
    Success {
        /// The sword moved up a tier.
        evolved: bool,
    },
    /// The sword was destroyed.
    Failure,
}

impl Outcome {
    /// Returns true for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true for an evolving success.
    #[must_use]
    pub const fn evolved(self) -> bool {
        matches!(self, Self::Success { evolved: true })
    }
}

/// Everything an enhancement attempt produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enhancement {
    /// The sword that now occupies the active slot.
    pub sword: Sword,
    /// Balance after the fee.
    pub balance: Balance,
    /// What happened.
    pub outcome: Outcome,
    /// Fee charged for the attempt.
    pub cost: Mist,
    /// Id of the destroyed sword, to be purged from the collection.
    pub destroyed: Option<SwordId>,
}

/// Result of selling a sword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sale {
    /// Balance after the credit.
    pub balance: Balance,
    /// Id to drop from the active slot and the collection.
    pub removed: SwordId,
    /// Amount credited.
    pub earned: Mist,
}

/// The rules engine. Holds only the stats new swords are minted with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progression {
    base: BaseStats,
}

impl Progression {
    /// Creates a machine minting swords with `base` stats.
    #[must_use]
    pub const fn new(base: BaseStats) -> Self {
        Self { base }
    }

    /// A fresh tier-1 sword.
    #[must_use]
    pub fn base_sword(&self, ids: &mut LocalIdAllocator) -> Sword {
        Sword::base(ids.allocate(), &self.base)
    }

    /// Attempts one enhancement.
    ///
    /// The fee is charged whether or not the roll succeeds.
    ///
    /// # Errors
    ///
    /// - `MaxTierReached` if the sword is already at the per-tier cap.
    /// - `InsufficientFunds` if the balance does not cover the fee.
    ///
    /// Neither consumes a roll or allocates an id.
    pub fn attempt_enhancement<R: PercentRoll + ?Sized>(
        &self,
        sword: &Sword,
        balance: Balance,
        roll: &mut R,
        ids: &mut LocalIdAllocator,
    ) -> EconomyResult<Enhancement> {
        if sword.enhancement_count() >= MAX_ENHANCEMENTS_PER_TIER {
            error!(
                sword = %sword.id(),
                tier = sword.tier(),
                enhancement_count = sword.enhancement_count(),
                "Sword at enhancement cap without evolving"
            );
            return Err(EconomyError::MaxTierReached {
                tier: sword.tier(),
                enhancement_count: sword.enhancement_count(),
            });
        }

        let cost = enhancement_cost(sword.enhancement_count());
        let balance = balance.debit(cost)?;
        let rolled = roll.roll();

        if rolled < sword.success_rate() {
            let next = Self::enhanced(sword, cost)?;
            let evolved = next.tier() > sword.tier();
            debug!(
                sword = %sword.id(),
                rolled,
                rate = sword.success_rate(),
                tier = next.tier(),
                enhancement_count = next.enhancement_count(),
                evolved,
                "Enhancement succeeded"
            );
            Ok(Enhancement {
                sword: next,
                balance,
                outcome: Outcome::Success { evolved },
                cost,
                destroyed: None,
            })
        } else {
            let replacement = self.base_sword(ids);
            debug!(
                sword = %sword.id(),
                rolled,
                rate = sword.success_rate(),
                replacement = %replacement.id(),
                "Enhancement failed, sword destroyed"
            );
            Ok(Enhancement {
                sword: replacement,
                balance,
                outcome: Outcome::Failure,
                cost,
                destroyed: Some(sword.id()),
            })
        }
    }

    fn enhanced(sword: &Sword, cost: Mist) -> EconomyResult<Sword> {
        let value = sword
            .value()
            .checked_add(cost.half())
            .ok_or(EconomyError::ArithmeticOverflow)?;
        let count = sword.enhancement_count() + 1;

        if count >= MAX_ENHANCEMENTS_PER_TIER {
            let tier = sword
                .tier()
                .checked_add(1)
                .ok_or(EconomyError::ArithmeticOverflow)?;
            Ok(sword.advanced(tier, 0, BASE_SUCCESS_RATE, value))
        } else {
            Ok(sword.advanced(
                sword.tier(),
                count,
                next_success_rate(sword.success_rate()),
                value,
            ))
        }
    }

    /// Sells a sword for its value.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the credit does not fit.
    pub fn sell(&self, sword: &Sword, balance: Balance) -> EconomyResult<Sale> {
        let balance = balance.credit(sword.value())?;
        debug!(sword = %sword.id(), earned = %sword.value(), "Sword sold");
        Ok(Sale {
            balance,
            removed: sword.id(),
            earned: sword.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{FixedRoll, ScriptedRoll};
    use crate::sword::SwordParts;

    fn setup() -> (Progression, LocalIdAllocator, Sword, Balance) {
        let progression = Progression::default();
        let mut ids = LocalIdAllocator::new();
        let sword = progression.base_sword(&mut ids);
        let balance = Balance::simulated(Mist::new(1_000_000_000_000));
        (progression, ids, sword, balance)
    }

    #[test]
    fn test_three_successes_evolve() {
        let (progression, mut ids, mut sword, mut balance) = setup();
        let start = balance.amount();
        let mut roll = FixedRoll::SUCCESS;

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let step = progression
                .attempt_enhancement(&sword, balance, &mut roll, &mut ids)
                .unwrap();
            sword = step.sword;
            balance = step.balance;
            outcomes.push(step.outcome);
        }

        assert_eq!(
            outcomes,
            vec![
                Outcome::Success { evolved: false },
                Outcome::Success { evolved: false },
                Outcome::Success { evolved: true },
            ]
        );
        assert_eq!(sword.tier(), 2);
        assert_eq!(sword.enhancement_count(), 0);
        assert_eq!(sword.success_rate(), 90);
        assert_eq!(sword.attack_power(), 13);
        assert_eq!(sword.magic_power(), 8);
        assert_eq!(sword.value(), Mist::new(1_000_000_000 + 3 * 500_000));
        assert_eq!(sword.display_name(), "knife");
        assert_eq!(sword.id(), SwordId::Local(1));
        assert_eq!(
            start.checked_sub(balance.amount()),
            Some(Mist::new(3 * 1_000_000))
        );
    }

    #[test]
    fn test_success_without_evolution_keeps_tier() {
        let (progression, mut ids, sword, balance) = setup();
        let step = progression
            .attempt_enhancement(&sword, balance, &mut FixedRoll::SUCCESS, &mut ids)
            .unwrap();
        assert_eq!(step.outcome, Outcome::Success { evolved: false });
        assert_eq!(step.sword.tier(), sword.tier());
        assert_eq!(step.sword.display_name(), sword.display_name());
        assert_eq!(step.sword.artwork_ref(), sword.artwork_ref());
        assert_eq!(step.sword.enhancement_count(), 1);
        assert_eq!(step.sword.success_rate(), 88);
    }

    #[test]
    fn test_evolution_resets_floor_rate() {
        let (progression, mut ids, _, balance) = setup();
        let sword = Sword::try_from(SwordParts {
            id: SwordId::Local(50),
            tier: 4,
            enhancement_count: 2,
            attack_power: 30,
            magic_power: 25,
            success_rate: 5,
            value: Mist::new(2_000_000_000),
        })
        .unwrap();

        let step = progression
            .attempt_enhancement(&sword, balance, &mut FixedRoll::SUCCESS, &mut ids)
            .unwrap();
        assert!(step.outcome.evolved());
        assert_eq!(step.sword.tier(), 5);
        assert_eq!(step.sword.enhancement_count(), 0);
        assert_eq!(step.sword.success_rate(), 90);
        assert_eq!(step.sword.type_class().0, 1);
    }

    #[test]
    fn test_failure_destroys_and_replaces() {
        let (progression, mut ids, sword, balance) = setup();
        let step = progression
            .attempt_enhancement(&sword, balance, &mut FixedRoll::FAILURE, &mut ids)
            .unwrap();

        assert_eq!(step.outcome, Outcome::Failure);
        assert_eq!(step.destroyed, Some(sword.id()));
        assert_ne!(step.sword.id(), sword.id());
        assert_eq!(step.sword.tier(), 1);
        assert_eq!(step.sword.enhancement_count(), 0);
        assert_eq!(step.sword.attack_power(), 10);
        assert_eq!(step.sword.magic_power(), 5);
        assert_eq!(step.sword.success_rate(), 90);
        assert_eq!(
            step.balance.amount(),
            Mist::new(1_000_000_000_000 - 1_000_000)
        );
    }

    #[test]
    fn test_roll_boundary() {
        let (progression, mut ids, sword, balance) = setup();
        let mut roll = ScriptedRoll::new([89, 90]);

        let hit = progression
            .attempt_enhancement(&sword, balance, &mut roll, &mut ids)
            .unwrap();
        assert!(hit.outcome.is_success());

        let miss = progression
            .attempt_enhancement(&sword, balance, &mut roll, &mut ids)
            .unwrap();
        assert_eq!(miss.outcome, Outcome::Failure);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let (progression, mut ids, sword, _) = setup();
        let poor = Balance::simulated(Mist::new(999_999));
        let before = ids;
        let mut roll = ScriptedRoll::new([0]);

        let result = progression.attempt_enhancement(&sword, poor, &mut roll, &mut ids);
        assert_eq!(
            result,
            Err(EconomyError::InsufficientFunds {
                required: Mist::new(1_000_000),
                available: Mist::new(999_999),
            })
        );
        assert_eq!(ids, before);
        assert_eq!(poor.amount(), Mist::new(999_999));
    }

    #[test]
    fn test_sell_credits_value() {
        let (progression, _, _, balance) = setup();
        let sword = Sword::try_from(SwordParts {
            value: Mist::new(100_000_000),
            ..Sword::base(SwordId::Local(9), &BaseStats::default()).parts()
        })
        .unwrap();

        let sale = progression.sell(&sword, balance).unwrap();
        assert_eq!(sale.removed, SwordId::Local(9));
        assert_eq!(sale.earned, Mist::new(100_000_000));
        assert_eq!(
            sale.balance.amount().checked_sub(balance.amount()),
            Some(Mist::new(100_000_000))
        );
    }

    #[test]
    fn test_sell_overflow() {
        let (progression, _, sword, _) = setup();
        let rich = Balance::simulated(Mist::MAX);
        assert_eq!(
            progression.sell(&sword, rich),
            Err(EconomyError::ArithmeticOverflow)
        );
    }
}

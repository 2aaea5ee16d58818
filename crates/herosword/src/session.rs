//! # Session Context
//!
//! Everything a player's session holds: the active sword, the balance and
//! the saved collection. Owned by the caller and replaced, never edited, by
//! each engine transition.

use std::fmt;

use herosword_economy::{enhancement_cost, Balance, Collection, ExecutionMode, Sword};
use herosword_shared::Mist;

use crate::error::{EngineError, EngineResult};

/// One player's session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    mode: ExecutionMode,
    active: Option<Sword>,
    balance: Balance,
    collection: Collection,
}

impl Session {
    /// Assembles a session.
    #[must_use]
    pub const fn new(
        mode: ExecutionMode,
        active: Option<Sword>,
        balance: Balance,
        collection: Collection,
    ) -> Self {
        Self {
            mode,
            active,
            balance,
            collection,
        }
    }

    /// Execution mode chosen at start.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// The equipped sword, if any.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> Option<&Sword> {
        self.active.as_ref()
    }

    /// The equipped sword, or `NoActiveSword`.
    pub fn require_active(&self) -> EngineResult<&Sword> {
        self.active.as_ref().ok_or(EngineError::NoActiveSword)
    }

    /// Current balance.
    #[inline]
    #[must_use]
    pub const fn balance(&self) -> Balance {
        self.balance
    }

    /// Saved swords.
    #[inline]
    #[must_use]
    pub const fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Copy with the active slot replaced.
    #[must_use]
    pub fn with_active(self, active: Option<Sword>) -> Self {
        Self { active, ..self }
    }

    /// Copy with the balance replaced.
    #[must_use]
    pub fn with_balance(self, balance: Balance) -> Self {
        Self { balance, ..self }
    }

    /// Copy with the collection replaced.
    #[must_use]
    pub fn with_collection(self, collection: Collection) -> Self {
        Self { collection, ..self }
    }

    /// Headline numbers for display.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let next_cost = self
            .active
            .as_ref()
            .map(|sword| enhancement_cost(sword.enhancement_count()));
        SessionSummary {
            mode: self.mode,
            active: self.active,
            balance: self.balance.amount(),
            balance_stale: self.balance.is_stale(),
            saved: self.collection.len(),
            next_cost,
            can_afford_next: next_cost.is_some_and(|cost| self.balance.can_afford(cost)),
        }
    }
}

/// Snapshot of a session for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Execution mode.
    pub mode: ExecutionMode,
    /// The equipped sword.
    pub active: Option<Sword>,
    /// Spendable balance.
    pub balance: Mist,
    /// The balance could not be refreshed after the last call.
    pub balance_stale: bool,
    /// Number of saved snapshots.
    pub saved: usize,
    /// Fee for the next enhancement of the active sword.
    pub next_cost: Option<Mist>,
    /// Whether the balance covers that fee.
    pub can_afford_next: bool,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            Some(sword) => write!(
                f,
                "{} (tier {}, +{}) ATK {} MAG {} {}% | value {}",
                sword.display_name(),
                sword.tier(),
                sword.enhancement_count(),
                sword.attack_power(),
                sword.magic_power(),
                sword.success_rate(),
                sword.value().to_sui_string(4),
            )?,
            None => f.write_str("no sword")?,
        }
        write!(f, " | balance {}", self.balance.to_sui_string(4))?;
        if self.balance_stale {
            f.write_str(" (stale)")?;
        }
        if let Some(cost) = self.next_cost {
            write!(f, " | next {}", cost.to_sui_string(4))?;
            if !self.can_afford_next {
                f.write_str(" (unaffordable)")?;
            }
        }
        write!(f, " | saved {}", self.saved)
    }
}

#[cfg(test)]
mod tests {
    use herosword_economy::BaseStats;
    use herosword_shared::SwordId;

    use super::*;

    fn session(balance: u64) -> Session {
        Session::new(
            ExecutionMode::Simulated,
            Some(Sword::base(SwordId::Local(1), &BaseStats::default())),
            Balance::simulated(Mist::new(balance)),
            Collection::new(),
        )
    }

    #[test]
    fn test_summary() {
        let summary = session(5_000_000).summary();
        assert_eq!(summary.next_cost, Some(Mist::new(1_000_000)));
        assert!(summary.can_afford_next);
        assert_eq!(summary.saved, 0);

        let text = summary.to_string();
        assert!(text.starts_with("a piece of iron (tier 1, +0)"));
        assert!(text.contains("balance 0.0050 SUI"));
    }

    #[test]
    fn test_summary_unaffordable() {
        let summary = session(10).summary();
        assert!(!summary.can_afford_next);
        assert!(summary.to_string().contains("(unaffordable)"));
    }

    #[test]
    fn test_empty_slot() {
        let empty = session(10).with_active(None);
        assert_eq!(empty.require_active(), Err(EngineError::NoActiveSword));
        assert_eq!(empty.summary().next_cost, None);
        assert!(!empty.summary().can_afford_next);
    }
}

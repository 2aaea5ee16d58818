//! # Economy Ledger (Balance)
//!
//! The player's spendable currency.
//!
//! - **Simulated**: computed locally, lives only for the session.
//! - **External**: the ledger is authoritative. Local debits and credits are
//!   provisional until the next [`Balance::reconciled`] replaces them with
//!   the fetched value.
//!
//! `Balance` is `Copy` and every operation returns a new value.

use herosword_shared::Mist;
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// Where the balance comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSource {
    /// Locally simulated play money.
    #[default]
    Simulated,
    /// Fetched from the ledger.
    External,
}

/// A spendable balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance {
    amount: Mist,
    source: BalanceSource,
    stale: bool,
}

impl Balance {
    /// A simulated balance.
    #[must_use]
    pub const fn simulated(amount: Mist) -> Self {
        Self {
            amount,
            source: BalanceSource::Simulated,
            stale: false,
        }
    }

    /// A balance just fetched from the ledger.
    #[must_use]
    pub const fn external(amount: Mist) -> Self {
        Self {
            amount,
            source: BalanceSource::External,
            stale: false,
        }
    }

    /// Current amount.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Mist {
        self.amount
    }

    /// Where the amount comes from.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> BalanceSource {
        self.source
    }

    /// True when an external balance could not be refreshed after a
    /// confirmed operation and may lag the ledger.
    #[inline]
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns true if `cost` can be paid.
    #[inline]
    #[must_use]
    pub fn can_afford(&self, cost: Mist) -> bool {
        self.amount >= cost
    }

    /// Fails with `InsufficientFunds` unless `cost` can be paid.
    pub fn ensure_affordable(&self, cost: Mist) -> EconomyResult<()> {
        if self.can_afford(cost) {
            Ok(())
        } else {
            Err(EconomyError::InsufficientFunds {
                required: cost,
                available: self.amount,
            })
        }
    }

    /// Balance after paying `cost`.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` if `cost` exceeds the balance. `self` is unchanged.
    pub fn debit(&self, cost: Mist) -> EconomyResult<Self> {
        self.ensure_affordable(cost)?;
        let amount = self
            .amount
            .checked_sub(cost)
            .ok_or(EconomyError::ArithmeticOverflow)?;
        Ok(Self { amount, ..*self })
    }

    /// Balance after receiving `amount`.
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the sum does not fit.
    pub fn credit(&self, amount: Mist) -> EconomyResult<Self> {
        let amount = self
            .amount
            .checked_add(amount)
            .ok_or(EconomyError::ArithmeticOverflow)?;
        Ok(Self { amount, ..*self })
    }

    /// Replaces the amount with a freshly fetched ledger value.
    #[must_use]
    pub const fn reconciled(&self, fetched: Mist) -> Self {
        Self {
            amount: fetched,
            source: self.source,
            stale: false,
        }
    }

    /// Same amount, flagged as possibly out of date.
    #[must_use]
    pub const fn marked_stale(&self) -> Self {
        Self {
            stale: true,
            ..*self
        }
    }
}

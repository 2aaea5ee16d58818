//! # Currency Amounts
//!
//! **NO FLOATING POINT IN BALANCE CALCULATIONS**
//!
//! Every price, balance and sale value is an integer count of MIST, the
//! smallest SUI unit (1 SUI = 10^9 MIST). Fractional SUI only exists at the
//! display edge, and even there it is rendered from integer division.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of decimal places between MIST and SUI.
const DECIMAL_PLACES: u32 = 9;

/// MIST per whole SUI.
pub const MIST_PER_SUI: u64 = 10u64.pow(DECIMAL_PLACES);

/// An amount of currency in MIST.
///
/// # Range
///
/// - Minimum: 0 MIST
/// - Maximum: ~18.4 billion SUI
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Mist(u64);

impl Mist {
    /// Zero value.
    pub const ZERO: Self = Self(0);

    /// Maximum representable value.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates an amount from raw MIST.
    #[inline]
    #[must_use]
    pub const fn new(mist: u64) -> Self {
        Self(mist)
    }

    /// Creates an amount from whole SUI.
    ///
    /// Returns `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn from_sui(sui: u64) -> Option<Self> {
        match sui.checked_mul(MIST_PER_SUI) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the raw MIST value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the whole SUI part.
    #[inline]
    #[must_use]
    pub const fn whole_sui(self) -> u64 {
        self.0 / MIST_PER_SUI
    }

    /// Returns the fractional part in MIST (0 to 10^9 - 1).
    #[inline]
    #[must_use]
    pub const fn fraction(self) -> u64 {
        self.0 % MIST_PER_SUI
    }

    /// Checked addition.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. `None` when `rhs` exceeds `self`.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating subtraction (floors at zero).
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Half of this amount, rounded down.
    #[inline]
    #[must_use]
    pub const fn half(self) -> Self {
        Self(self.0 / 2)
    }

    /// Returns true if this is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Renders the amount as SUI with a fixed number of decimals (max 9).
    ///
    /// Extra digits are truncated, never rounded, so a displayed balance is
    /// never larger than the real one.
    #[must_use]
    pub fn to_sui_string(self, decimals: u32) -> String {
        let decimals = decimals.min(DECIMAL_PLACES);
        if decimals == 0 {
            return format!("{} SUI", self.whole_sui());
        }
        let scaled = self.fraction() / 10u64.pow(DECIMAL_PLACES - decimals);
        format!(
            "{}.{:0width$} SUI",
            self.whole_sui(),
            scaled,
            width = decimals as usize
        )
    }
}

impl fmt::Debug for Mist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mist({})", self.0)
    }
}

impl fmt::Display for Mist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09} SUI",
            self.whole_sui(),
            self.fraction()
        )
    }
}

impl From<Mist> for u64 {
    fn from(value: Mist) -> Self {
        value.0
    }
}

//! Chain balance arithmetic and display.

use std::{fmt, iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

/// Base units per whole coin (9 decimal places).
pub const UNITS_PER_COIN: u128 = 1_000_000_000;

/// A token amount in base chain units.
///
/// Wraps a `u128` with saturating arithmetic. Fee splitting uses floor
/// division, so a split can under-report by at most one base unit per
/// divisor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(u128);

impl Balance {
    /// The zero amount.
    pub const ZERO: Balance = Balance(0);

    /// Creates a balance from raw base units.
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Creates a balance from whole coins.
    pub const fn from_coins(coins: u64) -> Self {
        Self(coins as u128 * UNITS_PER_COIN)
    }

    /// Raw base units.
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    pub const fn saturating_add(self, rhs: Balance) -> Balance {
        Balance(self.0.saturating_add(rhs.0))
    }

    /// Floor division by a share count, used for even fee splits.
    ///
    /// Returns zero when `shares` is zero so an empty claimant list cannot
    /// panic the notification path.
    pub const fn split_evenly(self, shares: usize) -> Balance {
        if shares == 0 {
            Balance::ZERO
        } else {
            Balance(self.0 / shares as u128)
        }
    }

    /// Renders the amount in USD at the given coin price, e.g. `$12.34`.
    pub fn display_usd(&self, price_usd: f64) -> String {
        let coins = self.0 as f64 / UNITS_PER_COIN as f64;
        format!("${:.2}", coins * price_usd)
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, rhs: Balance) -> Balance {
        self.saturating_add(rhs)
    }
}

impl Sum for Balance {
    fn sum<I: Iterator<Item = Balance>>(iter: I) -> Balance {
        iter.fold(Balance::ZERO, Balance::saturating_add)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNITS_PER_COIN;
        let frac = self.0 % UNITS_PER_COIN;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let frac = format!("{frac:09}");
            write!(f, "{whole}.{}", frac.trim_end_matches('0'))
        }
    }
}

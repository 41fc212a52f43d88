//! Coin amounts in the ledger's lowest denomination.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative amount of the native token.
///
/// Only checked arithmetic is exposed; overflow and underflow surface as
/// `None` and are turned into errors by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coin(pub u64);

impl Coin {
    pub const ZERO: Self = Self(0);

    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Coin) -> Option<Coin> {
        self.0.checked_add(other.0).map(Coin)
    }

    pub fn checked_sub(self, other: Coin) -> Option<Coin> {
        self.0.checked_sub(other.0).map(Coin)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Coin> {
        self.0.checked_mul(factor).map(Coin)
    }

    /// Sum a sequence of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Coin>
    where
        I: IntoIterator<Item = Coin>,
    {
        amounts
            .into_iter()
            .try_fold(Coin::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl From<u64> for Coin {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl From<Coin> for u64 {
    fn from(coin: Coin) -> Self {
        coin.0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Value types for prices, quantities, money, and currencies.

use std::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// A price in a market.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] instance.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the price as a `Decimal`.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl From<&str> for Price {
    /// # Panics
    ///
    /// Panics if `value` is not a valid decimal string.
    fn from(value: &str) -> Self {
        Self(Decimal::from_str(value).unwrap_or_else(|e| panic!("Invalid `Price` string '{value}': {e}")))
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quantity of an asset or contract, never negative.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        assert!(
            value.is_sign_positive() || value.is_zero(),
            "`Quantity` cannot be negative, was {value}"
        );
        Self(value)
    }

    /// Creates a zero [`Quantity`].
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the quantity as a `Decimal`.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns true if the quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the difference to `other`, saturating at zero.
    #[must_use]
    pub fn saturating_sub(&self, other: Self) -> Self {
        Self((self.0 - other.0).max(Decimal::ZERO))
    }
}

impl From<&str> for Quantity {
    /// # Panics
    ///
    /// Panics if `value` is not a valid non-negative decimal string.
    fn from(value: &str) -> Self {
        Self::new(
            Decimal::from_str(value)
                .unwrap_or_else(|e| panic!("Invalid `Quantity` string '{value}': {e}")),
        )
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the result would be negative.
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0 - rhs.0)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A currency, identified by its ISO 4217 or crypto code.
#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Currency(Ustr);

impl Currency {
    /// Creates a new [`Currency`] from the given code.
    #[must_use]
    pub fn new<T: AsRef<str>>(code: T) -> Self {
        Self(Ustr::from(code.as_ref()))
    }

    /// Returns the currency code as a string slice.
    #[must_use]
    pub fn code(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of money in a specific currency.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The monetary amount.
    pub amount: Decimal,
    /// The currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// The balance of an account in a single currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The currency of the balance.
    pub currency: Currency,
    /// The total balance.
    pub total: Decimal,
    /// The portion of the balance locked against working orders and margin.
    pub locked: Decimal,
    /// The portion of the balance free for trading.
    pub free: Decimal,
}

impl AccountBalance {
    /// Creates a new [`AccountBalance`] instance.
    #[must_use]
    pub const fn new(currency: Currency, total: Decimal, locked: Decimal, free: Decimal) -> Self {
        Self {
            currency,
            total,
            locked,
            free,
        }
    }
}

impl Display for AccountBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (locked={}, free={})",
            self.total, self.currency, self.locked, self.free
        )
    }
}

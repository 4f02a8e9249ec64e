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

//! Identifiers for domain entities.
//!
//! All identifiers are thin newtypes over interned strings, making them
//! cheap to copy, hash, and compare.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use ustr::Ustr;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Ustr);

        impl $name {
            /// Creates a new identifier from the given value.
            #[must_use]
            pub fn new<T: AsRef<str>>(value: T) -> Self {
                Self(Ustr::from(value.as_ref()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns the inner interned string.
            #[must_use]
            pub const fn inner(&self) -> Ustr {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// The identifier for a trader, in `NAME-TAG` convention (e.g. `TRADER-001`).
    TraderId
);

identifier!(
    /// The identifier for a trading strategy, in `NAME-TAG` convention (e.g. `EMACross-001`).
    StrategyId
);

identifier!(
    /// A client-assigned order identifier, unique per trader.
    ClientOrderId
);

identifier!(
    /// A venue-assigned order identifier.
    VenueOrderId
);

identifier!(
    /// The identifier for a held position.
    ///
    /// May originate from the venue or from the engine's position identifier
    /// generator.
    PositionId
);

identifier!(
    /// The identifier for a trading account.
    AccountId
);

identifier!(
    /// A venue-assigned trade (execution) identifier for a single fill.
    TradeId
);

identifier!(
    /// A tradeable symbol including its venue suffix (e.g. `AAPL.NASDAQ`).
    Symbol
);

impl TraderId {
    /// Returns the order identifier tag, the portion after the last hyphen.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.as_str().rsplit('-').next().unwrap_or_else(|| self.as_str())
    }
}

impl StrategyId {
    /// Returns the order identifier tag, the portion after the last hyphen.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.as_str().rsplit('-').next().unwrap_or_else(|| self.as_str())
    }
}

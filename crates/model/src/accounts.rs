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

//! Trading accounts.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    events::account::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency},
};

/// A trading account, created from the first matching [`AccountState`] event
/// and updated in place thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub base_currency: Currency,
    balances: IndexMap<Currency, AccountBalance>,
    events: Vec<AccountState>,
}

impl Account {
    /// Creates a new [`Account`] from its initial state event.
    #[must_use]
    pub fn new(event: AccountState) -> Self {
        let mut account = Self {
            id: event.account_id,
            base_currency: event.base_currency,
            balances: IndexMap::new(),
            events: Vec::new(),
        };
        account.apply(event);
        account
    }

    /// Applies a state event, replacing the per-currency balances.
    pub fn apply(&mut self, event: AccountState) {
        self.base_currency = event.base_currency;
        self.balances.clear();
        for balance in &event.balances {
            self.balances.insert(balance.currency, *balance);
        }
        self.events.push(event);
    }

    /// Returns the balance held in the given currency.
    #[must_use]
    pub fn balance(&self, currency: &Currency) -> Option<&AccountBalance> {
        self.balances.get(currency)
    }

    /// Returns all balances in insertion order.
    #[must_use]
    pub fn balances(&self) -> &IndexMap<Currency, AccountBalance> {
        &self.balances
    }

    /// Returns the state events applied to this account.
    #[must_use]
    pub fn events(&self) -> &[AccountState] {
        &self.events
    }

    /// Returns the number of state events applied.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account({}, {})", self.id, self.base_currency)
    }
}

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

//! Generation of per-symbol monotonic position identifiers.

use ahash::AHashMap;
use meridian_model::identifiers::{PositionId, Symbol, TraderId};

/// Mints position identifiers of the form `P-{trader_tag}-{symbol}-{count}`.
///
/// Counts are monotonic per symbol. Seeding the counts from persisted
/// positions via [`PositionIdGenerator::set_count`] guarantees newly issued
/// identifiers never collide with persisted ones.
#[derive(Clone, Debug)]
pub struct PositionIdGenerator {
    trader_id: TraderId,
    counts: AHashMap<Symbol, usize>,
}

impl PositionIdGenerator {
    /// Creates a new [`PositionIdGenerator`] for the given trader.
    #[must_use]
    pub fn new(trader_id: TraderId) -> Self {
        Self {
            trader_id,
            counts: AHashMap::new(),
        }
    }

    /// Generates the next position identifier for the given symbol.
    pub fn generate(&mut self, symbol: Symbol) -> PositionId {
        let count = self.counts.entry(symbol).or_insert(0);
        *count += 1;
        PositionId::from(format!(
            "P-{}-{symbol}-{count}",
            self.trader_id.tag(),
        ))
    }

    /// Returns the current count for the given symbol.
    #[must_use]
    pub fn count(&self, symbol: &Symbol) -> usize {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Sets the count for the given symbol.
    pub fn set_count(&mut self, symbol: Symbol, count: usize) {
        self.counts.insert(symbol, count);
    }

    /// Returns all counters to zero.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

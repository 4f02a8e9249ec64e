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

//! Events derived from position state changes.
//!
//! These are constructed by the execution engine when a fill opens, mutates,
//! or closes a position, and re-entered through the engine's event path so
//! they reach the portfolio and the owning strategy in order.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};

use crate::{
    events::order::OrderFilled,
    identifiers::{PositionId, StrategyId, Symbol},
    position::Position,
};

/// A new position was opened from a fill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOpened {
    /// A snapshot of the position immediately after the opening fill.
    pub position: Position,
    /// The fill which opened the position.
    pub fill: OrderFilled,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An open position was mutated by a fill without closing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionModified {
    /// A snapshot of the position immediately after the fill.
    pub position: Position,
    /// The fill which mutated the position.
    pub fill: OrderFilled,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// A position's net quantity reached zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionClosed {
    /// A snapshot of the position immediately after the closing fill.
    pub position: Position,
    /// The fill which closed the position.
    pub fill: OrderFilled,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// A sum type over all position events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionEvent {
    Opened(PositionOpened),
    Modified(PositionModified),
    Closed(PositionClosed),
}

impl PositionEvent {
    /// Returns the identifier of the affected position.
    #[must_use]
    pub fn position_id(&self) -> PositionId {
        self.position().id
    }

    /// Returns the strategy which owns the affected position.
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        self.position().strategy_id
    }

    /// Returns the symbol of the affected position.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.position().symbol
    }

    /// Returns the embedded position snapshot.
    #[must_use]
    pub fn position(&self) -> &Position {
        match self {
            Self::Opened(e) => &e.position,
            Self::Modified(e) => &e.position,
            Self::Closed(e) => &e.position,
        }
    }
}

impl Display for PositionEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Opened(_) => "PositionOpened",
            Self::Modified(_) => "PositionModified",
            Self::Closed(_) => "PositionClosed",
        };
        let position = self.position();
        write!(
            f,
            "{name}({}, {}, {} {})",
            position.id, position.symbol, position.side, position.quantity
        )
    }
}

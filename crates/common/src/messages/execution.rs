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

//! Execution command and event messages.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use meridian_model::{
    events::{AccountState, OrderEventAny, PositionEvent},
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId, TraderId},
    orders::{BracketOrder, Order},
    types::{Price, Quantity},
};
use serde::{Deserialize, Serialize};

/// A command to request current account state from the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInquiry {
    pub trader_id: TraderId,
    pub account_id: AccountId,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// A command to submit an order for execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    /// The existing position the order targets (hedging), if any.
    pub position_id: Option<PositionId>,
    pub order: Order,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// A command to submit a bracket order for execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBracketOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub bracket_order: BracketOrder,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// A command to modify a working order at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOrder {
    pub trader_id: TraderId,
    pub cl_ord_id: ClientOrderId,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// A command to cancel a working order at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub trader_id: TraderId,
    pub cl_ord_id: ClientOrderId,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// A sum type over all trading commands accepted by the execution engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingCommand {
    AccountInquiry(AccountInquiry),
    SubmitOrder(SubmitOrder),
    SubmitBracketOrder(SubmitBracketOrder),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
}

impl TradingCommand {
    /// Returns the identifier of the trader which issued the command.
    #[must_use]
    pub const fn trader_id(&self) -> TraderId {
        match self {
            Self::AccountInquiry(cmd) => cmd.trader_id,
            Self::SubmitOrder(cmd) => cmd.trader_id,
            Self::SubmitBracketOrder(cmd) => cmd.trader_id,
            Self::ModifyOrder(cmd) => cmd.trader_id,
            Self::CancelOrder(cmd) => cmd.trader_id,
        }
    }
}

impl Display for TradingCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountInquiry(cmd) => write!(f, "AccountInquiry({})", cmd.account_id),
            Self::SubmitOrder(cmd) => write!(f, "SubmitOrder({})", cmd.order.cl_ord_id),
            Self::SubmitBracketOrder(cmd) => {
                write!(f, "SubmitBracketOrder({})", cmd.bracket_order)
            }
            Self::ModifyOrder(cmd) => write!(f, "ModifyOrder({})", cmd.cl_ord_id),
            Self::CancelOrder(cmd) => write!(f, "CancelOrder({})", cmd.cl_ord_id),
        }
    }
}

/// A sum type over all events processed by the execution engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionEvent {
    Order(OrderEventAny),
    Position(PositionEvent),
    Account(AccountState),
}

impl Display for ExecutionEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Order(event) => write!(f, "{event}"),
            Self::Position(event) => write!(f, "{event}"),
            Self::Account(event) => write!(f, "{event}"),
        }
    }
}

/// The element type of the execution engine's message queue.
///
/// Commands and events share one queue so a single consumer serializes all
/// state transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMessage {
    Command(TradingCommand),
    Event(ExecutionEvent),
}

impl Display for ExecutionMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(command) => write!(f, "{command}"),
            Self::Event(event) => write!(f, "{event}"),
        }
    }
}

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

//! Events describing changes to order state.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};

use crate::{
    enums::{LiquiditySide, OrderSide},
    identifiers::{
        AccountId, ClientOrderId, PositionId, StrategyId, Symbol, TradeId, VenueOrderId,
    },
    types::{Currency, Price, Quantity},
};

/// An order was invalidated by the engine before reaching the venue.
///
/// Engine generated, so it carries the originating strategy identifier: the
/// order may never have been persisted (e.g. a duplicate client order
/// identifier), in which case no database index exists to route by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInvalid {
    pub cl_ord_id: ClientOrderId,
    pub strategy_id: StrategyId,
    pub reason: String,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was denied by the engine (e.g. the client refused it at submit).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDenied {
    pub cl_ord_id: ClientOrderId,
    pub strategy_id: StrategyId,
    pub reason: String,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was submitted to the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub cl_ord_id: ClientOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was accepted by the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub cl_ord_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was rejected by the venue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejected {
    pub cl_ord_id: ClientOrderId,
    pub account_id: AccountId,
    pub reason: String,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order is working at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWorking {
    pub cl_ord_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// A working order was modified at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModified {
    pub cl_ord_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was cancelled at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub cl_ord_id: ClientOrderId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order expired at the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpired {
    pub cl_ord_id: ClientOrderId,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// The venue rejected a cancel request for an order.
///
/// A normal venue response, not an engine error: it is routed to the
/// owning strategy without mutating the order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelReject {
    pub cl_ord_id: ClientOrderId,
    pub response_to: String,
    pub reason: String,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An order was filled (partially or completely) at the venue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilled {
    pub cl_ord_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub trade_id: TradeId,
    /// The venue-assigned position identifier, if the venue supplies one.
    pub position_id: Option<PositionId>,
    pub symbol: Symbol,
    pub order_side: OrderSide,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub liquidity_side: LiquiditySide,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// A sum type over all order events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEventAny {
    Invalid(OrderInvalid),
    Denied(OrderDenied),
    Submitted(OrderSubmitted),
    Accepted(OrderAccepted),
    Rejected(OrderRejected),
    Working(OrderWorking),
    Modified(OrderModified),
    Cancelled(OrderCancelled),
    Expired(OrderExpired),
    CancelReject(OrderCancelReject),
    Filled(OrderFilled),
}

impl OrderEventAny {
    /// Returns the client order identifier this event refers to.
    #[must_use]
    pub fn cl_ord_id(&self) -> ClientOrderId {
        match self {
            Self::Invalid(e) => e.cl_ord_id,
            Self::Denied(e) => e.cl_ord_id,
            Self::Submitted(e) => e.cl_ord_id,
            Self::Accepted(e) => e.cl_ord_id,
            Self::Rejected(e) => e.cl_ord_id,
            Self::Working(e) => e.cl_ord_id,
            Self::Modified(e) => e.cl_ord_id,
            Self::Cancelled(e) => e.cl_ord_id,
            Self::Expired(e) => e.cl_ord_id,
            Self::CancelReject(e) => e.cl_ord_id,
            Self::Filled(e) => e.cl_ord_id,
        }
    }

    /// Returns when the event occurred at its source.
    #[must_use]
    pub fn ts_event(&self) -> UnixNanos {
        match self {
            Self::Invalid(e) => e.ts_event,
            Self::Denied(e) => e.ts_event,
            Self::Submitted(e) => e.ts_event,
            Self::Accepted(e) => e.ts_event,
            Self::Rejected(e) => e.ts_event,
            Self::Working(e) => e.ts_event,
            Self::Modified(e) => e.ts_event,
            Self::Cancelled(e) => e.ts_event,
            Self::Expired(e) => e.ts_event,
            Self::CancelReject(e) => e.ts_event,
            Self::Filled(e) => e.ts_event,
        }
    }

    /// Returns the originating strategy identifier for engine-generated events.
    #[must_use]
    pub fn strategy_id(&self) -> Option<StrategyId> {
        match self {
            Self::Invalid(e) => Some(e.strategy_id),
            Self::Denied(e) => Some(e.strategy_id),
            _ => None,
        }
    }
}

impl Display for OrderEventAny {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(e) => {
                write!(f, "OrderInvalid({}, reason='{}')", e.cl_ord_id, e.reason)
            }
            Self::Denied(e) => write!(f, "OrderDenied({}, reason='{}')", e.cl_ord_id, e.reason),
            Self::Submitted(e) => write!(f, "OrderSubmitted({})", e.cl_ord_id),
            Self::Accepted(e) => {
                write!(f, "OrderAccepted({}, {})", e.cl_ord_id, e.venue_order_id)
            }
            Self::Rejected(e) => {
                write!(f, "OrderRejected({}, reason='{}')", e.cl_ord_id, e.reason)
            }
            Self::Working(e) => write!(f, "OrderWorking({}, {})", e.cl_ord_id, e.venue_order_id),
            Self::Modified(e) => write!(f, "OrderModified({})", e.cl_ord_id),
            Self::Cancelled(e) => write!(f, "OrderCancelled({})", e.cl_ord_id),
            Self::Expired(e) => write!(f, "OrderExpired({})", e.cl_ord_id),
            Self::CancelReject(e) => {
                write!(f, "OrderCancelReject({}, reason='{}')", e.cl_ord_id, e.reason)
            }
            Self::Filled(e) => write!(
                f,
                "OrderFilled({}, {}, {} {} @ {})",
                e.cl_ord_id, e.trade_id, e.order_side, e.last_qty, e.last_px
            ),
        }
    }
}

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

//! Orders and the order state machine.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    enums::{OrderSide, OrderStatus, OrderType, TimeInForce},
    events::order::{OrderEventAny, OrderFilled},
    identifiers::{ClientOrderId, Symbol, TradeId, VenueOrderId},
    types::{Price, Quantity},
};

/// Errors raised when applying an event to an [`Order`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("invalid state transition: {from} -> {event}")]
    InvalidStateTransition { from: OrderStatus, event: &'static str },
    #[error("duplicate fill: trade_id {0} already applied")]
    DuplicateFill(TradeId),
    #[error("event cl_ord_id {event} does not match order cl_ord_id {order}")]
    ClientOrderIdMismatch {
        order: ClientOrderId,
        event: ClientOrderId,
    },
}

/// A client order, tracking its lifecycle through applied events.
///
/// The state machine is driven exclusively through [`Order::apply`]; an
/// illegal transition is reported and leaves the order unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub cl_ord_id: ClientOrderId,
    pub symbol: Symbol,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub venue_order_id: Option<VenueOrderId>,
    pub filled_qty: Quantity,
    pub leaves_qty: Quantity,
    pub avg_px: Option<Decimal>,
    pub trade_ids: Vec<TradeId>,
    pub init_id: UUID4,
    pub ts_init: UnixNanos,
    pub ts_last: UnixNanos,
}

impl Order {
    /// Creates a new market order.
    #[must_use]
    pub fn market(
        cl_ord_id: ClientOrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            cl_ord_id,
            symbol,
            side,
            OrderType::Market,
            quantity,
            None,
            None,
            TimeInForce::Gtc,
            ts_init,
        )
    }

    /// Creates a new limit order.
    #[must_use]
    pub fn limit(
        cl_ord_id: ClientOrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        time_in_force: TimeInForce,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            cl_ord_id,
            symbol,
            side,
            OrderType::Limit,
            quantity,
            Some(price),
            None,
            time_in_force,
            ts_init,
        )
    }

    /// Creates a new stop-market order.
    #[must_use]
    pub fn stop_market(
        cl_ord_id: ClientOrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        trigger_price: Price,
        time_in_force: TimeInForce,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            cl_ord_id,
            symbol,
            side,
            OrderType::StopMarket,
            quantity,
            None,
            Some(trigger_price),
            time_in_force,
            ts_init,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        cl_ord_id: ClientOrderId,
        symbol: Symbol,
        side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
        price: Option<Price>,
        trigger_price: Option<Price>,
        time_in_force: TimeInForce,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            cl_ord_id,
            symbol,
            side,
            order_type,
            quantity,
            price,
            trigger_price,
            time_in_force,
            status: OrderStatus::Initialized,
            venue_order_id: None,
            filled_qty: Quantity::zero(),
            leaves_qty: quantity,
            avg_px: None,
            trade_ids: Vec::new(),
            init_id: UUID4::new(),
            ts_init,
            ts_last: ts_init,
        }
    }

    /// Returns true if the order can receive no further events.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the order is resting or eligible to fill at the venue.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        self.status.is_working()
    }

    /// Applies an event to the order, advancing the state machine.
    ///
    /// # Errors
    ///
    /// Returns an error if the event refers to a different order, repeats an
    /// applied `trade_id`, or is illegal from the current state. The order is
    /// left unchanged in every error case.
    pub fn apply(&mut self, event: &OrderEventAny) -> Result<(), OrderError> {
        if event.cl_ord_id() != self.cl_ord_id {
            return Err(OrderError::ClientOrderIdMismatch {
                order: self.cl_ord_id,
                event: event.cl_ord_id(),
            });
        }

        // Venue response to a cancel request, not an order state change
        if matches!(event, OrderEventAny::CancelReject(_)) {
            self.ts_last = event.ts_event();
            return Ok(());
        }

        if let OrderEventAny::Filled(fill) = event
            && self.trade_ids.contains(&fill.trade_id)
        {
            return Err(OrderError::DuplicateFill(fill.trade_id));
        }

        let next = self.transition(event)?;

        match event {
            OrderEventAny::Accepted(e) => self.venue_order_id = Some(e.venue_order_id),
            OrderEventAny::Working(e) => self.venue_order_id = Some(e.venue_order_id),
            OrderEventAny::Modified(e) => {
                if let Some(quantity) = e.quantity {
                    self.quantity = quantity;
                }
                if let Some(price) = e.price {
                    self.price = Some(price);
                }
                self.leaves_qty = self.quantity.saturating_sub(self.filled_qty);
            }
            OrderEventAny::Filled(e) => self.apply_fill(e),
            _ => {}
        }

        self.status = next;
        self.ts_last = event.ts_event();
        Ok(())
    }

    fn transition(&self, event: &OrderEventAny) -> Result<OrderStatus, OrderError> {
        use OrderStatus::{
            Accepted, Cancelled, Denied, Expired, Initialized, Invalid, PartiallyFilled, Rejected,
            Submitted, Working,
        };

        let next = match (self.status, event) {
            (Initialized, OrderEventAny::Submitted(_)) => Submitted,
            (Initialized, OrderEventAny::Invalid(_)) => Invalid,
            (Initialized, OrderEventAny::Denied(_)) => Denied,
            (Submitted, OrderEventAny::Accepted(_)) => Accepted,
            (Submitted, OrderEventAny::Rejected(_)) => Rejected,
            (Submitted | Accepted, OrderEventAny::Working(_)) => Working,
            (Accepted | Working, OrderEventAny::Modified(_)) => self.status,
            (
                Accepted | Working | PartiallyFilled,
                OrderEventAny::Cancelled(_),
            ) => Cancelled,
            (Accepted | Working | PartiallyFilled, OrderEventAny::Expired(_)) => Expired,
            // Fills may arrive ahead of the venue's submit/accept acks
            (
                Initialized | Submitted | Accepted | Working | PartiallyFilled,
                OrderEventAny::Filled(fill),
            ) => self.fill_status(fill),
            _ => {
                return Err(OrderError::InvalidStateTransition {
                    from: self.status,
                    event: event_name(event),
                });
            }
        };
        Ok(next)
    }

    fn fill_status(&self, fill: &OrderFilled) -> OrderStatus {
        if self.filled_qty + fill.last_qty >= self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        }
    }

    fn apply_fill(&mut self, fill: &OrderFilled) {
        let filled = self.filled_qty.as_decimal();
        let last = fill.last_qty.as_decimal();
        let total = filled + last;

        self.avg_px = Some(match self.avg_px {
            Some(avg) if !total.is_zero() => {
                (avg * filled + fill.last_px.as_decimal() * last) / total
            }
            _ => fill.last_px.as_decimal(),
        });
        self.filled_qty += fill.last_qty;
        self.leaves_qty = self.quantity.saturating_sub(self.filled_qty);
        self.trade_ids.push(fill.trade_id);
        if self.venue_order_id.is_none() {
            self.venue_order_id = fill.venue_order_id;
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order({}, {} {} {} {}, status={})",
            self.cl_ord_id, self.side, self.quantity, self.symbol, self.order_type, self.status
        )
    }
}

const fn event_name(event: &OrderEventAny) -> &'static str {
    match event {
        OrderEventAny::Invalid(_) => "OrderInvalid",
        OrderEventAny::Denied(_) => "OrderDenied",
        OrderEventAny::Submitted(_) => "OrderSubmitted",
        OrderEventAny::Accepted(_) => "OrderAccepted",
        OrderEventAny::Rejected(_) => "OrderRejected",
        OrderEventAny::Working(_) => "OrderWorking",
        OrderEventAny::Modified(_) => "OrderModified",
        OrderEventAny::Cancelled(_) => "OrderCancelled",
        OrderEventAny::Expired(_) => "OrderExpired",
        OrderEventAny::CancelReject(_) => "OrderCancelReject",
        OrderEventAny::Filled(_) => "OrderFilled",
    }
}

/// The role of an order within a bracket.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketLeg {
    Entry,
    StopLoss,
    TakeProfit,
}

impl BracketLeg {
    /// Derives the invalidation reason for this leg given the set of legs
    /// whose client order identifiers collided.
    ///
    /// The collider reports its own collision; siblings of a colliding entry
    /// report the parent, and siblings of a colliding protective leg report
    /// the OCO relationship.
    #[must_use]
    pub fn invalidation_reason(&self, collided: &[Self]) -> &'static str {
        if collided.contains(self) {
            "cl_ord_id already exists"
        } else if collided.contains(&Self::Entry) {
            "parent cl_ord_id already exists"
        } else {
            "OCO cl_ord_id already exists"
        }
    }
}

/// An entry order bracketed by a protective stop-loss and an optional
/// take-profit.
///
/// All legs share a validation fate: if any client order identifier
/// collides, every leg is invalidated with a leg-appropriate reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketOrder {
    pub entry: Order,
    pub stop_loss: Order,
    pub take_profit: Option<Order>,
}

impl BracketOrder {
    /// Creates a new [`BracketOrder`] instance.
    #[must_use]
    pub const fn new(entry: Order, stop_loss: Order, take_profit: Option<Order>) -> Self {
        Self {
            entry,
            stop_loss,
            take_profit,
        }
    }

    /// Returns the legs in submission order, tagged with their roles.
    #[must_use]
    pub fn legs(&self) -> Vec<(BracketLeg, &Order)> {
        let mut legs = vec![
            (BracketLeg::Entry, &self.entry),
            (BracketLeg::StopLoss, &self.stop_loss),
        ];
        if let Some(take_profit) = &self.take_profit {
            legs.push((BracketLeg::TakeProfit, take_profit));
        }
        legs
    }
}

impl Display for BracketOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BracketOrder(entry={}, stop_loss={}, take_profit={})",
            self.entry.cl_ord_id,
            self.stop_loss.cl_ord_id,
            self.take_profit
                .as_ref()
                .map_or("None".to_string(), |o| o.cl_ord_id.to_string()),
        )
    }
}

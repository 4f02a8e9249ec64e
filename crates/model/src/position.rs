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

//! Positions derived from order fills.

use std::fmt::{Display, Formatter};

use meridian_core::UnixNanos;
use rust_decimal::Decimal;
use rust_decimal::prelude::Signed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    enums::{OrderSide, PositionSide},
    events::order::OrderFilled,
    identifiers::{ClientOrderId, PositionId, StrategyId, Symbol, TradeId},
    types::Quantity,
};

/// Errors raised when constructing or mutating a [`Position`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("cannot open position: fill for {0} has no position_id")]
    NoPositionId(ClientOrderId),
    #[error("fill symbol {fill} does not match position symbol {position}")]
    SymbolMismatch { position: Symbol, fill: Symbol },
}

/// A position in a single symbol, owned by exactly one strategy for its
/// lifetime.
///
/// The net quantity is the signed sum of the constituent fills; the
/// position is closed exactly when the net quantity reaches zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub strategy_id: StrategyId,
    pub symbol: Symbol,
    pub side: PositionSide,
    /// The signed sum of constituent fill quantities (positive = long).
    pub signed_qty: Decimal,
    /// The absolute net quantity.
    pub quantity: Quantity,
    /// The largest absolute net quantity held over the position's lifetime.
    pub peak_qty: Quantity,
    /// Volume-weighted average price of exposure-increasing fills.
    pub avg_px_open: Decimal,
    /// Volume-weighted average price of exposure-reducing fills.
    pub avg_px_close: Option<Decimal>,
    /// The cumulative quantity closed against the position.
    pub closed_qty: Quantity,
    /// The client order identifiers which contributed fills.
    pub cl_ord_ids: Vec<ClientOrderId>,
    /// The trade identifiers of the constituent fills.
    pub trade_ids: Vec<TradeId>,
    pub ts_opened: UnixNanos,
    pub ts_closed: Option<UnixNanos>,
}

impl Position {
    /// Creates a new [`Position`] from its opening fill.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill carries no position identifier.
    pub fn new(fill: &OrderFilled, strategy_id: StrategyId) -> Result<Self, PositionError> {
        let id = fill
            .position_id
            .ok_or(PositionError::NoPositionId(fill.cl_ord_id))?;

        let mut position = Self {
            id,
            strategy_id,
            symbol: fill.symbol,
            side: PositionSide::Flat,
            signed_qty: Decimal::ZERO,
            quantity: Quantity::zero(),
            peak_qty: Quantity::zero(),
            avg_px_open: fill.last_px.as_decimal(),
            avg_px_close: None,
            closed_qty: Quantity::zero(),
            cl_ord_ids: Vec::new(),
            trade_ids: Vec::new(),
            ts_opened: fill.ts_event,
            ts_closed: None,
        };
        position.apply(fill)?;
        Ok(position)
    }

    /// Applies a fill to the position, updating the signed net quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill is for a different symbol.
    pub fn apply(&mut self, fill: &OrderFilled) -> Result<(), PositionError> {
        if fill.symbol != self.symbol {
            return Err(PositionError::SymbolMismatch {
                position: self.symbol,
                fill: fill.symbol,
            });
        }

        let delta = match fill.order_side {
            OrderSide::Buy => fill.last_qty.as_decimal(),
            OrderSide::Sell => -fill.last_qty.as_decimal(),
        };

        if self.signed_qty.is_zero() || self.signed_qty.signum() == delta.signum() {
            // Exposure increasing (or opening)
            let previous = self.signed_qty.abs();
            let total = previous + delta.abs();
            if !total.is_zero() {
                self.avg_px_open = (self.avg_px_open * previous
                    + fill.last_px.as_decimal() * delta.abs())
                    / total;
            }
        } else {
            // Exposure reducing
            let closing = delta.abs().min(self.signed_qty.abs());
            let prior = self.closed_qty.as_decimal();
            let total = prior + closing;
            self.avg_px_close = Some(match self.avg_px_close {
                Some(avg) if !total.is_zero() => {
                    (avg * prior + fill.last_px.as_decimal() * closing) / total
                }
                _ => fill.last_px.as_decimal(),
            });
            self.closed_qty = Quantity::new(total);

            // Crossing through zero re-opens exposure at the fill price
            if delta.abs() > self.signed_qty.abs() {
                self.avg_px_open = fill.last_px.as_decimal();
            }
        }

        self.signed_qty += delta;
        self.quantity = Quantity::new(self.signed_qty.abs());
        self.peak_qty = self.peak_qty.max(self.quantity);
        self.side = if self.signed_qty.is_zero() {
            PositionSide::Flat
        } else if self.signed_qty > Decimal::ZERO {
            PositionSide::Long
        } else {
            PositionSide::Short
        };
        if !self.cl_ord_ids.contains(&fill.cl_ord_id) {
            self.cl_ord_ids.push(fill.cl_ord_id);
        }
        self.trade_ids.push(fill.trade_id);
        self.ts_closed = if self.signed_qty.is_zero() {
            Some(fill.ts_event)
        } else {
            None
        };
        Ok(())
    }

    /// Returns true if the net quantity is non-zero.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.signed_qty.is_zero()
    }

    /// Returns true if the net quantity is zero.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.signed_qty.is_zero()
    }

    /// Returns true if the position is net long.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.signed_qty > Decimal::ZERO
    }

    /// Returns true if the position is net short.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.signed_qty < Decimal::ZERO
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Position({}, {} {} {})",
            self.id, self.side, self.quantity, self.symbol
        )
    }
}

#[cfg(test)]
mod tests {
    use meridian_core::UUID4;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        enums::LiquiditySide,
        identifiers::VenueOrderId,
        types::{Currency, Price},
    };

    fn fill(
        cl_ord_id: &str,
        trade_id: &str,
        side: OrderSide,
        qty: u64,
        px: &str,
    ) -> OrderFilled {
        OrderFilled {
            cl_ord_id: ClientOrderId::from(cl_ord_id),
            venue_order_id: Some(VenueOrderId::from("V-1")),
            trade_id: TradeId::from(trade_id),
            position_id: Some(PositionId::from("P-001-AUD/USD.SIM-1")),
            symbol: Symbol::from("AUD/USD.SIM"),
            order_side: side,
            last_qty: Quantity::from(qty),
            last_px: Price::from(px),
            currency: Currency::from("USD"),
            liquidity_side: LiquiditySide::Taker,
            event_id: UUID4::new(),
            ts_event: UnixNanos::from(1),
            ts_init: UnixNanos::from(1),
        }
    }

    #[rstest]
    fn test_position_opened_long() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        assert!(position.is_open());
        assert!(position.is_long());
        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.signed_qty, dec!(100000));
        assert_eq!(position.avg_px_open, dec!(0.80000));
    }

    #[rstest]
    fn test_position_requires_position_id() {
        let mut opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        opening.position_id = None;

        let result = Position::new(&opening, StrategyId::from("S-001"));
        assert_eq!(
            result,
            Err(PositionError::NoPositionId(ClientOrderId::from("O-1")))
        );
    }

    #[rstest]
    fn test_position_closed_at_zero_net_quantity() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let mut position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        position
            .apply(&fill("O-2", "T-2", OrderSide::Sell, 100_000, "0.80010"))
            .unwrap();

        assert!(position.is_closed());
        assert_eq!(position.side, PositionSide::Flat);
        assert!(position.ts_closed.is_some());
        assert_eq!(position.avg_px_close, Some(dec!(0.80010)));
    }

    #[rstest]
    fn test_position_partial_reduction_stays_open() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let mut position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        position
            .apply(&fill("O-2", "T-2", OrderSide::Sell, 50_000, "0.80010"))
            .unwrap();

        assert!(position.is_open());
        assert_eq!(position.signed_qty, dec!(50000));
        assert_eq!(position.peak_qty, Quantity::from(100_000u64));
    }

    #[rstest]
    fn test_position_flip_through_zero() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let mut position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        position
            .apply(&fill("O-2", "T-2", OrderSide::Sell, 150_000, "0.81000"))
            .unwrap();

        assert!(position.is_short());
        assert_eq!(position.signed_qty, dec!(-50000));
        assert_eq!(position.avg_px_open, dec!(0.81000));
    }

    #[rstest]
    fn test_position_rejects_symbol_mismatch() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let mut position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        let mut other = fill("O-2", "T-2", OrderSide::Sell, 100_000, "0.80010");
        other.symbol = Symbol::from("EUR/USD.SIM");

        assert!(matches!(
            position.apply(&other),
            Err(PositionError::SymbolMismatch { .. })
        ));
    }

    #[rstest]
    fn test_signed_qty_is_sum_of_fills() {
        let opening = fill("O-1", "T-1", OrderSide::Buy, 100_000, "0.80000");
        let mut position = Position::new(&opening, StrategyId::from("S-001")).unwrap();

        position
            .apply(&fill("O-2", "T-2", OrderSide::Buy, 25_000, "0.80500"))
            .unwrap();
        position
            .apply(&fill("O-3", "T-3", OrderSide::Sell, 30_000, "0.81000"))
            .unwrap();

        assert_eq!(position.signed_qty, dec!(95000));
        assert_eq!(position.trade_ids.len(), 3);
    }
}

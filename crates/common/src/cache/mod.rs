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

//! The execution database contract and its in-memory implementation.

use std::fmt::Debug;

use ahash::AHashMap;
use meridian_model::{
    accounts::Account,
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId, Symbol, TraderId},
    orders::Order,
    position::Position,
};

/// Durable/cacheable persistence of orders, positions, and accounts, plus
/// the identifier indexes the execution engine correlates with.
///
/// The database is stamped with a single trader identifier; the engine
/// refuses construction when the identifiers differ.
pub trait ExecutionDatabase: Debug {
    /// Returns the trader identifier the database is stamped with.
    fn trader_id(&self) -> TraderId;

    /// Returns the account with the given identifier.
    fn get_account(&self, account_id: &AccountId) -> Option<Account>;

    /// Adds the given account.
    fn add_account(&mut self, account: Account);

    /// Updates the given account.
    fn update_account(&mut self, account: Account);

    /// Returns true if an order exists with the given identifier.
    fn order_exists(&self, cl_ord_id: &ClientOrderId) -> bool;

    /// Adds the given order, indexed against its strategy and (optionally)
    /// an existing position.
    fn add_order(
        &mut self,
        order: &Order,
        position_id: Option<PositionId>,
        strategy_id: StrategyId,
    );

    /// Returns the order with the given identifier.
    fn get_order(&self, cl_ord_id: &ClientOrderId) -> Option<Order>;

    /// Updates the given order.
    fn update_order(&mut self, order: &Order);

    /// Returns true if a position exists with the given identifier.
    fn position_exists(&self, position_id: &PositionId) -> bool;

    /// Adds the given position, indexed against its strategy.
    fn add_position(&mut self, position: &Position, strategy_id: StrategyId);

    /// Returns the position with the given identifier.
    fn get_position(&self, position_id: &PositionId) -> Option<Position>;

    /// Updates the given position.
    fn update_position(&mut self, position: &Position);

    /// Returns the position identifier indexed for the given order, if any.
    fn get_position_id(&self, cl_ord_id: &ClientOrderId) -> Option<PositionId>;

    /// Returns the strategy identifier indexed for the given order, if any.
    fn get_strategy_for_order(&self, cl_ord_id: &ClientOrderId) -> Option<StrategyId>;

    /// Returns all open positions, optionally filtered by symbol and strategy.
    fn get_positions_open(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> Vec<Position>;

    /// Returns the count of open positions, optionally filtered by symbol
    /// and strategy.
    fn positions_open_count(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> usize;

    /// Returns the count of positions ever held, per symbol.
    fn get_symbol_position_counts(&self) -> AHashMap<Symbol, usize>;

    /// Logs any residual working orders or open positions.
    fn check_residuals(&self);

    /// Clears all stores and indexes. The stamped trader identifier is kept.
    fn reset(&mut self);
}

/// An in-memory [`ExecutionDatabase`].
#[derive(Debug)]
pub struct InMemoryExecutionDatabase {
    trader_id: TraderId,
    accounts: AHashMap<AccountId, Account>,
    orders: AHashMap<ClientOrderId, Order>,
    positions: AHashMap<PositionId, Position>,
    index_order_strategy: AHashMap<ClientOrderId, StrategyId>,
    index_order_position: AHashMap<ClientOrderId, PositionId>,
}

impl InMemoryExecutionDatabase {
    /// Creates a new [`InMemoryExecutionDatabase`] stamped with `trader_id`.
    #[must_use]
    pub fn new(trader_id: TraderId) -> Self {
        Self {
            trader_id,
            accounts: AHashMap::new(),
            orders: AHashMap::new(),
            positions: AHashMap::new(),
            index_order_strategy: AHashMap::new(),
            index_order_position: AHashMap::new(),
        }
    }

    fn index_position_orders(&mut self, position: &Position) {
        for cl_ord_id in &position.cl_ord_ids {
            self.index_order_position.insert(*cl_ord_id, position.id);
        }
    }
}

impl ExecutionDatabase for InMemoryExecutionDatabase {
    fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    fn get_account(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.get(account_id).cloned()
    }

    fn add_account(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    fn update_account(&mut self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    fn order_exists(&self, cl_ord_id: &ClientOrderId) -> bool {
        self.orders.contains_key(cl_ord_id)
    }

    fn add_order(
        &mut self,
        order: &Order,
        position_id: Option<PositionId>,
        strategy_id: StrategyId,
    ) {
        if self.orders.contains_key(&order.cl_ord_id) {
            log::error!("Cannot add order: {} already exists", order.cl_ord_id);
            return;
        }
        self.orders.insert(order.cl_ord_id, order.clone());
        self.index_order_strategy.insert(order.cl_ord_id, strategy_id);
        if let Some(position_id) = position_id {
            self.index_order_position.insert(order.cl_ord_id, position_id);
        }
    }

    fn get_order(&self, cl_ord_id: &ClientOrderId) -> Option<Order> {
        self.orders.get(cl_ord_id).cloned()
    }

    fn update_order(&mut self, order: &Order) {
        if !self.orders.contains_key(&order.cl_ord_id) {
            log::error!("Cannot update order: {} not found", order.cl_ord_id);
            return;
        }
        self.orders.insert(order.cl_ord_id, order.clone());
    }

    fn position_exists(&self, position_id: &PositionId) -> bool {
        self.positions.contains_key(position_id)
    }

    fn add_position(&mut self, position: &Position, strategy_id: StrategyId) {
        if self.positions.contains_key(&position.id) {
            log::error!("Cannot add position: {} already exists", position.id);
            return;
        }
        debug_assert_eq!(position.strategy_id, strategy_id);
        self.positions.insert(position.id, position.clone());
        self.index_position_orders(position);
    }

    fn get_position(&self, position_id: &PositionId) -> Option<Position> {
        self.positions.get(position_id).cloned()
    }

    fn update_position(&mut self, position: &Position) {
        if !self.positions.contains_key(&position.id) {
            log::error!("Cannot update position: {} not found", position.id);
            return;
        }
        self.positions.insert(position.id, position.clone());
        self.index_position_orders(position);
    }

    fn get_position_id(&self, cl_ord_id: &ClientOrderId) -> Option<PositionId> {
        self.index_order_position.get(cl_ord_id).copied()
    }

    fn get_strategy_for_order(&self, cl_ord_id: &ClientOrderId) -> Option<StrategyId> {
        self.index_order_strategy.get(cl_ord_id).copied()
    }

    fn get_positions_open(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> Vec<Position> {
        self.positions
            .values()
            .filter(|p| p.is_open())
            .filter(|p| symbol.is_none_or(|s| &p.symbol == s))
            .filter(|p| strategy_id.is_none_or(|s| &p.strategy_id == s))
            .cloned()
            .collect()
    }

    fn positions_open_count(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> usize {
        self.positions
            .values()
            .filter(|p| p.is_open())
            .filter(|p| symbol.is_none_or(|s| &p.symbol == s))
            .filter(|p| strategy_id.is_none_or(|s| &p.strategy_id == s))
            .count()
    }

    fn get_symbol_position_counts(&self) -> AHashMap<Symbol, usize> {
        let mut counts: AHashMap<Symbol, usize> = AHashMap::new();
        for position in self.positions.values() {
            *counts.entry(position.symbol).or_insert(0) += 1;
        }
        counts
    }

    fn check_residuals(&self) {
        for order in self.orders.values().filter(|o| o.is_working()) {
            log::warn!("Residual working order: {order}");
        }
        for position in self.positions.values().filter(|p| p.is_open()) {
            log::warn!("Residual open position: {position}");
        }
    }

    fn reset(&mut self) {
        self.accounts.clear();
        self.orders.clear();
        self.positions.clear();
        self.index_order_strategy.clear();
        self.index_order_position.clear();
        log::info!("Reset");
    }
}

#[cfg(test)]
mod tests {
    use meridian_core::{UUID4, UnixNanos};
    use meridian_model::{
        enums::{LiquiditySide, OrderSide},
        events::OrderFilled,
        identifiers::TradeId,
        types::{Currency, Price, Quantity},
    };
    use rstest::rstest;

    use super::*;

    fn database() -> InMemoryExecutionDatabase {
        InMemoryExecutionDatabase::new(TraderId::from("TESTER-001"))
    }

    fn test_order(cl_ord_id: &str) -> Order {
        Order::market(
            ClientOrderId::from(cl_ord_id),
            Symbol::from("AUD/USD.SIM"),
            OrderSide::Buy,
            Quantity::from(100_000u64),
            UnixNanos::default(),
        )
    }

    fn test_position(cl_ord_id: &str, position_id: &str) -> Position {
        let fill = OrderFilled {
            cl_ord_id: ClientOrderId::from(cl_ord_id),
            venue_order_id: None,
            trade_id: TradeId::from("T-1"),
            position_id: Some(PositionId::from(position_id)),
            symbol: Symbol::from("AUD/USD.SIM"),
            order_side: OrderSide::Buy,
            last_qty: Quantity::from(100_000u64),
            last_px: Price::from("0.80000"),
            currency: Currency::from("USD"),
            liquidity_side: LiquiditySide::Taker,
            event_id: UUID4::new(),
            ts_event: UnixNanos::from(1),
            ts_init: UnixNanos::from(1),
        };
        Position::new(&fill, StrategyId::from("S-001")).unwrap()
    }

    #[rstest]
    fn test_add_order_indexes_strategy_and_position() {
        let mut db = database();
        let order = test_order("O-1");

        db.add_order(
            &order,
            Some(PositionId::from("P-1")),
            StrategyId::from("S-001"),
        );

        assert!(db.order_exists(&order.cl_ord_id));
        assert_eq!(
            db.get_strategy_for_order(&order.cl_ord_id),
            Some(StrategyId::from("S-001"))
        );
        assert_eq!(
            db.get_position_id(&order.cl_ord_id),
            Some(PositionId::from("P-1"))
        );
    }

    #[rstest]
    fn test_duplicate_add_order_is_refused() {
        let mut db = database();
        let order = test_order("O-1");

        db.add_order(&order, None, StrategyId::from("S-001"));
        db.add_order(&order, None, StrategyId::from("S-002"));

        assert_eq!(
            db.get_strategy_for_order(&order.cl_ord_id),
            Some(StrategyId::from("S-001"))
        );
    }

    #[rstest]
    fn test_add_position_indexes_contributing_orders() {
        let mut db = database();
        let position = test_position("O-1", "P-1");

        db.add_position(&position, StrategyId::from("S-001"));

        assert!(db.position_exists(&position.id));
        assert_eq!(
            db.get_position_id(&ClientOrderId::from("O-1")),
            Some(PositionId::from("P-1"))
        );
        assert_eq!(db.positions_open_count(None, None), 1);
    }

    #[rstest]
    fn test_get_positions_open_filters() {
        let mut db = database();
        db.add_position(&test_position("O-1", "P-1"), StrategyId::from("S-001"));

        let symbol = Symbol::from("AUD/USD.SIM");
        let other = Symbol::from("EUR/USD.SIM");
        assert_eq!(db.get_positions_open(Some(&symbol), None).len(), 1);
        assert_eq!(db.get_positions_open(Some(&other), None).len(), 0);
        assert_eq!(
            db.get_positions_open(None, Some(&StrategyId::from("S-999"))).len(),
            0
        );
    }

    #[rstest]
    fn test_symbol_position_counts_include_closed() {
        let mut db = database();
        let mut position = test_position("O-1", "P-1");
        db.add_position(&position, StrategyId::from("S-001"));

        let closing = OrderFilled {
            cl_ord_id: ClientOrderId::from("O-2"),
            venue_order_id: None,
            trade_id: TradeId::from("T-2"),
            position_id: Some(position.id),
            symbol: position.symbol,
            order_side: OrderSide::Sell,
            last_qty: Quantity::from(100_000u64),
            last_px: Price::from("0.80010"),
            currency: Currency::from("USD"),
            liquidity_side: LiquiditySide::Taker,
            event_id: UUID4::new(),
            ts_event: UnixNanos::from(2),
            ts_init: UnixNanos::from(2),
        };
        position.apply(&closing).unwrap();
        db.update_position(&position);

        let counts = db.get_symbol_position_counts();
        assert_eq!(counts.get(&Symbol::from("AUD/USD.SIM")), Some(&1));
        assert_eq!(db.positions_open_count(None, None), 0);
        // The closing order is now indexed to the position as well
        assert_eq!(
            db.get_position_id(&ClientOrderId::from("O-2")),
            Some(position.id)
        );
    }

    #[rstest]
    fn test_reset_keeps_trader_id() {
        let mut db = database();
        db.add_order(&test_order("O-1"), None, StrategyId::from("S-001"));

        db.reset();

        assert_eq!(db.trader_id(), TraderId::from("TESTER-001"));
        assert!(!db.order_exists(&ClientOrderId::from("O-1")));
    }
}

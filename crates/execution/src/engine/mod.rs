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

//! Provides a generic `ExecutionEngine` for all environments.
//!
//! The execution engine sits between trading strategies and the execution
//! client, mediating every order command and every event reported back from
//! the venue. It is the single source of truth for the lifecycle of orders
//! and derived positions, and the enforcement point for pre-trade
//! validation, identifier assignment, persistence, strategy routing, and
//! portfolio accounting.

pub mod config;
pub mod stubs;

use std::{cell::RefCell, collections::VecDeque, fmt::Debug, rc::Rc};

use config::ExecutionEngineConfig;
use indexmap::IndexMap;
use meridian_common::{
    actor::Strategy,
    cache::ExecutionDatabase,
    clients::ExecutionClient,
    clock::Clock,
    generators::position_id::PositionIdGenerator,
    logging::{CMD, EVT, RECV, SEND},
    messages::execution::{
        AccountInquiry, CancelOrder, ExecutionEvent, ExecutionMessage, ModifyOrder,
        SubmitBracketOrder, SubmitOrder, TradingCommand,
    },
    portfolio::Portfolio,
    runner::TradingCommandSender,
};
use meridian_core::UUID4;
use meridian_model::{
    accounts::Account,
    enums::OmsType,
    events::{
        AccountState, OrderDenied, OrderEventAny, OrderFilled, OrderInvalid, PositionClosed,
        PositionEvent, PositionModified, PositionOpened,
    },
    identifiers::{AccountId, StrategyId, Symbol, TraderId},
    orders::{Order, OrderError},
    position::Position,
};
use rust_decimal::Decimal;

/// Central execution engine responsible for order routing and position
/// bookkeeping.
///
/// Commands and events share one internal FIFO which the engine drains
/// iteratively, so derived position events re-enter the event path with
/// bounded depth and in submission order. In-process callers invoke
/// [`ExecutionEngine::execute`] and [`ExecutionEngine::process`]
/// synchronously; the live variant feeds the same methods from a
/// single-consumer queue.
pub struct ExecutionEngine {
    trader_id: TraderId,
    account_id: AccountId,
    oms_type: OmsType,
    clock: Rc<RefCell<dyn Clock>>,
    database: Rc<RefCell<dyn ExecutionDatabase>>,
    portfolio: Rc<RefCell<dyn Portfolio>>,
    client: Option<Box<dyn ExecutionClient>>,
    strategies: IndexMap<StrategyId, Rc<RefCell<dyn Strategy>>>,
    pos_id_generator: PositionIdGenerator,
    account: Option<Account>,
    command_count: u64,
    event_count: u64,
    queue: Rc<RefCell<VecDeque<ExecutionMessage>>>,
    is_draining: bool,
    config: ExecutionEngineConfig,
}

impl Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ExecutionEngine))
            .field("trader_id", &self.trader_id)
            .field("account_id", &self.account_id)
            .field("oms_type", &self.oms_type)
            .field("strategy_count", &self.strategies.len())
            .finish()
    }
}

impl ExecutionEngine {
    /// Creates a new [`ExecutionEngine`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is stamped with a different trader
    /// identifier, or if `oms_type` is unspecified.
    pub fn new(
        trader_id: TraderId,
        account_id: AccountId,
        oms_type: OmsType,
        clock: Rc<RefCell<dyn Clock>>,
        database: Rc<RefCell<dyn ExecutionDatabase>>,
        portfolio: Rc<RefCell<dyn Portfolio>>,
        config: Option<ExecutionEngineConfig>,
    ) -> anyhow::Result<Self> {
        let database_trader_id = database.borrow().trader_id();
        if database_trader_id != trader_id {
            anyhow::bail!(
                "Database trader_id {database_trader_id} does not match engine trader_id {trader_id}"
            );
        }
        if oms_type == OmsType::Unspecified {
            anyhow::bail!("OMS type must be NETTING or HEDGING, was UNSPECIFIED");
        }

        Ok(Self {
            trader_id,
            account_id,
            oms_type,
            clock,
            database,
            portfolio,
            client: None,
            strategies: IndexMap::new(),
            pos_id_generator: PositionIdGenerator::new(trader_id),
            account: None,
            command_count: 0,
            event_count: 0,
            queue: Rc::new(RefCell::new(VecDeque::new())),
            is_draining: false,
            config: config.unwrap_or_default(),
        })
    }

    #[must_use]
    /// Returns the identifier of the trader this engine hosts.
    pub const fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    #[must_use]
    /// Returns the identifier of the account this engine hosts.
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    #[must_use]
    /// Returns the order management type of this engine.
    pub const fn oms_type(&self) -> OmsType {
        self.oms_type
    }

    #[must_use]
    /// Returns the trader account, once installed from an account event.
    pub const fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    #[must_use]
    /// Returns a reference to the execution database.
    pub fn database(&self) -> &Rc<RefCell<dyn ExecutionDatabase>> {
        &self.database
    }

    #[must_use]
    /// Returns the count of commands dispatched since construction or reset.
    pub const fn command_count(&self) -> u64 {
        self.command_count
    }

    #[must_use]
    /// Returns the count of events dispatched since construction or reset,
    /// including engine-generated events.
    pub const fn event_count(&self) -> u64 {
        self.event_count
    }

    #[must_use]
    /// Returns the position identifier count for the given symbol.
    pub fn position_id_count(&self, symbol: &Symbol) -> usize {
        self.pos_id_generator.count(symbol)
    }

    /// Returns a sender which enqueues commands onto the engine's internal
    /// queue.
    ///
    /// This is the back-reference handed to strategies at registration.
    /// Commands enqueued outside a dispatch cycle are taken up with the
    /// engine's next drain.
    #[must_use]
    pub fn command_sender(&self) -> Rc<dyn TradingCommandSender> {
        Rc::new(QueuedCommandSender {
            queue: self.queue.clone(),
        })
    }

    /// Registers the execution client.
    ///
    /// # Errors
    ///
    /// Returns an error if a client is already registered.
    pub fn register_client(&mut self, client: Box<dyn ExecutionClient>) -> anyhow::Result<()> {
        if self.client.is_some() {
            anyhow::bail!("An execution client is already registered");
        }
        log::debug!("Registered execution client");
        self.client = Some(client);
        Ok(())
    }

    /// Deregisters the execution client.
    ///
    /// # Errors
    ///
    /// Returns an error if no client is registered.
    pub fn deregister_client(&mut self) -> anyhow::Result<()> {
        if self.client.take().is_some() {
            log::debug!("Deregistered execution client");
            Ok(())
        } else {
            anyhow::bail!("No execution client registered")
        }
    }

    /// Registers the given strategy, binding the engine back-reference into
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy identifier is already registered.
    pub fn register_strategy(&mut self, strategy: Rc<RefCell<dyn Strategy>>) -> anyhow::Result<()> {
        let strategy_id = strategy.borrow().strategy_id();
        if self.strategies.contains_key(&strategy_id) {
            anyhow::bail!("Strategy {strategy_id} already registered");
        }

        strategy
            .borrow_mut()
            .register_execution_engine(self.command_sender());
        self.strategies.insert(strategy_id, strategy);
        log::info!("Registered strategy {strategy_id}");
        Ok(())
    }

    /// Deregisters the strategy with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy is not registered.
    pub fn deregister_strategy(&mut self, strategy_id: StrategyId) -> anyhow::Result<()> {
        if self.strategies.shift_remove(&strategy_id).is_some() {
            log::info!("Deregistered strategy {strategy_id}");
            Ok(())
        } else {
            anyhow::bail!("Strategy {strategy_id} not registered")
        }
    }

    #[must_use]
    /// Returns the identifiers of all registered strategies, in registration
    /// order.
    pub fn registered_strategies(&self) -> Vec<StrategyId> {
        self.strategies.keys().copied().collect()
    }

    #[must_use]
    /// Returns true if the summed signed quantity of open positions for the
    /// given symbol (and optionally strategy) is strictly greater than zero.
    pub fn is_net_long(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_position(symbol, strategy_id) > Decimal::ZERO
    }

    #[must_use]
    /// Returns true if the summed signed quantity of open positions for the
    /// given symbol (and optionally strategy) is strictly less than zero.
    pub fn is_net_short(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_position(symbol, strategy_id) < Decimal::ZERO
    }

    #[must_use]
    /// Returns true if no positions are open for the given filters.
    pub fn is_flat(&self, symbol: Option<&Symbol>, strategy_id: Option<&StrategyId>) -> bool {
        self.database
            .borrow()
            .positions_open_count(symbol, strategy_id)
            == 0
    }

    fn net_position(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> Decimal {
        self.database
            .borrow()
            .get_positions_open(Some(symbol), strategy_id)
            .iter()
            .map(|p| p.signed_qty)
            .sum()
    }

    /// Checks for residual working orders and open positions.
    pub fn check_residuals(&self) {
        self.database.borrow().check_residuals();
    }

    /// Seeds the position identifier generator from persisted position
    /// counts, so newly issued identifiers never collide with persisted
    /// ones.
    pub fn set_position_id_counts(&mut self) {
        let counts = self.database.borrow().get_symbol_position_counts();
        self.pos_id_generator.reset();
        for (symbol, count) in counts {
            self.pos_id_generator.set_count(symbol, count);
            log::info!("Set PositionId count for {symbol} to {count}");
        }
    }

    /// Starts the execution engine.
    pub fn start(&mut self) {
        self.set_position_id_counts();
        log::info!("Started");
    }

    /// Stops the execution engine.
    pub fn stop(&mut self) {
        self.check_residuals();
        log::info!("Stopped");
    }

    /// Resets the execution engine to its initial state.
    ///
    /// Zeroes the command and event counters, clears the strategy registry,
    /// and returns the position identifier generator counters to zero.
    pub fn reset(&mut self) {
        self.command_count = 0;
        self.event_count = 0;
        self.strategies.clear();
        self.pos_id_generator.reset();
        log::info!("Reset");
    }

    /// Disposes of the execution engine, releasing resources.
    pub fn dispose(&mut self) {
        log::info!("Disposed");
    }

    /// Executes a trading command.
    pub fn execute(&mut self, command: TradingCommand) {
        self.queue
            .borrow_mut()
            .push_back(ExecutionMessage::Command(command));
        self.drain();
    }

    /// Processes an execution event.
    pub fn process(&mut self, event: ExecutionEvent) {
        self.queue
            .borrow_mut()
            .push_back(ExecutionMessage::Event(event));
        self.drain();
    }

    fn drain(&mut self) {
        if self.is_draining {
            return;
        }
        self.is_draining = true;
        loop {
            let message = self.queue.borrow_mut().pop_front();
            match message {
                Some(ExecutionMessage::Command(command)) => {
                    self.command_count += 1;
                    self.execute_command(command);
                }
                Some(ExecutionMessage::Event(event)) => {
                    self.event_count += 1;
                    self.handle_event(event);
                }
                None => break,
            }
        }
        self.is_draining = false;
    }

    fn enqueue_event(&self, event: ExecutionEvent) {
        self.queue
            .borrow_mut()
            .push_back(ExecutionMessage::Event(event));
    }

    // -- COMMAND HANDLERS ------------------------------------------------

    fn execute_command(&mut self, command: TradingCommand) {
        if self.config.debug {
            log::debug!("{RECV}{CMD} {command}");
        }

        if self.client.is_none() {
            log::error!("Cannot execute command {command}: no execution client registered");
            return;
        }

        match command {
            TradingCommand::AccountInquiry(cmd) => self.handle_account_inquiry(&cmd),
            TradingCommand::SubmitOrder(cmd) => self.handle_submit_order(cmd),
            TradingCommand::SubmitBracketOrder(cmd) => self.handle_submit_bracket_order(cmd),
            TradingCommand::ModifyOrder(cmd) => self.handle_modify_order(&cmd),
            TradingCommand::CancelOrder(cmd) => self.handle_cancel_order(&cmd),
        }
    }

    fn handle_account_inquiry(&self, cmd: &AccountInquiry) {
        if let Some(client) = &self.client
            && let Err(e) = client.account_inquiry(cmd)
        {
            log::error!("Error on account inquiry: {e}");
        }
    }

    fn handle_submit_order(&mut self, cmd: SubmitOrder) {
        if self.database.borrow().order_exists(&cmd.order.cl_ord_id) {
            self.invalidate_order(&cmd.order, cmd.strategy_id, "cl_ord_id already exists");
            return;
        }

        if let Some(position_id) = cmd.position_id
            && !self.database.borrow().position_exists(&position_id)
        {
            self.invalidate_order(&cmd.order, cmd.strategy_id, "position_id does not exist");
            return;
        }

        self.database
            .borrow_mut()
            .add_order(&cmd.order, cmd.position_id, cmd.strategy_id);

        let result = self.client.as_ref().map(|c| c.submit_order(&cmd));
        if let Some(Err(e)) = result {
            log::error!("Error submitting order to client: {e}");
            self.deny_order(
                &cmd.order,
                cmd.strategy_id,
                &format!("failed-to-submit-order-to-client: {e}"),
            );
        }
    }

    fn handle_submit_bracket_order(&mut self, cmd: SubmitBracketOrder) {
        let collided: Vec<_> = cmd
            .bracket_order
            .legs()
            .iter()
            .filter(|(_, order)| self.database.borrow().order_exists(&order.cl_ord_id))
            .map(|(leg, _)| *leg)
            .collect();

        // All legs share a validation fate
        if !collided.is_empty() {
            for (leg, order) in cmd.bracket_order.legs() {
                self.invalidate_order(order, cmd.strategy_id, leg.invalidation_reason(&collided));
            }
            return;
        }

        {
            let mut database = self.database.borrow_mut();
            for (_, order) in cmd.bracket_order.legs() {
                database.add_order(order, None, cmd.strategy_id);
            }
        }

        let result = self.client.as_ref().map(|c| c.submit_bracket_order(&cmd));
        if let Some(Err(e)) = result {
            log::error!("Error submitting bracket order to client: {e}");
            for (_, order) in cmd.bracket_order.legs() {
                self.deny_order(
                    order,
                    cmd.strategy_id,
                    &format!("failed-to-submit-bracket-order-to-client: {e}"),
                );
            }
        }
    }

    fn handle_modify_order(&self, cmd: &ModifyOrder) {
        // The venue is authoritative for whether the order is still modifiable
        if let Some(client) = &self.client
            && let Err(e) = client.modify_order(cmd)
        {
            log::error!("Error modifying order: {e}");
        }
    }

    fn handle_cancel_order(&self, cmd: &CancelOrder) {
        if let Some(client) = &self.client
            && let Err(e) = client.cancel_order(cmd)
        {
            log::error!("Error canceling order: {e}");
        }
    }

    fn invalidate_order(&self, order: &Order, strategy_id: StrategyId, reason: &str) {
        log::error!("Order invalid: {reason}, cl_ord_id: {}", order.cl_ord_id);

        let ts_now = self.clock.borrow().timestamp_ns();
        let event = OrderInvalid {
            cl_ord_id: order.cl_ord_id,
            strategy_id,
            reason: reason.to_string(),
            event_id: UUID4::new(),
            ts_event: ts_now,
            ts_init: ts_now,
        };
        self.enqueue_event(ExecutionEvent::Order(OrderEventAny::Invalid(event)));
    }

    fn deny_order(&self, order: &Order, strategy_id: StrategyId, reason: &str) {
        log::error!("Order denied: {reason}, cl_ord_id: {}", order.cl_ord_id);

        let ts_now = self.clock.borrow().timestamp_ns();
        let event = OrderDenied {
            cl_ord_id: order.cl_ord_id,
            strategy_id,
            reason: reason.to_string(),
            event_id: UUID4::new(),
            ts_event: ts_now,
            ts_init: ts_now,
        };
        self.enqueue_event(ExecutionEvent::Order(OrderEventAny::Denied(event)));
    }

    // -- EVENT HANDLERS --------------------------------------------------

    fn handle_event(&mut self, event: ExecutionEvent) {
        if self.config.debug {
            log::debug!("{RECV}{EVT} {event}");
        }

        match event {
            ExecutionEvent::Order(event) => self.handle_order_event(event),
            ExecutionEvent::Position(event) => self.handle_position_event(event),
            ExecutionEvent::Account(event) => self.handle_account_event(event),
        }
    }

    fn handle_order_event(&mut self, event: OrderEventAny) {
        if matches!(event, OrderEventAny::CancelReject(_)) {
            let cl_ord_id = event.cl_ord_id();
            let strategy_id = self.database.borrow().get_strategy_for_order(&cl_ord_id);
            match strategy_id {
                Some(strategy_id) => {
                    self.send_to_strategy(ExecutionEvent::Order(event), Some(strategy_id));
                }
                None => {
                    log::error!("Cannot route {event}: no strategy indexed for {cl_ord_id}");
                }
            }
            return;
        }

        // Engine-generated events carry their strategy so they can be routed
        // even when the order was never persisted
        let strategy_override = event.strategy_id();

        let order = self.database.borrow().get_order(&event.cl_ord_id());
        let Some(mut order) = order else {
            if let Some(strategy_id) = strategy_override {
                self.send_to_strategy(ExecutionEvent::Order(event), Some(strategy_id));
            } else {
                log::warn!(
                    "Order with {} not found in the database to apply {event}",
                    event.cl_ord_id()
                );
            }
            return;
        };

        if let Err(e) = order.apply(&event) {
            match e {
                OrderError::InvalidStateTransition { .. } => {
                    log::warn!("InvalidStateTransition: {e}, did not apply {event}");
                }
                OrderError::DuplicateFill(_) => {
                    log::warn!("Duplicate fill: {e}, did not apply {event}");
                    return;
                }
                OrderError::ClientOrderIdMismatch { .. } => {
                    log::error!("Error applying event: {e}, did not apply {event}");
                    return;
                }
            }
        }

        self.database.borrow_mut().update_order(&order);

        if let OrderEventAny::Filled(fill) = event {
            self.handle_order_fill(fill);
        } else {
            let strategy_id = strategy_override.or_else(|| {
                self.database
                    .borrow()
                    .get_strategy_for_order(&event.cl_ord_id())
            });
            self.send_to_strategy(ExecutionEvent::Order(event), strategy_id);
        }
    }

    /// Resolves the target position for a fill and opens or updates it.
    fn handle_order_fill(&mut self, mut fill: OrderFilled) {
        let (mut indexed_position_id, strategy_id) = {
            let database = self.database.borrow();
            (
                database.get_position_id(&fill.cl_ord_id),
                database.get_strategy_for_order(&fill.cl_ord_id),
            )
        };

        let Some(strategy_id) = strategy_id else {
            log::error!(
                "Cannot handle order fill: no strategy indexed for {}",
                fill.cl_ord_id
            );
            return;
        };

        // NETTING collapses fills for the same symbol and strategy into one
        // net position
        if indexed_position_id.is_none()
            && fill.position_id.is_none()
            && self.oms_type == OmsType::Netting
        {
            indexed_position_id = self
                .database
                .borrow()
                .get_positions_open(Some(&fill.symbol), Some(&strategy_id))
                .first()
                .map(|p| p.id);
        }

        match fill.position_id {
            None => match indexed_position_id {
                None => {
                    let position_id = self.pos_id_generator.generate(fill.symbol);
                    fill.position_id = Some(position_id);
                    self.open_position(fill, strategy_id);
                }
                Some(position_id) => {
                    fill.position_id = Some(position_id);
                    self.update_position(fill, strategy_id);
                }
            },
            Some(_) => match indexed_position_id {
                None => self.open_position(fill, strategy_id),
                Some(_) => self.update_position(fill, strategy_id),
            },
        }
    }

    fn open_position(&mut self, fill: OrderFilled, strategy_id: StrategyId) {
        let position = match Position::new(&fill, strategy_id) {
            Ok(position) => position,
            Err(e) => {
                log::error!("Cannot open position: {e}");
                return;
            }
        };
        self.database
            .borrow_mut()
            .add_position(&position, strategy_id);

        let ts_init = self.clock.borrow().timestamp_ns();
        let event = PositionEvent::Opened(PositionOpened {
            position,
            fill: fill.clone(),
            event_id: UUID4::new(),
            ts_event: fill.ts_event,
            ts_init,
        });

        // The strategy sees the fill before its portfolio-level consequence
        self.send_to_strategy(
            ExecutionEvent::Order(OrderEventAny::Filled(fill)),
            Some(strategy_id),
        );
        self.enqueue_event(ExecutionEvent::Position(event));
    }

    fn update_position(&mut self, fill: OrderFilled, strategy_id: StrategyId) {
        let Some(position_id) = fill.position_id else {
            log::error!("Cannot update position: no position_id on fill {}", fill.trade_id);
            return;
        };

        let position = self.database.borrow().get_position(&position_id);
        let Some(mut position) = position else {
            log::error!("Cannot update position: {position_id} not found in the database");
            return;
        };

        if let Err(e) = position.apply(&fill) {
            log::error!("Error applying fill to {position_id}: {e}");
            return;
        }
        self.database.borrow_mut().update_position(&position);

        let ts_init = self.clock.borrow().timestamp_ns();
        let event = if position.is_closed() {
            PositionEvent::Closed(PositionClosed {
                position,
                fill: fill.clone(),
                event_id: UUID4::new(),
                ts_event: fill.ts_event,
                ts_init,
            })
        } else {
            PositionEvent::Modified(PositionModified {
                position,
                fill: fill.clone(),
                event_id: UUID4::new(),
                ts_event: fill.ts_event,
                ts_init,
            })
        };

        // The strategy sees the fill before its portfolio-level consequence
        self.send_to_strategy(
            ExecutionEvent::Order(OrderEventAny::Filled(fill)),
            Some(strategy_id),
        );
        self.enqueue_event(ExecutionEvent::Position(event));
    }

    fn handle_position_event(&mut self, event: PositionEvent) {
        self.portfolio.borrow_mut().update(&event);

        let strategy_id = event.strategy_id();
        self.send_to_strategy(ExecutionEvent::Position(event), Some(strategy_id));
    }

    fn handle_account_event(&mut self, event: AccountState) {
        let existing = self.database.borrow().get_account(&event.account_id);
        match existing {
            None => {
                if event.account_id == self.account_id {
                    let account = Account::new(event.clone());
                    self.account = Some(account.clone());
                    self.database.borrow_mut().add_account(account);
                    self.portfolio
                        .borrow_mut()
                        .set_base_currency(event.base_currency);
                    return;
                }
            }
            Some(mut account) => {
                if account.id == self.account_id {
                    account.apply(event);
                    self.account = Some(account.clone());
                    self.database.borrow_mut().update_account(account);
                    return;
                }
            }
        }

        log::warn!(
            "Cannot update account: event is for a different account {}",
            event.account_id
        );
    }

    // -- STRATEGY ROUTING ------------------------------------------------

    fn send_to_strategy(&self, event: ExecutionEvent, strategy_id: Option<StrategyId>) {
        let Some(strategy_id) = strategy_id else {
            log::error!("Cannot send event {event} to strategy: no strategy_id");
            return;
        };

        // Events can outlive a deregistered strategy, so test the registry
        // handle rather than the identifier
        let Some(strategy) = self.strategies.get(&strategy_id) else {
            log::error!("Cannot send event {event} to strategy: {strategy_id} not registered");
            return;
        };

        if self.config.debug {
            log::debug!("{SEND}{EVT} {event}");
        }
        strategy.borrow_mut().handle_event(&event);
    }
}

/// Enqueues commands onto an execution engine's internal queue.
#[derive(Debug)]
struct QueuedCommandSender {
    queue: Rc<RefCell<VecDeque<ExecutionMessage>>>,
}

impl TradingCommandSender for QueuedCommandSender {
    fn execute(&self, command: TradingCommand) {
        self.queue
            .borrow_mut()
            .push_back(ExecutionMessage::Command(command));
    }
}

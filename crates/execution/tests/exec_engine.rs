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

//! Tests module for `ExecutionEngine`.

use std::{cell::RefCell, rc::Rc};

use meridian_common::{
    cache::{ExecutionDatabase, InMemoryExecutionDatabase},
    clock::{Clock, TestClock},
    messages::execution::{
        AccountInquiry, CancelOrder, ExecutionEvent, ModifyOrder, SubmitBracketOrder, SubmitOrder,
        TradingCommand,
    },
};
use meridian_core::{UUID4, UnixNanos};
use meridian_execution::engine::{
    ExecutionEngine,
    config::ExecutionEngineConfig,
    stubs::{RecordingStrategy, StubExecutionClient, StubPortfolio},
};
use meridian_model::{
    enums::{LiquiditySide, OmsType, OrderSide, OrderStatus, TimeInForce},
    events::{
        AccountState, OrderAccepted, OrderCancelReject, OrderCancelled, OrderEventAny, OrderFilled,
        OrderSubmitted, PositionEvent,
    },
    identifiers::{
        AccountId, ClientOrderId, PositionId, StrategyId, Symbol, TradeId, TraderId, VenueOrderId,
    },
    orders::{BracketOrder, Order},
    position::Position,
    types::{AccountBalance, Currency, Price, Quantity},
};
use rstest::*;
use rust_decimal_macros::dec;

const TRADER: &str = "TESTER-001";
const ACCOUNT: &str = "SIM-001";
const STRATEGY: &str = "S-001";
const SYMBOL: &str = "AUD/USD.SIM";

struct TestHarness {
    engine: ExecutionEngine,
    database: Rc<RefCell<InMemoryExecutionDatabase>>,
    client_commands: Rc<RefCell<Vec<TradingCommand>>>,
    strategy_events: Rc<RefCell<Vec<ExecutionEvent>>>,
    portfolio_events: Rc<RefCell<Vec<PositionEvent>>>,
    portfolio_base_currency: Rc<RefCell<Option<Currency>>>,
}

fn harness(oms_type: OmsType) -> TestHarness {
    let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
    let database = Rc::new(RefCell::new(InMemoryExecutionDatabase::new(
        TraderId::from(TRADER),
    )));

    let portfolio_stub = StubPortfolio::new();
    let portfolio_events = portfolio_stub.events();
    let portfolio_base_currency = portfolio_stub.base_currency();

    let mut engine = ExecutionEngine::new(
        TraderId::from(TRADER),
        AccountId::from(ACCOUNT),
        oms_type,
        clock,
        database.clone(),
        Rc::new(RefCell::new(portfolio_stub)),
        Some(ExecutionEngineConfig { debug: true }),
    )
    .unwrap();

    let client = StubExecutionClient::new();
    let client_commands = client.commands();
    engine.register_client(Box::new(client)).unwrap();

    let strategy = RecordingStrategy::new(StrategyId::from(STRATEGY));
    let strategy_events = strategy.events();
    engine
        .register_strategy(Rc::new(RefCell::new(strategy)))
        .unwrap();

    TestHarness {
        engine,
        database,
        client_commands,
        strategy_events,
        portfolio_events,
        portfolio_base_currency,
    }
}

#[fixture]
fn netting() -> TestHarness {
    harness(OmsType::Netting)
}

#[fixture]
fn hedging() -> TestHarness {
    harness(OmsType::Hedging)
}

fn market_order(cl_ord_id: &str, side: OrderSide, qty: u64) -> Order {
    Order::market(
        ClientOrderId::from(cl_ord_id),
        Symbol::from(SYMBOL),
        side,
        Quantity::from(qty),
        UnixNanos::default(),
    )
}

fn submit(order: Order) -> TradingCommand {
    submit_for_position(order, None)
}

fn submit_for_position(order: Order, position_id: Option<PositionId>) -> TradingCommand {
    TradingCommand::SubmitOrder(SubmitOrder {
        trader_id: TraderId::from(TRADER),
        strategy_id: StrategyId::from(STRATEGY),
        position_id,
        order,
        command_id: UUID4::new(),
        ts_init: UnixNanos::default(),
    })
}

fn fill(cl_ord_id: &str, trade_id: &str, side: OrderSide, qty: u64) -> ExecutionEvent {
    fill_with_position(cl_ord_id, trade_id, side, qty, None)
}

fn fill_with_position(
    cl_ord_id: &str,
    trade_id: &str,
    side: OrderSide,
    qty: u64,
    position_id: Option<&str>,
) -> ExecutionEvent {
    ExecutionEvent::Order(OrderEventAny::Filled(OrderFilled {
        cl_ord_id: ClientOrderId::from(cl_ord_id),
        venue_order_id: Some(VenueOrderId::from("V-1")),
        trade_id: TradeId::from(trade_id),
        position_id: position_id.map(PositionId::from),
        symbol: Symbol::from(SYMBOL),
        order_side: side,
        last_qty: Quantity::from(qty),
        last_px: Price::from("0.80000"),
        currency: Currency::from("USD"),
        liquidity_side: LiquiditySide::Taker,
        event_id: UUID4::new(),
        ts_event: UnixNanos::from(1),
        ts_init: UnixNanos::from(1),
    }))
}

fn submitted(cl_ord_id: &str) -> ExecutionEvent {
    ExecutionEvent::Order(OrderEventAny::Submitted(OrderSubmitted {
        cl_ord_id: ClientOrderId::from(cl_ord_id),
        account_id: AccountId::from(ACCOUNT),
        event_id: UUID4::new(),
        ts_event: UnixNanos::from(1),
        ts_init: UnixNanos::from(1),
    }))
}

fn accepted(cl_ord_id: &str) -> ExecutionEvent {
    ExecutionEvent::Order(OrderEventAny::Accepted(OrderAccepted {
        cl_ord_id: ClientOrderId::from(cl_ord_id),
        venue_order_id: VenueOrderId::from("V-1"),
        account_id: AccountId::from(ACCOUNT),
        event_id: UUID4::new(),
        ts_event: UnixNanos::from(2),
        ts_init: UnixNanos::from(2),
    }))
}

fn account_state(account_id: &str) -> AccountState {
    let currency = Currency::from("USD");
    AccountState::new(
        AccountId::from(account_id),
        currency,
        vec![AccountBalance::new(
            currency,
            dec!(1000000),
            dec!(0),
            dec!(1000000),
        )],
        UUID4::new(),
        UnixNanos::from(1),
        UnixNanos::from(1),
    )
}

fn invalid_reasons(events: &[ExecutionEvent]) -> Vec<(ClientOrderId, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            ExecutionEvent::Order(OrderEventAny::Invalid(inv)) => {
                Some((inv.cl_ord_id, inv.reason.clone()))
            }
            _ => None,
        })
        .collect()
}

// -- CONSTRUCTION --------------------------------------------------------

#[rstest]
fn test_construction_fails_on_trader_id_mismatch() {
    let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
    let database = Rc::new(RefCell::new(InMemoryExecutionDatabase::new(
        TraderId::from("OTHER-999"),
    )));

    let result = ExecutionEngine::new(
        TraderId::from(TRADER),
        AccountId::from(ACCOUNT),
        OmsType::Netting,
        clock,
        database,
        Rc::new(RefCell::new(StubPortfolio::new())),
        None,
    );

    assert!(result.is_err());
}

#[rstest]
fn test_construction_fails_on_unspecified_oms_type() {
    let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
    let database = Rc::new(RefCell::new(InMemoryExecutionDatabase::new(
        TraderId::from(TRADER),
    )));

    let result = ExecutionEngine::new(
        TraderId::from(TRADER),
        AccountId::from(ACCOUNT),
        OmsType::Unspecified,
        clock,
        database,
        Rc::new(RefCell::new(StubPortfolio::new())),
        None,
    );

    assert!(result.is_err());
}

// -- STRATEGY REGISTRY ---------------------------------------------------

#[rstest]
fn test_register_strategy_twice_is_an_error(mut netting: TestHarness) {
    let strategy = RecordingStrategy::new(StrategyId::from(STRATEGY));

    let result = netting
        .engine
        .register_strategy(Rc::new(RefCell::new(strategy)));

    assert!(result.is_err());
    assert_eq!(
        netting.engine.registered_strategies(),
        vec![StrategyId::from(STRATEGY)]
    );
}

#[rstest]
fn test_deregister_unknown_strategy_is_an_error(mut netting: TestHarness) {
    let result = netting
        .engine
        .deregister_strategy(StrategyId::from("S-UNKNOWN"));

    assert!(result.is_err());
}

#[rstest]
fn test_registration_binds_command_sender(mut netting: TestHarness) {
    let strategy = RecordingStrategy::new(StrategyId::from("S-002"));
    let strategy = Rc::new(RefCell::new(strategy));
    netting.engine.register_strategy(strategy.clone()).unwrap();

    assert!(strategy.borrow().sender().is_some());
}

// -- COMMAND DISPATCH ----------------------------------------------------

#[rstest]
fn test_account_inquiry_forwarded_to_client(mut netting: TestHarness) {
    netting
        .engine
        .execute(TradingCommand::AccountInquiry(AccountInquiry {
            trader_id: TraderId::from(TRADER),
            account_id: AccountId::from(ACCOUNT),
            command_id: UUID4::new(),
            ts_init: UnixNanos::default(),
        }));

    assert_eq!(netting.client_commands.borrow().len(), 1);
    assert_eq!(netting.engine.command_count(), 1);
}

#[rstest]
fn test_submit_order_persists_and_forwards(mut netting: TestHarness) {
    let order = market_order("O-1", OrderSide::Buy, 100_000);

    netting.engine.execute(submit(order.clone()));

    assert!(netting.database.borrow().order_exists(&order.cl_ord_id));
    assert_eq!(
        netting
            .database
            .borrow()
            .get_strategy_for_order(&order.cl_ord_id),
        Some(StrategyId::from(STRATEGY))
    );
    assert_eq!(netting.client_commands.borrow().len(), 1);
    assert!(invalid_reasons(&netting.strategy_events.borrow()).is_empty());
}

#[rstest]
fn test_duplicate_submit_is_invalidated(mut netting: TestHarness) {
    let order = market_order("E-1", OrderSide::Buy, 100_000);

    netting.engine.execute(submit(order.clone()));
    netting.engine.execute(submit(order));

    // One submission reached the client, the duplicate was invalidated
    assert_eq!(netting.client_commands.borrow().len(), 1);
    let reasons = invalid_reasons(&netting.strategy_events.borrow());
    assert_eq!(reasons.len(), 1);
    assert_eq!(reasons[0].0, ClientOrderId::from("E-1"));
    assert!(reasons[0].1.contains("cl_ord_id already exists"));
    assert_eq!(netting.engine.command_count(), 2);
}

#[rstest]
fn test_submit_with_unknown_position_id_is_invalidated(mut netting: TestHarness) {
    let order = market_order("O-1", OrderSide::Buy, 100_000);

    netting
        .engine
        .execute(submit_for_position(order, Some(PositionId::from("P-404"))));

    assert!(netting.client_commands.borrow().is_empty());
    assert!(
        !netting
            .database
            .borrow()
            .order_exists(&ClientOrderId::from("O-1"))
    );
    let reasons = invalid_reasons(&netting.strategy_events.borrow());
    assert_eq!(reasons.len(), 1);
    assert!(reasons[0].1.contains("position_id does not exist"));
}

#[rstest]
fn test_submit_order_exactly_one_of_persisted_or_invalidated(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));

    let persisted = netting
        .database
        .borrow()
        .order_exists(&ClientOrderId::from("O-1"));
    let invalidated = invalid_reasons(&netting.strategy_events.borrow()).len();

    assert!(persisted);
    assert_eq!(invalidated, 1);
}

#[rstest]
fn test_client_refusal_denies_order(mut netting: TestHarness) {
    netting.engine.deregister_client().unwrap();
    netting
        .engine
        .register_client(Box::new(StubExecutionClient::failing_submits()))
        .unwrap();

    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));

    let events = netting.strategy_events.borrow();
    let denied = events.iter().any(|e| {
        matches!(
            e,
            ExecutionEvent::Order(OrderEventAny::Denied(d))
                if d.reason.contains("failed-to-submit-order-to-client")
        )
    });
    assert!(denied);
}

#[rstest]
fn test_modify_and_cancel_forwarded_without_validation(mut netting: TestHarness) {
    netting.engine.execute(TradingCommand::ModifyOrder(ModifyOrder {
        trader_id: TraderId::from(TRADER),
        cl_ord_id: ClientOrderId::from("O-UNKNOWN"),
        quantity: Some(Quantity::from(50_000u64)),
        price: None,
        command_id: UUID4::new(),
        ts_init: UnixNanos::default(),
    }));
    netting.engine.execute(TradingCommand::CancelOrder(CancelOrder {
        trader_id: TraderId::from(TRADER),
        cl_ord_id: ClientOrderId::from("O-UNKNOWN"),
        command_id: UUID4::new(),
        ts_init: UnixNanos::default(),
    }));

    assert_eq!(netting.client_commands.borrow().len(), 2);
    assert_eq!(netting.engine.command_count(), 2);
}

// -- BRACKET ORDERS ------------------------------------------------------

fn bracket(entry: &str, stop: &str, take_profit: Option<&str>) -> TradingCommand {
    let entry = market_order(entry, OrderSide::Buy, 100_000);
    let stop_loss = Order::stop_market(
        ClientOrderId::from(stop),
        Symbol::from(SYMBOL),
        OrderSide::Sell,
        Quantity::from(100_000u64),
        Price::from("0.79000"),
        TimeInForce::Gtc,
        UnixNanos::default(),
    );
    let take_profit = take_profit.map(|id| {
        Order::limit(
            ClientOrderId::from(id),
            Symbol::from(SYMBOL),
            OrderSide::Sell,
            Quantity::from(100_000u64),
            Price::from("0.81000"),
            TimeInForce::Gtc,
            UnixNanos::default(),
        )
    });

    TradingCommand::SubmitBracketOrder(SubmitBracketOrder {
        trader_id: TraderId::from(TRADER),
        strategy_id: StrategyId::from(STRATEGY),
        bracket_order: BracketOrder::new(entry, stop_loss, take_profit),
        command_id: UUID4::new(),
        ts_init: UnixNanos::default(),
    })
}

#[rstest]
fn test_submit_bracket_order_persists_all_legs(mut netting: TestHarness) {
    netting.engine.execute(bracket("E-2", "SL-2", Some("TP-2")));

    let database = netting.database.borrow();
    assert!(database.order_exists(&ClientOrderId::from("E-2")));
    assert!(database.order_exists(&ClientOrderId::from("SL-2")));
    assert!(database.order_exists(&ClientOrderId::from("TP-2")));
    drop(database);

    let commands = netting.client_commands.borrow();
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], TradingCommand::SubmitBracketOrder(_)));
}

#[rstest]
fn test_bracket_collision_on_take_profit_invalidates_every_leg(mut netting: TestHarness) {
    netting
        .database
        .borrow_mut()
        .add_order(
            &market_order("TP-1", OrderSide::Sell, 100_000),
            None,
            StrategyId::from(STRATEGY),
        );

    netting.engine.execute(bracket("E-2", "SL-2", Some("TP-1")));

    assert!(netting.client_commands.borrow().is_empty());

    let reasons = invalid_reasons(&netting.strategy_events.borrow());
    assert_eq!(reasons.len(), 3);
    let reason_for = |id: &str| {
        reasons
            .iter()
            .find(|(cl_ord_id, _)| *cl_ord_id == ClientOrderId::from(id))
            .map(|(_, reason)| reason.as_str())
            .unwrap()
    };
    assert_eq!(reason_for("E-2"), "OCO cl_ord_id already exists");
    assert_eq!(reason_for("SL-2"), "OCO cl_ord_id already exists");
    assert_eq!(reason_for("TP-1"), "cl_ord_id already exists");
}

#[rstest]
fn test_bracket_collision_on_entry_reports_parent_to_children(mut netting: TestHarness) {
    netting
        .database
        .borrow_mut()
        .add_order(
            &market_order("E-1", OrderSide::Buy, 100_000),
            None,
            StrategyId::from(STRATEGY),
        );

    netting.engine.execute(bracket("E-1", "SL-1", Some("TP-1")));

    let reasons = invalid_reasons(&netting.strategy_events.borrow());
    assert_eq!(reasons.len(), 3);
    let reason_for = |id: &str| {
        reasons
            .iter()
            .find(|(cl_ord_id, _)| *cl_ord_id == ClientOrderId::from(id))
            .map(|(_, reason)| reason.as_str())
            .unwrap()
    };
    assert_eq!(reason_for("E-1"), "cl_ord_id already exists");
    assert_eq!(reason_for("SL-1"), "parent cl_ord_id already exists");
    assert_eq!(reason_for("TP-1"), "parent cl_ord_id already exists");
}

// -- FILL CORRELATION ----------------------------------------------------

#[rstest]
fn test_open_then_close_without_venue_position_ids(mut netting: TestHarness) {
    let symbol = Symbol::from(SYMBOL);

    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    assert!(netting.engine.is_net_long(&symbol, None));
    assert!(!netting.engine.is_flat(Some(&symbol), None));
    assert_eq!(netting.engine.position_id_count(&symbol), 1);

    let opened = netting
        .portfolio_events
        .borrow()
        .iter()
        .filter(|e| matches!(e, PositionEvent::Opened(_)))
        .count();
    assert_eq!(opened, 1);

    netting.engine.execute(submit(market_order("O-2", OrderSide::Sell, 100)));
    netting.engine.process(fill("O-2", "T-2", OrderSide::Sell, 100));

    assert!(netting.engine.is_flat(Some(&symbol), None));
    assert!(!netting.engine.is_net_long(&symbol, None));
    let closed = netting
        .portfolio_events
        .borrow()
        .iter()
        .filter(|e| matches!(e, PositionEvent::Closed(_)))
        .count();
    assert_eq!(closed, 1);
    // Consolidated into one net position, so no second identifier was minted
    assert_eq!(netting.engine.position_id_count(&symbol), 1);
}

#[rstest]
fn test_hedging_opens_distinct_positions_per_fill(mut hedging: TestHarness) {
    let symbol = Symbol::from(SYMBOL);

    hedging.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    hedging.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));
    hedging.engine.execute(submit(market_order("O-2", OrderSide::Buy, 50)));
    hedging.engine.process(fill("O-2", "T-2", OrderSide::Buy, 50));

    assert_eq!(hedging.engine.position_id_count(&symbol), 2);
    assert_eq!(hedging.database.borrow().positions_open_count(None, None), 2);
    assert!(hedging.engine.is_net_long(&symbol, None));
}

#[rstest]
fn test_second_fill_for_same_order_updates_position(mut hedging: TestHarness) {
    let symbol = Symbol::from(SYMBOL);

    hedging.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    hedging.engine.process(fill("O-1", "T-1", OrderSide::Buy, 60));
    hedging.engine.process(fill("O-1", "T-2", OrderSide::Buy, 40));

    // Same order, same position: only one identifier minted
    assert_eq!(hedging.engine.position_id_count(&symbol), 1);
    assert_eq!(hedging.database.borrow().positions_open_count(None, None), 1);

    let modified = hedging
        .portfolio_events
        .borrow()
        .iter()
        .filter(|e| matches!(e, PositionEvent::Modified(_)))
        .count();
    assert_eq!(modified, 1);
}

#[rstest]
fn test_venue_supplied_position_id_opens_and_updates(mut hedging: TestHarness) {
    let symbol = Symbol::from(SYMBOL);

    hedging.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    hedging
        .engine
        .process(fill_with_position("O-1", "T-1", OrderSide::Buy, 100, Some("P-VENUE-1")));

    // Venue identifier adopted, nothing minted
    assert_eq!(hedging.engine.position_id_count(&symbol), 0);
    assert!(
        hedging
            .database
            .borrow()
            .position_exists(&PositionId::from("P-VENUE-1"))
    );

    hedging
        .engine
        .process(fill_with_position("O-1", "T-2", OrderSide::Sell, 100, Some("P-VENUE-1")));

    let position = hedging
        .database
        .borrow()
        .get_position(&PositionId::from("P-VENUE-1"))
        .unwrap();
    assert!(position.is_closed());
}

#[rstest]
fn test_submit_against_existing_position_updates_it(mut hedging: TestHarness) {
    hedging.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    hedging.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    let position_id = hedging
        .database
        .borrow()
        .get_position_id(&ClientOrderId::from("O-1"))
        .unwrap();

    hedging.engine.execute(submit_for_position(
        market_order("O-2", OrderSide::Sell, 100),
        Some(position_id),
    ));
    hedging.engine.process(fill("O-2", "T-2", OrderSide::Sell, 100));

    let position = hedging.database.borrow().get_position(&position_id).unwrap();
    assert!(position.is_closed());
    assert_eq!(hedging.database.borrow().positions_open_count(None, None), 0);
}

#[rstest]
fn test_fill_for_unknown_order_is_dropped(mut netting: TestHarness) {
    netting.engine.process(fill("O-GHOST", "T-1", OrderSide::Buy, 100));

    assert!(netting.strategy_events.borrow().is_empty());
    assert!(netting.portfolio_events.borrow().is_empty());
    assert_eq!(netting.engine.event_count(), 1);
}

#[rstest]
fn test_fill_for_missing_indexed_position_is_dropped(mut netting: TestHarness) {
    // Index O-1 against a position which was never persisted
    netting.database.borrow_mut().add_order(
        &market_order("O-1", OrderSide::Buy, 100),
        Some(PositionId::from("P-MISSING")),
        StrategyId::from(STRATEGY),
    );

    netting.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    assert!(netting.portfolio_events.borrow().is_empty());
    assert_eq!(netting.database.borrow().positions_open_count(None, None), 0);
}

#[rstest]
fn test_strategy_sees_fill_before_position_event(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    let events = netting.strategy_events.borrow();
    let fill_index = events
        .iter()
        .position(|e| matches!(e, ExecutionEvent::Order(OrderEventAny::Filled(_))))
        .unwrap();
    let position_index = events
        .iter()
        .position(|e| matches!(e, ExecutionEvent::Position(PositionEvent::Opened(_))))
        .unwrap();
    assert!(fill_index < position_index);
}

// -- ORDER EVENTS --------------------------------------------------------

#[rstest]
fn test_order_events_are_applied_and_routed(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(submitted("O-1"));
    netting.engine.process(accepted("O-1"));

    let order = netting
        .database
        .borrow()
        .get_order(&ClientOrderId::from("O-1"))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert_eq!(order.venue_order_id, Some(VenueOrderId::from("V-1")));

    let routed = netting
        .strategy_events
        .borrow()
        .iter()
        .filter(|e| {
            matches!(
                e,
                ExecutionEvent::Order(
                    OrderEventAny::Submitted(_) | OrderEventAny::Accepted(_)
                )
            )
        })
        .count();
    assert_eq!(routed, 2);
}

#[rstest]
fn test_event_for_unknown_order_is_dropped(mut netting: TestHarness) {
    netting.engine.process(accepted("O-UNKNOWN"));

    assert!(netting.strategy_events.borrow().is_empty());
    assert_eq!(netting.engine.event_count(), 1);
}

#[rstest]
fn test_illegal_transition_is_logged_and_flow_continues(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(submitted("O-1"));

    // Cancelled is illegal from SUBMITTED; the order stays put but the
    // event is still routed to the strategy
    netting
        .engine
        .process(ExecutionEvent::Order(OrderEventAny::Cancelled(OrderCancelled {
            cl_ord_id: ClientOrderId::from("O-1"),
            event_id: UUID4::new(),
            ts_event: UnixNanos::from(3),
            ts_init: UnixNanos::from(3),
        })));

    let order = netting
        .database
        .borrow()
        .get_order(&ClientOrderId::from("O-1"))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Submitted);

    let cancelled_routed = netting
        .strategy_events
        .borrow()
        .iter()
        .any(|e| matches!(e, ExecutionEvent::Order(OrderEventAny::Cancelled(_))));
    assert!(cancelled_routed);
}

#[rstest]
fn test_cancel_reject_routed_to_strategy(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));

    netting
        .engine
        .process(ExecutionEvent::Order(OrderEventAny::CancelReject(
            OrderCancelReject {
                cl_ord_id: ClientOrderId::from("O-1"),
                response_to: "CancelOrder".to_string(),
                reason: "ORDER_NOT_FOUND".to_string(),
                event_id: UUID4::new(),
                ts_event: UnixNanos::from(1),
                ts_init: UnixNanos::from(1),
            },
        )));

    let routed = netting
        .strategy_events
        .borrow()
        .iter()
        .any(|e| matches!(e, ExecutionEvent::Order(OrderEventAny::CancelReject(_))));
    assert!(routed);
}

#[rstest]
fn test_cancel_reject_for_unknown_order_is_dropped(mut netting: TestHarness) {
    netting
        .engine
        .process(ExecutionEvent::Order(OrderEventAny::CancelReject(
            OrderCancelReject {
                cl_ord_id: ClientOrderId::from("X-Z"),
                response_to: "CancelOrder".to_string(),
                reason: "ORDER_NOT_FOUND".to_string(),
                event_id: UUID4::new(),
                ts_event: UnixNanos::from(1),
                ts_init: UnixNanos::from(1),
            },
        )));

    assert!(netting.strategy_events.borrow().is_empty());
    assert_eq!(netting.engine.event_count(), 1);
}

// -- ACCOUNT UPDATER -----------------------------------------------------

#[rstest]
fn test_first_matching_account_event_installs_account(mut netting: TestHarness) {
    netting
        .engine
        .process(ExecutionEvent::Account(account_state(ACCOUNT)));

    assert!(netting.engine.account().is_some());
    assert!(
        netting
            .database
            .borrow()
            .get_account(&AccountId::from(ACCOUNT))
            .is_some()
    );
    assert_eq!(
        *netting.portfolio_base_currency.borrow(),
        Some(Currency::from("USD"))
    );
}

#[rstest]
fn test_subsequent_matching_account_event_updates_in_place(mut netting: TestHarness) {
    netting
        .engine
        .process(ExecutionEvent::Account(account_state(ACCOUNT)));
    netting
        .engine
        .process(ExecutionEvent::Account(account_state(ACCOUNT)));

    assert_eq!(netting.engine.account().unwrap().event_count(), 2);
}

#[rstest]
fn test_account_event_for_other_account_is_dropped(mut netting: TestHarness) {
    netting
        .engine
        .process(ExecutionEvent::Account(account_state("A-2")));

    assert!(netting.engine.account().is_none());
    assert!(
        netting
            .database
            .borrow()
            .get_account(&AccountId::from("A-2"))
            .is_none()
    );
    assert_eq!(netting.engine.event_count(), 1);
}

// -- COUNTERS, RESET, IDENTIFIER SEEDING ---------------------------------

#[rstest]
fn test_counters_track_dispatched_messages(mut netting: TestHarness) {
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(submitted("O-1"));
    netting.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    assert_eq!(netting.engine.command_count(), 1);
    // Two processed events plus the engine-generated PositionOpened
    assert_eq!(netting.engine.event_count(), 3);
}

#[rstest]
fn test_reset_zeroes_counters_registry_and_generator(mut netting: TestHarness) {
    let symbol = Symbol::from(SYMBOL);
    netting.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    netting.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));
    assert_eq!(netting.engine.position_id_count(&symbol), 1);

    netting.engine.reset();

    assert_eq!(netting.engine.command_count(), 0);
    assert_eq!(netting.engine.event_count(), 0);
    assert!(netting.engine.registered_strategies().is_empty());
    assert_eq!(netting.engine.position_id_count(&symbol), 0);
}

#[rstest]
fn test_set_position_id_counts_seeds_generator_from_database(mut netting: TestHarness) {
    let symbol = Symbol::from(SYMBOL);

    // Persist a position as if from a previous engine run
    let opening = match fill("O-0", "T-0", OrderSide::Buy, 100) {
        ExecutionEvent::Order(OrderEventAny::Filled(mut f)) => {
            f.position_id = Some(PositionId::from("P-001-AUD/USD.SIM-1"));
            f
        }
        _ => unreachable!(),
    };
    let position = Position::new(&opening, StrategyId::from(STRATEGY)).unwrap();
    netting
        .database
        .borrow_mut()
        .add_position(&position, StrategyId::from(STRATEGY));

    netting.engine.set_position_id_counts();

    assert_eq!(netting.engine.position_id_count(&symbol), 1);
}

#[rstest]
fn test_position_id_generation_is_monotonic_per_symbol(mut hedging: TestHarness) {
    for i in 1..=3 {
        hedging
            .engine
            .execute(submit(market_order(&format!("O-{i}"), OrderSide::Buy, 100)));
        hedging
            .engine
            .process(fill(&format!("O-{i}"), &format!("T-{i}"), OrderSide::Buy, 100));
    }

    let ids: Vec<_> = hedging
        .portfolio_events
        .borrow()
        .iter()
        .map(|e| e.position_id().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            "P-001-AUD/USD.SIM-1",
            "P-001-AUD/USD.SIM-2",
            "P-001-AUD/USD.SIM-3",
        ]
    );
}

#[rstest]
fn test_net_queries_respect_strategy_filter(mut hedging: TestHarness) {
    let symbol = Symbol::from(SYMBOL);
    let other_strategy = StrategyId::from("S-002");

    hedging.engine.execute(submit(market_order("O-1", OrderSide::Buy, 100)));
    hedging.engine.process(fill("O-1", "T-1", OrderSide::Buy, 100));

    assert!(hedging.engine.is_net_long(&symbol, Some(&StrategyId::from(STRATEGY))));
    assert!(!hedging.engine.is_net_long(&symbol, Some(&other_strategy)));
    assert!(hedging.engine.is_flat(Some(&symbol), Some(&other_strategy)));
    assert!(!hedging.engine.is_net_short(&symbol, None));
}

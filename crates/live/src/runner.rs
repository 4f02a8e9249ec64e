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

//! Single-consumer runner serializing all command and event processing.

use std::{fmt::Debug, sync::Arc, thread};

use arc_swap::ArcSwap;
use meridian_common::messages::execution::{ExecutionEvent, ExecutionMessage, TradingCommand};
use meridian_execution::engine::ExecutionEngine;
use meridian_model::identifiers::{StrategyId, Symbol};
use rust_decimal::Decimal;

/// The net open quantity held for one (symbol, strategy) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetPosition {
    pub symbol: Symbol,
    pub strategy_id: StrategyId,
    pub signed_qty: Decimal,
}

/// A point-in-time view of engine state, published by the consumer worker
/// after every processed message.
///
/// Producer threads serve queries from the snapshot and never touch the
/// database directly.
#[derive(Clone, Debug, Default)]
pub struct ExecutionSnapshot {
    /// Commands dispatched since construction or reset.
    pub command_count: u64,
    /// Events dispatched since construction or reset.
    pub event_count: u64,
    /// Net open quantities per (symbol, strategy).
    pub net_positions: Vec<NetPosition>,
}

/// A cloneable, thread-safe handle to a live execution engine.
///
/// `execute` and `process` are non-blocking enqueues returning once the
/// message is accepted; ordering is per-producer FIFO with a total order
/// over processing (single consumer). Once enqueued, a message is always
/// processed.
#[derive(Clone, Debug)]
pub struct LiveExecutionEngine {
    msg_tx: tokio::sync::mpsc::UnboundedSender<ExecutionMessage>,
    signal_tx: tokio::sync::mpsc::UnboundedSender<()>,
    snapshot: Arc<ArcSwap<ExecutionSnapshot>>,
}

impl LiveExecutionEngine {
    /// Enqueues a trading command for execution.
    pub fn execute(&self, command: TradingCommand) {
        if let Err(e) = self.msg_tx.send(ExecutionMessage::Command(command)) {
            log::error!("Failed to send trading command: {e}");
        }
    }

    /// Enqueues an execution event for processing.
    pub fn process(&self, event: ExecutionEvent) {
        if let Err(e) = self.msg_tx.send(ExecutionMessage::Event(event)) {
            log::error!("Failed to send execution event: {e}");
        }
    }

    /// Signals the consumer worker to stop.
    pub fn stop(&self) {
        if let Err(e) = self.signal_tx.send(()) {
            log::error!("Failed to send shutdown signal: {e}");
        }
    }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ExecutionSnapshot> {
        self.snapshot.load_full()
    }

    /// Returns the count of commands dispatched, as of the latest snapshot.
    #[must_use]
    pub fn command_count(&self) -> u64 {
        self.snapshot.load().command_count
    }

    /// Returns the count of events dispatched, as of the latest snapshot.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.snapshot.load().event_count
    }

    /// Returns true if the summed signed open quantity for the given symbol
    /// (and optionally strategy) is strictly greater than zero, as of the
    /// latest snapshot.
    #[must_use]
    pub fn is_net_long(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_position(symbol, strategy_id) > Decimal::ZERO
    }

    /// Returns true if the summed signed open quantity for the given symbol
    /// (and optionally strategy) is strictly less than zero, as of the
    /// latest snapshot.
    #[must_use]
    pub fn is_net_short(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_position(symbol, strategy_id) < Decimal::ZERO
    }

    /// Returns true if no positions are open for the given filters, as of
    /// the latest snapshot.
    #[must_use]
    pub fn is_flat(&self, symbol: Option<&Symbol>, strategy_id: Option<&StrategyId>) -> bool {
        !self.snapshot.load().net_positions.iter().any(|p| {
            symbol.is_none_or(|s| &p.symbol == s)
                && strategy_id.is_none_or(|s| &p.strategy_id == s)
        })
    }

    fn net_position(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> Decimal {
        self.snapshot
            .load()
            .net_positions
            .iter()
            .filter(|p| &p.symbol == symbol)
            .filter(|p| strategy_id.is_none_or(|s| &p.strategy_id == s))
            .map(|p| p.signed_qty)
            .sum()
    }
}

/// The single consumer draining the live engine's message queue.
///
/// Owns the inner [`ExecutionEngine`]: only the consumer mutates the
/// database, strategy registry, identifier generator, and counters.
pub struct LiveRunner {
    engine: ExecutionEngine,
    msg_rx: tokio::sync::mpsc::UnboundedReceiver<ExecutionMessage>,
    signal_rx: tokio::sync::mpsc::UnboundedReceiver<()>,
    snapshot: Arc<ArcSwap<ExecutionSnapshot>>,
}

impl Debug for LiveRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(LiveRunner))
            .field("engine", &self.engine)
            .finish()
    }
}

impl LiveRunner {
    /// Creates a new [`LiveRunner`] around the given engine, returning the
    /// runner together with its producer handle.
    #[must_use]
    pub fn new(engine: ExecutionEngine) -> (Self, LiveExecutionEngine) {
        let (msg_tx, msg_rx) = tokio::sync::mpsc::unbounded_channel::<ExecutionMessage>();
        let (signal_tx, signal_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        let snapshot = Arc::new(ArcSwap::from_pointee(ExecutionSnapshot::default()));

        let runner = Self {
            engine,
            msg_rx,
            signal_rx,
            snapshot: snapshot.clone(),
        };
        let handle = LiveExecutionEngine {
            msg_tx,
            signal_tx,
            snapshot,
        };
        (runner, handle)
    }

    /// Runs the consumer loop until a stop signal arrives or all producer
    /// handles are dropped.
    pub async fn run(&mut self) {
        log::info!("LiveRunner starting");

        loop {
            tokio::select! {
                Some(()) = self.signal_rx.recv() => {
                    log::info!("LiveRunner received signal, shutting down");
                    return;
                },
                Some(message) = self.msg_rx.recv() => {
                    self.handle_message(message);
                },
                else => {
                    log::debug!("LiveRunner all channels closed, exiting");
                    return;
                }
            }
        }
    }

    fn handle_message(&mut self, message: ExecutionMessage) {
        match message {
            ExecutionMessage::Command(command) => self.engine.execute(command),
            ExecutionMessage::Event(event) => self.engine.process(event),
        }
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let net_positions = self
            .engine
            .database()
            .borrow()
            .get_positions_open(None, None)
            .iter()
            .map(|p| NetPosition {
                symbol: p.symbol,
                strategy_id: p.strategy_id,
                signed_qty: p.signed_qty,
            })
            .collect();

        self.snapshot.store(Arc::new(ExecutionSnapshot {
            command_count: self.engine.command_count(),
            event_count: self.engine.event_count(),
            net_positions,
        }));
    }
}

/// Spawns a live execution engine on a dedicated consumer thread.
///
/// The factory runs on the worker thread and builds the inner engine there
/// (the engine is deliberately not `Send`). The worker is detached, so it
/// never blocks process shutdown; it stops on [`LiveExecutionEngine::stop`]
/// or when every producer handle has been dropped.
///
/// # Errors
///
/// Returns an error if the factory fails or the worker thread cannot be
/// spawned.
pub fn spawn<F>(factory: F) -> anyhow::Result<LiveExecutionEngine>
where
    F: FnOnce() -> anyhow::Result<ExecutionEngine> + Send + 'static,
{
    let (msg_tx, msg_rx) = tokio::sync::mpsc::unbounded_channel::<ExecutionMessage>();
    let (signal_tx, signal_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let snapshot = Arc::new(ArcSwap::from_pointee(ExecutionSnapshot::default()));

    let worker_snapshot = snapshot.clone();
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<anyhow::Result<()>>();

    thread::Builder::new()
        .name("exec-engine".to_string())
        .spawn(move || {
            let engine = match factory() {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(()));
                    engine
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!("Failed to build runtime for LiveRunner: {e}");
                    return;
                }
            };

            let mut runner = LiveRunner {
                engine,
                msg_rx,
                signal_rx,
                snapshot: worker_snapshot,
            };
            runtime.block_on(runner.run());
        })?;

    ready_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Engine worker terminated during startup"))??;

    Ok(LiveExecutionEngine {
        msg_tx,
        signal_tx,
        snapshot,
    })
}

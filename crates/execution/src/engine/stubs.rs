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

//! Stub implementations of the engine's external contracts for testing.

use std::{cell::RefCell, rc::Rc};

use meridian_common::{
    actor::Strategy,
    clients::ExecutionClient,
    messages::execution::{
        AccountInquiry, CancelOrder, ExecutionEvent, ModifyOrder, SubmitBracketOrder, SubmitOrder,
        TradingCommand,
    },
    portfolio::Portfolio,
    runner::TradingCommandSender,
};
use meridian_model::{
    events::PositionEvent,
    identifiers::StrategyId,
    types::Currency,
};

/// A stub execution client recording every command it receives.
#[derive(Debug, Default)]
pub struct StubExecutionClient {
    commands: Rc<RefCell<Vec<TradingCommand>>>,
    fail_submits: bool,
}

impl StubExecutionClient {
    /// Creates a new [`StubExecutionClient`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stub which fails every submit call.
    #[must_use]
    pub fn failing_submits() -> Self {
        Self {
            commands: Rc::new(RefCell::new(Vec::new())),
            fail_submits: true,
        }
    }

    /// Returns a shared handle to the recorded commands.
    #[must_use]
    pub fn commands(&self) -> Rc<RefCell<Vec<TradingCommand>>> {
        self.commands.clone()
    }
}

impl ExecutionClient for StubExecutionClient {
    fn account_inquiry(&self, command: &AccountInquiry) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(TradingCommand::AccountInquiry(*command));
        Ok(())
    }

    fn submit_order(&self, command: &SubmitOrder) -> anyhow::Result<()> {
        if self.fail_submits {
            anyhow::bail!("stub refused submit");
        }
        self.commands
            .borrow_mut()
            .push(TradingCommand::SubmitOrder(command.clone()));
        Ok(())
    }

    fn submit_bracket_order(&self, command: &SubmitBracketOrder) -> anyhow::Result<()> {
        if self.fail_submits {
            anyhow::bail!("stub refused submit");
        }
        self.commands
            .borrow_mut()
            .push(TradingCommand::SubmitBracketOrder(command.clone()));
        Ok(())
    }

    fn modify_order(&self, command: &ModifyOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(TradingCommand::ModifyOrder(*command));
        Ok(())
    }

    fn cancel_order(&self, command: &CancelOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(TradingCommand::CancelOrder(*command));
        Ok(())
    }
}

/// A stub strategy recording every event routed to it.
#[derive(Debug)]
pub struct RecordingStrategy {
    strategy_id: StrategyId,
    events: Rc<RefCell<Vec<ExecutionEvent>>>,
    sender: Option<Rc<dyn TradingCommandSender>>,
}

impl RecordingStrategy {
    /// Creates a new [`RecordingStrategy`] with the given identifier.
    #[must_use]
    pub fn new(strategy_id: StrategyId) -> Self {
        Self {
            strategy_id,
            events: Rc::new(RefCell::new(Vec::new())),
            sender: None,
        }
    }

    /// Returns a shared handle to the recorded events.
    #[must_use]
    pub fn events(&self) -> Rc<RefCell<Vec<ExecutionEvent>>> {
        self.events.clone()
    }

    /// Returns the bound command sender, if registered.
    #[must_use]
    pub fn sender(&self) -> Option<Rc<dyn TradingCommandSender>> {
        self.sender.clone()
    }
}

impl Strategy for RecordingStrategy {
    fn strategy_id(&self) -> StrategyId {
        self.strategy_id
    }

    fn register_execution_engine(&mut self, sender: Rc<dyn TradingCommandSender>) {
        self.sender = Some(sender);
    }

    fn handle_event(&mut self, event: &ExecutionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// A stub portfolio recording position events and the base currency.
#[derive(Debug, Default)]
pub struct StubPortfolio {
    events: Rc<RefCell<Vec<PositionEvent>>>,
    base_currency: Rc<RefCell<Option<Currency>>>,
}

impl StubPortfolio {
    /// Creates a new [`StubPortfolio`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the recorded position events.
    #[must_use]
    pub fn events(&self) -> Rc<RefCell<Vec<PositionEvent>>> {
        self.events.clone()
    }

    /// Returns a shared handle to the recorded base currency.
    #[must_use]
    pub fn base_currency(&self) -> Rc<RefCell<Option<Currency>>> {
        self.base_currency.clone()
    }
}

impl Portfolio for StubPortfolio {
    fn update(&mut self, event: &PositionEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    fn set_base_currency(&mut self, currency: Currency) {
        *self.base_currency.borrow_mut() = Some(currency);
    }
}

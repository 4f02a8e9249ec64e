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

//! The trading strategy contract.

use std::{fmt::Debug, rc::Rc};

use meridian_model::identifiers::StrategyId;

use crate::{messages::execution::ExecutionEvent, runner::TradingCommandSender};

/// An opaque consumer of execution events, registered with the engine under
/// its strategy identifier.
pub trait Strategy: Debug {
    /// Returns the identifier of this strategy.
    fn strategy_id(&self) -> StrategyId;

    /// Binds the engine back-reference into the strategy.
    ///
    /// Called once at registration; the strategy emits commands through the
    /// given sender.
    fn register_execution_engine(&mut self, sender: Rc<dyn TradingCommandSender>);

    /// Handles an event routed to this strategy.
    fn handle_event(&mut self, event: &ExecutionEvent);
}

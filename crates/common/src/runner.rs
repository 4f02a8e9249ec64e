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

//! Message senders decoupling producers from the engine's dispatch loop.

use std::fmt::Debug;

use crate::messages::execution::TradingCommand;

/// Accepts trading commands for execution.
///
/// Handed to strategies at registration as their engine back-reference:
/// strategies emit commands through the sender and the engine drains them,
/// which keeps the reference non-owning in both engine variants.
pub trait TradingCommandSender: Debug {
    /// Accepts the given command for execution.
    fn execute(&self, command: TradingCommand);
}

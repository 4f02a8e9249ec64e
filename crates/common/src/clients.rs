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

//! The execution client contract for trading venue connectivity.

use std::fmt::Debug;

use crate::messages::execution::{
    AccountInquiry, CancelOrder, ModifyOrder, SubmitBracketOrder, SubmitOrder,
};

/// The outbound adapter which talks to an execution venue.
///
/// Calls are fire-and-forget from the engine's perspective; results return
/// asynchronously as events through the engine's event path.
pub trait ExecutionClient: Debug {
    /// Requests current account state from the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be passed to the venue.
    fn account_inquiry(&self, command: &AccountInquiry) -> anyhow::Result<()>;

    /// Submits an order to the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be passed to the venue.
    fn submit_order(&self, command: &SubmitOrder) -> anyhow::Result<()>;

    /// Submits a bracket order to the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be passed to the venue.
    fn submit_bracket_order(&self, command: &SubmitBracketOrder) -> anyhow::Result<()>;

    /// Requests modification of a working order at the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be passed to the venue.
    fn modify_order(&self, command: &ModifyOrder) -> anyhow::Result<()>;

    /// Requests cancellation of a working order at the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be passed to the venue.
    fn cancel_order(&self, command: &CancelOrder) -> anyhow::Result<()>;
}

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

//! Common services and contracts shared across the Meridian platform.
//!
//! Provides the ambient services the engines depend on (clock, logging tags,
//! identifier generators, the execution database) together with the contracts
//! which define the engine's boundary (execution client, portfolio,
//! strategy, command sender).

pub mod actor;
pub mod cache;
pub mod clients;
pub mod clock;
pub mod generators;
pub mod logging;
pub mod messages;
pub mod portfolio;
pub mod runner;

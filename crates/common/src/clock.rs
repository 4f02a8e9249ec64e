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

//! Clocks providing the current time to engine components.

use std::{
    fmt::Debug,
    time::{SystemTime, UNIX_EPOCH},
};

use meridian_core::UnixNanos;

/// A read-only clock.
pub trait Clock: Debug {
    /// Returns the current time as nanoseconds since the UNIX epoch.
    fn timestamp_ns(&self) -> UnixNanos;
}

/// A static test clock with settable time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestClock {
    time: UnixNanos,
}

impl TestClock {
    /// Creates a new [`TestClock`] at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock to the given time.
    pub fn set_time(&mut self, time: UnixNanos) {
        self.time = time;
    }

    /// Advances the clock by the given number of nanoseconds.
    pub fn advance_time(&mut self, delta_ns: u64) {
        self.time = self.time + delta_ns;
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time
    }
}

/// A clock reading real wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiveClock;

impl LiveClock {
    /// Creates a new [`LiveClock`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX epoch")
            .as_nanos();
        UnixNanos::from(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

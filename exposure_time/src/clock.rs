//
// Copyright 2025 The Project Oak Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use std::time::SystemTime;

use crate::instant::Instant;

/// A time source that can provide the current time as an `Instant`.
///
/// The trait is object-safe so that a verifier can own a `Box<dyn Clock>` and
/// tests can swap in a [`FixedClock`].
pub trait Clock: Send + Sync {
    /// Returns the current time as an `Instant`.
    fn get_time(&self) -> Instant;
}

/// A `Clock` that always returns a fixed, pre-configured time.
pub struct FixedClock {
    time: Instant,
}

impl FixedClock {
    /// Creates a new `FixedClock` that will always return the given `Instant`.
    pub fn at_instant(time: Instant) -> Self {
        FixedClock { time }
    }
}

impl Clock for FixedClock {
    fn get_time(&self) -> Instant {
        self.time
    }
}

/// A `Clock` backed by `std::time::SystemTime`.
pub struct SystemTimeClock;

impl Clock for SystemTimeClock {
    fn get_time(&self) -> Instant {
        Instant::from(SystemTime::now())
    }
}

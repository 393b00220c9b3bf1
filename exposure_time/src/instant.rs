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

//! Represents a specific moment in time, measured with respect to Unix epoch.
//!
//! Attestation statements carry their issue time as milliseconds since the
//! epoch, certificates carry second-resolution validity bounds, and policy
//! windows are compared at whole seconds. `Instant` stores nanoseconds so that
//! none of these conversions lose information until a caller asks for a
//! coarser unit.

use core::{
    fmt,
    ops::{Add, Sub},
    time::Duration,
};
use std::time::SystemTime;

// An anchor in time which can be used to create new Instant instances or learn
// about where in time an Instant lies. This is similar to the
// SystemTime::UNIX_EPOCH.
pub const UNIX_EPOCH: Instant = Instant { nanoseconds: 0 };

const MILLIS_TO_NANOS: i128 = 1_000_000;
const SECONDS_TO_NANOS: i128 = 1_000_000_000;

/// Represents a specific moment in time.
///
/// Internally, it stores signed nanonseconds anchored at Unix epoch
/// (January 1, 1970, 00:00:00 UTC).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Instant {
    nanoseconds: i128,
}

impl Instant {
    pub const UNIX_EPOCH: Instant = UNIX_EPOCH;

    /// Creates a new `Instant` from the number of seconds since the Unix
    /// epoch.
    pub const fn from_unix_seconds(unix_epoch_seconds: i64) -> Self {
        Instant { nanoseconds: SECONDS_TO_NANOS * unix_epoch_seconds as i128 }
    }

    /// Creates a new `Instant` from the number of milliseconds since the Unix
    /// epoch.
    pub const fn from_unix_millis(unix_epoch_millis: i64) -> Self {
        Instant { nanoseconds: MILLIS_TO_NANOS * unix_epoch_millis as i128 }
    }

    /// Creates a new `Instant` from the number of nanoseconds since the Unix
    /// epoch.
    pub const fn from_unix_nanos(unix_epoch_nanos: i128) -> Self {
        Instant { nanoseconds: unix_epoch_nanos }
    }

    /// Converts this instant into the number of whole seconds since the Unix
    /// epoch, truncating any sub-second part.
    ///
    /// Values outside the `i64` range saturate.
    pub fn into_unix_seconds(self) -> i64 {
        saturate(self.nanoseconds / SECONDS_TO_NANOS)
    }

    /// Converts this instant into the number of whole milliseconds since the
    /// Unix epoch, truncating any sub-millisecond part.
    ///
    /// Values outside the `i64` range saturate.
    pub fn into_unix_millis(self) -> i64 {
        saturate(self.nanoseconds / MILLIS_TO_NANOS)
    }

    /// Converts this instant into the number of nanoseconds since the Unix
    /// epoch.
    pub fn into_unix_nanos(self) -> i128 {
        self.nanoseconds
    }

    /// Returns this instant with its sub-second part dropped.
    pub fn truncate_to_seconds(self) -> Self {
        Instant::from_unix_nanos(self.nanoseconds / SECONDS_TO_NANOS * SECONDS_TO_NANOS)
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_unix_seconds())
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, other: Duration) -> Self::Output {
        Self { nanoseconds: self.nanoseconds + other.as_nanos() as i128 }
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, other: Duration) -> Self {
        Self { nanoseconds: self.nanoseconds - other.as_nanos() as i128 }
    }
}

impl From<SystemTime> for Instant {
    /// Converts a `SystemTime` to an `Instant`, including times before the
    /// epoch.
    fn from(time: SystemTime) -> Self {
        match time.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(duration) => UNIX_EPOCH + duration,
            Err(err) => UNIX_EPOCH - err.duration(),
        }
    }
}

/// Serde adapter for fields encoded as integer milliseconds since the Unix
/// epoch, e.g. `#[serde(with = "exposure_time::instant::unix_millis")]`.
pub mod unix_millis {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Instant;

    pub fn serialize<S: Serializer>(instant: &Instant, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(instant.into_unix_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Instant, D::Error> {
        i64::deserialize(deserializer).map(Instant::from_unix_millis)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[googletest::test]
    fn test_unix_seconds_conversion_example() {
        const EXPECTED_SECONDS: i64 = 1234567890;
        let instant = Instant::from_unix_seconds(EXPECTED_SECONDS);
        assert_eq!(EXPECTED_SECONDS, instant.into_unix_seconds());
    }

    #[googletest::test]
    fn test_unix_millis_truncates_to_seconds() {
        let instant = Instant::from_unix_millis(1589154006495);
        assert_that!(instant.into_unix_seconds(), eq(1589154006_i64));
        assert_that!(instant.into_unix_millis(), eq(1589154006495_i64));
        assert_that!(instant.truncate_to_seconds(), eq(Instant::from_unix_seconds(1589154006)));
    }

    #[googletest::test]
    fn test_saturates_outside_i64() {
        let huge = Instant::from_unix_nanos(i128::MAX);
        assert_that!(huge.into_unix_millis(), eq(i64::MAX));
        let tiny = Instant::from_unix_nanos(i128::MIN);
        assert_that!(tiny.into_unix_seconds(), eq(i64::MIN));
    }

    #[googletest::test]
    fn test_instant_add_and_sub() {
        let instant = Instant::from_unix_seconds(1589154006);
        let minute = Duration::from_secs(60);
        assert_that!(instant + minute, eq(Instant::from_unix_seconds(1589154066)));
        assert_that!(instant - minute, eq(Instant::from_unix_seconds(1589153946)));
    }

    #[googletest::test]
    fn test_from_system_time_before_epoch() {
        let duration = Duration::from_secs(54321);
        let system_time = SystemTime::UNIX_EPOCH - duration;
        assert_that!(Instant::from(system_time), eq(UNIX_EPOCH - duration));
    }

    #[googletest::test]
    fn test_display_is_unix_seconds() {
        assert_that!(
            Instant::from_unix_millis(1589154066999).to_string().as_str(),
            eq("1589154066")
        );
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Stamped {
        #[serde(rename = "timestampMs", with = "unix_millis")]
        timestamp: Instant,
    }

    #[googletest::test]
    fn test_unix_millis_serde() {
        let stamped: Stamped = serde_json::from_str(r#"{"timestampMs":1589154006495}"#).unwrap();
        assert_that!(stamped.timestamp, eq(Instant::from_unix_millis(1589154006495)));
        assert_that!(
            serde_json::to_string(&stamped).unwrap().as_str(),
            eq(r#"{"timestampMs":1589154006495}"#)
        );
    }

    #[googletest::test]
    fn test_unix_millis_rejects_strings() {
        assert!(serde_json::from_str::<Stamped>(r#"{"timestampMs":"soon"}"#).is_err());
    }
}

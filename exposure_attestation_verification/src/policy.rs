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

//! Stored per-app attestation requirements.

use core::time::Duration;

use exposure_nonce::Nonce;
use exposure_time::Instant;
use serde::{Deserialize, Serialize};

use crate::options::VerifyOptions;

const DEFAULT_ALLOWED_PAST_SECONDS: u64 = 15 * 60;
const DEFAULT_ALLOWED_FUTURE_SECONDS: u64 = 60;

/// The attestation requirements configured for one authorized app.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPolicy {
    pub app_package_name: String,
    /// Expected APK or APK certificate digest. Empty skips the check.
    #[serde(default)]
    pub apk_digest: String,
    #[serde(default)]
    pub cts_profile_match: bool,
    #[serde(default)]
    pub basic_integrity: bool,
    /// How far before the reference time a statement may have been generated.
    #[serde(default = "default_allowed_past_seconds")]
    pub allowed_past_seconds: u64,
    /// How far after the reference time a statement may have been generated,
    /// to absorb clock skew on devices.
    #[serde(default = "default_allowed_future_seconds")]
    pub allowed_future_seconds: u64,
}

fn default_allowed_past_seconds() -> u64 {
    DEFAULT_ALLOWED_PAST_SECONDS
}

fn default_allowed_future_seconds() -> u64 {
    DEFAULT_ALLOWED_FUTURE_SECONDS
}

impl AppPolicy {
    pub fn new(app_package_name: impl Into<String>) -> Self {
        Self {
            app_package_name: app_package_name.into(),
            apk_digest: String::new(),
            cts_profile_match: false,
            basic_integrity: false,
            allowed_past_seconds: DEFAULT_ALLOWED_PAST_SECONDS,
            allowed_future_seconds: DEFAULT_ALLOWED_FUTURE_SECONDS,
        }
    }

    /// Returns the options that accept statements generated for `nonce` within
    /// the allowed window around `now`.
    pub fn verify_options<'a>(&'a self, nonce: &'a dyn Nonce, now: Instant) -> VerifyOptions<'a> {
        VerifyOptions {
            app_pkg_name: &self.app_package_name,
            apk_digest: &self.apk_digest,
            nonce: Some(nonce),
            cts_profile_match: self.cts_profile_match,
            basic_integrity: self.basic_integrity,
            min_valid_time: Some(now - Duration::from_secs(self.allowed_past_seconds)),
            max_valid_time: Some(now + Duration::from_secs(self.allowed_future_seconds)),
        }
    }
}

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

use core::fmt;

use exposure_nonce::Nonce;
use exposure_time::Instant;

/// What a caller requires of an attestation statement, supplied per call.
#[derive(Clone, Copy, Default)]
pub struct VerifyOptions<'a> {
    /// If non-empty, must equal the package name claimed by the statement.
    pub app_pkg_name: &'a str,
    /// If non-empty, must be one of the APK certificate digests or the APK
    /// digest claimed by the statement.
    pub apk_digest: &'a str,
    /// Required. The statement nonce must decode to its rendering.
    pub nonce: Option<&'a dyn Nonce>,
    /// If set, the statement must claim a CTS profile match.
    pub cts_profile_match: bool,
    /// If set, the statement must claim basic integrity.
    pub basic_integrity: bool,
    /// Required. Inclusive lower bound for the statement timestamp.
    pub min_valid_time: Option<Instant>,
    /// Required. Inclusive upper bound for the statement timestamp.
    pub max_valid_time: Option<Instant>,
}

impl fmt::Debug for VerifyOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyOptions")
            .field("app_pkg_name", &self.app_pkg_name)
            .field("apk_digest", &self.apk_digest)
            .field("nonce", &self.nonce.map(|nonce| nonce.nonce()))
            .field("cts_profile_match", &self.cts_profile_match)
            .field("basic_integrity", &self.basic_integrity)
            .field("min_valid_time", &self.min_valid_time)
            .field("max_valid_time", &self.max_valid_time)
            .finish()
    }
}

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

use exposure_time::Instant;
use serde::{Deserialize, Serialize};

use crate::{error::AttestationError, statement::decode_base64};

/// The claims an attestation statement makes about a device and an app.
///
/// https://developer.android.com/training/safetynet/attestation#compat-check-response
///
/// Only the timestamp and the package name are required. Which of the other
/// fields are present depends on the evaluation that produced the statement,
/// so they default to empty or false.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Base64 encoding of the nonce the device was asked to embed.
    #[serde(default)]
    pub nonce: String,
    /// Time at which the statement was generated, in milliseconds since the
    /// Unix epoch.
    #[serde(rename = "timestampMs", with = "exposure_time::instant::unix_millis")]
    pub timestamp: Instant,
    pub apk_package_name: String,
    /// Base64 SHA-256 digest of the APK.
    #[serde(default)]
    pub apk_digest_sha256: String,
    /// Base64 SHA-256 digests of the certificates the APK was signed with.
    #[serde(default)]
    pub apk_certificate_digest_sha256: Vec<String>,
    #[serde(default)]
    pub cts_profile_match: bool,
    #[serde(default)]
    pub basic_integrity: bool,
    /// Comma separated evaluation types, e.g. `BASIC` or `BASIC,HARDWARE_BACKED`.
    #[serde(default)]
    pub evaluation_type: String,
    /// Suggestion for how a device may get back to a passing state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    /// Set when the attestation service could not evaluate the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Claims {
    /// Decodes the claims from the still-encoded payload segment of a
    /// statement.
    pub fn decode(payload_segment: &str) -> Result<Self, AttestationError> {
        let payload = decode_base64(payload_segment)
            .map_err(|err| AttestationError::MalformedClaims(format!("invalid base64: {err}")))?;
        serde_json::from_slice(&payload)
            .map_err(|err| AttestationError::MalformedClaims(err.to_string()))
    }

    /// Returns the nonce the device embedded, or `None` if the claim is not
    /// valid base64.
    pub fn decoded_nonce(&self) -> Option<Vec<u8>> {
        decode_base64(&self.nonce).ok()
    }

    /// Returns the timestamp as whole seconds since the Unix epoch.
    pub fn timestamp_seconds(&self) -> i64 {
        self.timestamp.into_unix_seconds()
    }

    /// Whether `digest` is one of the APK signing certificate digests or the
    /// digest of the APK itself.
    pub fn matches_apk_digest(&self, digest: &str) -> bool {
        self.apk_certificate_digest_sha256.iter().any(|certificate| certificate == digest)
            || self.apk_digest_sha256 == digest
    }
}

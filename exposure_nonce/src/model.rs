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

use serde::{Deserialize, Serialize};

/// A single temporary exposure key as submitted by a device.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExposureKey {
    /// The key bytes in standard base64, exactly as received.
    pub key: String,
    /// The interval number at which the key became active.
    #[serde(rename = "rollingStartNumber")]
    pub interval_number: i32,
    /// The number of intervals the key was active for.
    #[serde(rename = "rollingPeriod")]
    pub interval_count: i32,
}

impl ExposureKey {
    pub fn new(key: impl Into<String>, interval_number: i32, interval_count: i32) -> Self {
        Self { key: key.into(), interval_number, interval_count }
    }
}

/// A publish request, limited to the fields that participate in the nonce
/// plus the attestation statement that travels with them.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publish {
    #[serde(rename = "temporaryExposureKeys")]
    pub keys: Vec<ExposureKey>,
    /// Region codes. Case and order are not significant.
    pub regions: Vec<String>,
    pub app_package_name: String,
    pub transmission_risk: u8,
    /// Name of the authority that verified the diagnosis. May be empty.
    #[serde(rename = "verificationPayload", default)]
    pub verification_authority_name: String,
    /// The signed device attestation statement, in compact form.
    #[serde(default)]
    pub device_verification_payload: String,
}

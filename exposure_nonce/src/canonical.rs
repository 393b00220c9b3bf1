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

//! Canonical encoding of a publish request.
//!
//! The cleartext is
//!
//! ```text
//! appPackageName|transmissionRisk|key[,key...]|region[,region...]|verificationAuthorityName
//! ```
//!
//! where every key is rendered as `base64(key).intervalNumber.intervalCount`.
//! Rendered keys are sorted lexicographically, regions are uppercased and then
//! sorted, so the encoding does not depend on the order in which a device
//! listed either of them. None of the fields can contain `|` or `,`: keys are
//! base64, intervals and risk are decimal, and region codes are letters.

use crate::model::{ExposureKey, Publish};

const FIELD_SEPARATOR: &str = "|";
const LIST_SEPARATOR: &str = ",";

/// Returns the canonical cleartext of `publish` as UTF-8 bytes.
pub fn encode(publish: &Publish) -> Vec<u8> {
    cleartext(publish).into_bytes()
}

/// Returns the canonical cleartext of `publish`.
pub fn cleartext(publish: &Publish) -> String {
    [
        publish.app_package_name.clone(),
        publish.transmission_risk.to_string(),
        sorted_keys(&publish.keys).join(LIST_SEPARATOR),
        sorted_regions(&publish.regions).join(LIST_SEPARATOR),
        publish.verification_authority_name.clone(),
    ]
    .join(FIELD_SEPARATOR)
}

fn render_key(key: &ExposureKey) -> String {
    format!("{}.{}.{}", key.key, key.interval_number, key.interval_count)
}

fn sorted_keys(keys: &[ExposureKey]) -> Vec<String> {
    let mut rendered: Vec<String> = keys.iter().map(render_key).collect();
    rendered.sort_unstable();
    rendered
}

fn sorted_regions(regions: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = regions.iter().map(|r| r.to_uppercase()).collect();
    normalized.sort_unstable();
    normalized
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn publish() -> Publish {
        Publish {
            keys: vec![
                ExposureKey::new("x21Goi8X9m/glOZ0+wz8fA", 263123, 144),
                ExposureKey::new("2mvFSmRsFmJR5r07dxGSjg", 263267, 144),
            ],
            regions: vec!["us".to_string(), "GB".to_string()],
            app_package_name: "com.example.app".to_string(),
            transmission_risk: 4,
            verification_authority_name: "QRTH-ROWO-LOLO-FOOB".to_string(),
            ..Default::default()
        }
    }

    #[googletest::test]
    fn test_cleartext_layout() {
        assert_that!(
            cleartext(&publish()).as_str(),
            eq("com.example.app|4|2mvFSmRsFmJR5r07dxGSjg.263267.144,x21Goi8X9m/glOZ0+wz8fA.263123.144|GB,US|QRTH-ROWO-LOLO-FOOB")
        );
    }

    #[googletest::test]
    fn test_empty_lists_and_authority() {
        let publish = Publish {
            app_package_name: "com.example.app".to_string(),
            transmission_risk: 0,
            ..Default::default()
        };
        assert_that!(cleartext(&publish).as_str(), eq("com.example.app|0|||"));
    }

    #[googletest::test]
    fn test_key_and_region_order_is_normalized() {
        let mut reordered = publish();
        reordered.keys.reverse();
        reordered.regions = vec!["gb".to_string(), "US".to_string()];
        assert_eq!(encode(&reordered), encode(&publish()));
    }

    #[googletest::test]
    fn test_device_payload_does_not_participate() {
        let mut with_payload = publish();
        with_payload.device_verification_payload = "header.payload.signature".to_string();
        assert_eq!(encode(&with_payload), encode(&publish()));
    }
}

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

use exposure_nonce::{ExposureKey, Nonce, Publish, PublishNonce};
use googletest::prelude::*;

const APP_PACKAGE: &str = "com.google.android.apps.exposurenotification";

fn publish(
    keys: &[(&str, i32, i32)],
    regions: &[&str],
    transmission_risk: u8,
    verification_authority_name: &str,
) -> Publish {
    Publish {
        keys: keys.iter().map(|(key, number, count)| ExposureKey::new(*key, *number, *count)).collect(),
        regions: regions.iter().map(|r| r.to_string()).collect(),
        app_package_name: APP_PACKAGE.to_string(),
        transmission_risk,
        verification_authority_name: verification_authority_name.to_string(),
        ..Default::default()
    }
}

fn reference_publish() -> Publish {
    publish(
        &[
            ("x21Goi8X9m/glOZ0+wz8fA", 263123, 144),
            ("2mvFSmRsFmJR5r07dxGSjg", 263267, 144),
            ("6bAd3dv7p+VEuaJVkVItaQ", 263411, 27),
        ],
        &["GB", "US"],
        4,
        "QRTH-ROWO-LOLO-FOOB",
    )
}

// Data for these vectors was generated by the Android reference application.
#[googletest::test]
fn test_reference_application_vectors() {
    let vectors = [
        (reference_publish(), "xH8QNR09EKuCCuNitam1RgjPaGHO/9p54VikqFdirVY="),
        (
            publish(
                &[
                    ("zdCW5HrOKbirxmQVc0L/eA", 263123, 144),
                    ("t+k51ifogJo9jq3GH9LWGQ", 263267, 144),
                    ("3uXRrSlcv1+OMI3oFtdaUw", 263411, 27),
                ],
                &["gB", "us"],
                7,
                "BREA-KMEO-FFAP-IECE",
            ),
            "LHSwWAjTf3nMVTk7LBwMx9Wg7jEPRjEJf1zRtoxQI64=",
        ),
        (
            publish(
                &[
                    ("HKXVlIO+vDmQNJ2M1MVtHQ==", 2647872, 144),
                    ("JjEtCT9Lcyw5oPiaNcWC/Q==", 2648016, 144),
                    ("cLTwDu9onEv/N6FMV3Uy4Q==", 2648160, 144),
                    ("ko6TsgPP8Wvu+ijpSLbY3A==", 2648304, 144),
                    ("9kMgBy7qdG3o6eh3vAD3mQ==", 2648448, 144),
                ],
                &["GB"],
                1,
                "PUBLIC_HEALTH_AUTHORITY",
            ),
            "vtahfsLtYDEImsinerZRqk+p8PuXfoz8hmPCshlSzgw=",
        ),
    ];

    for (publish, expected) in vectors.iter() {
        expect_that!(PublishNonce::new(publish).nonce().as_str(), eq(*expected));
    }
}

#[googletest::test]
fn test_regions_are_case_insensitive() {
    let upper = reference_publish();
    let mut lower = reference_publish();
    lower.regions = vec!["gb".to_string(), "us".to_string()];

    assert_eq!(PublishNonce::new(&upper).nonce(), PublishNonce::new(&lower).nonce());
}

#[googletest::test]
fn test_every_field_changes_the_nonce() {
    let reference = reference_publish();
    let reference_nonce = PublishNonce::new(&reference).nonce();

    let mut changed_key = reference_publish();
    changed_key.keys[0].key = "AAAAAAAAAAAAAAAAAAAAAA".to_string();
    let mut changed_interval_number = reference_publish();
    changed_interval_number.keys[1].interval_number += 1;
    let mut changed_interval_count = reference_publish();
    changed_interval_count.keys[2].interval_count = 144;
    let mut changed_region = reference_publish();
    changed_region.regions = vec!["GB".to_string(), "CA".to_string()];
    let mut changed_risk = reference_publish();
    changed_risk.transmission_risk = 5;
    let mut changed_authority = reference_publish();
    changed_authority.verification_authority_name = String::new();
    let mut changed_app = reference_publish();
    changed_app.app_package_name = "com.example.other".to_string();

    for changed in [
        changed_key,
        changed_interval_number,
        changed_interval_count,
        changed_region,
        changed_risk,
        changed_authority,
        changed_app,
    ] {
        expect_that!(
            PublishNonce::new(&changed).nonce().as_str(),
            not(eq(reference_nonce.as_str())),
            "{changed:?}"
        );
    }
}

#[googletest::test]
fn test_key_order_does_not_change_the_nonce() {
    let reference = reference_publish();
    let mut reversed = reference_publish();
    reversed.keys.reverse();

    assert_eq!(PublishNonce::new(&reference).nonce(), PublishNonce::new(&reversed).nonce());
}

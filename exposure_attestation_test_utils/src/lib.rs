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

//! Helpers for minting certificate chains and compact signed attestation
//! statements in tests.
//!
//! All keys are deterministic P-256 keys derived from a one byte seed, so no
//! private key material needs to be checked in.

use std::{
    str::FromStr,
    time::{Duration, SystemTime},
};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use exposure_time::Instant;
use p256::ecdsa::{signature::Signer, DerSignature, Signature, SigningKey};
use serde_json::{json, Value};
use x509_cert::{
    builder::{Builder, CertificateBuilder, Profile},
    der::{
        asn1::{BitString, Ia5String},
        Encode,
    },
    ext::pkix::{name::GeneralName, SubjectAltName},
    name::Name,
    serial_number::SerialNumber,
    spki::SubjectPublicKeyInfoOwned,
    time::{Time, Validity},
    Certificate, TbsCertificate,
};

pub const ATTESTATION_HOSTNAME: &str = "attest.android.com";
pub const APP_PACKAGE_NAME: &str = "com.google.android.apps.exposurenotification";

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns the deterministic P-256 key for `seed`. The seed must be non-zero.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).expect("failed to create signing key")
}

/// Returns a validity window from `not_before` to `not_after`, truncated to
/// whole seconds.
pub fn validity(not_before: Instant, not_after: Instant) -> Validity {
    Validity { not_before: to_time(not_before), not_after: to_time(not_after) }
}

/// Returns a validity window that starts a day before `now` and ends a year
/// after it.
pub fn validity_around(now: Instant) -> Validity {
    validity(now - ONE_DAY, now + 365 * ONE_DAY)
}

fn to_time(instant: Instant) -> Time {
    let seconds = u64::try_from(instant.into_unix_seconds()).expect("instant before the epoch");
    Time::try_from(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
        .expect("failed to convert time")
}

fn subject_public_key_info(key: &SigningKey) -> SubjectPublicKeyInfoOwned {
    SubjectPublicKeyInfoOwned::from_key(*key.verifying_key()).expect("failed to encode public key")
}

fn name(common_name: &str) -> Name {
    Name::from_str(&format!("CN={common_name},O=Exposure Test,C=US")).expect("invalid name")
}

/// A certificate together with the key certified by it.
pub struct Identity {
    pub key: SigningKey,
    pub certificate: Certificate,
}

impl Identity {
    pub fn der(&self) -> Vec<u8> {
        self.certificate.to_der().expect("failed to encode certificate")
    }
}

/// A certificate authority that can issue intermediates and leaves.
pub struct Authority {
    pub identity: Identity,
}

impl Authority {
    /// Creates a self-signed root.
    pub fn root(common_name: &str, seed: u8, validity: Validity) -> Self {
        let key = signing_key(seed);
        let builder = CertificateBuilder::new(
            Profile::Root,
            serial(seed),
            validity,
            name(common_name),
            subject_public_key_info(&key),
            &key,
        )
        .expect("failed to create root builder");
        let certificate = builder.build::<DerSignature>().expect("failed to sign root");
        Self { identity: Identity { key, certificate } }
    }

    /// Issues a subordinate authority.
    pub fn intermediate(&self, common_name: &str, seed: u8, validity: Validity) -> Authority {
        let key = signing_key(seed);
        let builder = CertificateBuilder::new(
            Profile::SubCA { issuer: self.subject(), path_len_constraint: Some(0) },
            serial(seed),
            validity,
            name(common_name),
            subject_public_key_info(&key),
            &self.identity.key,
        )
        .expect("failed to create intermediate builder");
        let certificate = builder.build::<DerSignature>().expect("failed to sign intermediate");
        Authority { identity: Identity { key, certificate } }
    }

    /// Issues a leaf whose subjectAltName lists `dns_names`. No extension is
    /// added when `dns_names` is empty.
    pub fn leaf(
        &self,
        common_name: &str,
        dns_names: &[&str],
        seed: u8,
        validity: Validity,
    ) -> Identity {
        let key = signing_key(seed);
        let mut builder = CertificateBuilder::new(
            Profile::Leaf {
                issuer: self.subject(),
                enable_key_agreement: false,
                enable_key_encipherment: false,
            },
            serial(seed),
            validity,
            name(common_name),
            subject_public_key_info(&key),
            &self.identity.key,
        )
        .expect("failed to create leaf builder");
        if !dns_names.is_empty() {
            let names = dns_names
                .iter()
                .map(|dns| GeneralName::DnsName(Ia5String::new(dns).expect("invalid dns name")))
                .collect();
            builder.add_extension(&SubjectAltName(names)).expect("failed to add extension");
        }
        let certificate = builder.build::<DerSignature>().expect("failed to sign leaf");
        Identity { key, certificate }
    }

    /// Signs a hand-edited `tbs_certificate`, for certificates the builder
    /// does not produce.
    pub fn sign_certificate(&self, tbs_certificate: TbsCertificate) -> Certificate {
        let message = tbs_certificate.to_der().expect("failed to encode certificate");
        let signature: DerSignature = self.identity.key.sign(&message);
        Certificate {
            signature_algorithm: tbs_certificate.signature.clone(),
            signature: BitString::from_bytes(signature.as_bytes())
                .expect("failed to encode signature"),
            tbs_certificate,
        }
    }

    pub fn certificate(&self) -> &Certificate {
        &self.identity.certificate
    }

    pub fn der(&self) -> Vec<u8> {
        self.identity.der()
    }

    fn subject(&self) -> Name {
        self.identity.certificate.tbs_certificate.subject.clone()
    }
}

fn serial(seed: u8) -> SerialNumber {
    SerialNumber::new(&[seed & 0x7f]).expect("invalid serial number")
}

/// A root, an intermediate and an attestation leaf for
/// [`ATTESTATION_HOSTNAME`], all valid around the same instant.
pub struct TestPki {
    pub root: Authority,
    pub intermediate: Authority,
    pub leaf: Identity,
}

impl TestPki {
    pub fn new(now: Instant) -> Self {
        let validity = validity_around(now);
        let root = Authority::root("Exposure Test Root", 1, validity);
        let intermediate = root.intermediate("Exposure Test CA", 2, validity);
        let leaf = intermediate.leaf(ATTESTATION_HOSTNAME, &[ATTESTATION_HOSTNAME], 3, validity);
        Self { root, intermediate, leaf }
    }

    /// The chain a statement signed by this PKI carries, leaf first.
    pub fn chain(&self) -> Vec<&Certificate> {
        vec![&self.leaf.certificate, self.intermediate.certificate()]
    }

    /// Signs `claims` with the leaf key, carrying [`TestPki::chain`].
    pub fn sign(&self, claims: &Value) -> String {
        sign_statement(&self.leaf.key, &self.chain(), claims)
    }
}

/// Returns the header of an ES256 statement carrying `chain`.
pub fn es256_header(chain: &[&Certificate]) -> Value {
    let x5c: Vec<String> = chain
        .iter()
        .map(|certificate| {
            STANDARD.encode(certificate.to_der().expect("failed to encode certificate"))
        })
        .collect();
    json!({ "alg": "ES256", "x5c": x5c })
}

/// Encodes `header` and `claims` and signs them with `key`.
pub fn encode_statement(header: &Value, claims: &Value, key: &SigningKey) -> String {
    let signed_data = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );
    let signature: Signature = key.sign(signed_data.as_bytes());
    format!("{signed_data}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

/// Signs `claims` with `key` in an ES256 statement carrying `chain`.
pub fn sign_statement(key: &SigningKey, chain: &[&Certificate], claims: &Value) -> String {
    encode_statement(&es256_header(chain), claims, key)
}

/// Returns claims for [`APP_PACKAGE_NAME`] that pass every integrity check.
/// The `nonce` claim carries `nonce` the way devices embed it.
pub fn claims(nonce: &str, timestamp: Instant) -> Value {
    json!({
        "nonce": STANDARD.encode(nonce),
        "timestampMs": timestamp.into_unix_millis(),
        "apkPackageName": APP_PACKAGE_NAME,
        "apkDigestSha256": "TYKutUOxUzJcflEoLw3/Xklh5qh+O0jqxY56sv2pFUc=",
        "apkCertificateDigestSha256": ["jqmYEqi9qUvpUe11qMf3v2o6VEQM+5NDee2bz0xdzWc="],
        "ctsProfileMatch": true,
        "basicIntegrity": true,
        "evaluationType": "BASIC",
    })
}

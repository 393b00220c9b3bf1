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

use exposure_time::{Clock, Instant, SystemTimeClock};
use log::{debug, error, info, warn};

use crate::{
    chain::{verify_chain, TrustStore},
    claims::Claims,
    error::{AttestationError, ErrorKind},
    options::VerifyOptions,
    statement::SignedStatement,
    SAFETYNET_HOSTNAME,
};

/// Verifies attestation statements against a fixed set of trusted roots.
///
/// The verifier holds no mutable state, so one instance can serve concurrent
/// requests.
pub struct AttestationVerifier {
    trust_store: TrustStore,
    hostname: String,
    clock: Box<dyn Clock>,
}

impl AttestationVerifier {
    /// Creates a verifier that expects statements from [`SAFETYNET_HOSTNAME`]
    /// and reads the time from the system clock.
    pub fn new(trust_store: TrustStore) -> Self {
        Self {
            trust_store,
            hostname: SAFETYNET_HOSTNAME.to_string(),
            clock: Box::new(SystemTimeClock),
        }
    }

    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        Self { clock: Box::new(clock), ..self }
    }

    /// Sets the hostname the leaf certificate must be issued for.
    pub fn with_hostname(self, hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), ..self }
    }

    /// Parses `raw`, validates its chain of trust and signature, and returns
    /// the claims it makes. No policy is applied to the claims.
    pub fn verify_attestation(&self, raw: &str) -> Result<Claims, AttestationError> {
        let now = self.clock.get_time();
        self.verify_at(raw, now).inspect_err(log_rejection)
    }

    /// Verifies `raw` like [`AttestationVerifier::verify_attestation`] and
    /// then checks its claims against `options`. Fails with the first check
    /// that does not hold.
    pub fn validate_attestation(
        &self,
        raw: &str,
        options: &VerifyOptions,
    ) -> Result<(), AttestationError> {
        let now = self.clock.get_time();
        self.verify_at(raw, now)
            .and_then(|claims| validate_claims(&claims, options))
            .inspect_err(log_rejection)
    }

    fn verify_at(&self, raw: &str, now: Instant) -> Result<Claims, AttestationError> {
        let statement = SignedStatement::parse(raw)?;
        debug!(
            "parsed {:?} statement with {} certificates",
            statement.header().algorithm,
            statement.certificate_chain().len()
        );

        verify_chain(&statement, &self.trust_store, &self.hostname, now)?;
        debug!("statement is signed by {} at {now}", self.hostname);

        let claims = Claims::decode(statement.payload_segment())?;
        debug!("decoded claims for {} at {}", claims.apk_package_name, claims.timestamp);
        Ok(claims)
    }
}

/// Checks verified `claims` against `options`, in order: nonce, time window,
/// package name and digest, integrity flags.
pub fn validate_claims(claims: &Claims, options: &VerifyOptions) -> Result<(), AttestationError> {
    let expected_nonce = options.nonce.map(|nonce| nonce.nonce()).unwrap_or_default();
    if expected_nonce.is_empty() {
        return Err(AttestationError::MissingNonce);
    }
    if claims.decoded_nonce().as_deref() != Some(expected_nonce.as_bytes()) {
        return Err(AttestationError::NonceMismatch);
    }

    let (Some(min_valid_time), Some(max_valid_time)) =
        (options.min_valid_time, options.max_valid_time)
    else {
        return Err(AttestationError::MissingTimeBounds);
    };
    let claim_time = claims.timestamp.truncate_to_seconds();
    if claim_time < min_valid_time {
        return Err(AttestationError::TooOld {
            min: min_valid_time.into_unix_seconds(),
            actual: claim_time.into_unix_seconds(),
        });
    }
    if claim_time > max_valid_time {
        return Err(AttestationError::TooNew {
            max: max_valid_time.into_unix_seconds(),
            actual: claim_time.into_unix_seconds(),
        });
    }

    if !options.app_pkg_name.is_empty() && options.app_pkg_name != claims.apk_package_name {
        return Err(AttestationError::AppMismatch {
            expected: options.app_pkg_name.to_string(),
            actual: claims.apk_package_name.clone(),
        });
    }
    if !options.apk_digest.is_empty() && !claims.matches_apk_digest(options.apk_digest) {
        return Err(AttestationError::DigestMismatch { expected: options.apk_digest.to_string() });
    }

    if options.basic_integrity && !claims.basic_integrity {
        return Err(AttestationError::IntegrityFailed);
    }
    if options.cts_profile_match && !claims.cts_profile_match {
        return Err(AttestationError::ProfileMismatch);
    }

    debug!("attestation for {} satisfies the verify options", claims.apk_package_name);
    Ok(())
}

fn log_rejection(err: &AttestationError) {
    match err.kind() {
        ErrorKind::Trust => warn!("untrusted attestation: {err}"),
        ErrorKind::Format | ErrorKind::Policy => info!("attestation rejected: {err}"),
        ErrorKind::Configuration => error!("attestation cannot be validated: {err}"),
    }
}

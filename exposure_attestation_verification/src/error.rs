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

/// Coarse classification of an [`AttestationError`], for logging and
/// alerting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The statement or its claims could not be decoded.
    Format,
    /// The statement is not vouched for by a trusted authority.
    Trust,
    /// The statement is authentic but does not satisfy the caller's options.
    Policy,
    /// The caller did not supply options that allow any statement to pass.
    Configuration,
}

#[derive(thiserror::Error, Debug)]
pub enum AttestationError {
    #[error("malformed attestation statement: {0}")]
    MalformedStatement(String),
    #[error("attestation statement has no certificate chain")]
    MissingCertificateChain,
    #[error("untrusted certificate chain: {0}")]
    UntrustedChain(String),
    #[error(
        "certificate {subject} is not valid at {now}, valid from {not_before} until {not_after}"
    )]
    ExpiredCertificate { subject: String, not_before: Instant, not_after: Instant, now: Instant },
    #[error("leaf certificate is not issued for {expected}")]
    IdentityMismatch { expected: String },
    #[error("attestation statement signature is invalid")]
    SignatureInvalid,
    #[error("malformed attestation claims: {0}")]
    MalformedClaims(String),
    #[error("missing nonce")]
    MissingNonce,
    #[error("attestation nonce does not match")]
    NonceMismatch,
    #[error("missing timestamp bounds for attestation")]
    MissingTimeBounds,
    #[error("attestation is too old, must be newer than {min}, was {actual}")]
    TooOld { min: i64, actual: i64 },
    #[error("attestation is in the future, must be older than {max}, was {actual}")]
    TooNew { max: i64, actual: i64 },
    #[error("attestation app package name mismatch, want {expected}, got {actual}")]
    AppMismatch { expected: String, actual: String },
    #[error("attestation APK digest mismatch, want {expected}")]
    DigestMismatch { expected: String },
    #[error("attestation does not pass basic integrity")]
    IntegrityFailed,
    #[error("attestation does not match the CTS profile")]
    ProfileMismatch,
}

impl AttestationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttestationError::MalformedStatement(_)
            | AttestationError::MissingCertificateChain
            | AttestationError::MalformedClaims(_) => ErrorKind::Format,
            AttestationError::UntrustedChain(_)
            | AttestationError::ExpiredCertificate { .. }
            | AttestationError::IdentityMismatch { .. }
            | AttestationError::SignatureInvalid => ErrorKind::Trust,
            AttestationError::MissingNonce | AttestationError::MissingTimeBounds => {
                ErrorKind::Configuration
            }
            AttestationError::NonceMismatch
            | AttestationError::TooOld { .. }
            | AttestationError::TooNew { .. }
            | AttestationError::AppMismatch { .. }
            | AttestationError::DigestMismatch { .. }
            | AttestationError::IntegrityFailed
            | AttestationError::ProfileMismatch => ErrorKind::Policy,
        }
    }
}

// Convenience From implementations for the decoding errors that surface while
// parsing a statement.

impl From<base64::DecodeError> for AttestationError {
    fn from(e: base64::DecodeError) -> AttestationError {
        AttestationError::MalformedStatement(format!("invalid base64: {e}"))
    }
}

impl From<x509_cert::der::Error> for AttestationError {
    fn from(e: x509_cert::der::Error) -> AttestationError {
        AttestationError::MalformedStatement(format!("invalid certificate: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_policy_messages() {
        expect_that!(
            AttestationError::TooOld { min: 1589154066, actual: 1589154006 }.to_string().as_str(),
            eq("attestation is too old, must be newer than 1589154066, was 1589154006")
        );
        expect_that!(
            AttestationError::TooNew { max: 1589153946, actual: 1589154006 }.to_string().as_str(),
            eq("attestation is in the future, must be older than 1589153946, was 1589154006")
        );
        expect_that!(AttestationError::MissingNonce.to_string().as_str(), eq("missing nonce"));
        expect_that!(
            AttestationError::MissingTimeBounds.to_string().as_str(),
            eq("missing timestamp bounds for attestation")
        );
    }

    #[googletest::test]
    fn test_kinds() {
        expect_that!(AttestationError::MissingCertificateChain.kind(), eq(ErrorKind::Format));
        expect_that!(AttestationError::SignatureInvalid.kind(), eq(ErrorKind::Trust));
        expect_that!(AttestationError::IntegrityFailed.kind(), eq(ErrorKind::Policy));
        expect_that!(AttestationError::MissingTimeBounds.kind(), eq(ErrorKind::Configuration));
    }
}

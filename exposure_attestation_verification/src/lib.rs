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

//! Verification of device attestation statements.
//!
//! A statement is a compact signed JSON structure with three dot separated
//! segments. Its header carries the certificate chain of the signer, its
//! payload carries the claims made about the device and the app. Validation
//! is a strict pipeline that stops at the first failing check:
//!
//! 1. [`statement::SignedStatement::parse`] splits and decodes the statement.
//! 2. [`chain::verify_chain`] anchors the chain in a [`TrustStore`], checks the
//!    leaf identity and then the statement signature.
//! 3. [`claims::Claims::decode`] extracts the claims.
//! 4. [`verifier::validate_claims`] applies [`VerifyOptions`].

pub mod chain;
pub mod claims;
pub mod error;
pub mod options;
pub mod policy;
pub mod signature;
pub mod statement;
pub mod verifier;

pub use chain::TrustStore;
pub use claims::Claims;
pub use error::{AttestationError, ErrorKind};
pub use options::VerifyOptions;
pub use policy::AppPolicy;
pub use statement::SignedStatement;
pub use verifier::AttestationVerifier;

/// Hostname the attestation service certifies its signing key for.
pub const SAFETYNET_HOSTNAME: &str = "attest.android.com";

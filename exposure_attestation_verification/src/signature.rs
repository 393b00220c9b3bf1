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

//! Signature checks for certificates and for the statement itself.

use const_oid::{
    db::rfc5912::{
        ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, SHA_256_WITH_RSA_ENCRYPTION,
        SHA_384_WITH_RSA_ENCRYPTION, SHA_512_WITH_RSA_ENCRYPTION,
    },
    AssociatedOid, ObjectIdentifier,
};
use rsa::{signature::Verifier, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use x509_cert::{
    der::{referenced::OwnedToRef, Encode},
    spki::SubjectPublicKeyInfoOwned,
    Certificate,
};

use crate::statement::{Algorithm, SignedStatement};

#[derive(thiserror::Error, Debug)]
pub enum SignatureError {
    #[error("unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),
    #[error("signature algorithm {outer} does not match signed algorithm {inner}")]
    AlgorithmMismatch { outer: ObjectIdentifier, inner: ObjectIdentifier },
    #[error("invalid public key: {0}")]
    InvalidKey(String),
    #[error("malformed signature")]
    MalformedSignature,
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("failed to encode signed data: {0}")]
    Encoding(#[from] x509_cert::der::Error),
}

/// Verifies that `certificate` was signed by the key of `issuer`.
pub fn verify_certificate_signature(
    issuer: &Certificate,
    certificate: &Certificate,
) -> Result<(), SignatureError> {
    let algorithm = certificate.signature_algorithm.oid;
    let signed_algorithm = certificate.tbs_certificate.signature.oid;
    if algorithm != signed_algorithm {
        return Err(SignatureError::AlgorithmMismatch {
            outer: algorithm,
            inner: signed_algorithm,
        });
    }

    let key = &issuer.tbs_certificate.subject_public_key_info;
    let message = certificate.tbs_certificate.to_der()?;
    let signature = certificate.signature.as_bytes().ok_or(SignatureError::MalformedSignature)?;

    if algorithm == SHA_256_WITH_RSA_ENCRYPTION {
        verify_rsa::<Sha256>(key, &message, signature)
    } else if algorithm == SHA_384_WITH_RSA_ENCRYPTION {
        verify_rsa::<Sha384>(key, &message, signature)
    } else if algorithm == SHA_512_WITH_RSA_ENCRYPTION {
        verify_rsa::<Sha512>(key, &message, signature)
    } else if algorithm == ECDSA_WITH_SHA_256 {
        let signature = p256::ecdsa::Signature::from_der(signature)
            .map_err(|_err| SignatureError::MalformedSignature)?;
        verify_p256(key, &message, &signature)
    } else if algorithm == ECDSA_WITH_SHA_384 {
        let signature = p384::ecdsa::Signature::from_der(signature)
            .map_err(|_err| SignatureError::MalformedSignature)?;
        verify_p384(key, &message, &signature)
    } else {
        Err(SignatureError::UnsupportedAlgorithm(algorithm))
    }
}

/// Verifies the statement signature over its header and payload segments with
/// the key of the `leaf` certificate.
pub fn verify_statement_signature(
    statement: &SignedStatement,
    leaf: &Certificate,
) -> Result<(), SignatureError> {
    let key = &leaf.tbs_certificate.subject_public_key_info;
    let message = statement.signed_data();
    match statement.header().algorithm {
        Algorithm::Rs256 => verify_rsa::<Sha256>(key, message.as_bytes(), statement.signature()),
        Algorithm::Es256 => {
            let signature = p256::ecdsa::Signature::from_slice(statement.signature())
                .map_err(|_err| SignatureError::MalformedSignature)?;
            verify_p256(key, message.as_bytes(), &signature)
        }
    }
}

fn verify_rsa<D>(
    key: &SubjectPublicKeyInfoOwned,
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError>
where
    D: Digest + AssociatedOid,
{
    let public_key = RsaPublicKey::try_from(key.owned_to_ref())
        .map_err(|err| SignatureError::InvalidKey(format!("could not parse RSA key: {err}")))?;
    let signature = rsa::pkcs1v15::Signature::try_from(signature)
        .map_err(|_err| SignatureError::MalformedSignature)?;
    rsa::pkcs1v15::VerifyingKey::<D>::new(public_key)
        .verify(message, &signature)
        .map_err(|_err| SignatureError::VerificationFailed)
}

fn verify_p256(
    key: &SubjectPublicKeyInfoOwned,
    message: &[u8],
    signature: &p256::ecdsa::Signature,
) -> Result<(), SignatureError> {
    p256::ecdsa::VerifyingKey::from_sec1_bytes(key.subject_public_key.raw_bytes())
        .map_err(|_err| SignatureError::InvalidKey("could not extract P-256 key".to_string()))?
        .verify(message, signature)
        .map_err(|_err| SignatureError::VerificationFailed)
}

fn verify_p384(
    key: &SubjectPublicKeyInfoOwned,
    message: &[u8],
    signature: &p384::ecdsa::Signature,
) -> Result<(), SignatureError> {
    p384::ecdsa::VerifyingKey::from_sec1_bytes(key.subject_public_key.raw_bytes())
        .map_err(|_err| SignatureError::InvalidKey("could not extract P-384 key".to_string()))?
        .verify(message, signature)
        .map_err(|_err| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use exposure_attestation_test_utils::{claims, encode_statement, es256_header, TestPki};
    use exposure_time::Instant;
    use googletest::prelude::*;

    use super::*;

    const NOW: Instant = Instant::from_unix_seconds(1_700_000_000);

    #[googletest::test]
    fn test_certificate_signatures_along_chain() {
        let pki = TestPki::new(NOW);

        expect_that!(
            verify_certificate_signature(pki.intermediate.certificate(), &pki.leaf.certificate),
            ok(anything())
        );
        expect_that!(
            verify_certificate_signature(pki.root.certificate(), pki.intermediate.certificate()),
            ok(anything())
        );
        expect_that!(
            verify_certificate_signature(pki.root.certificate(), pki.root.certificate()),
            ok(anything())
        );
    }

    #[googletest::test]
    fn test_certificate_signed_by_other_key_fails() {
        let pki = TestPki::new(NOW);

        expect_that!(
            verify_certificate_signature(pki.root.certificate(), &pki.leaf.certificate),
            err(matches_pattern!(SignatureError::VerificationFailed))
        );
    }

    #[googletest::test]
    fn test_statement_signature() {
        let pki = TestPki::new(NOW);
        let statement = SignedStatement::parse(&pki.sign(&claims("nonce", NOW))).unwrap();

        expect_that!(verify_statement_signature(&statement, &pki.leaf.certificate), ok(anything()));
        expect_that!(
            verify_statement_signature(&statement, pki.intermediate.certificate()),
            err(matches_pattern!(SignatureError::VerificationFailed))
        );
    }

    #[googletest::test]
    fn test_statement_signature_covers_payload() {
        let pki = TestPki::new(NOW);
        let signed = pki.sign(&claims("nonce", NOW));
        let forged = pki.sign(&claims("other nonce", NOW));
        let (header_and_payload, _) = forged.rsplit_once('.').unwrap();
        let (_, signature) = signed.rsplit_once('.').unwrap();
        let statement =
            SignedStatement::parse(&format!("{header_and_payload}.{signature}")).unwrap();

        expect_that!(
            verify_statement_signature(&statement, &pki.leaf.certificate),
            err(matches_pattern!(SignatureError::VerificationFailed))
        );
    }

    #[googletest::test]
    fn test_rs256_statement_with_ec_key_fails() {
        let pki = TestPki::new(NOW);
        let mut header = es256_header(&pki.chain());
        header["alg"] = "RS256".into();
        let raw = encode_statement(&header, &claims("nonce", NOW), &pki.leaf.key);
        let statement = SignedStatement::parse(&raw).unwrap();

        expect_that!(
            verify_statement_signature(&statement, &pki.leaf.certificate),
            err(matches_pattern!(SignatureError::InvalidKey(_)))
        );
    }
}

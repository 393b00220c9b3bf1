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

//! Chain-of-trust validation for the certificates carried by a statement.
//!
//! The chain is ordered leaf first: every certificate is signed by the one
//! after it, and the last one is signed by a trusted root. The root itself
//! may or may not be part of the chain.

use const_oid::db::rfc4519::CN;
use exposure_time::Instant;
use log::debug;
use x509_cert::{
    der::{Decode, Encode},
    ext::pkix::{name::GeneralName, BasicConstraints, KeyUsage, SubjectAltName},
    name::Name,
    Certificate,
};

use crate::{
    error::AttestationError,
    signature::{verify_certificate_signature, verify_statement_signature},
    statement::SignedStatement,
};

/// The set of root certificates statements must chain up to. Immutable once
/// built, so a single store can be shared by concurrent verifications.
#[derive(Clone, Debug)]
pub struct TrustStore {
    roots: Vec<TrustedRoot>,
}

#[derive(Clone, Debug)]
struct TrustedRoot {
    certificate: Certificate,
    der: Vec<u8>,
}

impl TrustStore {
    pub fn new(roots: Vec<Certificate>) -> Result<Self, x509_cert::der::Error> {
        let roots = roots
            .into_iter()
            .map(|certificate| Ok(TrustedRoot { der: certificate.to_der()?, certificate }))
            .collect::<Result<Vec<_>, x509_cert::der::Error>>()?;
        Ok(Self { roots })
    }

    /// Builds a store from DER encoded certificates.
    pub fn from_der<I, B>(roots: I) -> Result<Self, x509_cert::der::Error>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let roots = roots
            .into_iter()
            .map(|der| Certificate::from_der(der.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(roots)
    }

    /// Builds a store from a bundle of PEM encoded certificates.
    pub fn from_pem(bundle: &[u8]) -> Result<Self, x509_cert::der::Error> {
        Self::new(Certificate::load_pem_chain(bundle)?)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Certificate> {
        self.roots.iter().map(|root| &root.certificate)
    }

    fn find_identical(&self, der: &[u8]) -> Option<&Certificate> {
        self.roots.iter().find(|root| root.der == der).map(|root| &root.certificate)
    }

    fn find_issuer(&self, certificate: &Certificate) -> Option<&Certificate> {
        self.roots()
            .filter(|root| root.tbs_certificate.subject == certificate.tbs_certificate.issuer)
            .find(|root| verify_certificate_signature(root, certificate).is_ok())
    }
}

/// Checks that `issuer` may issue certificates, given the number of CA
/// certificates between it and the leaf.
fn verify_authority(issuer: &Certificate, cas_below: usize) -> Result<(), AttestationError> {
    let subject = &issuer.tbs_certificate.subject;
    let untrusted = |reason: &str| AttestationError::UntrustedChain(format!("{subject} {reason}"));

    let constraints = match issuer.tbs_certificate.get::<BasicConstraints>() {
        Ok(Some((_critical, constraints))) => constraints,
        Ok(None) => return Err(untrusted("has no basic constraints")),
        Err(err) => return Err(untrusted(&format!("has invalid basic constraints: {err}"))),
    };
    if !constraints.ca {
        return Err(untrusted("is not a certificate authority"));
    }
    if let Some(path_len) = constraints.path_len_constraint {
        if cas_below > usize::from(path_len) {
            return Err(untrusted(&format!(
                "allows {path_len} intermediate certificates, chain has {cas_below}"
            )));
        }
    }

    match issuer.tbs_certificate.get::<KeyUsage>() {
        Ok(Some((_critical, key_usage))) if !key_usage.key_cert_sign() => {
            Err(untrusted("is not allowed to sign certificates"))
        }
        Ok(_) => Ok(()),
        Err(err) => Err(untrusted(&format!("has invalid key usage: {err}"))),
    }
}

/// Validates the certificate chain of `statement` against `trust_store` at
/// `now`, checks that the leaf is issued for `hostname` and verifies the
/// statement signature with the leaf key. Returns the leaf certificate.
pub fn verify_chain(
    statement: &SignedStatement,
    trust_store: &TrustStore,
    hostname: &str,
    now: Instant,
) -> Result<Certificate, AttestationError> {
    let encoded_chain = statement.certificate_chain();
    let chain = encoded_chain
        .iter()
        .map(|der| Certificate::from_der(der))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(leaf) = chain.first() else {
        return Err(AttestationError::MissingCertificateChain);
    };

    let mut index = 0;
    loop {
        let certificate = &chain[index];
        verify_validity(certificate, now)?;

        if trust_store.find_identical(&encoded_chain[index]).is_some() {
            debug!("chain anchored at trusted certificate {index}");
            break;
        }

        match chain.get(index + 1) {
            Some(issuer) => {
                if issuer.tbs_certificate.subject != certificate.tbs_certificate.issuer {
                    return Err(AttestationError::UntrustedChain(format!(
                        "certificate {index} is issued by {}, not by {}",
                        certificate.tbs_certificate.issuer, issuer.tbs_certificate.subject
                    )));
                }
                verify_certificate_signature(issuer, certificate).map_err(|err| {
                    AttestationError::UntrustedChain(format!(
                        "certificate {index} is not signed by its issuer: {err}"
                    ))
                })?;
                verify_authority(issuer, index)?;
                index += 1;
            }
            None => {
                let root = trust_store.find_issuer(certificate).ok_or_else(|| {
                    AttestationError::UntrustedChain(format!(
                        "no trusted root issued {}",
                        certificate.tbs_certificate.subject
                    ))
                })?;
                verify_authority(root, index)?;
                verify_validity(root, now)?;
                debug!("chain anchored at trusted root {}", root.tbs_certificate.subject);
                break;
            }
        }
    }

    verify_identity(leaf, hostname)?;
    verify_statement_signature(statement, leaf).map_err(|err| {
        debug!("statement signature rejected: {err}");
        AttestationError::SignatureInvalid
    })?;

    Ok(leaf.clone())
}

fn verify_validity(certificate: &Certificate, now: Instant) -> Result<(), AttestationError> {
    let validity = &certificate.tbs_certificate.validity;
    let not_before = Instant::from(validity.not_before.to_system_time());
    let not_after = Instant::from(validity.not_after.to_system_time());

    if now < not_before || now > not_after {
        Err(AttestationError::ExpiredCertificate {
            subject: certificate.tbs_certificate.subject.to_string(),
            not_before,
            not_after,
            now,
        })
    } else {
        Ok(())
    }
}

/// Checks the DNS names of the subjectAltName extension against `hostname`.
/// The subject common name is only consulted when there is no such extension.
/// An extension that does not decode matches nothing.
fn verify_identity(leaf: &Certificate, hostname: &str) -> Result<(), AttestationError> {
    let matches = match leaf.tbs_certificate.get::<SubjectAltName>() {
        Ok(Some((_critical, alt_names))) => alt_names.0.iter().any(|name| match name {
            GeneralName::DnsName(dns) => dns.as_str().eq_ignore_ascii_case(hostname),
            _ => false,
        }),
        Ok(None) => common_names(&leaf.tbs_certificate.subject)
            .any(|common_name| common_name.eq_ignore_ascii_case(hostname)),
        Err(err) => {
            debug!("leaf subjectAltName does not decode: {err}");
            false
        }
    };

    if matches {
        Ok(())
    } else {
        Err(AttestationError::IdentityMismatch { expected: hostname.to_string() })
    }
}

fn common_names(name: &Name) -> impl Iterator<Item = &str> {
    name.0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .filter(|attribute| attribute.oid == CN)
        .filter_map(|attribute| std::str::from_utf8(attribute.value.value()).ok())
}

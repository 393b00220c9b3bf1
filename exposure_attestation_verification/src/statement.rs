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

//! Parsing of compact signed statements.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AttestationError;

const SEGMENT_SEPARATOR: char = '.';

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decodes base64 in either the standard or the URL-safe alphabet, with or
/// without padding. Issuers are not consistent about which one they use.
pub(crate) fn decode_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if input.contains(|c| c == '-' || c == '_') {
        URL_SAFE_LENIENT.decode(input)
    } else {
        STANDARD_LENIENT.decode(input)
    }
}

/// The signature algorithms a statement may be signed with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    #[serde(rename = "RS256")]
    Rs256,
    /// ECDSA on P-256 with SHA-256, signature encoded as `r || s`.
    #[serde(rename = "ES256")]
    Es256,
}

/// The fields of the statement header needed for verification.
///
/// https://datatracker.ietf.org/doc/html/rfc7515#section-4.1
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Header {
    #[serde(rename = "alg")]
    pub algorithm: Algorithm,

    /// Base64 DER certificates, leaf first.
    #[serde(rename = "x5c", default)]
    pub x509_chain: Vec<String>,
}

/// A statement split into its segments. The header and payload are kept in
/// their original encoded form because the signature covers that text.
#[derive(Debug)]
pub struct SignedStatement {
    header: Header,
    header_segment: String,
    payload_segment: String,
    signature: Vec<u8>,
    certificate_chain: Vec<Vec<u8>>,
}

impl SignedStatement {
    pub fn parse(raw: &str) -> Result<Self, AttestationError> {
        let segments: Vec<&str> = raw.split(SEGMENT_SEPARATOR).collect();
        let [header_segment, payload_segment, signature_segment] = segments.as_slice() else {
            return Err(AttestationError::MalformedStatement(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(AttestationError::MalformedStatement("empty segment".to_string()));
        }

        let header: Header = serde_json::from_slice(&decode_base64(header_segment)?)
            .map_err(|e| AttestationError::MalformedStatement(format!("invalid header: {e}")))?;
        serde_json::from_slice::<Map<String, Value>>(&decode_base64(payload_segment)?)
            .map_err(|e| AttestationError::MalformedStatement(format!("invalid payload: {e}")))?;
        let signature = decode_base64(signature_segment)?;

        if header.x509_chain.is_empty() {
            return Err(AttestationError::MissingCertificateChain);
        }
        let certificate_chain = header
            .x509_chain
            .iter()
            .map(|certificate| decode_base64(certificate))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            header_segment: header_segment.to_string(),
            payload_segment: payload_segment.to_string(),
            signature,
            certificate_chain,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_segment(&self) -> &str {
        &self.header_segment
    }

    pub fn payload_segment(&self) -> &str {
        &self.payload_segment
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// DER encoded certificates, leaf first.
    pub fn certificate_chain(&self) -> &[Vec<u8>] {
        &self.certificate_chain
    }

    /// The exact bytes covered by the signature.
    pub fn signed_data(&self) -> String {
        format!("{}{SEGMENT_SEPARATOR}{}", self.header_segment, self.payload_segment)
    }
}

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

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

use crate::{canonical, model::Publish};

/// Something that can render the nonce an attestation statement is expected
/// to carry.
///
/// An empty rendering means "no nonce is available" and is rejected by the
/// verifier exactly like a missing nonce.
pub trait Nonce {
    fn nonce(&self) -> String;
}

/// The nonce bound to a specific publish request: the standard base64
/// encoding of the SHA-256 digest of its canonical cleartext.
#[derive(Clone, Copy, Debug)]
pub struct PublishNonce<'a> {
    publish: &'a Publish,
}

impl<'a> PublishNonce<'a> {
    pub fn new(publish: &'a Publish) -> Self {
        Self { publish }
    }

    /// Returns the raw 32-byte digest that [`Nonce::nonce`] renders.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(canonical::encode(self.publish)).into()
    }
}

impl Nonce for PublishNonce<'_> {
    fn nonce(&self) -> String {
        STANDARD.encode(self.digest())
    }
}

/// A nonce that always renders empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyNonce;

impl Nonce for EmptyNonce {
    fn nonce(&self) -> String {
        String::new()
    }
}

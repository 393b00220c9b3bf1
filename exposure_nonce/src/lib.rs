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

//! Derives the attestation nonce for a publish request.
//!
//! A device asks the attestation service to sign a statement over
//! [`PublishNonce::nonce`] of the exact request it is about to send. The
//! server recomputes the same value from the request it received, so a
//! captured statement cannot be replayed against different keys, regions or
//! authority names.

pub mod canonical;
pub mod model;
pub mod nonce;

pub use model::{ExposureKey, Publish};
pub use nonce::{EmptyNonce, Nonce, PublishNonce};

//! Digest algorithms named by manifest attributes, with base64 encoding.
//!
//! Manifests declare digests as `<ALG>-Digest: <base64>`. This module maps the
//! `<ALG>` prefix to an algorithm and hashes raw chunks; deciding whether a
//! declared digest is acceptable is left to the caller.

use base64::Engine;
use sha2::{Digest as _, Sha256, Sha384, Sha512};

use crate::error::DigestError;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 3] = [
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// Canonical attribute prefix, as written by signers (e.g. `SHA-256`).
    pub fn attribute_prefix(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Parse an attribute prefix such as `SHA-256` (case-insensitive).
    pub fn from_attribute_prefix(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha-256" | "sha256" => Some(DigestAlgorithm::Sha256),
            "sha-384" | "sha384" => Some(DigestAlgorithm::Sha384),
            "sha-512" | "sha512" => Some(DigestAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Output length in bytes for this algorithm.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.attribute_prefix())
    }
}

/// Compute digest of the given data using the specified algorithm.
#[tracing::instrument(skip(data), fields(data_len = data.len(), alg = ?algorithm))]
pub fn compute_digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Encode a digest the way manifests store it (standard, padded base64).
pub fn encode_digest(digest: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(digest)
}

/// Decode a digest attribute value and check its length.
///
/// Accepts both padded and unpadded base64.
pub fn decode_digest(algorithm: DigestAlgorithm, value: &str) -> Result<Vec<u8>, DigestError> {
    let value = value.trim();
    let digest = base64::engine::general_purpose::STANDARD
        .decode(value)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(value))?;
    if digest.len() != algorithm.output_len() {
        return Err(DigestError::LengthMismatch {
            algorithm,
            expected: algorithm.output_len(),
            got: digest.len(),
        });
    }
    Ok(digest)
}

//! Byte-exact parsing of JAR/APK signing manifests.
//!
//! The parser turns `META-INF/MANIFEST.MF` (and signature files with the same
//! syntax) into main attributes, per-entry attributes and the raw byte span of
//! every entry block, so a verifier can hash exactly what the signer hashed.
//! It does not decide whether any digest or signature is trustworthy.

pub mod attributes;
pub mod candidates;
pub mod digest;
pub mod error;
pub mod manifest;
mod scan;
pub mod types;

pub use candidates::{BufferCandidates, CandidateSource, ZipCandidates, parse_first_candidate};
pub use digest::{DigestAlgorithm, compute_digest, decode_digest, encode_digest};
pub use error::{CandidateError, DigestError, ManifestError};
pub use manifest::{Attributes, Manifest, parse_manifest};
pub use scan::{MAX_NAME_LEN, is_valid_name};
pub use types::*;

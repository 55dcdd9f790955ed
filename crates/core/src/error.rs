//! Error types for manifest parsing and candidate selection.

use thiserror::Error;

use crate::digest::DigestAlgorithm;

/// Structural failure while parsing a single manifest buffer.
///
/// Every variant aborts the parse; no partial manifest is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The `:` after an attribute name is not followed by a single space.
    #[error("Invalid header structure '{name}' at offset {offset}: expected ': ' separator")]
    MissingSeparator { name: String, offset: usize },

    /// Attribute name is empty, longer than 70 bytes, or outside `[A-Za-z0-9_-]`.
    #[error("Invalid attribute name in manifest: '{name}' at offset {offset}")]
    InvalidName { name: String, offset: usize },

    #[error("NUL character in manifest at offset {offset}")]
    NulByte { offset: usize },

    /// An entry block whose first header is not `Name`.
    #[error("Entry is not named: block at offset {offset} starts with '{name}'")]
    EntryNotNamed { name: String, offset: usize },

    #[error("More than one entry with the same name: '{name}'")]
    DuplicateEntry { name: String },

    #[error("Value of attribute '{name}' at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { name: String, offset: usize },
}

/// Failure to obtain a parsed manifest from any candidate buffer.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("Failed to open {entry}")]
    NotFound { entry: String },

    #[error("Failed to read {entry}: {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {entry}: {source}")]
    Parse {
        entry: String,
        #[source]
        source: ManifestError,
    },
}

/// A digest attribute value that cannot be used as a digest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("Invalid base64 in digest attribute: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Digest length mismatch for {algorithm}: expected {expected}, got {got}")]
    LengthMismatch {
        algorithm: DigestAlgorithm,
        expected: usize,
        got: usize,
    },
}

impl CandidateError {
    /// Logical entry name the error refers to.
    pub fn entry(&self) -> &str {
        match self {
            CandidateError::NotFound { entry }
            | CandidateError::Io { entry, .. }
            | CandidateError::Parse { entry, .. } => entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_entry_and_cause() {
        let err = CandidateError::Parse {
            entry: "META-INF/MANIFEST.MF".into(),
            source: ManifestError::NulByte { offset: 12 },
        };
        assert_eq!(err.entry(), "META-INF/MANIFEST.MF");
        assert_eq!(
            err.to_string(),
            "Failed to parse META-INF/MANIFEST.MF: NUL character in manifest at offset 12"
        );
    }

    #[test]
    fn not_found_mentions_entry() {
        let err = CandidateError::NotFound {
            entry: "META-INF/CERT.SF".into(),
        };
        assert_eq!(err.to_string(), "Failed to open META-INF/CERT.SF");
    }
}

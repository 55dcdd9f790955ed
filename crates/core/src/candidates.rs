//! Candidate buffers for a logical archive entry, and first-success selection.
//!
//! An archive may hold several physical entries under the same path. Each one
//! is a candidate; [`parse_first_candidate`] tries them in order and keeps the
//! first that parses.

use std::io::{self, Read, Seek};

use zip::ZipArchive;

use crate::error::CandidateError;
use crate::manifest::{Manifest, parse_manifest};
use crate::types::ParseOptions;

/// Ordered supply of candidate buffers sharing one logical entry name.
pub trait CandidateSource {
    /// Logical entry name, used in error messages.
    fn name(&self) -> &str;

    /// Read the next candidate, or `None` once all have been handed out.
    fn next_candidate(&mut self) -> Option<io::Result<Vec<u8>>>;
}

/// Candidates already held in memory.
#[derive(Debug)]
pub struct BufferCandidates {
    name: String,
    buffers: std::vec::IntoIter<Vec<u8>>,
}

impl BufferCandidates {
    pub fn new(name: impl Into<String>, buffers: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            buffers: buffers.into_iter(),
        }
    }

    pub fn single(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(name, vec![data])
    }
}

impl CandidateSource for BufferCandidates {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_candidate(&mut self) -> Option<io::Result<Vec<u8>>> {
        self.buffers.next().map(Ok)
    }
}

/// Every physical zip entry stored under a given path, in central directory order.
pub struct ZipCandidates<R: Read + Seek> {
    archive: ZipArchive<R>,
    name: String,
    indices: std::vec::IntoIter<usize>,
}

impl<R: Read + Seek> ZipCandidates<R> {
    /// Open the archive and find all entries named `name`.
    ///
    /// Entry contents are only read when a candidate is requested.
    #[tracing::instrument(skip(reader, name), fields(entry = %name.as_ref()))]
    pub fn new(reader: R, name: impl AsRef<str>) -> zip::result::ZipResult<Self> {
        let name = name.as_ref().to_owned();
        let mut archive = ZipArchive::new(reader)?;

        let mut indices = Vec::new();
        for index in 0..archive.len() {
            if archive.by_index_raw(index)?.name() == name {
                indices.push(index);
            }
        }
        tracing::debug!(
            archive_entries = archive.len(),
            candidates = indices.len(),
            "Located candidate entries"
        );

        Ok(Self {
            archive,
            name,
            indices: indices.into_iter(),
        })
    }

    /// Number of candidates not yet handed out.
    pub fn remaining(&self) -> usize {
        self.indices.len()
    }

    fn read_entry(&mut self, index: usize) -> io::Result<Vec<u8>> {
        let mut file = self.archive.by_index(index)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl<R: Read + Seek> CandidateSource for ZipCandidates<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_candidate(&mut self) -> Option<io::Result<Vec<u8>>> {
        let index = self.indices.next()?;
        Some(self.read_entry(index))
    }
}

/// Parse candidates in order and return the first manifest that parses.
///
/// A candidate that cannot be read or parsed is skipped. If none succeeds, the
/// error from the last candidate is returned, or [`CandidateError::NotFound`]
/// when the source had no candidates at all.
#[tracing::instrument(skip(source), fields(entry = %source.name()))]
pub fn parse_first_candidate<S: CandidateSource + ?Sized>(
    source: &mut S,
    options: ParseOptions,
) -> Result<Manifest, CandidateError> {
    let mut last_error: Option<CandidateError> = None;
    let mut attempt = 0usize;

    while let Some(candidate) = source.next_candidate() {
        attempt += 1;
        let data = match candidate {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Failed to read candidate");
                last_error = Some(CandidateError::Io {
                    entry: source.name().to_owned(),
                    source: e,
                });
                continue;
            }
        };

        match parse_manifest(data, options) {
            Ok(manifest) => {
                tracing::debug!(attempt, "Parsed candidate");
                return Ok(manifest);
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Failed to parse candidate");
                last_error = Some(CandidateError::Parse {
                    entry: source.name().to_owned(),
                    source: e,
                });
            }
        }
    }

    Err(last_error.unwrap_or_else(|| CandidateError::NotFound {
        entry: source.name().to_owned(),
    }))
}

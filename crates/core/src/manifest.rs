//! Manifest parsing with byte-exact entry spans.
//!
//! A manifest is a main block of `Name: Value` headers followed by entry blocks
//! separated by blank lines; each entry block starts with a `Name` header.
//! Signers hash every entry block exactly as written, so the parser records
//! where each block starts and ends in the raw data instead of re-serializing.

use std::collections::BTreeMap;

use crate::attributes;
use crate::digest::DigestAlgorithm;
use crate::error::ManifestError;
use crate::scan::Scanner;
use crate::types::{ParseOptions, Span};

pub type Attributes = BTreeMap<String, String>;

/// A parsed manifest together with the raw bytes it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    raw: Vec<u8>,
    main: Attributes,
    entries: BTreeMap<String, Attributes>,
    chunks: BTreeMap<String, Span>,
    main_end: usize,
}

impl Manifest {
    /// The exact bytes that were parsed.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn main_attributes(&self) -> &Attributes {
        &self.main
    }

    /// Look up a main attribute by name (case-insensitive).
    pub fn main_attribute(&self, key: &str) -> Option<&str> {
        lookup(&self.main, key)
    }

    pub fn entries(&self) -> &BTreeMap<String, Attributes> {
        &self.entries
    }

    /// Attributes of an entry, without its `Name` header.
    pub fn entry(&self, name: &str) -> Option<&Attributes> {
        self.entries.get(name)
    }

    pub fn entry_attribute(&self, name: &str, key: &str) -> Option<&str> {
        lookup(self.entry(name)?, key)
    }

    /// Entry spans; empty unless parsed with [`ParseOptions::capture_chunks`].
    pub fn spans(&self) -> &BTreeMap<String, Span> {
        &self.chunks
    }

    pub fn span(&self, name: &str) -> Option<Span> {
        self.chunks.get(name).copied()
    }

    /// Raw bytes of an entry block, including its trailing blank line.
    pub fn chunk(&self, name: &str) -> Option<&[u8]> {
        self.span(name).map(|span| &self.raw[span.range()])
    }

    /// Offset where the main block ends and the first entry block begins.
    pub fn main_end(&self) -> usize {
        self.main_end
    }

    /// Raw bytes of the main block, including its terminating blank line.
    pub fn main_section(&self) -> &[u8] {
        &self.raw[..self.main_end]
    }

    /// Recognised `<ALG>-Digest` attributes of an entry.
    pub fn entry_digests(&self, name: &str) -> Vec<(DigestAlgorithm, &str)> {
        self.entry(name)
            .map(|attrs| attributes::digest_attributes(attrs, attributes::DIGEST_SUFFIX))
            .unwrap_or_default()
    }

    /// Recognised `<ALG><suffix>` attributes of the main block.
    pub fn main_digests(&self, suffix: &str) -> Vec<(DigestAlgorithm, &str)> {
        attributes::digest_attributes(&self.main, suffix)
    }
}

fn lookup<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
    attrs.get(&key.to_ascii_lowercase()).map(String::as_str)
}

/// Parse a manifest.
///
/// With `options.capture_chunks`, the span of every entry block is recorded
/// and a repeated entry name is an error. Without it, attributes of repeated
/// entries are merged.
pub fn parse_manifest(
    data: impl Into<Vec<u8>>,
    options: ParseOptions,
) -> Result<Manifest, ManifestError> {
    let raw = data.into();
    let blocks = parse_blocks(&raw, options)?;
    Ok(Manifest {
        raw,
        main: blocks.main,
        entries: blocks.entries,
        chunks: blocks.chunks,
        main_end: blocks.main_end,
    })
}

#[derive(Default)]
struct Blocks {
    main: Attributes,
    entries: BTreeMap<String, Attributes>,
    chunks: BTreeMap<String, Span>,
    main_end: usize,
}

#[tracing::instrument(skip(data), fields(data_len = data.len()))]
fn parse_blocks(data: &[u8], options: ParseOptions) -> Result<Blocks, ManifestError> {
    let mut scanner = Scanner::new(data);
    let mut blocks = Blocks::default();

    while let Some(header) = scanner.next_header()? {
        blocks.main.insert(header.name, header.value);
    }
    blocks.main_end = scanner.position();

    let mut mark = scanner.position();
    while let Some(first) = scanner.next_header()? {
        if first.name != attributes::NAME {
            return Err(ManifestError::EntryNotNamed {
                name: first.name,
                offset: first.offset,
            });
        }

        let entry_name = first.value;
        let entry = blocks.entries.entry(entry_name.clone()).or_default();
        while let Some(header) = scanner.next_header()? {
            entry.insert(header.name, header.value);
        }

        if options.capture_chunks {
            if blocks.chunks.contains_key(&entry_name) {
                return Err(ManifestError::DuplicateEntry { name: entry_name });
            }
            blocks
                .chunks
                .insert(entry_name, Span::new(mark, scanner.position()));
        }
        mark = scanner.position();
    }

    tracing::debug!(
        main_attributes = blocks.main.len(),
        entries = blocks.entries.len(),
        main_end = blocks.main_end,
        "Parsed manifest"
    );
    Ok(blocks)
}

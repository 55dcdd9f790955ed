//! Common types shared by the parser and its callers.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Options controlling a single parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Record the raw byte span of every entry block.
    ///
    /// Enabling this also turns repeated entry names into a hard error.
    pub capture_chunks: bool,
}

impl ParseOptions {
    pub fn with_chunks() -> Self {
        Self {
            capture_chunks: true,
        }
    }
}

/// Half-open byte range `[start, end)` into a manifest's raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

//! Header record scanner.
//!
//! The scanner walks the raw manifest bytes one header record at a time. Line
//! break handling is modelled as a small state machine: [`step`] is a pure
//! function from the current [`ScanState`] and the next byte to a
//! [`Transition`], and [`Scanner`] only moves the cursor and collects bytes
//! according to what `step` returns.

use crate::error::ManifestError;

/// Longest attribute name: the 72-byte line limit minus the `": "` separator.
pub const MAX_NAME_LEN: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Looking for the `:` that ends an attribute name.
    ReadingName,
    /// Inside a value with no pending line break.
    ReadingValue,
    /// Exactly one line break seen. `cr` is set when that break was a bare
    /// `\r` so far, in which case a following `\n` belongs to the same break.
    AtContinuation { cr: bool },
    /// Two or more consecutive line breaks seen: the block is over.
    AtBlockBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Byte belongs to the current name or value.
    Consume,
    /// The `:` ending an attribute name.
    Delimiter,
    /// Line break byte, moving to the given state.
    LineBreak(ScanState),
    /// Space after a single line break: the next line continues the value.
    Fold,
    /// Byte begins the next record and must be left unread.
    Finish,
    /// NUL inside a value.
    Nul,
}

pub(crate) fn step(state: ScanState, byte: u8) -> Transition {
    use ScanState::*;

    match (state, byte) {
        (ReadingName, b':') => Transition::Delimiter,
        (ReadingName, _) => Transition::Consume,

        (_, 0) => Transition::Nul,

        (ReadingValue, b'\n') => Transition::LineBreak(AtContinuation { cr: false }),
        (ReadingValue, b'\r') => Transition::LineBreak(AtContinuation { cr: true }),
        (ReadingValue, _) => Transition::Consume,

        // `\r\n` is one break
        (AtContinuation { cr: true }, b'\n') => {
            Transition::LineBreak(AtContinuation { cr: false })
        }
        (AtContinuation { .. }, b'\n' | b'\r') => Transition::LineBreak(AtBlockBoundary),
        (AtContinuation { .. }, b' ') => Transition::Fold,

        (AtBlockBoundary, b'\n' | b'\r') => Transition::LineBreak(AtBlockBoundary),

        (AtContinuation { .. } | AtBlockBoundary, _) => Transition::Finish,
    }
}

/// Returns true if `name` is a legal attribute name.
pub fn is_valid_name(name: &[u8]) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .iter()
            .all(|&c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
}

/// A single `Name: Value` record, with the name already lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub name: String,
    pub value: String,
    /// Offset of the first byte of the record.
    pub offset: usize,
}

pub(crate) struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
    block_end_pending: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            block_end_pending: false,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next header record of the current block.
    ///
    /// Returns `Ok(None)` once the block is over: after a blank line, at the
    /// end of the input, or for a final record with no line break after it.
    pub fn next_header(&mut self) -> Result<Option<Header>, ManifestError> {
        // The previous record already consumed the blank line ending its block.
        if self.block_end_pending {
            self.block_end_pending = false;
            return Ok(None);
        }

        let offset = self.pos;
        let Some(name) = self.read_name()? else {
            return Ok(None);
        };
        let value_offset = self.pos;
        let (value, state) = self.read_value()?;

        self.block_end_pending = state == ScanState::AtBlockBoundary;
        if !matches!(
            state,
            ScanState::AtContinuation { .. } | ScanState::AtBlockBoundary
        ) {
            return Ok(None);
        }

        let value = String::from_utf8(value).map_err(|_| ManifestError::InvalidUtf8 {
            name: name.clone(),
            offset: value_offset,
        })?;
        Ok(Some(Header {
            name,
            value,
            offset,
        }))
    }

    /// Scan up to and past the `": "` separator. `None` if no `:` remains.
    fn read_name(&mut self) -> Result<Option<String>, ManifestError> {
        let start = self.pos;
        while self.pos < self.data.len() {
            match step(ScanState::ReadingName, self.data[self.pos]) {
                Transition::Delimiter => break,
                _ => self.pos += 1,
            }
        }
        if self.pos == self.data.len() {
            return Ok(None);
        }

        let raw = &self.data[start..self.pos];
        if self.data.get(self.pos + 1) != Some(&b' ') {
            return Err(ManifestError::MissingSeparator {
                name: String::from_utf8_lossy(raw).into_owned(),
                offset: start,
            });
        }
        if !is_valid_name(raw) {
            return Err(ManifestError::InvalidName {
                name: String::from_utf8_lossy(raw).into_owned(),
                offset: start,
            });
        }

        self.pos += 2;
        Ok(Some(
            raw.iter().map(|b| b.to_ascii_lowercase() as char).collect(),
        ))
    }

    /// Scan a value, unfolding continuation lines.
    ///
    /// Bytes are gathered before decoding because a wrapped line may split a
    /// multi-byte character.
    fn read_value(&mut self) -> Result<(Vec<u8>, ScanState), ManifestError> {
        let mut value = Vec::new();
        let mut state = ScanState::ReadingValue;
        // Current physical line segment is data[mark..last].
        let mut mark = self.pos;
        let mut last = self.pos;

        while self.pos < self.data.len() {
            match step(state, self.data[self.pos]) {
                Transition::Nul => return Err(ManifestError::NulByte { offset: self.pos }),
                Transition::Consume | Transition::Delimiter => {
                    self.pos += 1;
                    last = self.pos;
                }
                Transition::LineBreak(next) => {
                    self.pos += 1;
                    state = next;
                }
                Transition::Fold => {
                    value.extend_from_slice(&self.data[mark..last]);
                    self.pos += 1;
                    mark = self.pos;
                    last = self.pos;
                    state = ScanState::ReadingValue;
                }
                Transition::Finish => break,
            }
        }

        value.extend_from_slice(&self.data[mark..last]);
        Ok((value, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(data: &[u8]) -> Vec<Option<(String, String)>> {
        let mut scanner = Scanner::new(data);
        let mut out = Vec::new();
        while scanner.position() < data.len() || scanner.block_end_pending {
            out.push(
                scanner
                    .next_header()
                    .unwrap()
                    .map(|h| (h.name, h.value)),
            );
        }
        out
    }

    fn pair(name: &str, value: &str) -> Option<(String, String)> {
        Some((name.to_string(), value.to_string()))
    }

    #[test]
    fn step_counts_line_breaks() {
        use ScanState::*;
        assert_eq!(step(ReadingValue, b'a'), Transition::Consume);
        assert_eq!(
            step(ReadingValue, b'\n'),
            Transition::LineBreak(AtContinuation { cr: false })
        );
        assert_eq!(
            step(AtContinuation { cr: false }, b'\n'),
            Transition::LineBreak(AtBlockBoundary)
        );
        assert_eq!(
            step(AtBlockBoundary, b'\r'),
            Transition::LineBreak(AtBlockBoundary)
        );
    }

    #[test]
    fn step_treats_crlf_as_one_break() {
        use ScanState::*;
        assert_eq!(
            step(ReadingValue, b'\r'),
            Transition::LineBreak(AtContinuation { cr: true })
        );
        assert_eq!(
            step(AtContinuation { cr: true }, b'\n'),
            Transition::LineBreak(AtContinuation { cr: false })
        );
        assert_eq!(
            step(AtContinuation { cr: true }, b'\r'),
            Transition::LineBreak(AtBlockBoundary)
        );
    }

    #[test]
    fn step_folds_only_after_single_break() {
        use ScanState::*;
        assert_eq!(step(AtContinuation { cr: false }, b' '), Transition::Fold);
        assert_eq!(step(AtContinuation { cr: true }, b' '), Transition::Fold);
        assert_eq!(step(AtBlockBoundary, b' '), Transition::Finish);
        assert_eq!(step(ReadingValue, b' '), Transition::Consume);
        assert_eq!(step(AtContinuation { cr: false }, b'N'), Transition::Finish);
    }

    #[test]
    fn step_rejects_nul_in_values_only() {
        use ScanState::*;
        assert_eq!(step(ReadingValue, 0), Transition::Nul);
        assert_eq!(step(AtContinuation { cr: false }, 0), Transition::Nul);
        assert_eq!(step(AtBlockBoundary, 0), Transition::Nul);
        assert_eq!(step(ReadingName, 0), Transition::Consume);
        assert_eq!(step(ReadingName, b':'), Transition::Delimiter);
        assert_eq!(step(ReadingValue, b':'), Transition::Consume);
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name(b"Digest-SHA"));
        assert!(is_valid_name(b"X_Android-APK-Signed2"));
        assert!(!is_valid_name(b"bad name"));
        assert!(!is_valid_name(b""));
        assert!(!is_valid_name(b"caf\xc3\xa9"));
        assert!(is_valid_name(&[b'a'; 70]));
        assert!(!is_valid_name(&[b'a'; 71]));
    }

    #[test]
    fn reads_records_and_block_end() {
        let data = b"Manifest-Version: 1.0\nCreated-By: test\n\nName: a\n";
        assert_eq!(
            headers(data),
            vec![
                pair("manifest-version", "1.0"),
                pair("created-by", "test"),
                None,
                pair("name", "a"),
            ]
        );
    }

    #[test]
    fn unfolds_continuation_lines() {
        let data = b"Name: first part\n second part\r\n third\n";
        assert_eq!(
            headers(data),
            vec![pair("name", "first partsecond partthird")]
        );
    }

    #[test]
    fn folded_utf8_is_decoded_after_joining() {
        // U+00E9 split across the wrap.
        let data = b"Name: caf\xc3\n \xa9\n";
        assert_eq!(headers(data), vec![pair("name", "caf\u{e9}")]);
    }

    #[test]
    fn blank_line_sets_pending_block_end() {
        let mut scanner = Scanner::new(b"A: 1\r\n\r\nB: 2\n");
        assert_eq!(scanner.next_header().unwrap().unwrap().value, "1");
        assert_eq!(scanner.position(), 8);
        assert_eq!(scanner.next_header().unwrap(), None);
        let b = scanner.next_header().unwrap().unwrap();
        assert_eq!((b.name.as_str(), b.offset), ("b", 8));
    }

    #[test]
    fn unterminated_final_record_is_dropped() {
        let mut scanner = Scanner::new(b"A: 1\nB: 2");
        assert!(scanner.next_header().unwrap().is_some());
        assert_eq!(scanner.next_header().unwrap(), None);
        assert_eq!(scanner.position(), 9);
    }

    #[test]
    fn trailing_bytes_without_colon_end_the_block() {
        let mut scanner = Scanner::new(b"A: 1\ntrailing");
        assert!(scanner.next_header().unwrap().is_some());
        assert_eq!(scanner.next_header().unwrap(), None);
        assert_eq!(scanner.position(), 13);
    }

    #[test]
    fn separator_must_be_colon_space() {
        let err = Scanner::new(b"Name:a\n").next_header().unwrap_err();
        assert!(matches!(err, ManifestError::MissingSeparator { ref name, offset: 0 } if name == "Name"));

        let err = Scanner::new(b"Name:").next_header().unwrap_err();
        assert!(matches!(err, ManifestError::MissingSeparator { .. }));
    }

    #[test]
    fn invalid_name_is_reported() {
        let err = Scanner::new(b"bad name: x\n").next_header().unwrap_err();
        assert_eq!(
            err,
            ManifestError::InvalidName {
                name: "bad name".into(),
                offset: 0
            }
        );
    }

    #[test]
    fn nul_in_value_is_reported() {
        let err = Scanner::new(b"A: x\0y\n").next_header().unwrap_err();
        assert_eq!(err, ManifestError::NulByte { offset: 4 });
    }

    #[test]
    fn invalid_utf8_value_is_reported() {
        let err = Scanner::new(b"A: \xff\n").next_header().unwrap_err();
        assert_eq!(
            err,
            ManifestError::InvalidUtf8 {
                name: "a".into(),
                offset: 3
            }
        );
    }
}

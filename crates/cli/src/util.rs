//! CLI utility functions.

use apk_manifest_core::Span;

pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const KB_TO_MB_ROUNDING_THRESHOLD: usize = 1_048_525;

    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < KB_TO_MB_ROUNDING_THRESHOLD {
        format!("{:.1} KB", bytes as f64 / KB)
    } else {
        format!("{:.2} MB", bytes as f64 / MB)
    }
}

/// `start..end (size)` for display.
pub fn format_span(span: Span) -> String {
    format!("{}..{} ({})", span.start, span.end, format_bytes(span.len()))
}

/// True if the data starts with a zip local file header.
pub fn looks_like_zip(data: &[u8]) -> bool {
    data.starts_with(b"PK\x03\x04")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_are_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
    }

    #[test]
    fn boundary_at_rounding_threshold() {
        assert!(format_bytes(1_048_524).ends_with("KB"));
        assert!(format_bytes(1_048_525).ends_with("MB"));
    }

    #[test]
    fn span_shows_range_and_size() {
        assert_eq!(format_span(Span::new(23, 58)), "23..58 (35 B)");
    }

    #[test]
    fn detects_zip_magic() {
        assert!(looks_like_zip(b"PK\x03\x04rest"));
        assert!(!looks_like_zip(b"Manifest-Version: 1.0\n"));
        assert!(!looks_like_zip(b"PK"));
    }
}

//! HTTP `Range` header parsing.
//!
//! Only single ranges are served. For a multi-range header the first
//! clause is used and the rest are ignored.

/// An inclusive byte range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered (`end - start + 1`).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a partial response.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("malformed range header: {0}")]
    Malformed(String),

    #[error("range not satisfiable for {size} byte file")]
    Unsatisfiable { size: u64 },
}

/// Parse a `Range` header value against a file of `size` bytes.
///
/// Supports:
/// - `bytes=0-499`
/// - `bytes=500-` (to end of file)
/// - `bytes=-500` (last 500 bytes)
/// - `bytes=0-99, 200-299` (only `0-99` is served)
///
/// An end past the last byte is clamped to `size - 1`.
pub fn parse_range(header: &str, size: u64) -> Result<ByteRange, RangeError> {
    let malformed = || RangeError::Malformed(header.to_string());

    let spec = header.trim().strip_prefix("bytes=").ok_or_else(malformed)?;
    let first = spec.split(',').next().unwrap_or_default().trim();
    let (start, end) = first.split_once('-').ok_or_else(malformed)?;
    let (start, end) = (start.trim(), end.trim());

    let unsatisfiable = RangeError::Unsatisfiable { size };

    match (start.is_empty(), end.is_empty()) {
        // bytes=-N
        (true, false) => {
            let suffix: u64 = end.parse().map_err(|_| malformed())?;
            if suffix == 0 || size == 0 {
                return Err(unsatisfiable);
            }
            Ok(ByteRange {
                start: size.saturating_sub(suffix),
                end: size - 1,
            })
        }
        // bytes=N-
        (false, true) => {
            let start: u64 = start.parse().map_err(|_| malformed())?;
            if start >= size {
                return Err(unsatisfiable);
            }
            Ok(ByteRange {
                start,
                end: size - 1,
            })
        }
        // bytes=N-M
        (false, false) => {
            let start: u64 = start.parse().map_err(|_| malformed())?;
            let end: u64 = end.parse().map_err(|_| malformed())?;
            if start > end {
                return Err(malformed());
            }
            if start >= size {
                return Err(unsatisfiable);
            }
            Ok(ByteRange {
                start,
                end: end.min(size - 1),
            })
        }
        (true, true) => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn range(start: u64, end: u64) -> ByteRange {
        ByteRange { start, end }
    }

    #[test]
    fn test_closed_range() {
        let r = parse_range("bytes=100-199", 1000).unwrap();
        assert_eq!(r, range(100, 199));
        assert_eq!(r.len(), 100);
        assert_eq!(r.content_range(1000), "bytes 100-199/1000");
    }

    #[test]
    fn test_open_end() {
        let r = parse_range("bytes=500-", 1000).unwrap();
        assert_eq!(r, range(500, 999));
        assert_eq!(r.len(), 500);
    }

    #[test]
    fn test_suffix() {
        assert_eq!(parse_range("bytes=-200", 1000).unwrap(), range(800, 999));
        assert_eq!(parse_range("bytes=-5000", 1000).unwrap(), range(0, 999));
    }

    #[test]
    fn test_end_clamped() {
        assert_eq!(parse_range("bytes=0-2000", 1000).unwrap(), range(0, 999));
    }

    #[test]
    fn test_single_byte() {
        let r = parse_range("bytes=999-999", 1000).unwrap();
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_first_of_multiple_ranges() {
        assert_eq!(
            parse_range("bytes=0-99, 200-299", 1000).unwrap(),
            range(0, 99)
        );
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_range(" bytes= 10 - 20 ", 1000).unwrap(), range(10, 20));
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(
            parse_range("bytes=1000-", 1000),
            Err(RangeError::Unsatisfiable { size: 1000 })
        );
        assert_eq!(
            parse_range("bytes=1500-1600", 1000),
            Err(RangeError::Unsatisfiable { size: 1000 })
        );
        assert_matches!(
            parse_range("bytes=0-", 0),
            Err(RangeError::Unsatisfiable { .. })
        );
        assert_matches!(
            parse_range("bytes=-0", 1000),
            Err(RangeError::Unsatisfiable { .. })
        );
    }

    #[test]
    fn test_malformed() {
        for header in [
            "bytes=-",
            "bytes=abc-def",
            "bytes=10",
            "items=0-10",
            "bytes=200-100",
            "",
        ] {
            assert!(
                matches!(parse_range(header, 1000), Err(RangeError::Malformed(_))),
                "{header:?}"
            );
        }
    }
}

// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Reader for textual probe captures
//!
//! A capture consists of lines of hex digits, one line per probe beat. Each
//! pair of digits forms one byte, most significant nibble first. Within a
//! line, the bytes are stored in reverse order of their transmission. This
//! module restores the transmission order: the bytes of each line are yielded
//! last-to-first, and lines are processed in order.
//!
//! # Example
//!
//! ```
//! use probe_kanata::hex;
//!
//! let bytes: Vec<u8> = hex::Reader::new(["0102", "a0b0c0"])
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(bytes, [0x02, 0x01, 0xc0, 0xb0, 0xa0]);
//! ```

use core::fmt;
use core::iter::FusedIterator;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;


/// Decode a single line of a capture
///
/// Leading and trailing whitespace (including a trailing `\r`) is ignored. An
/// empty line yields no bytes. On success, an iterator over the line's bytes
/// in transmission order is returned.
pub fn decode_line(line: &str) -> Result<LineBytes<'_>, ErrorKind> {
    let trimmed = line.trim();
    let invalid = trimmed.char_indices().find(|(_, c)| !c.is_ascii_hexdigit());
    if let Some((pos, digit)) = invalid {
        let offset = line.len() - line.trim_start().len();
        let column = line[..offset + pos].chars().count() + 1;
        return Err(ErrorKind::InvalidDigit { column, digit });
    }

    // Only ASCII digits are left
    let digits = trimmed.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(ErrorKind::MalformedLine(digits.len()));
    }
    Ok(LineBytes {
        pairs: digits.rchunks_exact(2),
    })
}

/// Read a whole capture into a buffer of bytes in transmission order
#[cfg(feature = "alloc")]
pub fn read_bytes<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<u8>, Error> {
    Reader::new(lines).collect()
}

/// Bytes of a single capture line, in transmission order
#[derive(Clone, Debug)]
pub struct LineBytes<'a> {
    pairs: core::slice::RChunksExact<'a, u8>,
}

impl Iterator for LineBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|p| (nibble(p[0]) << 4) | nibble(p[1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl ExactSizeIterator for LineBytes<'_> {}

impl FusedIterator for LineBytes<'_> {}

/// Reader yielding the bytes of a capture in transmission order
///
/// The reader consumes lines from an inner iterator and yields their bytes
/// one by one. If a line is malformed, a single [`Error`] carrying the
/// (1-based) line number is yielded and the reader stops.
#[derive(Clone, Debug)]
pub struct Reader<'a, I> {
    lines: I,
    line_number: usize,
    current: Option<LineBytes<'a>>,
    failed: bool,
}

impl<'a, I: Iterator<Item = &'a str>> Reader<'a, I> {
    /// Create a new reader for the given lines
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
            line_number: 0,
            current: None,
            failed: false,
        }
    }

    /// Retrieve the number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for Reader<'a, I> {
    type Item = Result<u8, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(byte) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(byte));
            }

            let line = self.lines.next()?;
            self.line_number += 1;
            match decode_line(line) {
                Ok(bytes) => self.current = Some(bytes),
                Err(kind) => {
                    self.failed = true;
                    return Some(Err(Error {
                        line: self.line_number,
                        kind,
                    }));
                }
            }
        }
    }
}

impl<'a, I: Iterator<Item = &'a str>> FusedIterator for Reader<'a, I> {}

/// Capture line rendering of bytes
///
/// This is the inverse of [`decode_line`]: the wrapped bytes, given in
/// transmission order, are rendered as a single capture line, i.e. as pairs of
/// lower case hex digits in reverse order.
#[derive(Copy, Clone, Debug)]
pub struct Line<'a>(pub &'a [u8]);

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().rev().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

/// Capture decoding error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    /// Line number (1-based) of the offending line
    pub line: usize,
    /// Kind of error
    pub kind: ErrorKind,
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Kind of a capture decoding [`Error`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The line holds the given, odd number of hex digits
    MalformedLine(usize),
    /// The line contains a character that is not a hex digit
    InvalidDigit { column: usize, digit: char },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine(n) => write!(f, "odd number of hex digits ({n})"),
            Self::InvalidDigit { column, digit } => {
                write!(f, "invalid hex digit {digit:?} in column {column}")
            }
        }
    }
}

/// Convert an (already validated) ASCII hex digit to its value
fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

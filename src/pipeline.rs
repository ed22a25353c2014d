// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Conversion of whole captures into Kanata logs
//!
//! This module strings together the [hex] reader, the token [`Decoder`], the
//! [`Tracer`][tracer::Tracer] and the [kanata] renderer. Lines of the log are written as soon
//! as the token they originate from was processed. If processing aborts, the
//! output written up to that point is a valid log of all preceding tokens.
//!
//! Recoverable conditions do not abort processing. They are logged as
//! warnings and collected as [`Diagnostic`]s in the [`Report`].
//!
//! # Example
//!
//! ```
//! use probe_kanata::pipeline;
//!
//! let capture = "150000200006\n050005\n";
//! let mut log = Vec::new();
//! let report = pipeline::run(capture.lines(), &mut log, &Default::default()).unwrap();
//! assert_eq!(report.tokens, 2);
//! assert!(String::from_utf8(log).unwrap().contains("S\t0\t0\tRs\n"));
//! ```

use std::fmt;
use std::io;
use std::vec::Vec;

use crate::config::Parameters;
use crate::token::{self, Decoder};
use crate::tracer::{self, Unretired, Warning};
use crate::{hex, kanata};

#[cfg(test)]
mod tests;

/// Convert a capture into a Kanata log
///
/// The capture is given as an iterator over its lines. The log is written to
/// `out`. On success, a [`Report`] summarizing the run is returned.
pub fn run<'a, W: io::Write>(
    lines: impl IntoIterator<Item = &'a str>,
    mut out: W,
    params: &Parameters,
) -> Result<Report, Error> {
    let bytes = hex::read_bytes(lines)?;
    tracing::debug!(bytes = bytes.len(), "Read capture");

    let mut decoder = Decoder::new(&bytes);
    let mut tracer = tracer::builder().with_params(params).build();
    let mut report = Report::default();

    writeln!(out, "{}", kanata::Header)?;
    while decoder.bytes_left() > 0 {
        let index = decoder.token_index();
        let offset = decoder.byte_pos();
        let token = match decoder.decode_token() {
            Ok(token) => token,
            Err(token::Error::IncompleteToken { remaining, .. }) => {
                report.push(Diagnostic::IncompleteToken {
                    index,
                    offset,
                    remaining,
                });
                break;
            }
            Err(token::Error::MalformedToken { header, .. })
                if !params.malformed_token.is_abort() =>
            {
                report.push(Diagnostic::MalformedToken {
                    index,
                    offset,
                    header,
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        tracing::trace!(index, offset, ?token, "Decoded token");

        let warning = tracer
            .process_token(&token)
            .map_err(|source| Error::Trace {
                index,
                offset,
                source,
            })?;
        if let Some(Warning::OrphanCompletion { hw_id }) = warning {
            report.push(Diagnostic::OrphanCompletion {
                index,
                offset,
                hw_id,
            });
        }

        for event in tracer.by_ref() {
            writeln!(out, "{}", kanata::Line(&event))?;
            report.events += 1;
        }
        report.tokens += 1;
    }
    out.flush()?;

    report.cycles = tracer.current_cycle();
    if let Some(unretired) = tracer.finish() {
        report.push(Diagnostic::UnretiredOperations(unretired));
    }
    tracing::debug!(
        tokens = report.tokens,
        events = report.events,
        cycles = report.cycles,
        "Finished trace"
    );
    Ok(report)
}

/// Summary of a [`run`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of tokens traced
    pub tokens: usize,
    /// Number of events written
    pub events: usize,
    /// Number of cycles covered by the trace
    pub cycles: u64,
    /// Recoverable conditions encountered
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Determine whether the run completed without any [`Diagnostic`]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// Recoverable condition encountered during a [`run`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The capture ends in the middle of a token
    ///
    /// The incomplete token and the remaining bytes were discarded.
    IncompleteToken {
        index: usize,
        offset: usize,
        remaining: usize,
    },
    /// A token with a malformed header was skipped
    MalformedToken {
        index: usize,
        offset: usize,
        header: u16,
    },
    /// A completion without matching open issue was ignored
    OrphanCompletion {
        index: usize,
        offset: usize,
        hw_id: u8,
    },
    /// Operations were left unretired at the end of the capture
    UnretiredOperations(Unretired),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteToken {
                index,
                offset,
                remaining,
            } => write!(
                f,
                "token {index} at byte {offset} is incomplete, discarded {remaining} bytes"
            ),
            Self::MalformedToken {
                index,
                offset,
                header,
            } => write!(
                f,
                "skipped token {index} at byte {offset} with malformed header {header:#06x}"
            ),
            Self::OrphanCompletion {
                index,
                offset,
                hw_id,
            } => write!(
                f,
                "token {index} at byte {offset}: {}",
                Warning::OrphanCompletion { hw_id: *hw_id }
            ),
            Self::UnretiredOperations(unretired) => unretired.fmt(f),
        }
    }
}

/// Errors aborting a [`run`]
#[derive(Debug)]
pub enum Error {
    /// The capture contains a malformed line
    Line(hex::Error),
    /// The capture contains a malformed token
    Token(token::Error),
    /// A token violates the protocol
    Trace {
        index: usize,
        offset: usize,
        source: tracer::Error,
    },
    /// The log could not be written
    Io(io::Error),
}

impl From<hex::Error> for Error {
    fn from(err: hex::Error) -> Self {
        Self::Line(err)
    }
}

impl From<token::Error> for Error {
    fn from(err: token::Error) -> Self {
        Self::Token(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Line(err) => Some(err),
            Self::Token(err) => Some(err),
            Self::Trace { source, .. } => Some(source),
            Self::Io(err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(_) => write!(f, "malformed capture line"),
            Self::Token(_) => write!(f, "malformed token"),
            Self::Trace { index, offset, .. } => {
                write!(f, "protocol violation in token {index} at byte {offset}")
            }
            Self::Io(_) => write!(f, "could not write log"),
        }
    }
}

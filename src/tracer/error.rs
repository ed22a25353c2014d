// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use crate::token::Header;

/// Tracing specific errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Events of the previous token were not consumed
    ///
    /// The given number of events still need to be extracted from the
    /// [`Tracer`][super::Tracer] before the next token can be processed.
    UnprocessedEvents(usize),
    /// A read was issued with a hardware id that is still in flight
    ///
    /// The hardware id is still held by the operation with the given trace
    /// id.
    DuplicateInFlightId { hw_id: u8, trace_id: u64 },
    /// A completion arrived for a hardware id without an open issue
    OrphanCompletion { hw_id: u8 },
    /// The hardware id does not fit the id space
    IdOutOfRange(u8),
    /// The token's header declares an impossible encoding
    ///
    /// Either the cycle delay is zero or the token is an idle token with a
    /// cycle delay other than [`IDLE_DELAY`][crate::token::IDLE_DELAY].
    MalformedToken(Header),
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnprocessedEvents(n) => write!(f, "{n} unprocessed events"),
            Self::DuplicateInFlightId { hw_id, trace_id } => write!(
                f,
                "hardware id {hw_id} reused while operation {trace_id} is in flight"
            ),
            Self::OrphanCompletion { hw_id } => {
                write!(f, "completion for hardware id {hw_id} without open issue")
            }
            Self::IdOutOfRange(id) => write!(f, "hardware id {id} out of range"),
            Self::MalformedToken(header) => write!(
                f,
                "malformed token with cycle delay {}",
                header.cycle_delay
            ),
        }
    }
}

/// Non-fatal conditions reported while processing a token
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A completion arrived for a hardware id without an open issue
    ///
    /// The completion was ignored.
    OrphanCompletion { hw_id: u8 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanCompletion { hw_id } => {
                write!(f, "ignored completion for hardware id {hw_id} without open issue")
            }
        }
    }
}

/// Summary of operations left at the end of a trace
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Unretired {
    /// Number of reads still awaiting their response
    pub in_flight: usize,
    /// Number of completed operations whose retirement was not emitted
    pub pending_retire: usize,
}

impl fmt::Display for Unretired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} operations in flight and {} pending retirement at end of trace",
            self.in_flight, self.pending_retire
        )
    }
}

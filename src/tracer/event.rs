// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Tracing events

use core::fmt;

/// Tracing event
///
/// Events are generated by the [`Tracer`][super::Tracer] for each processed
/// [`Token`][crate::token::Token]. Operations are identified by a trace id,
/// which is unique across the whole trace, rather than by their hardware id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Time advanced by the given number of cycles
    Cycle(u64),
    /// An operation was issued
    Issue { id: u64, hw_id: u8, channel: u8 },
    /// Description of an issued operation
    Label {
        id: u64,
        addr: u32,
        channel: u8,
        wen: bool,
    },
    /// An operation entered the given [`Stage`]
    Stage { id: u64, stage: Stage },
    /// An operation retired
    Retire { id: u64 },
}

/// Stage of an operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// A write was issued and acknowledged
    WriteComplete,
    /// A read was issued and awaits its response
    ReadIssued,
    /// The response to a read was received
    ResponseReceived,
}

impl Stage {
    /// Retrieve the short name of the stage
    pub fn name(self) -> &'static str {
        match self {
            Self::WriteComplete => "Wr",
            Self::ReadIssued => "Rd",
            Self::ResponseReceived => "Rs",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

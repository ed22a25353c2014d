// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Rendering of tracing [`Event`]s in the Kanata log format
//!
//! Kanata logs are tab separated text files consumed by pipeline visualizers.
//! A log starts with a fixed [`Header`], followed by one [`Line`] per
//! [`Event`]. Both implement [`Display`][fmt::Display] without a trailing
//! line break.
//!
//! # Example
//!
//! ```
//! use probe_kanata::kanata;
//! use probe_kanata::tracer::{Event, Stage};
//!
//! let event = Event::Stage { id: 0, stage: Stage::ReadIssued };
//! assert_eq!(kanata::Line(&event).to_string(), "S\t0\t0\tRd");
//! ```

use core::fmt;

use crate::tracer::Event;

#[cfg(test)]
mod tests;

/// Version of the Kanata format produced
pub const VERSION: &str = "0004";

/// Lane on which stages are displayed
const LANE: u8 = 0;

/// Label type of the operation description
const LABEL_TYPE: u8 = 1;

/// Kanata log header
///
/// Consists of the format version line and the initial cycle line.
#[derive(Copy, Clone, Debug, Default)]
pub struct Header;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kanata\t{VERSION}\nC=\t0")
    }
}

/// Kanata log line for a single [`Event`]
#[derive(Copy, Clone, Debug)]
pub struct Line<'a>(pub &'a Event);

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Event::Cycle(delta) => write!(f, "C\t{delta}\t"),
            Event::Issue { id, hw_id, channel } => write!(f, "I\t{id}\t{hw_id}\t{channel}"),
            Event::Label {
                id,
                addr,
                channel,
                wen,
            } => write!(
                f,
                "L\t{id}\t{LABEL_TYPE}\t{}",
                Description {
                    addr,
                    channel,
                    wen
                }
            ),
            Event::Stage { id, stage } => write!(f, "S\t{id}\t{LANE}\t{stage}"),
            Event::Retire { id } => write!(f, "R\t{id}\t{id}\t"),
        }
    }
}

/// Human readable description of an operation
struct Description {
    addr: u32,
    channel: u8,
    wen: bool,
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{:07x} channel={} wen={:b}",
            self.addr,
            self.channel,
            u8::from(self.wen)
        )
    }
}

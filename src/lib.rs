// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

//! # Decoder and Kanata trace builder for FPGA pipeline probe captures
//!
//! A hardware probe attached to the processor emits, once per active cycle, a
//! compact bit-packed record describing dispatch and completion events on two
//! tracked checkpoints. This crate turns a capture of that bitstream into a
//! cycle-accurate log in the Kanata format understood by pipeline visualizers.
//!
//! Data flows strictly forward through the following stages:
//!
//! * the [hex] reader turns the textual capture into the ordered byte stream
//!   the probe transmitted,
//! * the [token] [`Decoder`][token::Decoder] consumes that byte stream into
//!   [`Token`][token::Token]s using the [field] codec,
//! * the [`Tracer`][tracer::Tracer] replays tokens against a table of
//!   in-flight operations and yields [`Event`][tracer::Event]s and
//! * [kanata] renders those events as lines of the visualization log.
//!
//! With the `std` feature, the [`pipeline`] module strings these stages
//! together for a whole capture.
//!
//! # no_std
//!
//! Without the `alloc` and `std` features, this crate only uses the Core
//! Library and does not allocate.
//!
//! # Example
//!
//! The following decodes a single token issuing a read and prints the
//! resulting Kanata lines.
//!
//! ```
//! use probe_kanata::{hex, kanata, token, tracer};
//!
//! let capture = "150000200006";
//! let bytes: Vec<u8> = hex::Reader::new(capture.lines())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let mut decoder = token::Decoder::new(&bytes);
//! let mut tracer = tracer::builder().build();
//!
//! println!("{}", kanata::Header);
//! while decoder.bytes_left() > 0 {
//!     let token = decoder.decode_token().unwrap();
//!     tracer.process_token(&token).unwrap();
//!     tracer.by_ref().for_each(|e| println!("{}", kanata::Line(&e)));
//! }
//! assert_eq!(tracer.in_flight().collect::<Vec<_>>(), [(5, 0)]);
//! ```
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod field;
pub mod hex;
pub mod kanata;
#[cfg(feature = "std")]
pub mod pipeline;
pub mod token;
pub mod tracer;

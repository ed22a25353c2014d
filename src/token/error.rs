// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Token-specific error types

use core::fmt;

/// Token decode/encode errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The data ended in the middle of a token
    ///
    /// The token with the given index, starting at the given byte offset, is
    /// incomplete. `remaining` bytes of data are left in the input.
    IncompleteToken {
        index: usize,
        offset: usize,
        remaining: usize,
    },
    /// The token's header declares an impossible encoding
    ///
    /// Either the cycle delay is zero or the token is an idle token with a
    /// cycle delay other than [`IDLE_DELAY`][super::IDLE_DELAY].
    MalformedToken {
        index: usize,
        offset: usize,
        header: u16,
    },
    /// The target buffer is too small for the encoded data
    BufferTooSmall,
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteToken {
                index,
                offset,
                remaining,
            } => write!(
                f,
                "token {index} at byte {offset} is incomplete ({remaining} bytes left)"
            ),
            Self::MalformedToken {
                index,
                offset,
                header,
            } => write!(
                f,
                "token {index} at byte {offset} has malformed header {header:#06x}"
            ),
            Self::BufferTooSmall => write!(f, "Reached end of buffer while encoding"),
        }
    }
}

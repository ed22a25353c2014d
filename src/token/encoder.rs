// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Token encoder

use super::Token;
use super::error::Error;

/// An encoder for [`Token`]s
///
/// The encoder writes tokens into a buffer in the probe's transmission order.
/// Field values exceeding their width are truncated. The encoder does not
/// check whether a token is valid, i.e. it may be used to produce malformed
/// data.
///
/// # Example
///
/// ```
/// use probe_kanata::token::{self, CheckpointB, Token};
///
/// let mut encoder = token::Encoder::new([0u8; 16]);
/// encoder.encode(&Token::idle()).unwrap();
/// encoder
///     .encode(&Token { cycle_delay: 1, checkpoint_a: None, checkpoint_b: Some(CheckpointB { id: 5 }) })
///     .unwrap();
/// let (buffer, len) = encoder.finish();
/// assert_eq!(&buffer[..len], b"\xfc\xff\x05\x00\x05");
/// ```
#[derive(Clone, Debug)]
pub struct Encoder<B: AsMut<[u8]>> {
    data: B,
    byte_pos: usize,
}

impl<B: AsMut<[u8]>> Encoder<B> {
    /// Create a new encoder writing to the given buffer
    pub fn new(data: B) -> Self {
        Self { data, byte_pos: 0 }
    }

    /// Encode a single [`Token`]
    ///
    /// If the token does not fit into the remaining buffer, nothing is
    /// written and [`Error::BufferTooSmall`] is returned.
    pub fn encode(&mut self, token: &Token) -> Result<(), Error> {
        let target = self
            .data
            .as_mut()
            .get_mut(self.byte_pos..)
            .and_then(|d| d.get_mut(..token.encoded_len()))
            .ok_or(Error::BufferTooSmall)?;

        let header = token.header().to_raw().to_le_bytes();
        let a = token.checkpoint_a.map(|a| a.to_raw().to_le_bytes());
        let b = token.checkpoint_b.map(|b| [b.to_raw()]);
        let bytes = header
            .iter()
            .chain(a.iter().flatten())
            .chain(b.iter().flatten());
        target.iter_mut().zip(bytes).for_each(|(t, b)| *t = *b);

        self.byte_pos += token.encoded_len();
        Ok(())
    }

    /// Retrieve the number of bytes written so far
    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    /// Finish the encoding process
    ///
    /// Returns the buffer and the number of bytes written to it.
    pub fn finish(self) -> (B, usize) {
        (self.data, self.byte_pos)
    }
}

// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Token decoder

use core::iter::FusedIterator;

use super::error::Error;
use super::{CHECKPOINT_B_LEN, HEADER_LEN};
use super::{CheckpointA, CheckpointB, Header, Token};

/// A decoder for [`Token`]s
///
/// The decoder consumes a byte stream in transmission order front to back.
/// Each successfully decoded [`Token`] is removed from the input, leaving the
/// decoder at the first byte of the next token.
///
/// If a token could not be decoded due to insufficient data, the decoder
/// reports this by emitting an [`Error::IncompleteToken`] error and does not
/// consume any of the remaining bytes. If the data is supplied in chunks, the
/// remaining bytes may thus be prepended to the next chunk. The number of
/// bytes left can be queried via [`bytes_left`][Self::bytes_left].
///
/// If a token's header is not valid, the decoder emits an
/// [`Error::MalformedToken`] and skips the header as well as the bodies it
/// declares, as far as they are present in the input.
///
/// # Example
///
/// The follwing example demonstrates decoding of a stream that ends in an
/// incomplete token.
///
/// ```
/// use probe_kanata::token;
///
/// let data = b"\xfc\xff\x05\x00\x2a\x06\x00";
/// let mut decoder = token::Decoder::new(data);
/// loop {
///     let token = match decoder.decode_token() {
///         Ok(token) => token,
///         Err(token::Error::IncompleteToken { .. }) => break,
///         Err(e) => panic!("{e:?}"),
///     };
///     // ...
/// }
/// assert_eq!(decoder.bytes_left(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Decoder<'d> {
    data: &'d [u8],
    byte_pos: usize,
    token_index: usize,
}

impl<'d> Decoder<'d> {
    /// Create a new decoder for the given data
    pub fn new(data: &'d [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            token_index: 0,
        }
    }

    /// Retrieve the number of bytes left in this decoder's data
    pub fn bytes_left(&self) -> usize {
        self.data.len().saturating_sub(self.byte_pos)
    }

    /// Retrieve the current byte position
    ///
    /// Returns the zero-based position of the first byte of the next token.
    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    /// Retrieve the index of the next token
    ///
    /// The index counts all tokens consumed so far, including skipped
    /// malformed ones.
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    /// Retrieve the data not yet consumed
    pub fn remaining_data(&self) -> &'d [u8] {
        self.data.get(self.byte_pos..).unwrap_or_default()
    }

    /// Reset the inner data to the given byte slice
    ///
    /// The token index is preserved.
    pub fn reset(&mut self, data: &'d [u8]) {
        self.data = data;
        self.byte_pos = 0;
    }

    /// Decode a single [`Token`]
    pub fn decode_token(&mut self) -> Result<Token, Error> {
        let mut cursor = Cursor::new(self.remaining_data());
        let res = self.decode_with(&mut cursor);
        match res {
            Ok(_) | Err(Error::MalformedToken { .. }) => {
                self.byte_pos += cursor.consumed;
                self.token_index += 1;
            }
            Err(_) => (),
        }
        res
    }

    /// Retrieve an [`Iterator`] over all remaining [`Token`]s
    ///
    /// The iterator ends after the data is exhausted or after yielding the
    /// first error.
    pub fn tokens(&mut self) -> Tokens<'_, 'd> {
        Tokens {
            decoder: self,
            done: false,
        }
    }

    fn decode_with(&self, cursor: &mut Cursor<'d>) -> Result<Token, Error> {
        let incomplete = || Error::IncompleteToken {
            index: self.token_index,
            offset: self.byte_pos,
            remaining: self.bytes_left(),
        };

        let raw = cursor.take().map(u16::from_le_bytes).ok_or_else(incomplete)?;
        let header = Header::from_raw(raw);
        if !header.is_valid() {
            // Skip whatever the header declares, so decoding may continue
            // at the following token.
            cursor.skip(header.token_len() - HEADER_LEN);
            return Err(Error::MalformedToken {
                index: self.token_index,
                offset: self.byte_pos,
                header: raw,
            });
        }

        let checkpoint_a = header
            .checkpoint_a_enabled
            .then(|| cursor.take().map(u32::from_le_bytes).ok_or_else(incomplete))
            .transpose()?
            .map(CheckpointA::from_raw);
        let checkpoint_b = header
            .checkpoint_b_enabled
            .then(|| cursor.take::<CHECKPOINT_B_LEN>().ok_or_else(incomplete))
            .transpose()?
            .map(|[b]| CheckpointB::from_raw(b));

        Ok(Token {
            cycle_delay: header.cycle_delay,
            checkpoint_a,
            checkpoint_b,
        })
    }
}

/// [`Iterator`] over the [`Token`]s of a [`Decoder`]
#[derive(Debug)]
pub struct Tokens<'a, 'd> {
    decoder: &'a mut Decoder<'d>,
    done: bool,
}

impl Iterator for Tokens<'_, '_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.decoder.bytes_left() == 0 {
            return None;
        }
        let res = self.decoder.decode_token();
        self.done = res.is_err();
        Some(res)
    }
}

impl FusedIterator for Tokens<'_, '_> {}

/// Cursor over a single token's bytes
struct Cursor<'d> {
    data: &'d [u8],
    consumed: usize,
}

impl<'d> Cursor<'d> {
    fn new(data: &'d [u8]) -> Self {
        Self { data, consumed: 0 }
    }

    /// Take the next `N` bytes
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let (bytes, rest) = self.data.split_first_chunk::<N>()?;
        self.data = rest;
        self.consumed += N;
        Some(*bytes)
    }

    /// Skip up to `count` bytes
    fn skip(&mut self, count: usize) {
        let count = count.min(self.data.len());
        self.data = &self.data[count..];
        self.consumed += count;
    }
}

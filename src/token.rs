// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Probe tokens and their decoder
//!
//! The probe emits one [`Token`] per active cycle. Every token starts with a
//! 16 bit [`Header`], optionally followed by a 32 bit [`CheckpointA`] body and
//! an 8 bit [`CheckpointB`] body, in that order. Multi-byte containers are
//! transmitted least significant byte first. Within each container, fields are
//! laid out least significant field first as described by the [field lists]
//! in this module.
//!
//! Tokens are decoded from the byte stream via a [`Decoder`] and encoded via
//! an [`Encoder`].
//!
//! [field lists]: HEADER

pub mod decoder;
pub mod encoder;
pub mod error;


pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::Error;

use crate::field::{Field, FieldList};

/// Field list of a token [`Header`]
pub const HEADER: FieldList<3> = FieldList::new([
    Field::new("checkpoint_b_enabled", 1),
    Field::new("checkpoint_a_enabled", 1),
    Field::new("cycle_delay", 14),
]);

/// Field list of a [`CheckpointA`] body
pub const CHECKPOINT_A: FieldList<4> = FieldList::new([
    Field::new("wen", 1),
    Field::new("addr", 22),
    Field::new("channel", 3),
    Field::new("id", 6),
]);

/// Field list of a [`CheckpointB`] body
pub const CHECKPOINT_B: FieldList<2> = FieldList::new([
    Field::new("id", 6),
    Field::new("throwaway", 2),
]);

const _: () = assert!(HEADER.width() == 8 * HEADER_LEN as u32);
const _: () = assert!(CHECKPOINT_A.width() == 8 * CHECKPOINT_A_LEN as u32);
const _: () = assert!(CHECKPOINT_B.width() == 8 * CHECKPOINT_B_LEN as u32);

/// Length of a [`Header`] in bytes
pub const HEADER_LEN: usize = 2;

/// Length of a [`CheckpointA`] body in bytes
pub const CHECKPOINT_A_LEN: usize = 4;

/// Length of a [`CheckpointB`] body in bytes
pub const CHECKPOINT_B_LEN: usize = 1;

/// Maximum length of a [`Token`] in bytes
pub const MAX_TOKEN_LEN: usize = HEADER_LEN + CHECKPOINT_A_LEN + CHECKPOINT_B_LEN;

/// Cycle delay of an idle token
///
/// Tokens without any checkpoint carry this saturated value rather than the
/// number of cycles actually elapsed.
pub const IDLE_DELAY: u16 = (1 << 14) - 1;

/// Single probe record
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Number of cycles since the previous token
    pub cycle_delay: u16,
    /// Operation issued in this token's cycle
    pub checkpoint_a: Option<CheckpointA>,
    /// Operation completed in this token's cycle
    pub checkpoint_b: Option<CheckpointB>,
}

impl Token {
    /// Create an idle token
    pub const fn idle() -> Self {
        Self {
            cycle_delay: IDLE_DELAY,
            checkpoint_a: None,
            checkpoint_b: None,
        }
    }

    /// Retrieve the [`Header`] describing this token
    pub fn header(&self) -> Header {
        Header {
            checkpoint_b_enabled: self.checkpoint_b.is_some(),
            checkpoint_a_enabled: self.checkpoint_a.is_some(),
            cycle_delay: self.cycle_delay,
        }
    }

    /// Determine whether this is an idle token
    pub fn is_idle(&self) -> bool {
        self.checkpoint_a.is_none() && self.checkpoint_b.is_none()
    }

    /// Retrieve the length of this token's encoding in bytes
    pub fn encoded_len(&self) -> usize {
        self.header().token_len()
    }
}

/// Token header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub checkpoint_b_enabled: bool,
    pub checkpoint_a_enabled: bool,
    pub cycle_delay: u16,
}

impl Header {
    /// Unpack a header from its raw, 16 bit representation
    pub fn from_raw(raw: u16) -> Self {
        let values = HEADER.unpack(raw.into());
        Self {
            checkpoint_b_enabled: values["checkpoint_b_enabled"] != 0,
            checkpoint_a_enabled: values["checkpoint_a_enabled"] != 0,
            cycle_delay: values["cycle_delay"] as u16,
        }
    }

    /// Pack this header into its raw, 16 bit representation
    pub fn to_raw(&self) -> u16 {
        let values = HEADER
            .zeroed()
            .with("checkpoint_b_enabled", self.checkpoint_b_enabled.into())
            .with("checkpoint_a_enabled", self.checkpoint_a_enabled.into())
            .with("cycle_delay", self.cycle_delay.into());
        HEADER.pack(&values) as u16
    }

    /// Determine whether this header describes a possible token
    ///
    /// A token's cycle delay is never zero. A token without any checkpoint is
    /// an idle token and carries the saturated [`IDLE_DELAY`].
    pub fn is_valid(&self) -> bool {
        let idle = !self.checkpoint_a_enabled && !self.checkpoint_b_enabled;
        self.cycle_delay != 0 && (!idle || self.cycle_delay == IDLE_DELAY)
    }

    /// Retrieve the length in bytes of a token with this header
    pub fn token_len(&self) -> usize {
        let a = if self.checkpoint_a_enabled { CHECKPOINT_A_LEN } else { 0 };
        let b = if self.checkpoint_b_enabled { CHECKPOINT_B_LEN } else { 0 };
        HEADER_LEN + a + b
    }
}

/// Issue of an operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CheckpointA {
    /// Write enable, i.e. whether the operation is a write
    pub wen: bool,
    /// Target address (22 bits)
    pub addr: u32,
    /// Channel issuing the operation (3 bits)
    pub channel: u8,
    /// Hardware id assigned to the operation (6 bits)
    pub id: u8,
}

impl CheckpointA {
    /// Unpack a body from its raw, 32 bit representation
    pub fn from_raw(raw: u32) -> Self {
        let values = CHECKPOINT_A.unpack(raw.into());
        Self {
            wen: values["wen"] != 0,
            addr: values["addr"] as u32,
            channel: values["channel"] as u8,
            id: values["id"] as u8,
        }
    }

    /// Pack this body into its raw, 32 bit representation
    pub fn to_raw(&self) -> u32 {
        let values = CHECKPOINT_A
            .zeroed()
            .with("wen", self.wen.into())
            .with("addr", self.addr.into())
            .with("channel", self.channel.into())
            .with("id", self.id.into());
        CHECKPOINT_A.pack(&values) as u32
    }
}

/// Completion of an operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CheckpointB {
    /// Hardware id of the completed operation (6 bits)
    pub id: u8,
}

impl CheckpointB {
    /// Unpack a body from its raw, 8 bit representation
    pub fn from_raw(raw: u8) -> Self {
        let values = CHECKPOINT_B.unpack(raw.into());
        Self {
            id: values["id"] as u8,
        }
    }

    /// Pack this body into its raw, 8 bit representation
    pub fn to_raw(&self) -> u8 {
        let values = CHECKPOINT_B.zeroed().with("id", self.id.into());
        CHECKPOINT_B.pack(&values) as u8
    }
}

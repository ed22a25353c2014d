// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Generic codec for named, fixed-width bit fields
//!
//! A [`FieldList`] describes an integer container as an ordered sequence of
//! [`Field`]s. The first field occupies the least significant bits of the
//! container, the next field the bits above it and so on. The sum of all
//! field widths is the width of the container.
//!
//! # Example
//!
//! ```
//! use probe_kanata::field::{Field, FieldList};
//!
//! const LIST: FieldList<2> = FieldList::new([Field::new("low", 4), Field::new("high", 4)]);
//!
//! let values = LIST.unpack(0xa5);
//! assert_eq!(values["low"], 0x5);
//! assert_eq!(values["high"], 0xa);
//! assert_eq!(LIST.pack(&values), 0xa5);
//! ```

use core::fmt;
use core::ops;


/// A single named field of a given width in bits
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: u8,
}

impl Field {
    /// Create a new field
    pub const fn new(name: &'static str, width: u8) -> Self {
        Self { name, width }
    }

    /// Extract this field's value from the lowest bits of `value`
    fn extract(&self, value: u64) -> u64 {
        value & mask(self.width)
    }
}

/// Ordered list of [`Field`]s, least significant field first
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldList<const N: usize> {
    fields: [Field; N],
}

impl<const N: usize> FieldList<N> {
    /// Create a new field list
    pub const fn new(fields: [Field; N]) -> Self {
        Self { fields }
    }

    /// Retrieve the fields in decode order
    pub fn fields(&self) -> &[Field; N] {
        &self.fields
    }

    /// Retrieve the total width of all fields in bits
    pub const fn width(&self) -> u32 {
        let mut width = 0;
        let mut i = 0;
        while i < N {
            width += self.fields[i].width as u32;
            i += 1;
        }
        width
    }

    /// Retrieve the position of the field with the given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Unpack the given value into its fields
    ///
    /// Fields are extracted in list order: each field takes the lowest bits of
    /// what remains of the value, which is then shifted right by the field's
    /// width. Bits beyond the list's [width][Self::width] are silently
    /// dropped.
    pub fn unpack(&self, value: u64) -> Values<'_, N> {
        let mut values = [0; N];
        let mut remaining = value;
        for (field, slot) in self.fields.iter().zip(values.iter_mut()) {
            *slot = field.extract(remaining);
            remaining = remaining.checked_shr(field.width.into()).unwrap_or(0);
        }
        Values { list: self, values }
    }

    /// Pack the given values into a single integer
    ///
    /// This is the inverse of [`unpack`][Self::unpack]. Values exceeding their
    /// field's width are truncated.
    pub fn pack(&self, values: &Values<'_, N>) -> u64 {
        self.fields
            .iter()
            .zip(values.values)
            .rev()
            .fold(0, |acc, (field, value)| {
                acc.checked_shl(field.width.into()).unwrap_or(0) | field.extract(value)
            })
    }

    /// Create a set of [`Values`] for this list with all fields set to zero
    pub fn zeroed(&self) -> Values<'_, N> {
        Values {
            list: self,
            values: [0; N],
        }
    }
}

/// Field values associated to a [`FieldList`]
///
/// Values may be looked up by field name, either via [`get`][Self::get] or via
/// indexing. Indexing with a name not present in the list panics.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Values<'l, const N: usize> {
    list: &'l FieldList<N>,
    values: [u64; N],
}

impl<const N: usize> Values<'_, N> {
    /// Retrieve the value of the field with the given name
    pub fn get(&self, name: &str) -> Option<u64> {
        self.list.position(name).map(|i| self.values[i])
    }

    /// Set the value of the field with the given name
    ///
    /// Returns the value previously held or `None` if there is no such field.
    pub fn set(&mut self, name: &str, value: u64) -> Option<u64> {
        let slot = &mut self.values[self.list.position(name)?];
        Some(core::mem::replace(slot, value))
    }

    /// Set a value, consuming and returning the values
    ///
    /// Names not present in the list are ignored.
    pub fn with(mut self, name: &str, value: u64) -> Self {
        self.set(name, value);
        self
    }

    /// Iterate over all fields' names and values in decode order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.list
            .fields
            .iter()
            .zip(self.values)
            .map(|(f, v)| (f.name, v))
    }
}

impl<const N: usize> ops::Index<&str> for Values<'_, N> {
    type Output = u64;

    fn index(&self, name: &str) -> &Self::Output {
        match self.list.position(name) {
            Some(i) => &self.values[i],
            None => panic!("No field named '{name}'"),
        }
    }
}

impl<const N: usize> fmt::Debug for Values<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Create a mask covering the lowest `width` bits
fn mask(width: u8) -> u64 {
    !u64::MAX.checked_shl(width.into()).unwrap_or(0)
}

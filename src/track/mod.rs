//! Track codecs: conversion between [`CardRecord`] and raw stripe data.

mod first;

pub use first::{FIXED_NAME_WIDTH, TRACK1_GRAMMAR, TRACK1_MAX_LENGTH, Track1, Track1Options};

use std::fmt;

use crate::card::CardRecord;
use crate::error::Result;

/// Marks a field that is structurally present but has no value.
pub const PLACEHOLDER: char = '^';

/// A magnetic-stripe track format.
pub trait Track {
    fn name(&self) -> &'static str;
    fn write(&self, card: &CardRecord) -> Result<Vec<u8>>;
    fn read(&self, raw: &[u8]) -> Result<CardRecord>;
}

/// Card fields in grammar order. Capture group `n` holds `Field::ALL[n - 1]`;
/// encoding and decoding both go through [`Field::from_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FormatCode,
    PrimaryAccountNumber,
    Name,
    ExpirationDate,
    ServiceCode,
    DiscretionaryData,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FormatCode,
        Field::PrimaryAccountNumber,
        Field::Name,
        Field::ExpirationDate,
        Field::ServiceCode,
        Field::DiscretionaryData,
    ];

    /// 1-based capture group index of this field.
    pub fn group(self) -> usize {
        self as usize + 1
    }

    pub fn from_group(index: usize) -> Option<Field> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FormatCode => "format code",
            Field::PrimaryAccountNumber => "primary account number",
            Field::Name => "name",
            Field::ExpirationDate => "expiration date",
            Field::ServiceCode => "service code",
            Field::DiscretionaryData => "discretionary data",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an extracted or resolved field value means "absent".
pub fn is_absent(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.chars().eq(std::iter::once(PLACEHOLDER))
}

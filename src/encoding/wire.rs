// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire types and field tags.

use std::fmt;

use crate::core::{CodecError, Result};

/// Largest field number a tag can carry (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Field numbers reserved for the protocol implementation.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Framing class of an encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// int32, int64, uint32, uint64, sint32, sint64, bool, enum
    Varint = 0,
    /// fixed64, sfixed64, double
    Fixed64 = 1,
    /// string, bytes, embedded messages, packed repeated fields
    LengthDelimited = 2,
    /// fixed32, sfixed32, float
    Fixed32 = 5,
}

impl WireType {
    /// Raw 3-bit code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::LengthDelimited => "length-delimited",
            WireType::Fixed32 => "fixed32",
        }
    }

    /// Parse a wire type code for `field_number`.
    ///
    /// Group codes (3, 4) are reported as unsupported; 6 and 7 are invalid.
    pub fn from_code(code: u8, field_number: u32) -> Result<Self> {
        match code {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            3 | 4 => Err(CodecError::unsupported(format!(
                "group wire type {code} on field {field_number}"
            ))),
            _ => Err(CodecError::unexpected_wire_type(
                field_number,
                code,
                "one of 0, 1, 2, 5",
            )),
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combine a field number and wire type into a tag.
#[inline]
pub const fn make_tag(field_number: u32, wire_type: WireType) -> u64 {
    ((field_number as u64) << 3) | wire_type as u64
}

/// Split a decoded tag into field number and wire type.
pub fn split_tag(tag: u64) -> Result<(u32, WireType)> {
    let code = (tag & 0x07) as u8;
    let number = tag >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER as u64 {
        return Err(CodecError::unexpected_wire_type(
            number.min(u32::MAX as u64) as u32,
            code,
            format!("field number in 1..={MAX_FIELD_NUMBER}"),
        ));
    }
    let number = number as u32;
    Ok((number, WireType::from_code(code, number)?))
}

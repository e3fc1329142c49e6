// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Base-128 varints and zig-zag mapping.
//!
//! Varints store seven bits per byte, least-significant group first, with
//! the high bit set on every byte except the last (unsigned LEB128). A
//! 64-bit value takes at most [`MAX_VARINT_LEN`] bytes.

use crate::core::{CodecError, Result};

/// Longest encoding of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Why a raw varint read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VarintFault {
    /// Input ended before the terminating byte
    Exhausted,
    /// No terminating byte within ten bytes, or bits past 64
    Overlong,
}

/// Append `value` as a varint.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint_to_vec(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len_varint(value));
    encode_varint(value, &mut buf);
    buf
}

/// Number of bytes `value` occupies as a varint.
#[inline]
pub const fn encoded_len_varint(value: u64) -> usize {
    // ceil(significant_bits / 7), with zero taking one byte
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint starting at `offset`.
///
/// Returns the value and the offset just past it. Fails with
/// [`CodecError::MalformedVarint`] if no terminating byte is found within
/// ten bytes or before the end of `data`.
pub fn decode_varint(data: &[u8], offset: usize) -> Result<(u64, usize)> {
    read_varint(data, offset).map_err(|_| CodecError::malformed_varint(offset))
}

pub(crate) fn read_varint(
    data: &[u8],
    offset: usize,
) -> std::result::Result<(u64, usize), VarintFault> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = data.get(offset + i) else {
            return Err(VarintFault::Exhausted);
        };
        // tenth byte may only contribute the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(VarintFault::Overlong);
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, offset + i + 1));
        }
    }
    Err(VarintFault::Overlong)
}

/// Map a signed 64-bit integer onto an unsigned one, small magnitudes first.
#[inline]
pub const fn zigzag_encode_64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`].
#[inline]
pub const fn zigzag_decode_64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// 32-bit zig-zag, used by `sint32`.
#[inline]
pub const fn zigzag_encode_32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[inline]
pub const fn zigzag_decode_32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

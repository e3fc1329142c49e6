// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire format encoding and decoding.
//!
//! - [`varint`] - Base-128 varints and zig-zag mapping
//! - [`wire`] - Wire types, tags and field number limits
//! - [`writer`] - Byte accumulator and message encoder
//! - [`reader`] - Entry cursor and schema-driven decoder
//! - [`calculator`] - Exact encoded sizes, used to pre-size buffers

pub mod calculator;
pub mod reader;
pub mod varint;
pub mod wire;
pub mod writer;

pub use reader::{
    decode_message, merge_message, DecodeOptions, RawValue, WireEntry, WireReader,
    DEFAULT_RECURSION_LIMIT,
};
pub use varint::{
    decode_varint, encode_varint, encode_varint_to_vec, encoded_len_varint, zigzag_decode_32,
    zigzag_decode_64, zigzag_encode_32, zigzag_encode_64, MAX_VARINT_LEN,
};
pub use wire::{make_tag, split_tag, WireType, MAX_FIELD_NUMBER};
pub use writer::{encode_message, WireWriter};

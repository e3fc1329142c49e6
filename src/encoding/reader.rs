// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire reader: parses tagged entries and decodes them against a descriptor.
//!
//! [`WireReader`] is a schema-less cursor that yields raw
//! `(field number, wire type, value)` entries. [`decode_message`] drives it
//! with a [`MessageDescriptor`], recursing into nested messages on their
//! length-bounded sub-slices.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use protocodec::encoding::{RawValue, WireReader};
//!
//! let data = [0x08, 0x96, 0x01];
//! for entry in WireReader::new(&data) {
//!     let entry = entry?;
//!     assert_eq!(entry.field_number, 1);
//!     assert_eq!(entry.value, RawValue::Varint(150));
//! }
//! # Ok(())
//! # }
//! ```

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use super::varint::{read_varint, zigzag_decode_32, zigzag_decode_64, VarintFault};
use super::wire::{split_tag, WireType};
use crate::core::{CodecError, Result, Value};
use crate::message::DynamicMessage;
use crate::schema::{FieldDescriptor, Kind, MessageDescriptor};

/// Default maximum message nesting depth.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum depth of nested messages
    pub recursion_limit: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Undecoded value of one wire entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    /// Varint payload
    Varint(u64),
    /// Eight little-endian bytes
    Fixed64(u64),
    /// Length-delimited payload, borrowed from the input
    LengthDelimited(&'a [u8]),
    /// Four little-endian bytes
    Fixed32(u32),
}

/// One tagged entry read from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEntry<'a> {
    /// Field number from the tag
    pub field_number: u32,
    /// Wire type from the tag
    pub wire_type: WireType,
    /// Raw payload
    pub value: RawValue<'a>,
    /// Absolute offset of the tag
    pub position: usize,
}

/// Cursor over wire-format bytes.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
    /// Absolute offset of `data[0]`, for error positions
    base: usize,
    failed: bool,
}

impl<'a> WireReader<'a> {
    /// Create a reader over a complete buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Create a reader over a sub-slice that starts at `base` in the
    /// original input.
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self {
            data,
            offset: 0,
            base,
            failed: false,
        }
    }

    /// Absolute position of the cursor.
    #[inline]
    pub fn cursor_position(&self) -> usize {
        self.base + self.offset
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether all bytes were consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Read an unsigned varint.
    pub fn read_varint(&mut self) -> Result<u64> {
        match read_varint(self.data, self.offset) {
            Ok((value, next)) => {
                self.offset = next;
                Ok(value)
            }
            Err(VarintFault::Exhausted) => Err(CodecError::truncated(
                self.remaining() + 1,
                self.remaining(),
                self.cursor_position(),
            )),
            Err(VarintFault::Overlong) => {
                Err(CodecError::malformed_varint(self.cursor_position()))
            }
        }
    }

    /// Read a tag and split it into field number and wire type.
    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        let tag = self.read_varint()?;
        split_tag(tag)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::truncated(
                len,
                self.remaining(),
                self.cursor_position(),
            ));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Read four little-endian bytes.
    pub fn read_fixed32(&mut self) -> Result<u32> {
        self.take(4).map(LittleEndian::read_u32)
    }

    /// Read eight little-endian bytes.
    pub fn read_fixed64(&mut self) -> Result<u64> {
        self.take(8).map(LittleEndian::read_u64)
    }

    /// Read a length prefix and return the payload it frames.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let start = self.cursor_position();
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| CodecError::truncated(usize::MAX, self.remaining(), start))?;
        self.take(len)
    }

    /// Read the payload for `wire_type`.
    pub fn read_value(&mut self, wire_type: WireType) -> Result<RawValue<'a>> {
        Ok(match wire_type {
            WireType::Varint => RawValue::Varint(self.read_varint()?),
            WireType::Fixed64 => RawValue::Fixed64(self.read_fixed64()?),
            WireType::LengthDelimited => RawValue::LengthDelimited(self.read_length_delimited()?),
            WireType::Fixed32 => RawValue::Fixed32(self.read_fixed32()?),
        })
    }

    /// Skip over a payload of `wire_type`.
    pub fn skip_value(&mut self, wire_type: WireType) -> Result<()> {
        self.read_value(wire_type).map(|_| ())
    }

    /// Read the next complete entry.
    pub fn read_entry(&mut self) -> Result<WireEntry<'a>> {
        let position = self.cursor_position();
        let (field_number, wire_type) = self.read_tag()?;
        let value = self.read_value(wire_type)?;
        Ok(WireEntry {
            field_number,
            wire_type,
            value,
            position,
        })
    }
}

impl<'a> Iterator for WireReader<'a> {
    type Item = Result<WireEntry<'a>>;

    /// Yields entries until the input is exhausted or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_at_end() {
            return None;
        }
        let entry = self.read_entry();
        self.failed = entry.is_err();
        Some(entry)
    }
}

// ============================================================================
// Schema-driven decoding
// ============================================================================

/// Decode a fresh message of type `descriptor`.
pub fn decode_message(
    descriptor: MessageDescriptor,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<DynamicMessage> {
    let mut message = DynamicMessage::new(descriptor);
    merge_message(&mut message, data, options)?;
    Ok(message)
}

/// Decode `data` into an existing message.
///
/// On error the message may be partially updated; callers wanting
/// all-or-nothing behavior decode into a scratch copy.
pub fn merge_message(
    message: &mut DynamicMessage,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<()> {
    merge_at(message, WireReader::new(data), 0, options)
}

/// `depth` counts enclosing messages above `message`.
fn merge_at(
    message: &mut DynamicMessage,
    mut reader: WireReader<'_>,
    depth: usize,
    options: &DecodeOptions,
) -> Result<()> {
    while !reader.is_at_end() {
        let (number, wire_type) = reader.read_tag()?;
        let field = message.descriptor().field_by_number(number);
        match field {
            Some(field) => {
                read_field(&mut reader, message, &field, wire_type, depth, options)?;
            }
            None => {
                debug!(
                    message = message.descriptor().full_name(),
                    field_number = number,
                    wire_type = %wire_type,
                    "skipping unknown field"
                );
                reader.skip_value(wire_type)?;
            }
        }
    }
    Ok(())
}

fn read_field(
    reader: &mut WireReader<'_>,
    message: &mut DynamicMessage,
    field: &FieldDescriptor,
    wire_type: WireType,
    depth: usize,
    options: &DecodeOptions,
) -> Result<()> {
    let kind = field.kind();
    let expected = kind.wire_type();

    if field.is_list() {
        if wire_type == WireType::LengthDelimited && kind.is_packable() {
            let payload = reader.read_length_delimited()?;
            let base = reader.cursor_position() - payload.len();
            let mut packed = WireReader::with_base(payload, base);
            while !packed.is_at_end() {
                let value = read_scalar(&mut packed, &kind)?;
                message.push_unchecked(field.number(), value);
            }
            return Ok(());
        }
        if wire_type != expected {
            return Err(wire_type_error(field, wire_type, expected, true));
        }
        let value = read_single(reader, field, &kind, depth, options)?;
        message.push_unchecked(field.number(), value);
        return Ok(());
    }

    if wire_type != expected {
        return Err(wire_type_error(field, wire_type, expected, false));
    }

    if let Kind::Message(nested) = &kind {
        // repeated occurrences of a singular message merge
        let mut target = match message.take_message(field) {
            Some(existing) => {
                debug!(field = field.name(), "merging repeated singular message");
                existing
            }
            None => DynamicMessage::new(nested.clone()),
        };
        let result = read_nested(reader, &mut target, depth, options);
        message.insert_unchecked(field.number(), Value::Message(target));
        return result;
    }

    let value = read_single(reader, field, &kind, depth, options)?;
    message.insert_unchecked(field.number(), value);
    Ok(())
}

fn wire_type_error(
    field: &FieldDescriptor,
    actual: WireType,
    expected: WireType,
    packed_ok: bool,
) -> CodecError {
    let expected = if packed_ok && field.kind().is_packable() {
        format!("{expected} or packed length-delimited for '{}'", field.name())
    } else {
        format!("{expected} for '{}'", field.name())
    };
    CodecError::unexpected_wire_type(field.number(), actual.code(), expected)
}

fn read_nested(
    reader: &mut WireReader<'_>,
    target: &mut DynamicMessage,
    depth: usize,
    options: &DecodeOptions,
) -> Result<()> {
    if depth >= options.recursion_limit {
        return Err(CodecError::RecursionLimit {
            limit: options.recursion_limit,
        });
    }
    let payload = reader.read_length_delimited()?;
    let base = reader.cursor_position() - payload.len();
    merge_at(target, WireReader::with_base(payload, base), depth + 1, options)
}

fn read_single(
    reader: &mut WireReader<'_>,
    field: &FieldDescriptor,
    kind: &Kind,
    depth: usize,
    options: &DecodeOptions,
) -> Result<Value> {
    match kind {
        Kind::String => {
            let position = reader.cursor_position();
            let bytes = reader.read_length_delimited()?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| CodecError::invalid_utf8(field.name(), position))?;
            Ok(Value::String(text.to_string()))
        }
        Kind::Bytes => Ok(Value::Bytes(reader.read_length_delimited()?.to_vec())),
        Kind::Message(nested) => {
            let mut target = DynamicMessage::new(nested.clone());
            read_nested(reader, &mut target, depth, options)?;
            Ok(Value::Message(target))
        }
        _ => read_scalar(reader, kind),
    }
}

/// Read one packable scalar as `kind`.
fn read_scalar(reader: &mut WireReader<'_>, kind: &Kind) -> Result<Value> {
    Ok(match kind {
        Kind::Double => Value::Float64(f64::from_bits(reader.read_fixed64()?)),
        Kind::Float => Value::Float32(f32::from_bits(reader.read_fixed32()?)),
        // int32 is sign-extended on the wire; truncation recovers it
        Kind::Int32 => Value::Int32(reader.read_varint()? as i32),
        Kind::Int64 => Value::Int64(reader.read_varint()? as i64),
        Kind::UInt32 => Value::UInt32(reader.read_varint()? as u32),
        Kind::UInt64 => Value::UInt64(reader.read_varint()?),
        Kind::SInt32 => Value::Int32(zigzag_decode_32(reader.read_varint()? as u32)),
        Kind::SInt64 => Value::Int64(zigzag_decode_64(reader.read_varint()?)),
        Kind::Fixed32 => Value::UInt32(reader.read_fixed32()?),
        Kind::Fixed64 => Value::UInt64(reader.read_fixed64()?),
        Kind::SFixed32 => Value::Int32(reader.read_fixed32()? as i32),
        Kind::SFixed64 => Value::Int64(reader.read_fixed64()? as i64),
        Kind::Bool => Value::Bool(reader.read_varint()? != 0),
        Kind::Enum(_) => Value::EnumNumber(reader.read_varint()? as i32),
        Kind::String | Kind::Bytes | Kind::Message(_) => {
            return Err(CodecError::unsupported(format!(
                "packed encoding of {}",
                kind.name()
            )))
        }
    })
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire writer: appends tagged, framed field values to a byte buffer.
//!
//! Fields are written in ascending field-number order, so a message always
//! encodes to the same bytes. Singular scalars equal to their default are
//! omitted; repeated packable scalars are packed unless the field opts out.

use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use super::calculator;
use super::varint::{encode_varint, zigzag_encode_32, zigzag_encode_64};
use super::wire::{make_tag, WireType};
use crate::core::Value;
use crate::message::DynamicMessage;
use crate::schema::{FieldDescriptor, Kind};

/// Default initial capacity for a writer without a size hint.
const DEFAULT_CAPACITY: usize = 64;

/// Byte accumulator for wire-format output.
///
/// # Example
///
/// ```no_run
/// # fn main() {
/// use protocodec::encoding::{WireType, WireWriter};
///
/// let mut writer = WireWriter::new();
/// writer.write_tag(1, WireType::Varint);
/// writer.write_varint(150);
/// assert_eq!(writer.finish(), vec![0x08, 0x96, 0x01]);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WireWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a writer with a pre-sized buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// View the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the finished buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Write a field tag.
    #[inline]
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        self.write_varint(make_tag(field_number, wire_type));
    }

    /// Write an unsigned varint.
    #[inline]
    pub fn write_varint(&mut self, value: u64) {
        encode_varint(value, &mut self.buffer);
    }

    /// Write a 32-bit little-endian value.
    #[inline]
    pub fn write_fixed32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a 64-bit little-endian value.
    #[inline]
    pub fn write_fixed64(&mut self, value: u64) {
        let mut bytes = [0u8; 8];
        LittleEndian::write_u64(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a length-prefixed byte sequence.
    pub fn write_length_delimited(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.buffer.extend_from_slice(bytes);
    }

    /// Append raw bytes with no framing.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Write every set field of `message`.
    pub fn write_message(&mut self, message: &DynamicMessage) {
        let table = calculator::measure_message(message);
        self.put_message(message, &mut table.nested.into_iter());
    }

    /// Write one field, including its tag(s).
    pub fn write_field(&mut self, field: &FieldDescriptor, value: &Value) {
        let table = calculator::measure_field(field, value);
        self.put_field(field, value, &mut table.nested.into_iter());
    }

    /// Write a single value body (no tag) as `kind`.
    pub fn write_value(&mut self, kind: &Kind, value: &Value) {
        let table = calculator::measure_value(kind, value);
        self.put_value(kind, value, &mut table.nested.into_iter());
    }

    // `nested` yields nested message lengths in the order they are reached,
    // as recorded by the calculator pass.

    fn put_message<I>(&mut self, message: &DynamicMessage, nested: &mut I)
    where
        I: Iterator<Item = usize>,
    {
        for (field, value) in message.fields() {
            self.put_field(&field, value, nested);
        }
    }

    fn put_field<I>(&mut self, field: &FieldDescriptor, value: &Value, nested: &mut I)
    where
        I: Iterator<Item = usize>,
    {
        let kind = field.kind();
        let number = field.number();

        match value {
            Value::List(items) if items.is_empty() => {}
            Value::List(items) if field.is_packed() => {
                let body_len: usize = items
                    .iter()
                    .map(|item| calculator::value_len(&kind, item))
                    .sum();
                self.write_tag(number, WireType::LengthDelimited);
                self.write_varint(body_len as u64);
                for item in items {
                    self.put_value(&kind, item, nested);
                }
            }
            Value::List(items) => {
                let wire_type = kind.wire_type();
                for item in items {
                    self.write_tag(number, wire_type);
                    self.put_value(&kind, item, nested);
                }
            }
            value if value.is_default() => {}
            value => {
                self.write_tag(number, kind.wire_type());
                self.put_value(&kind, value, nested);
            }
        }
    }

    fn put_value<I>(&mut self, kind: &Kind, value: &Value, nested: &mut I)
    where
        I: Iterator<Item = usize>,
    {
        match value {
            Value::Bool(v) => self.write_varint(u64::from(*v)),
            Value::Int32(v) => match kind {
                Kind::SInt32 => self.write_varint(u64::from(zigzag_encode_32(*v))),
                Kind::SFixed32 => self.write_fixed32(*v as u32),
                // sign-extended, so negatives take ten bytes
                _ => self.write_varint(i64::from(*v) as u64),
            },
            Value::Int64(v) => match kind {
                Kind::SInt64 => self.write_varint(zigzag_encode_64(*v)),
                Kind::SFixed64 => self.write_fixed64(*v as u64),
                _ => self.write_varint(*v as u64),
            },
            Value::UInt32(v) => match kind {
                Kind::Fixed32 => self.write_fixed32(*v),
                _ => self.write_varint(u64::from(*v)),
            },
            Value::UInt64(v) => match kind {
                Kind::Fixed64 => self.write_fixed64(*v),
                _ => self.write_varint(*v),
            },
            Value::Float32(v) => self.write_fixed32(v.to_bits()),
            Value::Float64(v) => self.write_fixed64(v.to_bits()),
            Value::EnumNumber(v) => self.write_varint(i64::from(*v) as u64),
            Value::String(s) => self.write_length_delimited(s.as_bytes()),
            Value::Bytes(b) => self.write_length_delimited(b),
            Value::Message(msg) => {
                let len = nested
                    .next()
                    .unwrap_or_else(|| calculator::encoded_len(msg));
                self.write_varint(len as u64);
                self.put_message(msg, nested);
            }
            // lists never nest; set() rejects them as elements
            Value::List(_) => {}
        }
    }
}

/// Encode a message into a buffer sized by the calculator pass.
///
/// The message tree is measured once; nested lengths recorded by that pass
/// are reused while writing, so cost stays linear in the encoded size.
pub fn encode_message(message: &DynamicMessage) -> Vec<u8> {
    let table = calculator::measure_message(message);
    let mut writer = WireWriter::with_capacity(table.total);
    writer.put_message(message, &mut table.nested.into_iter());
    trace!(
        message = message.descriptor().full_name(),
        bytes = writer.len(),
        "encoded message"
    );
    writer.finish()
}

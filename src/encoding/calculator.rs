// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoded-size calculator.
//!
//! Mirrors the writer rule for rule so that buffers can be pre-sized and
//! nested message lengths written before their contents. A single
//! [`measure_message`] pass records the length of every nested message in
//! the order the writer reaches them, so encoding never re-measures a
//! subtree.

use super::varint::{encoded_len_varint, zigzag_encode_32, zigzag_encode_64};
use super::wire::{make_tag, WireType};
use crate::core::Value;
use crate::message::DynamicMessage;
use crate::schema::{FieldDescriptor, Kind};

/// Result of a sizing pass over one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTable {
    /// Encoded length of the measured message or value
    pub total: usize,
    /// Body length of each nested message, in writer (pre-)order
    pub nested: Vec<usize>,
}

/// Exact number of bytes `message` encodes to.
pub fn encoded_len(message: &DynamicMessage) -> usize {
    Sizer::new(false).message(message)
}

/// Bytes one field occupies, tags included.
pub fn field_len(field: &FieldDescriptor, value: &Value) -> usize {
    Sizer::new(false).field(field, value)
}

/// Bytes a single value body occupies as `kind` (no tag).
pub fn value_len(kind: &Kind, value: &Value) -> usize {
    Sizer::new(false).value(kind, value)
}

/// Size `message` and record every nested message length.
pub fn measure_message(message: &DynamicMessage) -> SizeTable {
    let mut sizer = Sizer::new(true);
    let total = sizer.message(message);
    sizer.finish(total)
}

/// Size one field and record its nested message lengths.
pub fn measure_field(field: &FieldDescriptor, value: &Value) -> SizeTable {
    let mut sizer = Sizer::new(true);
    let total = sizer.field(field, value);
    sizer.finish(total)
}

/// Size one value body and record its nested message lengths.
pub fn measure_value(kind: &Kind, value: &Value) -> SizeTable {
    let mut sizer = Sizer::new(true);
    let total = sizer.value(kind, value);
    sizer.finish(total)
}

struct Sizer {
    record: bool,
    nested: Vec<usize>,
}

impl Sizer {
    fn new(record: bool) -> Self {
        Self {
            record,
            nested: Vec::new(),
        }
    }

    fn finish(self, total: usize) -> SizeTable {
        SizeTable {
            total,
            nested: self.nested,
        }
    }

    fn message(&mut self, message: &DynamicMessage) -> usize {
        message
            .fields()
            .map(|(field, value)| self.field(&field, value))
            .sum()
    }

    fn field(&mut self, field: &FieldDescriptor, value: &Value) -> usize {
        let kind = field.kind();
        let number = field.number();

        match value {
            Value::List(items) if items.is_empty() => 0,
            Value::List(items) if field.is_packed() => {
                let body: usize = items.iter().map(|item| self.value(&kind, item)).sum();
                tag_len(number, WireType::LengthDelimited) + encoded_len_varint(body as u64) + body
            }
            Value::List(items) => {
                let tag = tag_len(number, kind.wire_type());
                items.iter().map(|item| tag + self.value(&kind, item)).sum()
            }
            value if value.is_default() => 0,
            value => tag_len(number, kind.wire_type()) + self.value(&kind, value),
        }
    }

    fn value(&mut self, kind: &Kind, value: &Value) -> usize {
        match value {
            Value::Message(msg) => {
                // reserve the slot first so parents precede their children
                let slot = self.nested.len();
                if self.record {
                    self.nested.push(0);
                }
                let len = self.message(msg);
                if self.record {
                    self.nested[slot] = len;
                }
                delimited_len(len)
            }
            other => scalar_len(kind, other),
        }
    }
}

fn scalar_len(kind: &Kind, value: &Value) -> usize {
    match value {
        Value::Bool(_) => 1,
        Value::Int32(v) => match kind {
            Kind::SInt32 => encoded_len_varint(u64::from(zigzag_encode_32(*v))),
            Kind::SFixed32 => 4,
            _ => encoded_len_varint(i64::from(*v) as u64),
        },
        Value::Int64(v) => match kind {
            Kind::SInt64 => encoded_len_varint(zigzag_encode_64(*v)),
            Kind::SFixed64 => 8,
            _ => encoded_len_varint(*v as u64),
        },
        Value::UInt32(v) => match kind {
            Kind::Fixed32 => 4,
            _ => encoded_len_varint(u64::from(*v)),
        },
        Value::UInt64(v) => match kind {
            Kind::Fixed64 => 8,
            _ => encoded_len_varint(*v),
        },
        Value::Float32(_) => 4,
        Value::Float64(_) => 8,
        Value::EnumNumber(v) => encoded_len_varint(i64::from(*v) as u64),
        Value::String(s) => delimited_len(s.len()),
        Value::Bytes(b) => delimited_len(b.len()),
        Value::Message(_) | Value::List(_) => 0,
    }
}

#[inline]
fn tag_len(number: u32, wire_type: WireType) -> usize {
    encoded_len_varint(make_tag(number, wire_type))
}

#[inline]
fn delimited_len(len: usize) -> usize {
    encoded_len_varint(len as u64) + len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DescriptorPool, FieldDef, FileDef, MessageDef};

    fn node(pool: &DescriptorPool, value: i32) -> DynamicMessage {
        let mut node = DynamicMessage::new(pool.resolve("tree.Node").unwrap());
        node.set("value", value).unwrap();
        node
    }

    #[test]
    fn test_measure_records_nested_in_preorder() {
        let pool = DescriptorPool::from_file(
            FileDef::new("tree").message(
                MessageDef::new("Node")
                    .field(FieldDef::singular("value", 1, "int32"))
                    .field(FieldDef::singular("child", 2, "Node"))
                    .field(FieldDef::repeated("kids", 3, "Node")),
            ),
        )
        .unwrap();

        let mut a = node(&pool, 1);
        a.set("child", node(&pool, 2)).unwrap();
        let mut root = DynamicMessage::new(pool.resolve("tree.Node").unwrap());
        root.set("child", a).unwrap();
        root.push("kids", node(&pool, 3)).unwrap();

        let table = measure_message(&root);
        // A { value, B { value } }, then B, then C { value }
        assert_eq!(table.nested, vec![6, 2, 2]);
        assert_eq!(table.total, 12);
        assert_eq!(encoded_len(&root), 12);
        assert_eq!(root.encode().len(), 12);
    }

    #[test]
    fn test_plain_len_records_nothing() {
        let table = measure_value(&Kind::String, &Value::String("abc".into()));
        assert_eq!(table.total, 4);
        assert!(table.nested.is_empty());
    }

    #[test]
    fn test_value_len() {
        assert_eq!(value_len(&Kind::Int32, &Value::Int32(300)), 2);
        assert_eq!(value_len(&Kind::Int32, &Value::Int32(-1)), 10);
        assert_eq!(value_len(&Kind::SInt32, &Value::Int32(-1)), 1);
        assert_eq!(value_len(&Kind::SFixed64, &Value::Int64(-1)), 8);
        assert_eq!(value_len(&Kind::Fixed32, &Value::UInt32(7)), 4);
        assert_eq!(value_len(&Kind::String, &Value::String("abc".into())), 4);
        assert_eq!(value_len(&Kind::Bytes, &Value::Bytes(vec![0; 200])), 202);
    }

    #[test]
    fn test_tag_len() {
        assert_eq!(tag_len(1, WireType::Varint), 1);
        assert_eq!(tag_len(15, WireType::Varint), 1);
        assert_eq!(tag_len(16, WireType::Varint), 2);
    }
}

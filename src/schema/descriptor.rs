// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Immutable descriptors for message, field and enum types.
//!
//! Descriptors are lightweight handles into a shared [`DescriptorPool`].
//! Cloning one clones an `Arc`; nothing behind it is ever mutated after the
//! pool is built, so descriptors can be shared freely across threads.

use std::collections::HashMap;
use std::fmt;

use super::pool::DescriptorPool;
use crate::encoding::WireType;

/// Backing storage for a built pool.
#[derive(Debug, Default)]
pub(crate) struct PoolInner {
    pub(crate) messages: Vec<MessageData>,
    pub(crate) enums: Vec<EnumData>,
    pub(crate) names: HashMap<String, TypeIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeIndex {
    Message(usize),
    Enum(usize),
}

#[derive(Debug)]
pub(crate) struct MessageData {
    pub(crate) full_name: String,
    /// Sorted by field number
    pub(crate) fields: Vec<FieldData>,
    pub(crate) by_number: HashMap<u32, usize>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) nested_messages: Vec<usize>,
    pub(crate) nested_enums: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct FieldData {
    pub(crate) name: String,
    pub(crate) number: u32,
    pub(crate) kind: KindIndex,
    pub(crate) cardinality: Cardinality,
    pub(crate) packed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KindIndex {
    Scalar(ScalarType),
    Enum(usize),
    Message(usize),
}

#[derive(Debug)]
pub(crate) struct EnumData {
    pub(crate) full_name: String,
    pub(crate) values: Vec<(String, i32)>,
}

/// Scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// Parse a scalar type name.
    pub(crate) fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "double" => Some(ScalarType::Double),
            "float" => Some(ScalarType::Float),
            "int32" => Some(ScalarType::Int32),
            "int64" => Some(ScalarType::Int64),
            "uint32" => Some(ScalarType::UInt32),
            "uint64" => Some(ScalarType::UInt64),
            "sint32" => Some(ScalarType::SInt32),
            "sint64" => Some(ScalarType::SInt64),
            "fixed32" => Some(ScalarType::Fixed32),
            "fixed64" => Some(ScalarType::Fixed64),
            "sfixed32" => Some(ScalarType::SFixed32),
            "sfixed64" => Some(ScalarType::SFixed64),
            "bool" => Some(ScalarType::Bool),
            "string" => Some(ScalarType::String),
            "bytes" => Some(ScalarType::Bytes),
            _ => None,
        }
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Zero or one value
    Singular,
    /// Ordered sequence of values
    Repeated,
}

/// Resolved type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// 64-bit float
    Double,
    /// 32-bit float
    Float,
    /// Signed 32-bit, negative values take ten bytes
    Int32,
    /// Signed 64-bit, negative values take ten bytes
    Int64,
    /// Unsigned 32-bit varint
    UInt32,
    /// Unsigned 64-bit varint
    UInt64,
    /// Zig-zag encoded signed 32-bit
    SInt32,
    /// Zig-zag encoded signed 64-bit
    SInt64,
    /// Fixed-width unsigned 32-bit
    Fixed32,
    /// Fixed-width unsigned 64-bit
    Fixed64,
    /// Fixed-width signed 32-bit
    SFixed32,
    /// Fixed-width signed 64-bit
    SFixed64,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
    /// Enum, carried as its integer value
    Enum(EnumDescriptor),
    /// Nested message
    Message(MessageDescriptor),
}

impl Kind {
    /// Wire type used for a single (unpacked) value of this kind.
    pub fn wire_type(&self) -> WireType {
        match self {
            Kind::Int32
            | Kind::Int64
            | Kind::UInt32
            | Kind::UInt64
            | Kind::SInt32
            | Kind::SInt64
            | Kind::Bool
            | Kind::Enum(_) => WireType::Varint,
            Kind::Double | Kind::Fixed64 | Kind::SFixed64 => WireType::Fixed64,
            Kind::Float | Kind::Fixed32 | Kind::SFixed32 => WireType::Fixed32,
            Kind::String | Kind::Bytes | Kind::Message(_) => WireType::LengthDelimited,
        }
    }

    /// Whether repeated values of this kind can use packed encoding.
    pub fn is_packable(&self) -> bool {
        self.wire_type() != WireType::LengthDelimited
    }

    /// The nested message type, if this is a message kind.
    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            Kind::Message(desc) => Some(desc),
            _ => None,
        }
    }

    /// The enum type, if this is an enum kind.
    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match self {
            Kind::Enum(desc) => Some(desc),
            _ => None,
        }
    }

    /// Type name as written in a schema.
    pub fn name(&self) -> &str {
        match self {
            Kind::Double => "double",
            Kind::Float => "float",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::UInt32 => "uint32",
            Kind::UInt64 => "uint64",
            Kind::SInt32 => "sint32",
            Kind::SInt64 => "sint64",
            Kind::Fixed32 => "fixed32",
            Kind::Fixed64 => "fixed64",
            Kind::SFixed32 => "sfixed32",
            Kind::SFixed64 => "sfixed64",
            Kind::Bool => "bool",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Enum(desc) => desc.full_name(),
            Kind::Message(desc) => desc.full_name(),
        }
    }

    fn from_index(pool: &DescriptorPool, kind: KindIndex) -> Self {
        match kind {
            KindIndex::Scalar(scalar) => match scalar {
                ScalarType::Double => Kind::Double,
                ScalarType::Float => Kind::Float,
                ScalarType::Int32 => Kind::Int32,
                ScalarType::Int64 => Kind::Int64,
                ScalarType::UInt32 => Kind::UInt32,
                ScalarType::UInt64 => Kind::UInt64,
                ScalarType::SInt32 => Kind::SInt32,
                ScalarType::SInt64 => Kind::SInt64,
                ScalarType::Fixed32 => Kind::Fixed32,
                ScalarType::Fixed64 => Kind::Fixed64,
                ScalarType::SFixed32 => Kind::SFixed32,
                ScalarType::SFixed64 => Kind::SFixed64,
                ScalarType::Bool => Kind::Bool,
                ScalarType::String => Kind::String,
                ScalarType::Bytes => Kind::Bytes,
            },
            KindIndex::Enum(index) => Kind::Enum(EnumDescriptor {
                pool: pool.clone(),
                index,
            }),
            KindIndex::Message(index) => Kind::Message(MessageDescriptor {
                pool: pool.clone(),
                index,
            }),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Schema of one message type.
#[derive(Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub(crate) pool: DescriptorPool,
    pub(crate) index: usize,
}

impl MessageDescriptor {
    fn data(&self) -> &MessageData {
        &self.pool.inner().messages[self.index]
    }

    /// Pool this descriptor belongs to.
    pub fn parent_pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Fully-qualified name, e.g. `tutorial.Person`.
    pub fn full_name(&self) -> &str {
        &self.data().full_name
    }

    /// Last component of the full name.
    pub fn name(&self) -> &str {
        short_name(self.full_name())
    }

    /// Fields in ascending field-number order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.data().fields.len()).map(move |index| FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.data().fields.len()
    }

    /// Look up a field by number.
    pub fn field_by_number(&self, number: u32) -> Option<FieldDescriptor> {
        self.data()
            .by_number
            .get(&number)
            .map(|&index| FieldDescriptor {
                message: self.clone(),
                index,
            })
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.data().by_name.get(name).map(|&index| FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    /// Message types declared inside this one.
    pub fn nested_messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        self.data()
            .nested_messages
            .iter()
            .map(move |&index| MessageDescriptor {
                pool: self.pool.clone(),
                index,
            })
    }

    /// Enum types declared inside this one.
    pub fn nested_enums(&self) -> impl Iterator<Item = EnumDescriptor> + '_ {
        self.data()
            .nested_enums
            .iter()
            .map(move |&index| EnumDescriptor {
                pool: self.pool.clone(),
                index,
            })
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("full_name", &self.full_name())
            .field("fields", &self.field_count())
            .finish()
    }
}

/// Schema of one field within a message.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    message: MessageDescriptor,
    index: usize,
}

impl FieldDescriptor {
    fn data(&self) -> &FieldData {
        &self.message.data().fields[self.index]
    }

    /// Message that declares this field.
    pub fn containing_message(&self) -> &MessageDescriptor {
        &self.message
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.data().name
    }

    /// Field number.
    pub fn number(&self) -> u32 {
        self.data().number
    }

    /// Resolved field type.
    pub fn kind(&self) -> Kind {
        Kind::from_index(&self.message.pool, self.data().kind)
    }

    /// Singular or repeated.
    pub fn cardinality(&self) -> Cardinality {
        self.data().cardinality
    }

    /// Whether this field holds a sequence of values.
    pub fn is_list(&self) -> bool {
        self.cardinality() == Cardinality::Repeated
    }

    /// Whether repeated values are written as one packed entry.
    pub fn is_packed(&self) -> bool {
        self.data().packed
    }

    /// Whether this is a singular or repeated message field.
    pub fn is_message(&self) -> bool {
        matches!(self.data().kind, KindIndex::Message(_))
    }

    /// Wire type used for each value of this field (ignoring packing).
    pub fn wire_type(&self) -> WireType {
        self.kind().wire_type()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name())
            .field("number", &self.number())
            .field("kind", &self.kind().name())
            .field("cardinality", &self.cardinality())
            .finish()
    }
}

/// Schema of an enum type.
#[derive(Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub(crate) pool: DescriptorPool,
    pub(crate) index: usize,
}

impl EnumDescriptor {
    fn data(&self) -> &EnumData {
        &self.pool.inner().enums[self.index]
    }

    /// Fully-qualified name, e.g. `tutorial.Person.PhoneType`.
    pub fn full_name(&self) -> &str {
        &self.data().full_name
    }

    /// Last component of the full name.
    pub fn name(&self) -> &str {
        short_name(self.full_name())
    }

    /// Declared (label, number) pairs in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.data()
            .values
            .iter()
            .map(|(name, number)| (name.as_str(), *number))
    }

    /// Number for a label.
    pub fn value_by_name(&self, name: &str) -> Option<i32> {
        self.values()
            .find(|(label, _)| *label == name)
            .map(|(_, number)| number)
    }

    /// First label declared for a number.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values()
            .find(|(_, n)| *n == number)
            .map(|(label, _)| label)
    }
}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDescriptor")
            .field("full_name", &self.full_name())
            .finish()
    }
}

fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

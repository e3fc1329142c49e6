// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic field value type.
//!
//! [`Value`] is the tagged representation of anything a message field can
//! hold. Scalars map one-to-one onto Rust primitives; enums are carried as
//! their integer; nested messages are owned [`DynamicMessage`]s; repeated
//! fields are a [`Value::List`].

use std::fmt;

use crate::message::DynamicMessage;
use crate::schema::{Cardinality, FieldDescriptor, Kind};

/// Value of a single message field.
///
/// Signed kinds (`int32`, `sint32`, `sfixed32`) share [`Value::Int32`];
/// the field's [`Kind`] decides how it is written on the wire. The same
/// holds for the 64-bit and unsigned families.
///
/// Floats compare by bit pattern, so `-0.0 != 0.0` and a `NaN` equals
/// itself; that is the equality a wire round trip preserves.
#[derive(Debug, Clone)]
pub enum Value {
    // Boolean
    Bool(bool),

    // Signed integers (int*, sint*, sfixed*)
    Int32(i32),
    Int64(i64),

    // Unsigned integers (uint*, fixed*)
    UInt32(u32),
    UInt64(u64),

    // Floating point
    Float32(f32),
    Float64(f64),

    // String (UTF-8)
    String(String),

    // Binary data
    Bytes(Vec<u8>),

    /// Enum number; need not be a declared value
    EnumNumber(i32),

    /// Nested message
    Message(DynamicMessage),

    /// Repeated field contents
    List(Vec<Value>),
}

impl Value {
    /// Default value for a single element of `kind`.
    pub fn default_for_kind(kind: &Kind) -> Self {
        match kind {
            Kind::Double => Value::Float64(0.0),
            Kind::Float => Value::Float32(0.0),
            Kind::Int32 | Kind::SInt32 | Kind::SFixed32 => Value::Int32(0),
            Kind::Int64 | Kind::SInt64 | Kind::SFixed64 => Value::Int64(0),
            Kind::UInt32 | Kind::Fixed32 => Value::UInt32(0),
            Kind::UInt64 | Kind::Fixed64 => Value::UInt64(0),
            Kind::Bool => Value::Bool(false),
            Kind::String => Value::String(String::new()),
            Kind::Bytes => Value::Bytes(Vec::new()),
            Kind::Enum(_) => Value::EnumNumber(0),
            Kind::Message(desc) => Value::Message(DynamicMessage::new(desc.clone())),
        }
    }

    /// Default value for a field: an empty list when repeated, otherwise
    /// the kind's default.
    pub fn default_for_field(field: &FieldDescriptor) -> Self {
        match field.cardinality() {
            Cardinality::Repeated => Value::List(Vec::new()),
            Cardinality::Singular => Self::default_for_kind(&field.kind()),
        }
    }

    /// Whether this value is a valid single element of `kind`.
    pub fn is_valid_for_kind(&self, kind: &Kind) -> bool {
        match (self, kind) {
            (Value::Bool(_), Kind::Bool)
            | (Value::Int32(_), Kind::Int32 | Kind::SInt32 | Kind::SFixed32)
            | (Value::Int64(_), Kind::Int64 | Kind::SInt64 | Kind::SFixed64)
            | (Value::UInt32(_), Kind::UInt32 | Kind::Fixed32)
            | (Value::UInt64(_), Kind::UInt64 | Kind::Fixed64)
            | (Value::Float32(_), Kind::Float)
            | (Value::Float64(_), Kind::Double)
            | (Value::String(_), Kind::String)
            | (Value::Bytes(_), Kind::Bytes)
            | (Value::EnumNumber(_), Kind::Enum(_)) => true,
            (Value::Message(msg), Kind::Message(desc)) => msg.descriptor() == desc,
            _ => false,
        }
    }

    /// Whether this value can be stored in `field`.
    pub fn is_valid_for_field(&self, field: &FieldDescriptor) -> bool {
        let kind = field.kind();
        match (field.cardinality(), self) {
            (Cardinality::Repeated, Value::List(items)) => {
                items.iter().all(|item| item.is_valid_for_kind(&kind))
            }
            (Cardinality::Repeated, _) => false,
            (Cardinality::Singular, value) => value.is_valid_for_kind(&kind),
        }
    }

    /// Whether this is the zero value of its type.
    ///
    /// Messages are never considered default: a set message field is
    /// written even when empty.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(v) => !*v,
            Value::Int32(v) => *v == 0,
            Value::Int64(v) => *v == 0,
            Value::UInt32(v) => *v == 0,
            Value::UInt64(v) => *v == 0,
            // -0.0 is not the default; it must reach the wire
            Value::Float32(v) => v.to_bits() == 0,
            Value::Float64(v) => v.to_bits() == 0,
            Value::String(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::EnumNumber(v) => *v == 0,
            Value::Message(_) => false,
            Value::List(v) => v.is_empty(),
        }
    }

    /// Short name of this value's variant, for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Bool(_) => "bool".to_string(),
            Value::Int32(_) => "int32".to_string(),
            Value::Int64(_) => "int64".to_string(),
            Value::UInt32(_) => "uint32".to_string(),
            Value::UInt64(_) => "uint64".to_string(),
            Value::Float32(_) => "float".to_string(),
            Value::Float64(_) => "double".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::EnumNumber(_) => "enum".to_string(),
            Value::Message(msg) => msg.descriptor().full_name().to_string(),
            Value::List(_) => "list".to_string(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the inner bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a signed integer, widening 32-bit values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::EnumNumber(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Get an unsigned integer, widening 32-bit values.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt32(v) => Some(u64::from(*v)),
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a float, widening `f32`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the enum number.
    pub fn as_enum_number(&self) -> Option<i32> {
        match self {
            Value::EnumNumber(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the inner string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the inner bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the nested message.
    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Get a mutable reference to the nested message.
    pub fn as_message_mut(&mut self) -> Option<&mut DynamicMessage> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Get the list elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get a mutable reference to the list.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::EnumNumber(a), Value::EnumNumber(b)) => a == b,
            (Value::Message(a), Value::Message(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Value::EnumNumber(v) => write!(f, "{v}"),
            Value::Message(m) => write!(f, "{m:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    DynamicMessage => Message,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

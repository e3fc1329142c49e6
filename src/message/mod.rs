// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic messages bound to a descriptor.
//!
//! A [`DynamicMessage`] is a mutable instance of one message type. Every
//! read and write is checked against the bound [`MessageDescriptor`], so a
//! message can never hold a field its type doesn't declare or a value of
//! the wrong type.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use protocodec::schema::{DescriptorPool, FieldDef, FileDef, MessageDef};
//! use protocodec::DynamicMessage;
//!
//! let pool = DescriptorPool::from_file(
//!     FileDef::new("demo").message(
//!         MessageDef::new("Greeting").field(FieldDef::singular("text", 1, "string")),
//!     ),
//! )?;
//! let mut msg = DynamicMessage::new(pool.resolve("demo.Greeting")?);
//! msg.set("text", "hello")?;
//! let bytes = msg.encode();
//! let decoded = DynamicMessage::decode(pool.resolve("demo.Greeting")?, &bytes)?;
//! assert_eq!(decoded, msg);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::{CodecError, Result, Value};
use crate::encoding::{calculator, reader, writer, DecodeOptions};
use crate::schema::{EnumDescriptor, FieldDescriptor, MessageDescriptor};

/// Mutable message instance bound to one message type.
///
/// Fields that were never set read as their defaults. Equality is
/// field-wise through [`get`](Self::get), so a field explicitly set to its
/// default compares equal to one left unset.
#[derive(Clone)]
pub struct DynamicMessage {
    descriptor: MessageDescriptor,
    /// Set fields keyed by field number
    fields: BTreeMap<u32, Value>,
}

impl DynamicMessage {
    /// Create a new instance with every field at its default.
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor,
            fields: BTreeMap::new(),
        }
    }

    /// Decode a message of type `descriptor` from `data`.
    ///
    /// Decoding is all-or-nothing: no partially populated message is
    /// returned on failure.
    pub fn decode(descriptor: MessageDescriptor, data: &[u8]) -> Result<Self> {
        reader::decode_message(descriptor, data, &DecodeOptions::default())
    }

    /// Decode with explicit options.
    pub fn decode_with_options(
        descriptor: MessageDescriptor,
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<Self> {
        reader::decode_message(descriptor, data, options)
    }

    /// Type this message is bound to.
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn field(&self, name: &str) -> Result<FieldDescriptor> {
        self.descriptor
            .field_by_name(name)
            .ok_or_else(|| CodecError::unknown_field(self.descriptor.full_name(), name))
    }

    fn check_owner(&self, field: &FieldDescriptor) -> Result<()> {
        if field.containing_message() != &self.descriptor {
            return Err(CodecError::unknown_field(
                self.descriptor.full_name(),
                field.name(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read a field by name, falling back to its default.
    pub fn get(&self, name: &str) -> Result<Cow<'_, Value>> {
        let field = self.field(name)?;
        Ok(self.get_field(&field))
    }

    /// Read a field by number, falling back to its default.
    pub fn get_by_number(&self, number: u32) -> Result<Cow<'_, Value>> {
        let field = self.descriptor.field_by_number(number).ok_or_else(|| {
            CodecError::unknown_field(self.descriptor.full_name(), number.to_string())
        })?;
        Ok(self.get_field(&field))
    }

    /// Read a field through its descriptor.
    pub fn get_field(&self, field: &FieldDescriptor) -> Cow<'_, Value> {
        match self.fields.get(&field.number()) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(Value::default_for_field(field)),
        }
    }

    /// Whether a field carries data that would be encoded.
    ///
    /// Repeated fields need at least one element; singular scalars need a
    /// non-default value; message fields only need to have been set.
    pub fn has(&self, name: &str) -> Result<bool> {
        let field = self.field(name)?;
        Ok(self.has_field(&field))
    }

    /// Like [`has`](Self::has), through a descriptor.
    pub fn has_field(&self, field: &FieldDescriptor) -> bool {
        self.fields
            .get(&field.number())
            .is_some_and(|value| !value.is_default())
    }

    /// Set fields with their descriptors, in field-number order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldDescriptor, &Value)> + '_ {
        self.fields.iter().filter_map(move |(number, value)| {
            self.descriptor
                .field_by_number(*number)
                .map(|field| (field, value))
        })
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Set a field by name.
    ///
    /// Fails with [`CodecError::UnknownField`] if the message has no such
    /// field and [`CodecError::FieldTypeMismatch`] if `value` doesn't fit
    /// its declared type. Repeated fields take a [`Value::List`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        self.set_field(&field, value.into())
    }

    /// Set a field through its descriptor.
    pub fn set_field(&mut self, field: &FieldDescriptor, value: Value) -> Result<()> {
        self.check_owner(field)?;
        if !value.is_valid_for_field(field) {
            return Err(self.mismatch(field, &value));
        }
        self.fields.insert(field.number(), value);
        Ok(())
    }

    /// Append one element to a repeated field.
    pub fn push(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        let value = value.into();
        if !field.is_list() || !value.is_valid_for_kind(&field.kind()) {
            return Err(self.mismatch(&field, &value));
        }
        self.push_unchecked(field.number(), value);
        Ok(())
    }

    /// Set a singular enum field from one of its labels.
    ///
    /// Like [`set`](Self::set), this replaces the current value; repeated
    /// enum fields take [`push_enum_by_name`](Self::push_enum_by_name).
    pub fn set_enum_by_name(&mut self, name: &str, label: &str) -> Result<()> {
        let field = self.field(name)?;
        let number = self.enum_number(&field, label, false)?;
        self.fields.insert(field.number(), Value::EnumNumber(number));
        Ok(())
    }

    /// Append one labeled value to a repeated enum field.
    pub fn push_enum_by_name(&mut self, name: &str, label: &str) -> Result<()> {
        let field = self.field(name)?;
        let number = self.enum_number(&field, label, true)?;
        self.push_unchecked(field.number(), Value::EnumNumber(number));
        Ok(())
    }

    fn enum_number(&self, field: &FieldDescriptor, label: &str, repeated: bool) -> Result<i32> {
        let kind = field.kind();
        let enum_desc = match kind.as_enum() {
            Some(enum_desc) if field.is_list() == repeated => enum_desc,
            _ => {
                return Err(CodecError::type_mismatch(
                    self.descriptor.full_name(),
                    field.name(),
                    field_type_label(field),
                    if repeated {
                        "repeated enum label"
                    } else {
                        "enum label"
                    },
                ))
            }
        };
        enum_desc
            .value_by_name(label)
            .ok_or_else(|| CodecError::unknown_enum_value(enum_desc.full_name(), label))
    }

    /// Mutable access to a nested message field, creating it if unset.
    pub fn message_mut(&mut self, name: &str) -> Result<&mut DynamicMessage> {
        let field = self.field(name)?;
        let kind = field.kind();
        let Some(nested) = kind.as_message().filter(|_| !field.is_list()) else {
            return Err(CodecError::type_mismatch(
                self.descriptor.full_name(),
                field.name(),
                field_type_label(&field),
                "message",
            ));
        };
        let message_name = self.descriptor.full_name().to_string();
        let slot = self
            .fields
            .entry(field.number())
            .or_insert_with(|| Value::Message(DynamicMessage::new(nested.clone())));
        slot.as_message_mut().ok_or_else(|| {
            CodecError::type_mismatch(message_name, field.name(), kind.name(), "non-message value")
        })
    }

    /// Reset a field to its default.
    pub fn clear(&mut self, name: &str) -> Result<()> {
        let field = self.field(name)?;
        self.fields.remove(&field.number());
        Ok(())
    }

    /// Reset every field.
    pub fn clear_all(&mut self) {
        self.fields.clear();
    }

    /// Assign several fields from a name -> value mapping.
    ///
    /// Fields are set one by one in iteration order. The first failure stops
    /// the assignment; fields assigned before it keep their new values.
    pub fn assign<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode to wire format.
    pub fn encode(&self) -> Vec<u8> {
        writer::encode_message(self)
    }

    /// Exact size of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self) -> usize {
        calculator::encoded_len(self)
    }

    /// Decode `data` into this message, merging with existing contents.
    ///
    /// Scalars are overwritten, repeated fields are appended, and message
    /// fields are merged recursively. On failure the message is unchanged.
    pub fn merge(&mut self, data: &[u8]) -> Result<()> {
        let mut scratch = self.clone();
        reader::merge_message(&mut scratch, data, &DecodeOptions::default())?;
        *self = scratch;
        Ok(())
    }

    // ========================================================================
    // Decoder hooks
    // ========================================================================

    /// Store a value the decoder already checked against the field.
    pub(crate) fn insert_unchecked(&mut self, number: u32, value: Value) {
        self.fields.insert(number, value);
    }

    /// Append to a repeated field without validation.
    pub(crate) fn push_unchecked(&mut self, number: u32, value: Value) {
        match self.fields.entry(number) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::List(items) => items.push(value),
                other => *other = Value::List(vec![value]),
            },
            Entry::Vacant(slot) => {
                slot.insert(Value::List(vec![value]));
            }
        }
    }

    /// Detach a nested message for merging; the caller puts it back.
    pub(crate) fn take_message(&mut self, field: &FieldDescriptor) -> Option<DynamicMessage> {
        match self.fields.remove(&field.number()) {
            Some(Value::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    fn mismatch(&self, field: &FieldDescriptor, value: &Value) -> CodecError {
        CodecError::type_mismatch(
            self.descriptor.full_name(),
            field.name(),
            field_type_label(field),
            value.type_name(),
        )
    }
}

fn field_type_label(field: &FieldDescriptor) -> String {
    if field.is_list() {
        format!("repeated {}", field.kind().name())
    } else {
        field.kind().name().to_string()
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        if self.descriptor != other.descriptor {
            return false;
        }
        self.descriptor.fields().all(|field| {
            let number = field.number();
            match (self.fields.get(&number), other.fields.get(&number)) {
                (None, None) => true,
                _ => self.get_field(&field) == other.get_field(&field),
            }
        })
    }
}

impl fmt::Debug for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.descriptor.name());
        for (field, value) in self.fields() {
            let kind = field.kind();
            out.field(
                field.name(),
                &FieldValue {
                    enum_desc: kind.as_enum(),
                    value,
                },
            );
        }
        out.finish()
    }
}

/// Debug view of a field value: enum numbers print as labels, strings and
/// messages as themselves rather than as `Value` variants.
struct FieldValue<'a> {
    enum_desc: Option<&'a EnumDescriptor>,
    value: &'a Value,
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::EnumNumber(n) => match self.enum_desc.and_then(|e| e.name_of(*n)) {
                Some(label) => f.write_str(label),
                None => write!(f, "{n}"),
            },
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::Message(msg) => fmt::Debug::fmt(msg, f),
            Value::List(items) => f
                .debug_list()
                .entries(items.iter().map(|value| FieldValue {
                    enum_desc: self.enum_desc,
                    value,
                }))
                .finish(),
            other => fmt::Display::fmt(other, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;
    use crate::schema::{DescriptorPool, EnumDef, FieldDef, FileDef, MessageDef};

    static POOL: OnceLock<DescriptorPool> = OnceLock::new();

    /// Shared pool, so every fixture message is bound to the same descriptors.
    fn pool() -> DescriptorPool {
        POOL.get_or_init(build_pool).clone()
    }

    fn build_pool() -> DescriptorPool {
        DescriptorPool::from_file(
            FileDef::new("tutorial")
                .message(
                    MessageDef::new("Person")
                        .field(FieldDef::singular("name", 1, "string"))
                        .field(FieldDef::singular("id", 2, "int32"))
                        .field(FieldDef::singular("email", 3, "string"))
                        .field(FieldDef::repeated("phones", 4, "PhoneNumber"))
                        .field(FieldDef::singular("manager", 5, "Person"))
                        .field(FieldDef::repeated("reachable", 6, "PhoneType"))
                        .message(
                            MessageDef::new("PhoneNumber")
                                .field(FieldDef::singular("number", 1, "string"))
                                .field(FieldDef::singular("type", 2, "PhoneType")),
                        )
                        .enumeration(
                            EnumDef::new("PhoneType")
                                .value("MOBILE", 0)
                                .value("HOME", 1)
                                .value("WORK", 2),
                        ),
                ),
        )
        .unwrap()
    }

    fn person() -> DynamicMessage {
        DynamicMessage::new(pool().resolve("tutorial.Person").unwrap())
    }

    #[test]
    fn test_defaults() {
        let msg = person();
        assert_eq!(*msg.get("name").unwrap(), Value::String(String::new()));
        assert_eq!(*msg.get("id").unwrap(), Value::Int32(0));
        assert_eq!(*msg.get("phones").unwrap(), Value::List(vec![]));
        let manager = msg.get("manager").unwrap();
        assert_eq!(
            manager.as_message().unwrap().descriptor().full_name(),
            "tutorial.Person"
        );
        assert!(!msg.has("name").unwrap());
        assert!(!msg.has("manager").unwrap());
    }

    #[test]
    fn test_fresh_instances() {
        let desc = pool().resolve("tutorial.Person").unwrap();
        let mut a = DynamicMessage::new(desc.clone());
        let b = DynamicMessage::new(desc);
        a.set("id", 7).unwrap();
        assert_eq!(*b.get("id").unwrap(), Value::Int32(0));
    }

    #[test]
    fn test_set_and_get() {
        let mut msg = person();
        msg.set("name", "John Doe").unwrap();
        msg.set("id", 1234).unwrap();
        assert_eq!(msg.get("name").unwrap().as_str(), Some("John Doe"));
        assert_eq!(msg.get_by_number(2).unwrap().as_i64(), Some(1234));
        assert!(msg.has("id").unwrap());
    }

    #[test]
    fn test_unknown_field() {
        let mut msg = person();
        assert_eq!(
            msg.set("age", 3).unwrap_err(),
            CodecError::unknown_field("tutorial.Person", "age")
        );
        assert!(matches!(
            msg.get("age"),
            Err(CodecError::UnknownField { .. })
        ));
        assert!(matches!(
            msg.get_by_number(99),
            Err(CodecError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let mut msg = person();
        let err = msg.set("id", "not a number").unwrap_err();
        assert_eq!(
            err,
            CodecError::type_mismatch("tutorial.Person", "id", "int32", "string")
        );
        assert!(matches!(
            msg.set("id", 5i64),
            Err(CodecError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            msg.set("phones", "x"),
            Err(CodecError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            msg.set("manager", person().get("phones").unwrap().into_owned()),
            Err(CodecError::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_nested_message_type_checked() {
        let pool = pool();
        let mut msg = DynamicMessage::new(pool.resolve("tutorial.Person").unwrap());
        let phone = DynamicMessage::new(pool.resolve("tutorial.Person.PhoneNumber").unwrap());
        assert!(msg.set("manager", phone.clone()).is_err());
        assert!(msg.push("phones", phone).is_ok());
        assert!(msg
            .push("phones", DynamicMessage::new(pool.resolve("tutorial.Person").unwrap()))
            .is_err());
    }

    #[test]
    fn test_push_and_list() {
        let pool = pool();
        let mut msg = DynamicMessage::new(pool.resolve("tutorial.Person").unwrap());
        let phone_desc = pool.resolve("tutorial.Person.PhoneNumber").unwrap();
        for number in ["1", "2", "3"] {
            let mut phone = DynamicMessage::new(phone_desc.clone());
            phone.set("number", number).unwrap();
            msg.push("phones", phone).unwrap();
        }
        let phones = msg.get("phones").unwrap();
        let numbers: Vec<String> = phones
            .as_list()
            .unwrap()
            .iter()
            .map(|p| {
                let phone = p.as_message().unwrap();
                phone.get("number").unwrap().as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
        assert!(msg.push("name", "x").is_err());
    }

    #[test]
    fn test_set_enum_by_name() {
        let pool = pool();
        let mut phone = DynamicMessage::new(pool.resolve("tutorial.Person.PhoneNumber").unwrap());
        phone.set_enum_by_name("type", "WORK").unwrap();
        assert_eq!(*phone.get("type").unwrap(), Value::EnumNumber(2));
        assert_eq!(
            phone.set_enum_by_name("type", "FAX").unwrap_err(),
            CodecError::unknown_enum_value("tutorial.Person.PhoneType", "FAX")
        );
        assert!(phone.set_enum_by_name("number", "HOME").is_err());
        // open enum: undeclared numbers are kept
        phone.set("type", Value::EnumNumber(42)).unwrap();
        assert_eq!(phone.get("type").unwrap().as_enum_number(), Some(42));
    }

    #[test]
    fn test_enum_labels_on_repeated_field() {
        let mut msg = person();
        msg.push_enum_by_name("reachable", "HOME").unwrap();
        msg.push_enum_by_name("reachable", "WORK").unwrap();
        assert_eq!(
            *msg.get("reachable").unwrap(),
            Value::List(vec![Value::EnumNumber(1), Value::EnumNumber(2)])
        );

        // set semantics never append; a list field needs push
        assert!(matches!(
            msg.set_enum_by_name("reachable", "MOBILE"),
            Err(CodecError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            msg.push_enum_by_name("reachable", "FAX"),
            Err(CodecError::UnknownEnumValue { .. })
        ));
        assert_eq!(msg.get("reachable").unwrap().as_list().unwrap().len(), 2);

        let pool = pool();
        let mut phone = DynamicMessage::new(pool.resolve("tutorial.Person.PhoneNumber").unwrap());
        assert!(matches!(
            phone.push_enum_by_name("type", "HOME"),
            Err(CodecError::FieldTypeMismatch { .. })
        ));
        phone.set_enum_by_name("type", "HOME").unwrap();
        phone.set_enum_by_name("type", "WORK").unwrap();
        assert_eq!(*phone.get("type").unwrap(), Value::EnumNumber(2));
    }

    #[test]
    fn test_message_mut() {
        let mut msg = person();
        msg.message_mut("manager")
            .unwrap()
            .set("name", "Boss")
            .unwrap();
        assert!(msg.has("manager").unwrap());
        let manager = msg.get("manager").unwrap();
        assert_eq!(
            manager.as_message().unwrap().get("name").unwrap().as_str(),
            Some("Boss")
        );
        assert!(msg.message_mut("phones").is_err());
        assert!(msg.message_mut("name").is_err());
    }

    #[test]
    fn test_assign_applies_in_order() {
        let mut msg = person();
        msg.assign([
            ("id", Value::from(5678)),
            ("name", Value::from("Jane Doe")),
            ("email", Value::from("jane@example.com")),
        ])
        .unwrap();
        assert_eq!(msg.get("name").unwrap().as_str(), Some("Jane Doe"));
        assert_eq!(msg.get("email").unwrap().as_str(), Some("jane@example.com"));
    }

    #[test]
    fn test_assign_stops_at_first_error() {
        let mut msg = person();
        let err = msg
            .assign([
                ("id", Value::from(1)),
                ("name", Value::from(2)),
                ("email", Value::from("never@set")),
            ])
            .unwrap_err();
        assert!(matches!(err, CodecError::FieldTypeMismatch { .. }));
        // earlier assignment is kept, later one never ran
        assert_eq!(msg.get("id").unwrap().as_i64(), Some(1));
        assert_eq!(msg.get("email").unwrap().as_str(), Some(""));
    }

    #[test]
    fn test_clear() {
        let mut msg = person();
        msg.set("name", "x").unwrap();
        msg.clear("name").unwrap();
        assert!(!msg.has("name").unwrap());
        msg.set("id", 3).unwrap();
        msg.clear_all();
        assert_eq!(msg, person());
    }

    #[test]
    fn test_equality_ignores_explicit_defaults() {
        let mut a = person();
        let b = person();
        a.set("id", 0).unwrap();
        a.set("phones", Value::List(vec![])).unwrap();
        assert_eq!(a, b);
        a.set("id", 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_self_referential() {
        let mut a = person();
        let b = person();
        assert_eq!(a, b);
        a.message_mut("manager").unwrap();
        // an empty manager equals an unset one
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixtures_share_descriptors() {
        assert_eq!(person().descriptor(), person().descriptor());
        assert_eq!(person(), person());
    }

    #[test]
    fn test_equality_requires_same_descriptor() {
        let other = DynamicMessage::new(build_pool().resolve("tutorial.Person").unwrap());
        assert_ne!(person(), other);
    }

    #[test]
    fn test_debug_labels_enums() {
        let pool = pool();
        let mut phone = DynamicMessage::new(pool.resolve("tutorial.Person.PhoneNumber").unwrap());
        phone.set("number", "555-4321").unwrap();
        phone.set_enum_by_name("type", "HOME").unwrap();
        let text = format!("{phone:?}");
        assert_eq!(text, "PhoneNumber { number: \"555-4321\", type: HOME }");
    }
}

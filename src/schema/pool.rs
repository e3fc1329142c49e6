// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Descriptor pool: the registry of message and enum types.
//!
//! A pool is assembled once from [`FileDef`]s through a
//! [`DescriptorPoolBuilder`], which resolves every type reference and checks
//! structural well-formedness. The built pool is immutable and cheap to
//! clone, so it can be shared across threads without locking.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::def::{EnumDef, FileDef, Label, MessageDef};
use super::descriptor::{
    EnumData, EnumDescriptor, FieldData, KindIndex, MessageData, MessageDescriptor, PoolInner,
    ScalarType, TypeIndex,
};
use super::Cardinality;
use crate::core::{CodecError, Result};
use crate::encoding::wire::{MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS};

/// Immutable collection of resolved message and enum types, keyed by
/// fully-qualified name.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    inner: Arc<PoolInner>,
}

impl PartialEq for DescriptorPool {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DescriptorPool {}

impl DescriptorPool {
    /// Start building a pool.
    pub fn builder() -> DescriptorPoolBuilder {
        DescriptorPoolBuilder::new()
    }

    /// Build a pool from a single file definition.
    pub fn from_file(file: FileDef) -> Result<Self> {
        Self::builder().add_file(file).build()
    }

    pub(crate) fn inner(&self) -> &PoolInner {
        &self.inner
    }

    /// Look up a message type by fully-qualified name.
    ///
    /// A leading `.` is accepted.
    pub fn resolve(&self, full_name: &str) -> Result<MessageDescriptor> {
        self.get_message(full_name)
            .ok_or_else(|| CodecError::unknown_type(full_name))
    }

    /// Look up an enum type by fully-qualified name.
    pub fn resolve_enum(&self, full_name: &str) -> Result<EnumDescriptor> {
        self.get_enum(full_name)
            .ok_or_else(|| CodecError::unknown_type(full_name))
    }

    /// Look up a message type, returning `None` when absent.
    pub fn get_message(&self, full_name: &str) -> Option<MessageDescriptor> {
        let name = full_name.strip_prefix('.').unwrap_or(full_name);
        match self.inner.names.get(name) {
            Some(TypeIndex::Message(index)) => Some(MessageDescriptor {
                pool: self.clone(),
                index: *index,
            }),
            _ => None,
        }
    }

    /// Look up an enum type, returning `None` when absent.
    pub fn get_enum(&self, full_name: &str) -> Option<EnumDescriptor> {
        let name = full_name.strip_prefix('.').unwrap_or(full_name);
        match self.inner.names.get(name) {
            Some(TypeIndex::Enum(index)) => Some(EnumDescriptor {
                pool: self.clone(),
                index: *index,
            }),
            _ => None,
        }
    }

    /// All message types, in definition order.
    pub fn messages(&self) -> impl ExactSizeIterator<Item = MessageDescriptor> + '_ {
        (0..self.inner.messages.len()).map(move |index| MessageDescriptor {
            pool: self.clone(),
            index,
        })
    }

    /// All enum types, in definition order.
    pub fn enums(&self) -> impl ExactSizeIterator<Item = EnumDescriptor> + '_ {
        (0..self.inner.enums.len()).map(move |index| EnumDescriptor {
            pool: self.clone(),
            index,
        })
    }
}

/// Collects file definitions and builds a [`DescriptorPool`].
#[derive(Debug, Default)]
pub struct DescriptorPoolBuilder {
    files: Vec<FileDef>,
}

impl DescriptorPoolBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file definition.
    pub fn add_file(mut self, file: FileDef) -> Self {
        self.files.push(file);
        self
    }

    /// Resolve all type references and validate the schema.
    pub fn build(self) -> Result<DescriptorPool> {
        let mut inner = PoolInner::default();
        let mut pending: Vec<(usize, &MessageDef)> = Vec::new();

        for file in &self.files {
            for enum_def in &file.enums {
                register_enum(&mut inner, enum_def, &file.package)?;
            }
            for message in &file.messages {
                register_message(&mut inner, &mut pending, message, &file.package)?;
            }
        }

        for (index, def) in pending {
            let full_name = inner.messages[index].full_name.clone();
            let mut fields = def
                .fields
                .iter()
                .map(|field| build_field(&inner.names, &full_name, field))
                .collect::<Result<Vec<_>>>()?;
            fields.sort_by_key(|f| f.number);

            let mut by_number = HashMap::with_capacity(fields.len());
            let mut by_name = HashMap::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                if by_number.insert(field.number, i).is_some() {
                    return Err(CodecError::invalid_schema(
                        &full_name,
                        format!("duplicate field number {}", field.number),
                    ));
                }
                if by_name.insert(field.name.clone(), i).is_some() {
                    return Err(CodecError::invalid_schema(
                        &full_name,
                        format!("duplicate field name '{}'", field.name),
                    ));
                }
            }

            let data = &mut inner.messages[index];
            data.fields = fields;
            data.by_number = by_number;
            data.by_name = by_name;
        }

        debug!(
            messages = inner.messages.len(),
            enums = inner.enums.len(),
            "built descriptor pool"
        );

        Ok(DescriptorPool {
            inner: Arc::new(inner),
        })
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn check_type_name(scope: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains('.') || name.contains(char::is_whitespace) {
        return Err(CodecError::invalid_schema(
            qualify(scope, name),
            format!("invalid type name '{name}'"),
        ));
    }
    Ok(())
}

fn claim_name(inner: &mut PoolInner, full_name: &str, index: TypeIndex) -> Result<()> {
    match inner.names.entry(full_name.to_string()) {
        Entry::Occupied(_) => Err(CodecError::invalid_schema(
            full_name,
            "type defined more than once",
        )),
        Entry::Vacant(slot) => {
            slot.insert(index);
            Ok(())
        }
    }
}

fn register_enum(inner: &mut PoolInner, def: &EnumDef, scope: &str) -> Result<usize> {
    check_type_name(scope, &def.name)?;
    let full_name = qualify(scope, &def.name);

    if def.values.is_empty() {
        return Err(CodecError::invalid_schema(&full_name, "enum has no values"));
    }
    let mut seen = HashMap::new();
    for value in &def.values {
        if seen.insert(value.name.as_str(), value.number).is_some() {
            return Err(CodecError::invalid_schema(
                &full_name,
                format!("duplicate enum value '{}'", value.name),
            ));
        }
    }

    let index = inner.enums.len();
    claim_name(inner, &full_name, TypeIndex::Enum(index))?;
    inner.enums.push(EnumData {
        full_name,
        values: def
            .values
            .iter()
            .map(|v| (v.name.clone(), v.number))
            .collect(),
    });
    Ok(index)
}

fn register_message<'a>(
    inner: &mut PoolInner,
    pending: &mut Vec<(usize, &'a MessageDef)>,
    def: &'a MessageDef,
    scope: &str,
) -> Result<usize> {
    check_type_name(scope, &def.name)?;
    let full_name = qualify(scope, &def.name);

    let index = inner.messages.len();
    claim_name(inner, &full_name, TypeIndex::Message(index))?;
    inner.messages.push(MessageData {
        full_name: full_name.clone(),
        fields: Vec::new(),
        by_number: HashMap::new(),
        by_name: HashMap::new(),
        nested_messages: Vec::new(),
        nested_enums: Vec::new(),
    });
    pending.push((index, def));

    for enum_def in &def.enums {
        let nested = register_enum(inner, enum_def, &full_name)?;
        inner.messages[index].nested_enums.push(nested);
    }
    for message in &def.messages {
        let nested = register_message(inner, pending, message, &full_name)?;
        inner.messages[index].nested_messages.push(nested);
    }
    Ok(index)
}

fn build_field(
    names: &HashMap<String, TypeIndex>,
    message: &str,
    def: &super::def::FieldDef,
) -> Result<FieldData> {
    if def.name.is_empty() {
        return Err(CodecError::invalid_schema(message, "field with empty name"));
    }
    if def.number == 0 || def.number > MAX_FIELD_NUMBER {
        return Err(CodecError::invalid_schema(
            message,
            format!(
                "field '{}' number {} outside 1..={MAX_FIELD_NUMBER}",
                def.name, def.number
            ),
        ));
    }
    if RESERVED_FIELD_NUMBERS.contains(&def.number) {
        return Err(CodecError::invalid_schema(
            message,
            format!("field '{}' uses reserved number {}", def.name, def.number),
        ));
    }

    let kind = resolve_type(names, message, &def.type_name).ok_or_else(|| {
        CodecError::invalid_schema(
            message,
            format!(
                "field '{}' refers to unknown type '{}'",
                def.name, def.type_name
            ),
        )
    })?;

    let packable = !matches!(
        kind,
        KindIndex::Scalar(ScalarType::String | ScalarType::Bytes) | KindIndex::Message(_)
    );
    let (cardinality, packed) = match (def.label, def.packed) {
        (Label::Optional, Some(true)) => {
            return Err(CodecError::invalid_schema(
                message,
                format!("field '{}' is packed but not repeated", def.name),
            ));
        }
        (Label::Optional, _) => (Cardinality::Singular, false),
        (Label::Repeated, Some(true)) if !packable => {
            return Err(CodecError::invalid_schema(
                message,
                format!(
                    "field '{}' of type '{}' cannot be packed",
                    def.name, def.type_name
                ),
            ));
        }
        (Label::Repeated, Some(packed)) => (Cardinality::Repeated, packed),
        (Label::Repeated, None) => (Cardinality::Repeated, packable),
    };

    Ok(FieldData {
        name: def.name.clone(),
        number: def.number,
        kind,
        cardinality,
        packed,
    })
}

/// Resolve a type reference the way protobuf scoping does: scalars first,
/// then `.`-prefixed absolute names, then relative names searched from the
/// innermost enclosing scope outward.
fn resolve_type(
    names: &HashMap<String, TypeIndex>,
    scope: &str,
    type_name: &str,
) -> Option<KindIndex> {
    if let Some(scalar) = ScalarType::try_from_str(type_name) {
        return Some(KindIndex::Scalar(scalar));
    }

    let to_kind = |index: &TypeIndex| match *index {
        TypeIndex::Message(i) => KindIndex::Message(i),
        TypeIndex::Enum(i) => KindIndex::Enum(i),
    };

    if let Some(absolute) = type_name.strip_prefix('.') {
        return names.get(absolute).map(to_kind);
    }

    let mut scope = scope;
    loop {
        if let Some(found) = names.get(&qualify(scope, type_name)) {
            return Some(to_kind(found));
        }
        if scope.is_empty() {
            return None;
        }
        scope = scope.rfind('.').map_or("", |pos| &scope[..pos]);
    }
}

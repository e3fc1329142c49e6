// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Definition types for already-compiled schemas.
//!
//! These are plain serde structs describing messages, fields and enums the
//! way a schema compiler would hand them over. They are turned into the
//! immutable descriptor tree by [`DescriptorPoolBuilder`](super::DescriptorPoolBuilder).

use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};

/// One schema file: a package plus its top-level messages and enums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDef {
    /// Package prefix for every type in this file (e.g. "tutorial")
    #[serde(default)]
    pub package: String,
    /// Top-level message definitions
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    /// Top-level enum definitions
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// A message type definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDef {
    /// Short name, without package or parent scope
    pub name: String,
    /// Declared fields, in any order
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Message types nested inside this one
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    /// Enum types nested inside this one
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// Field cardinality as written in a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Zero or one value
    #[default]
    Optional,
    /// Ordered sequence of values
    Repeated,
}

/// A field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within its message
    pub name: String,
    /// Field number, unique within its message
    pub number: u32,
    /// Scalar type name ("int32", "string", ...) or a message/enum reference
    #[serde(rename = "type")]
    pub type_name: String,
    /// Cardinality
    #[serde(default)]
    pub label: Label,
    /// Packed encoding override for repeated scalars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packed: Option<bool>,
}

/// An enum type definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    /// Short name
    pub name: String,
    /// Declared values; numbers need not be contiguous
    #[serde(default)]
    pub values: Vec<EnumValueDef>,
}

/// One labeled enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDef {
    /// Symbolic label
    pub name: String,
    /// Integer written on the wire
    pub number: i32,
}

impl FileDef {
    /// Create an empty file definition for a package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Add a top-level message.
    pub fn message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    /// Add a top-level enum.
    pub fn enumeration(mut self, enum_def: EnumDef) -> Self {
        self.enums.push(enum_def);
        self
    }

    /// Load a file definition from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CodecError::invalid_schema("<json>", format!("{e}")))
    }

    /// Load a file definition from TOML.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CodecError::invalid_schema("<toml>", format!("{e}")))
    }

    /// Serialize this definition to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CodecError::invalid_schema(self.package.clone(), format!("{e}")))
    }
}

impl MessageDef {
    /// Create a message definition with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a nested message.
    pub fn message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    /// Add a nested enum.
    pub fn enumeration(mut self, enum_def: EnumDef) -> Self {
        self.enums.push(enum_def);
        self
    }
}

impl FieldDef {
    /// A singular field.
    pub fn singular(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            type_name: type_name.into(),
            label: Label::Optional,
            packed: None,
        }
    }

    /// A repeated field.
    pub fn repeated(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
        Self {
            label: Label::Repeated,
            ..Self::singular(name, number, type_name)
        }
    }

    /// Override packed encoding.
    pub fn packed(mut self, packed: bool) -> Self {
        self.packed = Some(packed);
        self
    }
}

impl EnumDef {
    /// Create an enum definition with no values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Add a labeled value.
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number,
        });
        self
    }
}

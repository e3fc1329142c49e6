// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for protocodec.
//!
//! Covers every failure the engine can report:
//! - Schema construction and type lookup
//! - Wire-level decoding (varints, framing, wire types)
//! - Field access on dynamic messages

use std::fmt;

/// Errors that can occur while building schemas or encoding/decoding messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Message or enum type not found in the descriptor pool
    UnknownType {
        /// Fully-qualified type name that was requested
        type_name: String,
    },

    /// Varint without a terminating byte in its first 10 bytes, or
    /// carrying bits beyond the 64-bit range
    MalformedVarint {
        /// Offset of the first byte of the varint
        position: usize,
    },

    /// Declared or implied length exceeds the remaining input
    TruncatedBuffer {
        /// Bytes needed to finish the current value
        requested: usize,
        /// Bytes left in the buffer
        available: usize,
        /// Offset where the value starts
        position: usize,
    },

    /// Wire type on the wire doesn't match what the field expects,
    /// or is not a valid wire type at all
    UnexpectedWireType {
        /// Field number from the tag
        field_number: u32,
        /// Raw wire type code found on the wire
        wire_type: u8,
        /// What the decoder expected
        expected: String,
    },

    /// Value assigned to a field doesn't match its declared type
    FieldTypeMismatch {
        /// Fully-qualified message name
        message: String,
        /// Field name
        field: String,
        /// Declared field type
        expected: String,
        /// Type of the rejected value
        actual: String,
    },

    /// Field name or number is not declared by the message
    UnknownField {
        /// Fully-qualified message name
        message: String,
        /// Field name or number as given by the caller
        field: String,
    },

    /// Enum label not declared by the enum
    UnknownEnumValue {
        /// Fully-qualified enum name
        enum_name: String,
        /// Label that was looked up
        label: String,
    },

    /// Structural problem found while building a descriptor pool
    InvalidSchema {
        /// Type or field the problem was found in
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// String field whose bytes are not valid UTF-8
    InvalidUtf8 {
        /// Field name
        field: String,
        /// Offset of the string payload
        position: usize,
    },

    /// Nested messages deeper than the decoder allows
    RecursionLimit {
        /// Configured limit
        limit: usize,
    },

    /// Unsupported wire feature
    Unsupported {
        /// What is not supported
        feature: String,
    },
}

impl CodecError {
    /// Create an "unknown type" error.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        CodecError::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create a malformed varint error.
    pub fn malformed_varint(position: usize) -> Self {
        CodecError::MalformedVarint { position }
    }

    /// Create a truncated buffer error.
    pub fn truncated(requested: usize, available: usize, position: usize) -> Self {
        CodecError::TruncatedBuffer {
            requested,
            available,
            position,
        }
    }

    /// Create an unexpected wire type error.
    pub fn unexpected_wire_type(
        field_number: u32,
        wire_type: u8,
        expected: impl Into<String>,
    ) -> Self {
        CodecError::UnexpectedWireType {
            field_number,
            wire_type,
            expected: expected.into(),
        }
    }

    /// Create a field type mismatch error.
    pub fn type_mismatch(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        CodecError::FieldTypeMismatch {
            message: message.into(),
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an "unknown field" error.
    pub fn unknown_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        CodecError::UnknownField {
            message: message.into(),
            field: field.into(),
        }
    }

    /// Create an "unknown enum value" error.
    pub fn unknown_enum_value(enum_name: impl Into<String>, label: impl Into<String>) -> Self {
        CodecError::UnknownEnumValue {
            enum_name: enum_name.into(),
            label: label.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(field: impl Into<String>, position: usize) -> Self {
        CodecError::InvalidUtf8 {
            field: field.into(),
            position,
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CodecError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Whether this error came from malformed or truncated input bytes.
    pub fn is_wire_error(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedVarint { .. }
                | CodecError::TruncatedBuffer { .. }
                | CodecError::UnexpectedWireType { .. }
                | CodecError::InvalidUtf8 { .. }
                | CodecError::RecursionLimit { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::UnknownType { type_name } => vec![("type", type_name.clone())],
            CodecError::MalformedVarint { position } => {
                vec![("position", position.to_string())]
            }
            CodecError::TruncatedBuffer {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::UnexpectedWireType {
                field_number,
                wire_type,
                expected,
            } => vec![
                ("field_number", field_number.to_string()),
                ("wire_type", wire_type.to_string()),
                ("expected", expected.clone()),
            ],
            CodecError::FieldTypeMismatch {
                message,
                field,
                expected,
                actual,
            } => vec![
                ("message", message.clone()),
                ("field", field.clone()),
                ("expected", expected.clone()),
                ("actual", actual.clone()),
            ],
            CodecError::UnknownField { message, field } => {
                vec![("message", message.clone()), ("field", field.clone())]
            }
            CodecError::UnknownEnumValue { enum_name, label } => {
                vec![("enum", enum_name.clone()), ("label", label.clone())]
            }
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            CodecError::InvalidUtf8 { field, position } => {
                vec![("field", field.clone()), ("position", position.to_string())]
            }
            CodecError::RecursionLimit { limit } => vec![("limit", limit.to_string())],
            CodecError::Unsupported { feature } => vec![("feature", feature.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnknownType { type_name } => {
                write!(f, "Unknown type: '{type_name}'")
            }
            CodecError::MalformedVarint { position } => {
                write!(f, "Malformed varint at position {position}")
            }
            CodecError::TruncatedBuffer {
                requested,
                available,
                position,
            } => write!(
                f,
                "Truncated buffer: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            CodecError::UnexpectedWireType {
                field_number,
                wire_type,
                expected,
            } => write!(
                f,
                "Unexpected wire type {wire_type} for field {field_number}, expected {expected}"
            ),
            CodecError::FieldTypeMismatch {
                message,
                field,
                expected,
                actual,
            } => write!(
                f,
                "Type mismatch for field '{message}.{field}': expected {expected}, got {actual}"
            ),
            CodecError::UnknownField { message, field } => {
                write!(f, "Unknown field '{field}' in message '{message}'")
            }
            CodecError::UnknownEnumValue { enum_name, label } => {
                write!(f, "Unknown value '{label}' for enum '{enum_name}'")
            }
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => {
                write!(f, "Invalid schema '{schema_name}': {reason}")
            }
            CodecError::InvalidUtf8 { field, position } => {
                write!(f, "Invalid UTF-8 in string field '{field}' at position {position}")
            }
            CodecError::RecursionLimit { limit } => {
                write!(f, "Message nesting exceeds recursion limit of {limit}")
            }
            CodecError::Unsupported { feature } => {
                write!(f, "Unsupported feature: '{feature}'")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for protocodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Protocodec
//!
//! Schema-driven encoder and decoder for the protobuf binary wire format.
//!
//! Message types are described at runtime by a [`DescriptorPool`], built from
//! [`FileDef`] schema definitions (in code, JSON or TOML). Instances are
//! [`DynamicMessage`]s holding typed [`Value`]s, which encode to and decode
//! from bytes compatible with standard protobuf implementations.
//!
//! ## Architecture
//!
//! - `core/` - Error taxonomy and the field value type
//! - `schema/` - Schema definitions, descriptors and the descriptor pool
//! - `encoding/` - Varints, wire types, reader, writer and size calculator
//! - `message/` - Dynamic message instances
//!
//! ## Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use protocodec::{DescriptorPool, DynamicMessage, FieldDef, FileDef, MessageDef};
//!
//! let file = FileDef::new("demo").message(
//!     MessageDef::new("Point")
//!         .field(FieldDef::singular("x", 1, "int32"))
//!         .field(FieldDef::singular("y", 2, "int32")),
//! );
//! let pool = DescriptorPool::from_file(file)?;
//! let point_type = pool.resolve("demo.Point")?;
//!
//! let mut point = DynamicMessage::new(point_type.clone());
//! point.set("x", 3)?;
//! point.set("y", -4)?;
//!
//! let bytes = point.encode();
//! let decoded = DynamicMessage::decode(point_type, &bytes)?;
//! assert_eq!(decoded, point);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{CodecError, Result, Value};

// Wire format
pub mod encoding;

pub use encoding::{DecodeOptions, WireReader, WireType, WireWriter};

// Schema definitions and descriptors
pub mod schema;

pub use schema::{
    Cardinality, DescriptorPool, DescriptorPoolBuilder, EnumDef, EnumDescriptor, EnumValueDef,
    FieldDef, FieldDescriptor, FileDef, Kind, Label, MessageDef, MessageDescriptor,
};

// Dynamic messages
pub mod message;

pub use message::DynamicMessage;

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema model: definitions, descriptors and the descriptor pool.
//!
//! - [`FileDef`] and friends describe an already-compiled schema as data
//!   (buildable in code, or loaded from JSON/TOML)
//! - [`DescriptorPool`] resolves and validates them into an immutable tree
//! - [`MessageDescriptor`], [`FieldDescriptor`], [`EnumDescriptor`] are
//!   read-only views into the pool

pub mod def;
pub mod descriptor;
pub mod pool;

pub use def::{EnumDef, EnumValueDef, FieldDef, FileDef, Label, MessageDef};
pub use descriptor::{Cardinality, EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor};
pub use pool::{DescriptorPool, DescriptorPoolBuilder};

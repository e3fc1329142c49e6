// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout protocodec.
//!
//! - [`CodecError`] - Error taxonomy for schema, wire and field failures
//! - [`Value`] - Tagged field value representation

pub mod error;
pub mod value;

pub use error::{CodecError, Result};
pub use value::Value;

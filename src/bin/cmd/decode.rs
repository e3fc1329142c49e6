// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - decode a file against a schema definition.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use tracing::debug;

use crate::common::{load_schema, read_file, Result};
use protocodec::{DecodeOptions, DescriptorPool, DynamicMessage};

/// Decode a wire-format file with a JSON or TOML schema definition.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Schema definition file (.json or .toml)
    #[arg(short, long, value_name = "SCHEMA")]
    schema: PathBuf,

    /// Fully-qualified message type (e.g. tutorial.AddressBook)
    #[arg(short = 't', long = "type", value_name = "NAME")]
    type_name: String,

    /// Maximum nesting depth of messages
    #[arg(long, default_value_t = protocodec::encoding::DEFAULT_RECURSION_LIMIT)]
    recursion_limit: usize,

    /// Input file
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let pool = DescriptorPool::from_file(load_schema(&self.schema)?)?;
        debug!(messages = pool.messages().len(), "loaded schema");

        let descriptor = pool.resolve(&self.type_name)?;
        let data = read_file(&self.input)?;
        let options = DecodeOptions {
            recursion_limit: self.recursion_limit,
        };
        let message = DynamicMessage::decode_with_options(descriptor, &data, &options)
            .with_context(|| format!("Failed to decode {}", self.input.display()))?;

        println!("{message:#?}");
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - print raw wire entries without a schema.

use std::path::PathBuf;

use clap::Args;

use crate::common::{read_file, Result};
use protocodec::encoding::{RawValue, WireEntry};
use protocodec::WireReader;

/// Print the tagged entries of a wire-format file.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Input file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Descend into length-delimited payloads that parse as messages
    #[arg(short, long)]
    recursive: bool,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let data = read_file(&self.input)?;

        println!("=== {} ({} bytes) ===", self.input.display(), data.len());
        let entries = WireReader::new(&data).collect::<protocodec::Result<Vec<_>>>()?;
        print_entries(&entries, 0, self.recursive);
        println!();
        println!("Entries: {}", entries.len());
        Ok(())
    }
}

fn print_entries(entries: &[WireEntry<'_>], depth: usize, recursive: bool) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        println!(
            "{indent}[{:>6}] field {} ({}): {}",
            entry.position,
            entry.field_number,
            entry.wire_type,
            format_value(&entry.value)
        );
        if let (true, RawValue::LengthDelimited(payload)) = (recursive, entry.value) {
            if let Some(nested) = parse_nested(payload) {
                print_entries(&nested, depth + 1, recursive);
            }
        }
    }
}

/// Payload entries, if the payload is a complete non-empty message.
fn parse_nested(payload: &[u8]) -> Option<Vec<WireEntry<'_>>> {
    let entries = WireReader::new(payload).collect::<protocodec::Result<Vec<_>>>().ok()?;
    (!entries.is_empty()).then_some(entries)
}

fn format_value(value: &RawValue<'_>) -> String {
    match value {
        RawValue::Varint(v) => v.to_string(),
        RawValue::Fixed64(v) => format!("0x{v:016x}"),
        RawValue::Fixed32(v) => format!("0x{v:08x}"),
        RawValue::LengthDelimited(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) if !text.is_empty() && !text.chars().any(char::is_control) => {
                format!("{} bytes {:?}", bytes.len(), text)
            }
            _ => format!("{} bytes 0x{}", bytes.len(), hex::encode(bytes)),
        },
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use anyhow::Context as _;
use protocodec::{EnumDef, FieldDef, FileDef, MessageDef};
use tracing_subscriber::EnvFilter;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a second init in the same process is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read a whole input file.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write a whole output file, replacing any existing one.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a schema definition, picking the format from the file extension.
pub fn load_schema(path: &Path) -> Result<FileDef> {
    let parse: fn(&str) -> protocodec::Result<FileDef> =
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileDef::from_toml,
            Some("json") => FileDef::from_json,
            _ => anyhow::bail!(
                "Unsupported schema file {} (expected .json or .toml)",
                path.display()
            ),
        };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid schema {}", path.display()))
}

/// Schema of the sample address book.
pub fn address_book_schema() -> FileDef {
    FileDef::new("tutorial")
        .message(
            MessageDef::new("Person")
                .field(FieldDef::singular("name", 1, "string"))
                .field(FieldDef::singular("id", 2, "int32"))
                .field(FieldDef::singular("email", 3, "string"))
                .field(FieldDef::repeated("phones", 4, "PhoneNumber"))
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
        )
        .message(MessageDef::new("AddressBook").field(FieldDef::repeated("people", 1, "Person")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocodec::DescriptorPool;

    #[test]
    fn test_address_book_schema_builds() {
        let pool = DescriptorPool::from_file(address_book_schema()).unwrap();
        assert!(pool.resolve("tutorial.AddressBook").is_ok());
        assert!(pool.resolve_enum("tutorial.Person.PhoneType").is_ok());
    }

    #[test]
    fn test_load_schema_rejects_unknown_extension() {
        let err = load_schema(Path::new("schema.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported schema file"));
    }
}

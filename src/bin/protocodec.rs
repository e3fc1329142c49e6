// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Protocodec CLI
//!
//! Command-line tool for writing, reading and inspecting wire-format files.
//!
//! ## Usage
//!
//! ```sh
//! # Write the sample address book
//! protocodec addressbook write addressbook.bin
//!
//! # Read it back
//! protocodec addressbook read addressbook.bin
//!
//! # Dump raw wire entries without a schema
//! protocodec inspect addressbook.bin
//!
//! # Decode with a schema definition file
//! protocodec decode --schema addressbook.json --type tutorial.AddressBook addressbook.bin
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{AddressBookCmd, DecodeCmd, InspectCmd};
use common::Result;

/// Protocodec - protobuf wire format toolkit
///
/// Encode and decode messages against runtime schema definitions.
#[derive(Parser, Clone)]
#[command(name = "protocodec")]
#[command(about = "Schema-driven protobuf wire format toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Sample address book (write, read)
    #[command(subcommand)]
    Addressbook(AddressBookCmd),

    /// Print raw wire entries of a file
    Inspect(InspectCmd),

    /// Decode a file with a schema definition
    Decode(DecodeCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging();

    match cli.command {
        Commands::Addressbook(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Decode(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Addressbook command - write and read the sample address book.

use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::common::{address_book_schema, read_file, write_file, Result};
use protocodec::{DescriptorPool, DynamicMessage, Value};

/// Sample address book operations.
#[derive(Subcommand, Clone, Debug)]
pub enum AddressBookCmd {
    /// Encode the two-person sample address book to a file
    Write {
        /// Output file
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },

    /// Decode an address book file and print each person
    Read {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

impl AddressBookCmd {
    pub fn run(self) -> Result<()> {
        let pool = DescriptorPool::from_file(address_book_schema())?;
        match self {
            AddressBookCmd::Write { output } => cmd_write(&pool, output),
            AddressBookCmd::Read { input } => cmd_read(&pool, input),
        }
    }
}

/// Build the sample book: one person field by field, one by bulk assignment.
pub fn sample_book(pool: &DescriptorPool) -> Result<DynamicMessage> {
    let person_type = pool.resolve("tutorial.Person")?;
    let phone_type = pool.resolve("tutorial.Person.PhoneNumber")?;

    let mut john = DynamicMessage::new(person_type.clone());
    john.set("id", 1234)?;
    john.set("name", "John Doe")?;
    john.set("email", "jdoe@example.com")?;
    let mut home = DynamicMessage::new(phone_type.clone());
    home.set("number", "555-4321")?;
    home.set_enum_by_name("type", "HOME")?;
    john.push("phones", home)?;

    let mut work = DynamicMessage::new(phone_type);
    work.set("number", "777-4321")?;
    work.set_enum_by_name("type", "WORK")?;
    let mut jane = DynamicMessage::new(person_type);
    jane.assign([
        ("id", Value::from(5678)),
        ("name", Value::from("Jane Doe")),
        ("email", Value::from("jane@example.com")),
        ("phones", Value::List(vec![Value::Message(work)])),
    ])?;

    let mut book = DynamicMessage::new(pool.resolve("tutorial.AddressBook")?);
    book.push("people", john)?;
    book.push("people", jane)?;
    Ok(book)
}

/// Cmd: Write the sample address book
fn cmd_write(pool: &DescriptorPool, output: PathBuf) -> Result<()> {
    let book = sample_book(pool)?;
    let bytes = book.encode();
    write_file(&output, &bytes)?;

    info!(path = %output.display(), bytes = bytes.len(), "wrote address book");
    println!(
        "Wrote {} people ({} bytes) to {}",
        book.get("people")?.as_list().map_or(0, <[Value]>::len),
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Cmd: Read an address book and print each person
fn cmd_read(pool: &DescriptorPool, input: PathBuf) -> Result<()> {
    let data = read_file(&input)?;
    let book = DynamicMessage::decode(pool.resolve("tutorial.AddressBook")?, &data)?;

    let people = book.get("people")?;
    for person in people.as_list().unwrap_or_default() {
        if let Some(person) = person.as_message() {
            println!("{person:#?}");
        }
    }
    Ok(())
}

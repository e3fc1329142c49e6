// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use protocodec::{
    DescriptorPool, DynamicMessage, EnumDef, FieldDef, FileDef, MessageDef, MessageDescriptor,
    Value,
};

// ============================================================================
// Schemas
// ============================================================================

/// The address book schema: people with phone numbers and a phone type enum.
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

/// Build the address book pool.
pub fn address_book_pool() -> DescriptorPool {
    DescriptorPool::from_file(address_book_schema()).unwrap()
}

/// Resolve a message type in `pool`.
pub fn message_type(pool: &DescriptorPool, name: &str) -> MessageDescriptor {
    pool.resolve(name).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

/// A phone number with the given type label.
pub fn phone(pool: &DescriptorPool, number: &str, label: &str) -> DynamicMessage {
    let mut phone = DynamicMessage::new(message_type(pool, "tutorial.Person.PhoneNumber"));
    phone.set("number", number).unwrap();
    phone.set_enum_by_name("type", label).unwrap();
    phone
}

/// John Doe, built field by field.
pub fn john_doe(pool: &DescriptorPool) -> DynamicMessage {
    let mut person = DynamicMessage::new(message_type(pool, "tutorial.Person"));
    person.set("id", 1234).unwrap();
    person.set("name", "John Doe").unwrap();
    person.set("email", "jdoe@example.com").unwrap();
    person.push("phones", phone(pool, "555-4321", "HOME")).unwrap();
    person
}

/// Jane Doe, built by bulk assignment.
pub fn jane_doe(pool: &DescriptorPool) -> DynamicMessage {
    let mut person = DynamicMessage::new(message_type(pool, "tutorial.Person"));
    person
        .assign([
            ("id", Value::from(5678)),
            ("name", Value::from("Jane Doe")),
            ("email", Value::from("jane@example.com")),
            (
                "phones",
                Value::List(vec![Value::Message(phone(pool, "777-4321", "WORK"))]),
            ),
        ])
        .unwrap();
    person
}

/// An address book holding John and Jane.
pub fn sample_book(pool: &DescriptorPool) -> DynamicMessage {
    let mut book = DynamicMessage::new(message_type(pool, "tutorial.AddressBook"));
    book.push("people", john_doe(pool)).unwrap();
    book.push("people", jane_doe(pool)).unwrap();
    book
}

// ============================================================================
// Temporary files
// ============================================================================

/// Get a temporary directory for test files
pub fn temp_dir(prefix: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "protocodec_{}_{}_{}",
        prefix,
        std::process::id(),
        random
    ))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(prefix: &str, name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(prefix);
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Cleanup guard for test temporary files
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

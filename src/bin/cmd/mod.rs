// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod addressbook;
mod decode;
mod inspect;

pub use addressbook::AddressBookCmd;
pub use decode::DecodeCmd;
pub use inspect::InspectCmd;

// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Butler garage daemon.
//!
//! Holds the two durable sets the dispatcher depends on: the senders allowed
//! to operate the door and the provider message ids already acted upon.
//! Migrations are embedded and run on open; writes go through
//! `tokio-rusqlite`'s single background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteLedger;
pub use database::Database;
pub use models::*;

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the Savant assistant.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, typed CRUD operations for messages,
//! projects, and knowledge entries, plus a volatile in-memory backend with
//! identical query semantics.

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use memory::MemoryStorage;
pub use models::*;

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Taskpilot backend.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed CRUD operations for
//! tasks, conversations, messages, and tool invocation audit rows.
//!
//! Task rows carry no position column. Position is derived by callers from
//! the order `scan_tasks` returns rows in, which is SQLite rowid order.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod writer;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::*;

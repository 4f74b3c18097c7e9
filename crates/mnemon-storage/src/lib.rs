// SPDX-FileCopyrightText: 2026 Mnemon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable record store backends for the Mnemon memory pipeline.
//!
//! Two structurally different implementations of the
//! [`mnemon_core::RecordStore`] contract:
//!
//! - **SqliteRecordStore**: SQLite persistence via tokio-rusqlite
//! - **InMemoryRecordStore**: process-local map, used in tests and as the
//!   reference for backend interchangeability
//!
//! Both must behave identically; `tests/contract.rs` runs one suite
//! against each.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Position-addressed task store for the Taskpilot backend.
//!
//! Tasks are addressed by their 1-indexed rank in a fresh scan of the
//! owner's list rather than by id. See [`store::TaskStore`] for the
//! operations and the exact position rules.

pub mod store;

pub use store::{TaskStore, TaskUpdate};

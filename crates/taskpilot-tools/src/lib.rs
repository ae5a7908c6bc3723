// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, registry, and the built-in task tools.
//!
//! Tools are the model-facing surface of the task store: each built-in tool
//! parses the model's JSON arguments, calls into [`taskpilot_tasks`], and
//! returns a JSON result. Validation and not-found failures surface as
//! structured error outputs the model can read, never as crashes.

pub mod builtin;
pub mod tool;

pub use builtin::register_builtins;
pub use tool::{Tool, ToolOutput, ToolRegistry};

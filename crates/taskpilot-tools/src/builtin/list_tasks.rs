// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tool that lists a user's tasks with position numbers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taskpilot_core::TaskpilotError;
use taskpilot_tasks::TaskStore;

use crate::tool::{reportable, Tool, ToolOutput};

#[derive(Debug, Deserialize)]
struct ListTasksInput {
    user_id: String,
}

/// Lists the user's tasks, pending first, with their position numbers.
pub struct ListTasksTool {
    store: Arc<TaskStore>,
}

impl ListTasksTool {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListTasksTool {
    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "List all tasks for the user with position numbers"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
        let input: ListTasksInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::error(format!("invalid arguments: {e}"))),
        };

        match self.store.list_tasks(&input.user_id).await {
            Ok(listing) => Ok(ToolOutput::ok(&serde_json::json!({
                "success": true,
                "tasks": listing.tasks,
                "summary": listing.summary,
            }))),
            Err(e) => reportable(e),
        }
    }
}

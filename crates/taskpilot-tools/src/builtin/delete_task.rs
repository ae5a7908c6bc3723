// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tool that permanently deletes a task by position.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taskpilot_core::TaskpilotError;
use taskpilot_tasks::TaskStore;

use crate::tool::{reportable, Tool, ToolOutput};

#[derive(Debug, Deserialize)]
struct DeleteTaskInput {
    user_id: String,
    task_position: u32,
}

/// Deletes a task by position number. Positions after the deleted task
/// shift down by one, which is why multi-delete turns must run in
/// descending position order.
pub struct DeleteTaskTool {
    store: Arc<TaskStore>,
}

impl DeleteTaskTool {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for DeleteTaskTool {
    fn name(&self) -> &str {
        "delete_task"
    }

    fn description(&self) -> &str {
        "Delete a task by its position number in the user's task list"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_position": {
                    "type": "integer",
                    "description": "Position of the task in the user's task list (1-indexed)"
                }
            },
            "required": ["task_position"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
        let input: DeleteTaskInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::error(format!("invalid arguments: {e}"))),
        };

        match self
            .store
            .delete_task(&input.user_id, input.task_position)
            .await
        {
            Ok(task) => Ok(ToolOutput::ok(&serde_json::json!({
                "success": true,
                "deleted": task,
            }))),
            Err(e) => reportable(e),
        }
    }
}

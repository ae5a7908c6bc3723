// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tool that marks a task complete or incomplete.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taskpilot_core::TaskpilotError;
use taskpilot_tasks::TaskStore;

use crate::tool::{reportable, Tool, ToolOutput};

fn default_completed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CompleteTaskInput {
    user_id: String,
    task_position: u32,
    #[serde(default = "default_completed")]
    completed: bool,
}

/// Sets the completion flag of a task by position number.
pub struct CompleteTaskTool {
    store: Arc<TaskStore>,
}

impl CompleteTaskTool {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CompleteTaskTool {
    fn name(&self) -> &str {
        "complete_task"
    }

    fn description(&self) -> &str {
        "Mark a task as complete or incomplete by its position number in the user's task list"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_position": {
                    "type": "integer",
                    "description": "Position of the task in the user's task list (1-indexed)"
                },
                "completed": {
                    "type": "boolean",
                    "description": "Whether the task is completed (default true)"
                }
            },
            "required": ["task_position"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
        let input: CompleteTaskInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::error(format!("invalid arguments: {e}"))),
        };

        match self
            .store
            .set_completion(&input.user_id, input.task_position, input.completed)
            .await
        {
            Ok(task) => Ok(ToolOutput::ok(&serde_json::json!({
                "success": true,
                "task": task,
            }))),
            Err(e) => reportable(e),
        }
    }
}

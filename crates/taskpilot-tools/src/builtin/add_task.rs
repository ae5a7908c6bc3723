// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tool that creates a task.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taskpilot_core::TaskpilotError;
use taskpilot_tasks::TaskStore;

use crate::tool::{reportable, Tool, ToolOutput};

#[derive(Debug, Deserialize)]
struct AddTaskInput {
    user_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// Adds a new task to the user's todo list.
pub struct AddTaskTool {
    store: Arc<TaskStore>,
}

impl AddTaskTool {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AddTaskTool {
    fn name(&self) -> &str {
        "add_task"
    }

    fn description(&self) -> &str {
        "Add a new task to the user's todo list"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Task title" },
                "description": { "type": "string", "description": "Task description" }
            },
            "required": ["title"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
        let input: AddTaskInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::error(format!("invalid arguments: {e}"))),
        };

        match self
            .store
            .add_task(&input.user_id, &input.title, input.description.as_deref())
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

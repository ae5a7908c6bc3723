// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tool that updates a task addressed by position.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use taskpilot_core::TaskpilotError;
use taskpilot_tasks::{TaskStore, TaskUpdate};

use crate::tool::{reportable, Tool, ToolOutput};

#[derive(Debug, Deserialize)]
struct UpdateTaskInput {
    user_id: String,
    task_position: u32,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Updates the title and/or description of a task by position number.
pub struct UpdateTaskTool {
    store: Arc<TaskStore>,
}

impl UpdateTaskTool {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for UpdateTaskTool {
    fn name(&self) -> &str {
        "update_task"
    }

    fn description(&self) -> &str {
        "Update an existing task by its position number in the user's task list"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_position": {
                    "type": "integer",
                    "description": "Position of the task in the user's task list (1-indexed)"
                },
                "title": { "type": "string", "description": "New title (optional)" },
                "description": { "type": "string", "description": "New description (optional)" }
            },
            "required": ["task_position"]
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
        let input: UpdateTaskInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::error(format!("invalid arguments: {e}"))),
        };

        let update = TaskUpdate {
            title: input.title,
            description: input.description,
        };
        match self
            .store
            .update_task(&input.user_id, input.task_position, update)
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

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_config::model::StorageConfig;
    use taskpilot_core::StorageAdapter;
    use taskpilot_storage::SqliteStorage;
    use tempfile::tempdir;

    async fn setup_store() -> (Arc<TaskStore>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tools.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        });
        storage.initialize().await.unwrap();
        (Arc::new(TaskStore::new(Arc::new(storage))), dir)
    }

    #[tokio::test]
    async fn updates_title_by_position() {
        let (store, _dir) = setup_store().await;
        store.add_task("u1", "buy milk", None).await.unwrap();

        let tool = UpdateTaskTool::new(store);
        let output = tool
            .invoke(serde_json::json!({
                "user_id": "u1",
                "task_position": 1,
                "title": "buy oat milk"
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        let value: serde_json::Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(value["task"]["title"], "buy oat milk");
    }

    #[tokio::test]
    async fn no_fields_becomes_structured_error() {
        let (store, _dir) = setup_store().await;
        store.add_task("u1", "buy milk", None).await.unwrap();

        let tool = UpdateTaskTool::new(store);
        let output = tool
            .invoke(serde_json::json!({ "user_id": "u1", "task_position": 1 }))
            .await
            .unwrap();
        assert!(output.is_error);
    }

    #[tokio::test]
    async fn unknown_position_becomes_structured_error() {
        let (store, _dir) = setup_store().await;

        let tool = UpdateTaskTool::new(store);
        let output = tool
            .invoke(serde_json::json!({
                "user_id": "u1",
                "task_position": 9,
                "title": "anything"
            }))
            .await
            .unwrap();
        assert!(output.is_error);
    }
}

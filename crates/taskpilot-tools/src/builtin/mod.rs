// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in task tools exposed to the model.
//!
//! These five tools are the complete tool surface of the backend. Position
//! arguments are 1-indexed ranks in the owner's task list; the orchestrator
//! injects the authenticated `user_id` into every invocation.

pub mod add_task;
pub mod complete_task;
pub mod delete_task;
pub mod list_tasks;
pub mod update_task;

pub use add_task::AddTaskTool;
pub use complete_task::CompleteTaskTool;
pub use delete_task::DeleteTaskTool;
pub use list_tasks::ListTasksTool;
pub use update_task::UpdateTaskTool;

use std::sync::Arc;

use taskpilot_tasks::TaskStore;

use crate::ToolRegistry;

/// Registers the five task tools into the given registry.
pub fn register_builtins(registry: &mut ToolRegistry, store: Arc<TaskStore>) {
    registry.register(Arc::new(AddTaskTool::new(store.clone())));
    registry.register(Arc::new(ListTasksTool::new(store.clone())));
    registry.register(Arc::new(UpdateTaskTool::new(store.clone())));
    registry.register(Arc::new(CompleteTaskTool::new(store.clone())));
    registry.register(Arc::new(DeleteTaskTool::new(store)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_config::model::StorageConfig;
    use taskpilot_core::StorageAdapter;
    use taskpilot_storage::SqliteStorage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn register_builtins_registers_exactly_5_tools() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("builtins.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        });
        storage.initialize().await.unwrap();
        let store = Arc::new(TaskStore::new(Arc::new(storage)));

        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, store);

        assert_eq!(registry.len(), 5);
        for name in [
            "add_task",
            "list_tasks",
            "update_task",
            "complete_task",
            "delete_task",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {name}");
        }
        drop(dir);
    }
}

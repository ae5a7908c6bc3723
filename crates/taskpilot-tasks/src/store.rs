// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Position-addressed CRUD over the storage adapter.
//!
//! A task's position is its 1-indexed rank in a fresh scan of the owner's
//! tasks in insertion order. Positions are never stored; every operation
//! recomputes them from scratch, so deleting a task shifts every later
//! position down by one as a natural consequence of the scan rule.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use taskpilot_core::types::{Task, TaskItem, TaskListing, TaskSummary};
use taskpilot_core::{StorageAdapter, TaskpilotError};

/// Fields accepted by [`TaskStore::update_task`]. At least one must be set.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// The task store: position-addressed operations on a user's task list.
pub struct TaskStore {
    storage: Arc<dyn StorageAdapter>,
}

impl TaskStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Create a task. The title is trimmed; an empty result is a
    /// validation error. Returns the task tagged with its position.
    pub async fn add_task(
        &self,
        user_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<TaskItem, TaskpilotError> {
        validate_user(user_id)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskpilotError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let now = now_rfc3339();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            completed: false,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.insert_task(&task).await?;

        // A fresh scan always places the new row last.
        let position = self.storage.scan_tasks(user_id).await?.len() as u32;
        debug!(user_id, position, "task added");
        Ok(TaskItem::from_task(position, &task))
    }

    /// List a user's tasks: pending first, then completed, each keeping
    /// the position it held in the scan. Display order can therefore be
    /// non-monotonic in position.
    pub async fn list_tasks(&self, user_id: &str) -> Result<TaskListing, TaskpilotError> {
        validate_user(user_id)?;
        let tasks = self.storage.scan_tasks(user_id).await?;

        let items: Vec<TaskItem> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| TaskItem::from_task(i as u32 + 1, task))
            .collect();

        let completed = items.iter().filter(|t| t.completed).count() as u32;
        let summary = TaskSummary {
            total: items.len() as u32,
            pending: items.len() as u32 - completed,
            completed,
        };

        let (pending, done): (Vec<TaskItem>, Vec<TaskItem>) =
            items.into_iter().partition(|t| !t.completed);
        let mut tasks = pending;
        tasks.extend(done);

        Ok(TaskListing { tasks, summary })
    }

    /// Fetch the task at a 1-indexed position. Positions outside
    /// `1..=len`, including 0 and anything on an empty list, are
    /// not-found errors.
    pub async fn get_by_position(
        &self,
        user_id: &str,
        position: u32,
    ) -> Result<Task, TaskpilotError> {
        validate_user(user_id)?;
        let tasks = self.storage.scan_tasks(user_id).await?;
        let index = position_index(position, tasks.len())?;
        Ok(tasks[index].clone())
    }

    /// Update the task at a position. At least one field of `update` must
    /// be set; a provided title must be non-empty after trimming.
    pub async fn update_task(
        &self,
        user_id: &str,
        position: u32,
        update: TaskUpdate,
    ) -> Result<TaskItem, TaskpilotError> {
        validate_user(user_id)?;
        if update.is_empty() {
            return Err(TaskpilotError::Validation(
                "provide at least one field to update".to_string(),
            ));
        }

        let mut task = self.get_by_position(user_id, position).await?;
        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(TaskpilotError::Validation(
                    "task title must not be empty".to_string(),
                ));
            }
            task.title = title.to_string();
        }
        if let Some(description) = update.description {
            let description = description.trim();
            task.description = if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            };
        }
        task.updated_at = now_rfc3339();
        self.storage.update_task(&task).await?;
        debug!(user_id, position, "task updated");
        Ok(TaskItem::from_task(position, &task))
    }

    /// Set the completion flag of the task at a position. Idempotent;
    /// `updated_at` is refreshed even when the flag does not change.
    pub async fn set_completion(
        &self,
        user_id: &str,
        position: u32,
        completed: bool,
    ) -> Result<TaskItem, TaskpilotError> {
        validate_user(user_id)?;
        let mut task = self.get_by_position(user_id, position).await?;
        task.completed = completed;
        task.updated_at = now_rfc3339();
        self.storage.update_task(&task).await?;
        debug!(user_id, position, completed, "task completion set");
        Ok(TaskItem::from_task(position, &task))
    }

    /// Permanently delete the task at a position and return it. Every
    /// later task's position shifts down by one.
    pub async fn delete_task(
        &self,
        user_id: &str,
        position: u32,
    ) -> Result<TaskItem, TaskpilotError> {
        validate_user(user_id)?;
        let task = self.get_by_position(user_id, position).await?;
        self.storage.delete_task(&task.id).await?;
        debug!(user_id, position, "task deleted");
        Ok(TaskItem::from_task(position, &task))
    }
}

fn validate_user(user_id: &str) -> Result<(), TaskpilotError> {
    if user_id.trim().is_empty() {
        return Err(TaskpilotError::Validation(
            "user id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn position_index(position: u32, len: usize) -> Result<usize, TaskpilotError> {
    if position < 1 || position as usize > len {
        return Err(TaskpilotError::NotFound(format!(
            "no task at position {position}"
        )));
    }
    Ok(position as usize - 1)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

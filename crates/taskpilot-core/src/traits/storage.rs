// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::TaskpilotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatMessage, Conversation, Task, ToolInvocation};

/// Adapter for storage and persistence backends.
///
/// Storage adapters manage the lifecycle of database connections and
/// provide the row-level operations the task store and orchestrator
/// are built on. Task ordering is the backend's insertion order;
/// callers derive positions from it and never persist them.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection pool, etc.).
    async fn initialize(&self) -> Result<(), TaskpilotError>;

    /// Closes the storage backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), TaskpilotError>;

    // --- Task operations ---

    /// Inserts a new task row.
    async fn insert_task(&self, task: &Task) -> Result<(), TaskpilotError>;

    /// Returns all tasks owned by the user, in insertion order.
    async fn scan_tasks(&self, user_id: &str) -> Result<Vec<Task>, TaskpilotError>;

    /// Rewrites a task row identified by `task.id`.
    async fn update_task(&self, task: &Task) -> Result<(), TaskpilotError>;

    /// Permanently removes a task row by id.
    async fn delete_task(&self, task_id: &str) -> Result<(), TaskpilotError>;

    // --- Conversation operations ---

    /// Creates a conversation row.
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), TaskpilotError>;

    /// Fetches a conversation by id, scoped to its owner.
    async fn find_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, TaskpilotError>;

    /// Lists a user's conversations, newest first.
    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<Conversation>, TaskpilotError>;

    /// Bumps a conversation's updated_at timestamp.
    async fn touch_conversation(&self, conversation_id: &str)
        -> Result<(), TaskpilotError>;

    // --- Message operations ---

    /// Persists a chat message.
    async fn insert_message(&self, message: &ChatMessage) -> Result<(), TaskpilotError>;

    /// Returns a conversation's messages ordered by timestamp.
    async fn list_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ChatMessage>, TaskpilotError>;

    // --- Tool invocation audit ---

    /// Records a tool invocation audit row.
    async fn record_invocation(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<(), TaskpilotError>;

    /// Returns a conversation's tool invocations in recorded order.
    async fn list_invocations(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ToolInvocation>, TaskpilotError>;
}

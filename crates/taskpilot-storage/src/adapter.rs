// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use taskpilot_config::model::StorageConfig;
use taskpilot_core::types::{ChatMessage, Conversation, Task, ToolInvocation};
use taskpilot_core::{
    AdapterType, HealthStatus, PluginAdapter, StorageAdapter, TaskpilotError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, TaskpilotError> {
        self.db.get().ok_or_else(|| TaskpilotError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskpilotError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TaskpilotError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TaskpilotError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| TaskpilotError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TaskpilotError> {
        let db = self.db()?;
        // Checkpoint WAL before close.
        db.connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Task operations ---

    async fn insert_task(&self, task: &Task) -> Result<(), TaskpilotError> {
        queries::tasks::insert_task(self.db()?, task).await
    }

    async fn scan_tasks(&self, user_id: &str) -> Result<Vec<Task>, TaskpilotError> {
        queries::tasks::scan_tasks(self.db()?, user_id).await
    }

    async fn update_task(&self, task: &Task) -> Result<(), TaskpilotError> {
        queries::tasks::update_task(self.db()?, task).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), TaskpilotError> {
        queries::tasks::delete_task(self.db()?, task_id).await
    }

    // --- Conversation operations ---

    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), TaskpilotError> {
        queries::conversations::create_conversation(self.db()?, conversation).await
    }

    async fn find_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, TaskpilotError> {
        queries::conversations::find_conversation(self.db()?, conversation_id, user_id).await
    }

    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<Conversation>, TaskpilotError> {
        queries::conversations::list_conversations(self.db()?, user_id).await
    }

    async fn touch_conversation(&self, conversation_id: &str) -> Result<(), TaskpilotError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        queries::conversations::touch_conversation(self.db()?, conversation_id, &now).await
    }

    // --- Message operations ---

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), TaskpilotError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn list_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ChatMessage>, TaskpilotError> {
        queries::messages::list_messages(self.db()?, conversation_id).await
    }

    // --- Tool invocation audit ---

    async fn record_invocation(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<(), TaskpilotError> {
        queries::invocations::record_invocation(self.db()?, invocation).await
    }

    async fn list_invocations(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<ToolInvocation>, TaskpilotError> {
        queries::invocations::list_invocations(self.db()?, conversation_id).await
    }
}

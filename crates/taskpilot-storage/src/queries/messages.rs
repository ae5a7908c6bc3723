// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message row operations.

use rusqlite::params;
use taskpilot_core::TaskpilotError;

use crate::database::Database;
use crate::models::ChatMessage;

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<ChatMessage, rusqlite::Error> {
    Ok(ChatMessage {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        user_id: row.get(2)?,
        role: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Insert a new message row.
pub async fn insert_message(db: &Database, message: &ChatMessage) -> Result<(), TaskpilotError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, conversation_id, user_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.id,
                    message.conversation_id,
                    message.user_id,
                    message.role,
                    message.content,
                    message.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a conversation's messages in chronological order.
pub async fn list_messages(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<ChatMessage>, TaskpilotError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, user_id, role, content, created_at
                 FROM messages WHERE conversation_id = ?1 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Conversation;
    use crate::queries::conversations::create_conversation;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let conv = Conversation {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        create_conversation(&db, &conv).await.unwrap();
        (db, dir)
    }

    fn make_message(id: &str, role: &str, content: &str, ts: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            conversation_id: "c1".to_string(),
            user_id: "u1".to_string(),
            role: role.to_string(),
            content: content.to_string(),
            created_at: ts.to_string(),
        }
    }

    #[tokio::test]
    async fn list_returns_chronological_order() {
        let (db, _dir) = setup_db().await;

        // Inserted out of order to exercise the ORDER BY.
        insert_message(&db, &make_message("m2", "assistant", "sure", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();
        insert_message(&db, &make_message("m1", "user", "add a task", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let messages = list_messages(&db, "c1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "m1");
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].id, "m2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_scoped_to_conversation() {
        let (db, _dir) = setup_db().await;

        insert_message(&db, &make_message("m1", "user", "hello", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let messages = list_messages(&db, "other").await.unwrap();
        assert!(messages.is_empty());

        db.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation row operations.

use rusqlite::params;
use taskpilot_core::TaskpilotError;

use crate::database::Database;
use crate::models::Conversation;

fn row_to_conversation(row: &rusqlite::Row<'_>) -> Result<Conversation, rusqlite::Error> {
    Ok(Conversation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Insert a new conversation row.
pub async fn create_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), TaskpilotError> {
    let conversation = conversation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    conversation.id,
                    conversation.user_id,
                    conversation.created_at,
                    conversation.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a conversation by id, scoped to its owner.
///
/// Returns `None` both when the id does not exist and when it belongs to a
/// different user; callers cannot distinguish the two cases.
pub async fn find_conversation(
    db: &Database,
    conversation_id: &str,
    user_id: &str,
) -> Result<Option<Conversation>, TaskpilotError> {
    let conversation_id = conversation_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, created_at, updated_at
                 FROM conversations WHERE id = ?1 AND user_id = ?2",
            )?;
            match stmt.query_row(params![conversation_id, user_id], row_to_conversation) {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all conversations for a user, most recently updated first.
pub async fn list_conversations(
    db: &Database,
    user_id: &str,
) -> Result<Vec<Conversation>, TaskpilotError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, created_at, updated_at
                 FROM conversations WHERE user_id = ?1 ORDER BY updated_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id], row_to_conversation)?;
            let mut conversations = Vec::new();
            for row in rows {
                conversations.push(row?);
            }
            Ok(conversations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Bump a conversation's `updated_at` timestamp.
pub async fn touch_conversation(
    db: &Database,
    conversation_id: &str,
    updated_at: &str,
) -> Result<(), TaskpilotError> {
    let conversation_id = conversation_id.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                params![updated_at, conversation_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

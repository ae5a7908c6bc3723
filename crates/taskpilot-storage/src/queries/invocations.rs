// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool invocation audit rows.

use rusqlite::params;
use taskpilot_core::TaskpilotError;

use crate::database::Database;
use crate::models::ToolInvocation;

fn row_to_invocation(row: &rusqlite::Row<'_>) -> Result<ToolInvocation, rusqlite::Error> {
    Ok(ToolInvocation {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        user_id: row.get(2)?,
        tool_name: row.get(3)?,
        arguments: row.get(4)?,
        result: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Record one tool execution for audit purposes.
pub async fn record_invocation(
    db: &Database,
    invocation: &ToolInvocation,
) -> Result<(), TaskpilotError> {
    let invocation = invocation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tool_invocations
                 (id, conversation_id, user_id, tool_name, arguments, result, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    invocation.id,
                    invocation.conversation_id,
                    invocation.user_id,
                    invocation.tool_name,
                    invocation.arguments,
                    invocation.result,
                    invocation.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a conversation's tool invocations in recording order.
pub async fn list_invocations(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<ToolInvocation>, TaskpilotError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, user_id, tool_name, arguments, result, created_at
                 FROM tool_invocations WHERE conversation_id = ?1 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], row_to_invocation)?;
            let mut invocations = Vec::new();
            for row in rows {
                invocations.push(row?);
            }
            Ok(invocations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD operations.
//!
//! The scan query deliberately carries no ORDER BY clause: SQLite returns
//! rows of a single-table scan in rowid order, and that insertion order is
//! the source of truth for task positions. Adding an ORDER BY here would
//! change position semantics across the whole system.

use rusqlite::params;
use taskpilot_core::TaskpilotError;

use crate::database::Database;
use crate::models::Task;

fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Insert a new task row.
pub async fn insert_task(db: &Database, task: &Task) -> Result<(), TaskpilotError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, user_id, title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    task.id,
                    task.user_id,
                    task.title,
                    task.description,
                    task.completed as i64,
                    task.created_at,
                    task.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return all tasks owned by the user, in insertion (rowid) order.
pub async fn scan_tasks(db: &Database, user_id: &str) -> Result<Vec<Task>, TaskpilotError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE user_id = ?1",
            )?;
            let rows = stmt.query_map(params![user_id], row_to_task)?;
            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rewrite the mutable columns of a task row identified by `task.id`.
pub async fn update_task(db: &Database, task: &Task) -> Result<(), TaskpilotError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tasks SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    task.title,
                    task.description,
                    task.completed as i64,
                    task.updated_at,
                    task.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Permanently remove a task row by id.
pub async fn delete_task(db: &Database, task_id: &str) -> Result<(), TaskpilotError> {
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_task(id: &str, user: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            user_id: user.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_scan_preserves_insertion_order() {
        let (db, _dir) = setup_db().await;

        for (id, title) in [("t1", "first"), ("t2", "second"), ("t3", "third")] {
            insert_task(&db, &make_task(id, "u1", title)).await.unwrap();
        }

        let tasks = scan_tasks(&db, "u1").await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].title, "first");
        assert_eq!(tasks[1].title, "second");
        assert_eq!(tasks[2].title, "third");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn scan_is_scoped_to_owner() {
        let (db, _dir) = setup_db().await;

        insert_task(&db, &make_task("a1", "alice", "hers")).await.unwrap();
        insert_task(&db, &make_task("b1", "bob", "his")).await.unwrap();

        let alice = scan_tasks(&db, "alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, "a1");

        let nobody = scan_tasks(&db, "carol").await.unwrap();
        assert!(nobody.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_shifts_scan_order_not_row_content() {
        let (db, _dir) = setup_db().await;

        for (id, title) in [("t1", "first"), ("t2", "second"), ("t3", "third")] {
            insert_task(&db, &make_task(id, "u1", title)).await.unwrap();
        }

        delete_task(&db, "t2").await.unwrap();

        let tasks = scan_tasks(&db, "u1").await.unwrap();
        assert_eq!(tasks.len(), 2);
        // Remaining rows keep insertion order; "third" moved up one rank.
        assert_eq!(tasks[0].title, "first");
        assert_eq!(tasks[1].title, "third");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_rewrites_mutable_columns() {
        let (db, _dir) = setup_db().await;

        insert_task(&db, &make_task("t1", "u1", "old title")).await.unwrap();

        let mut task = scan_tasks(&db, "u1").await.unwrap().remove(0);
        task.title = "new title".to_string();
        task.description = Some("with details".to_string());
        task.completed = true;
        task.updated_at = "2026-01-02T00:00:00.000Z".to_string();
        update_task(&db, &task).await.unwrap();

        let tasks = scan_tasks(&db, "u1").await.unwrap();
        assert_eq!(tasks[0].title, "new title");
        assert_eq!(tasks[0].description.as_deref(), Some("with details"));
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].updated_at, "2026-01-02T00:00:00.000Z");
        // created_at is untouched by updates.
        assert_eq!(tasks[0].created_at, "2026-01-01T00:00:00.000Z");

        db.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use rusqlite::{Row, params};
use uuid::Uuid;

use savant_core::SavantError;

use crate::database::Database;
use crate::models::Message;
use crate::queries::{opt_uuid_from_sql, ts_from_sql, ts_to_sql, uuid_from_sql};

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: uuid_from_sql(0, row.get(0)?)?,
        content: row.get(1)?,
        user_id: row.get(2)?,
        chat_id: row.get(3)?,
        created_at: ts_from_sql(4, row.get(4)?)?,
        processed: row.get(5)?,
        project_id: opt_uuid_from_sql(6, row.get(6)?)?,
    })
}

const MESSAGE_COLUMNS: &str = "id, content, user_id, chat_id, created_at, processed, project_id";

/// Insert a message, replacing any existing row with the same id.
pub async fn save_message(db: &Database, msg: &Message) -> Result<(), SavantError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, content, user_id, chat_id, created_at, processed, project_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                     content = excluded.content,
                     user_id = excluded.user_id,
                     chat_id = excluded.chat_id,
                     created_at = excluded.created_at,
                     processed = excluded.processed,
                     project_id = excluded.project_id",
                params![
                    msg.id.to_string(),
                    msg.content,
                    msg.user_id,
                    msg.chat_id,
                    ts_to_sql(&msg.created_at),
                    msg.processed,
                    msg.project_id.map(|id| id.to_string()),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a message by id.
pub async fn get_message(db: &Database, id: Uuid) -> Result<Option<Message>, SavantError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id.to_string()], message_from_row)?;
            rows.next().transpose().map_err(Into::into)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Messages still awaiting processing, oldest first.
pub async fn list_unprocessed(db: &Database, limit: u32) -> Result<Vec<Message>, SavantError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE processed = 0
                 ORDER BY created_at ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a message processed, optionally linking it to a project.
///
/// Idempotent; an already-set `project_id` is never overwritten.
pub async fn mark_processed(
    db: &Database,
    id: Uuid,
    project_id: Option<Uuid>,
) -> Result<(), SavantError> {
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE messages SET processed = 1,
                 project_id = COALESCE(project_id, ?2)
                 WHERE id = ?1",
                params![id.to_string(), project_id.map(|p| p.to_string())],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if changed == 0 {
        return Err(SavantError::not_found("message", id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::queries::projects::save_project;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_msg(content: &str) -> Message {
        Message::new(content, "user-1", "chat-1")
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let (db, _dir) = setup_db().await;
        let msg = make_msg("hello");
        save_message(&db, &msg).await.unwrap();

        let fetched = get_message(&db, msg.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, msg.id);
        assert_eq!(fetched.content, "hello");
        assert_eq!(fetched.user_id, "user-1");
        assert!(!fetched.processed);
        assert!(fetched.project_id.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn resave_same_id_is_idempotent() {
        let (db, _dir) = setup_db().await;
        let mut msg = make_msg("first");
        save_message(&db, &msg).await.unwrap();

        msg.content = "second".to_string();
        save_message(&db, &msg).await.unwrap();

        let fetched = get_message(&db, msg.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "second");
        assert_eq!(list_unprocessed(&db, 10).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_message_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_message(&db, Uuid::new_v4()).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_unprocessed_oldest_first_and_limited() {
        let (db, _dir) = setup_db().await;

        let base = Utc::now();
        let mut ids = Vec::new();
        for i in 0..4 {
            let mut msg = make_msg(&format!("msg {i}"));
            msg.created_at = base + Duration::seconds(i);
            ids.push(msg.id);
            save_message(&db, &msg).await.unwrap();
        }

        // Processing the oldest removes it from the pending list.
        mark_processed(&db, ids[0], None).await.unwrap();

        let pending = list_unprocessed(&db, 2).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, ids[1]);
        assert_eq!(pending[1].id, ids[2]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_processed_is_idempotent() {
        let (db, _dir) = setup_db().await;
        let msg = make_msg("once");
        save_message(&db, &msg).await.unwrap();

        mark_processed(&db, msg.id, None).await.unwrap();
        mark_processed(&db, msg.id, None).await.unwrap();

        let fetched = get_message(&db, msg.id).await.unwrap().unwrap();
        assert!(fetched.processed);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_processed_never_overwrites_project_link() {
        let (db, _dir) = setup_db().await;
        let first = Project::new("First", "first project").unwrap();
        let second = Project::new("Second", "second project").unwrap();
        save_project(&db, &first).await.unwrap();
        save_project(&db, &second).await.unwrap();

        let msg = make_msg("linked");
        save_message(&db, &msg).await.unwrap();

        mark_processed(&db, msg.id, Some(first.id)).await.unwrap();
        mark_processed(&db, msg.id, Some(second.id)).await.unwrap();

        let fetched = get_message(&db, msg.id).await.unwrap().unwrap();
        assert_eq!(fetched.project_id, Some(first.id));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_processed_unknown_message_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = mark_processed(&db, Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, SavantError::NotFound { .. }));
        db.close().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge entry operations. Entries are insert-only.

use rusqlite::{Row, params};
use uuid::Uuid;

use savant_core::SavantError;

use crate::database::Database;
use crate::models::KnowledgeEntry;
use crate::queries::{like_pattern, opt_uuid_from_sql, tags_from_sql, ts_from_sql, ts_to_sql, uuid_from_sql};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<KnowledgeEntry> {
    Ok(KnowledgeEntry {
        id: uuid_from_sql(0, row.get(0)?)?,
        content: row.get(1)?,
        tags: tags_from_sql(2, row.get(2)?)?,
        source_message_id: uuid_from_sql(3, row.get(3)?)?,
        project_id: opt_uuid_from_sql(4, row.get(4)?)?,
        created_at: ts_from_sql(5, row.get(5)?)?,
    })
}

const ENTRY_COLUMNS: &str = "id, content, tags, source_message_id, project_id, created_at";

/// Insert a knowledge entry, replacing any existing row with the same id.
pub async fn save_entry(db: &Database, entry: &KnowledgeEntry) -> Result<(), SavantError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            let tags = serde_json::to_string(&entry.tags)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            conn.execute(
                "INSERT INTO knowledge_entries (id, content, tags, source_message_id, project_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     content = excluded.content,
                     tags = excluded.tags,
                     source_message_id = excluded.source_message_id,
                     project_id = excluded.project_id,
                     created_at = excluded.created_at",
                params![
                    entry.id.to_string(),
                    entry.content,
                    tags,
                    entry.source_message_id.to_string(),
                    entry.project_id.map(|id| id.to_string()),
                    ts_to_sql(&entry.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a knowledge entry by id.
pub async fn get_entry(db: &Database, id: Uuid) -> Result<Option<KnowledgeEntry>, SavantError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM knowledge_entries WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id.to_string()], entry_from_row)?;
            rows.next().transpose().map_err(Into::into)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All entries linked to a project, most recent first.
pub async fn list_entries_for_project(
    db: &Database,
    project_id: Uuid,
) -> Result<Vec<KnowledgeEntry>, SavantError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM knowledge_entries WHERE project_id = ?1
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![project_id.to_string()], entry_from_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Free-text search over entry content and tags, most recent first.
pub async fn search_entries(
    db: &Database,
    query: &str,
    limit: u32,
) -> Result<Vec<KnowledgeEntry>, SavantError> {
    let pattern = like_pattern(query);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM knowledge_entries
                 WHERE content LIKE ?1 OR tags LIKE ?1
                 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![pattern, limit], entry_from_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, Project};
    use crate::queries::{messages::save_message, projects::save_project};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, Message, Project, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let msg = Message::new("source message", "user-1", "chat-1");
        save_message(&db, &msg).await.unwrap();
        let project = Project::new("Auth System", "JWT work").unwrap();
        save_project(&db, &project).await.unwrap();

        (db, msg, project, dir)
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let (db, msg, project, _dir) = setup_db().await;

        let entry = KnowledgeEntry::new(
            "Use RS256 for signing",
            vec!["JWT".to_string(), "security".to_string()],
            msg.id,
            Some(project.id),
        );
        save_entry(&db, &entry).await.unwrap();

        let fetched = get_entry(&db, entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "Use RS256 for signing");
        assert_eq!(fetched.tags, vec!["jwt", "security"]);
        assert_eq!(fetched.source_message_id, msg.id);
        assert_eq!(fetched.project_id, Some(project.id));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn resave_same_id_is_idempotent() {
        let (db, msg, project, _dir) = setup_db().await;

        let entry = KnowledgeEntry::new("first take", vec![], msg.id, Some(project.id));
        save_entry(&db, &entry).await.unwrap();
        save_entry(&db, &entry).await.unwrap();

        let entries = list_entries_for_project(&db, project.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "first take");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_for_project_most_recent_first() {
        let (db, msg, project, _dir) = setup_db().await;

        let base = Utc::now();
        for i in 0..3 {
            let mut entry =
                KnowledgeEntry::new(format!("note {i}"), vec![], msg.id, Some(project.id));
            entry.created_at = base + Duration::seconds(i);
            save_entry(&db, &entry).await.unwrap();
        }
        // Unlinked entry must not appear.
        let unlinked = KnowledgeEntry::new("floating note", vec![], msg.id, None);
        save_entry(&db, &unlinked).await.unwrap();

        let entries = list_entries_for_project(&db, project.id).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].content, "note 2");
        assert_eq!(entries[2].content, "note 0");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_matches_content_and_tags() {
        let (db, msg, project, _dir) = setup_db().await;

        let by_content = KnowledgeEntry::new(
            "Rotate JWT keys quarterly",
            vec![],
            msg.id,
            Some(project.id),
        );
        let by_tag = KnowledgeEntry::new(
            "Quarterly review scheduled",
            vec!["jwt".to_string()],
            msg.id,
            None,
        );
        let unrelated = KnowledgeEntry::new("Ship on Friday", vec![], msg.id, None);
        save_entry(&db, &by_content).await.unwrap();
        save_entry(&db, &by_tag).await.unwrap();
        save_entry(&db, &unrelated).await.unwrap();

        let found = search_entries(&db, "jwt", 10).await.unwrap();
        assert_eq!(found.len(), 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let (db, msg, _project, _dir) = setup_db().await;

        let base = Utc::now();
        for i in 0..5 {
            let mut entry = KnowledgeEntry::new(format!("deploy step {i}"), vec![], msg.id, None);
            entry.created_at = base + Duration::seconds(i);
            save_entry(&db, &entry).await.unwrap();
        }

        let found = search_entries(&db, "deploy", 2).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].content, "deploy step 4");

        db.close().await.unwrap();
    }
}

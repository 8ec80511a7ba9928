// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Project CRUD operations.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{Row, params};
use uuid::Uuid;

use savant_core::SavantError;
use savant_core::types::ProjectStatus;

use crate::database::Database;
use crate::models::Project;
use crate::queries::{like_pattern, ts_from_sql, ts_to_sql, uuid_from_sql};

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let status_raw: String = row.get(3)?;
    let status = ProjectStatus::from_str(&status_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Project {
        id: uuid_from_sql(0, row.get(0)?)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status,
        created_at: ts_from_sql(4, row.get(4)?)?,
    })
}

const PROJECT_COLUMNS: &str = "id, name, description, status, created_at";

/// Insert or update a project.
pub async fn save_project(db: &Database, project: &Project) -> Result<(), SavantError> {
    let project = project.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO projects (id, name, description, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     description = excluded.description,
                     status = excluded.status",
                params![
                    project.id.to_string(),
                    project.name,
                    project.description,
                    project.status.to_string(),
                    ts_to_sql(&project.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a project by id.
pub async fn get_project(db: &Database, id: Uuid) -> Result<Option<Project>, SavantError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id.to_string()], project_from_row)?;
            rows.next().transpose().map_err(Into::into)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Projects with active status, ordered by name.
pub async fn list_active_projects(db: &Database) -> Result<Vec<Project>, SavantError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE status = 'active'
                 ORDER BY name COLLATE NOCASE ASC"
            ))?;
            let rows = stmt.query_map([], project_from_row)?;
            let mut projects = Vec::new();
            for row in rows {
                projects.push(row?);
            }
            Ok(projects)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Case-insensitive substring search over names and descriptions.
pub async fn search_projects(db: &Database, query: &str) -> Result<Vec<Project>, SavantError> {
    let pattern = like_pattern(query);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects
                 WHERE name LIKE ?1 OR description LIKE ?1
                 ORDER BY name COLLATE NOCASE ASC"
            ))?;
            let rows = stmt.query_map(params![pattern], project_from_row)?;
            let mut projects = Vec::new();
            for row in rows {
                projects.push(row?);
            }
            Ok(projects)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

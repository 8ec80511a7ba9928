// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

use savant_config::model::StorageConfig;
use savant_core::types::{KnowledgeEntry, Message, Project};
use savant_core::{
    AdapterType, HealthStatus, KnowledgeStore, MessageStore, PluginAdapter, ProjectStore,
    SavantError, StorageAdapter,
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

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SavantError> {
        self.db.get().ok_or_else(|| SavantError::Storage {
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

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
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

    async fn shutdown(&self) -> Result<(), SavantError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SavantError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SavantError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SavantError> {
        self.db()?.close().await
    }
}

#[async_trait]
impl MessageStore for SqliteStorage {
    async fn save_message(&self, message: &Message) -> Result<(), SavantError> {
        queries::messages::save_message(self.db()?, message).await
    }

    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, SavantError> {
        queries::messages::get_message(self.db()?, id).await
    }

    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<Message>, SavantError> {
        queries::messages::list_unprocessed(self.db()?, limit).await
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<(), SavantError> {
        queries::messages::mark_processed(self.db()?, id, project_id).await
    }
}

#[async_trait]
impl ProjectStore for SqliteStorage {
    async fn save_project(&self, project: &Project) -> Result<(), SavantError> {
        queries::projects::save_project(self.db()?, project).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, SavantError> {
        queries::projects::get_project(self.db()?, id).await
    }

    async fn list_active_projects(&self) -> Result<Vec<Project>, SavantError> {
        queries::projects::list_active_projects(self.db()?).await
    }

    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, SavantError> {
        queries::projects::search_projects(self.db()?, query).await
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStorage {
    async fn save_entry(&self, entry: &KnowledgeEntry) -> Result<(), SavantError> {
        queries::knowledge::save_entry(self.db()?, entry).await
    }

    async fn get_entry(&self, id: Uuid) -> Result<Option<KnowledgeEntry>, SavantError> {
        queries::knowledge::get_entry(self.db()?, id).await
    }

    async fn list_entries_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        queries::knowledge::list_entries_for_project(self.db()?, project_id).await
    }

    async fn search_entries(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        queries::knowledge::search_entries(self.db()?, query, limit).await
    }
}

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage capability sets, one per entity, plus the backend lifecycle trait.
//!
//! Each write is a single-entity, single-call operation assumed atomic at
//! the storage layer. Pipelines do not require cross-call transactions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SavantError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{KnowledgeEntry, Message, Project};

/// Persistence capability set for [`Message`].
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a message. Idempotent only with respect to explicit id reuse.
    async fn save_message(&self, message: &Message) -> Result<(), SavantError>;

    /// Fetches a message by id; `None` when unknown.
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, SavantError>;

    /// Lists messages still awaiting processing, oldest first.
    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<Message>, SavantError>;

    /// Marks a message processed, optionally linking it to a project.
    ///
    /// Idempotent: a second call leaves `processed = true`. An existing
    /// `project_id` is never overwritten or cleared.
    async fn mark_processed(&self, id: Uuid, project_id: Option<Uuid>)
    -> Result<(), SavantError>;
}

/// Persistence capability set for [`Project`].
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn save_project(&self, project: &Project) -> Result<(), SavantError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, SavantError>;

    /// Lists projects with active status.
    async fn list_active_projects(&self) -> Result<Vec<Project>, SavantError>;

    /// Case-insensitive substring search over project names and descriptions.
    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, SavantError>;
}

/// Persistence capability set for [`KnowledgeEntry`]. Entries are insert-only.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn save_entry(&self, entry: &KnowledgeEntry) -> Result<(), SavantError>;

    async fn get_entry(&self, id: Uuid) -> Result<Option<KnowledgeEntry>, SavantError>;

    /// All entries linked to a project, most recent first.
    async fn list_entries_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<KnowledgeEntry>, SavantError>;

    /// Free-text search over entry content and tags, most recent first.
    async fn search_entries(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<KnowledgeEntry>, SavantError>;
}

/// A storage backend: lifecycle plus the three entity capability sets.
#[async_trait]
pub trait StorageAdapter:
    PluginAdapter + MessageStore + ProjectStore + KnowledgeStore
{
    /// Initializes the backend (connection, migrations).
    async fn initialize(&self) -> Result<(), SavantError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), SavantError>;
}

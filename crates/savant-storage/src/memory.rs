// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the StorageAdapter trait.
//!
//! Document-style backend holding entities in hash maps behind an async
//! RwLock. Nothing survives a restart; intended for tests and ephemeral
//! deployments. Query semantics mirror the SQLite backend exactly.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use savant_core::types::{KnowledgeEntry, Message, Project, ProjectStatus};
use savant_core::{
    AdapterType, HealthStatus, KnowledgeStore, MessageStore, PluginAdapter, ProjectStore,
    SavantError, StorageAdapter,
};

#[derive(Default)]
struct Inner {
    messages: HashMap<Uuid, Message>,
    projects: HashMap<Uuid, Project>,
    entries: HashMap<Uuid, KnowledgeEntry>,
}

/// Volatile storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SavantError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), SavantError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SavantError> {
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStorage {
    async fn save_message(&self, message: &Message) -> Result<(), SavantError> {
        self.inner
            .write()
            .await
            .messages
            .insert(message.id, message.clone());
        Ok(())
    }

    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, SavantError> {
        Ok(self.inner.read().await.messages.get(&id).cloned())
    }

    async fn list_unprocessed(&self, limit: u32) -> Result<Vec<Message>, SavantError> {
        let inner = self.inner.read().await;
        let mut pending: Vec<Message> = inner
            .messages
            .values()
            .filter(|m| !m.processed)
            .cloned()
            .collect();
        pending.sort_by_key(|m| m.created_at);
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_processed(
        &self,
        id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<(), SavantError> {
        let mut inner = self.inner.write().await;
        let message = inner
            .messages
            .get_mut(&id)
            .ok_or_else(|| SavantError::not_found("message", id.to_string()))?;
        message.processed = true;
        if message.project_id.is_none() {
            message.project_id = project_id;
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStorage {
    async fn save_project(&self, project: &Project) -> Result<(), SavantError> {
        self.inner
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, SavantError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn list_active_projects(&self) -> Result<Vec<Project>, SavantError> {
        let inner = self.inner.read().await;
        let mut active: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| p.status == ProjectStatus::Active)
            .cloned()
            .collect();
        active.sort_by_key(|p| p.name.to_lowercase());
        Ok(active)
    }

    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, SavantError> {
        let inner = self.inner.read().await;
        let mut found: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| contains_ci(&p.name, query) || contains_ci(&p.description, query))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.name.to_lowercase());
        Ok(found)
    }
}

#[async_trait]
impl KnowledgeStore for MemoryStorage {
    async fn save_entry(&self, entry: &KnowledgeEntry) -> Result<(), SavantError> {
        self.inner
            .write()
            .await
            .entries
            .insert(entry.id, entry.clone());
        Ok(())
    }

    async fn get_entry(&self, id: Uuid) -> Result<Option<KnowledgeEntry>, SavantError> {
        Ok(self.inner.read().await.entries.get(&id).cloned())
    }

    async fn list_entries_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<KnowledgeEntry> = inner
            .entries
            .values()
            .filter(|e| e.project_id == Some(project_id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn search_entries(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        let inner = self.inner.read().await;
        let mut found: Vec<KnowledgeEntry> = inner
            .entries
            .values()
            .filter(|e| {
                contains_ci(&e.content, query) || e.tags.iter().any(|t| contains_ci(t, query))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit as usize);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn message_lifecycle_matches_sqlite_semantics() {
        let storage = MemoryStorage::new();
        storage.initialize().await.unwrap();

        let base = Utc::now();
        let mut older = Message::new("first", "user-1", "chat-1");
        older.created_at = base;
        let mut newer = Message::new("second", "user-1", "chat-1");
        newer.created_at = base + Duration::seconds(1);

        storage.save_message(&newer).await.unwrap();
        storage.save_message(&older).await.unwrap();

        let pending = storage.list_unprocessed(10).await.unwrap();
        assert_eq!(pending[0].id, older.id, "oldest first");

        storage.mark_processed(older.id, None).await.unwrap();
        let pending = storage.list_unprocessed(10).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn resave_same_id_is_idempotent() {
        let storage = MemoryStorage::new();
        let mut message = Message::new("first", "user-1", "chat-1");
        storage.save_message(&message).await.unwrap();
        message.content = "second".to_string();
        storage.save_message(&message).await.unwrap();

        let fetched = storage.get_message(message.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "second");
        assert_eq!(storage.list_unprocessed(10).await.unwrap().len(), 1);

        let entry = KnowledgeEntry::new("note", vec![], message.id, None);
        storage.save_entry(&entry).await.unwrap();
        storage.save_entry(&entry).await.unwrap();
        assert_eq!(storage.search_entries("note", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mark_processed_preserves_existing_link() {
        let storage = MemoryStorage::new();
        let message = Message::new("linked", "user-1", "chat-1");
        storage.save_message(&message).await.unwrap();

        let first = Uuid::new_v4();
        storage.mark_processed(message.id, Some(first)).await.unwrap();
        storage
            .mark_processed(message.id, Some(Uuid::new_v4()))
            .await
            .unwrap();

        let fetched = storage.get_message(message.id).await.unwrap().unwrap();
        assert_eq!(fetched.project_id, Some(first));
    }

    #[tokio::test]
    async fn mark_processed_unknown_message_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage
            .mark_processed(Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SavantError::NotFound { .. }));
    }

    #[tokio::test]
    async fn project_search_is_case_insensitive() {
        let storage = MemoryStorage::new();
        let project = Project::new("Auth System", "JWT work").unwrap();
        storage.save_project(&project).await.unwrap();

        let found = storage.search_projects("AUTH").await.unwrap();
        assert_eq!(found.len(), 1);

        let active = storage.list_active_projects().await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn entry_search_covers_tags_and_respects_limit() {
        let storage = MemoryStorage::new();
        let source = Uuid::new_v4();

        let base = Utc::now();
        for i in 0..3 {
            let mut entry = KnowledgeEntry::new(
                format!("note {i}"),
                vec!["deploy".to_string()],
                source,
                None,
            );
            entry.created_at = base + Duration::seconds(i);
            storage.save_entry(&entry).await.unwrap();
        }

        let found = storage.search_entries("DEPLOY", 2).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].content, "note 2", "most recent first");
    }
}

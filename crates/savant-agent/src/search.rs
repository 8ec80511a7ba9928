// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The knowledge-search pipeline: free-text lookup over stored entries.
//!
//! Matching and ordering are owned by the storage backend (most recent
//! first); no ranking logic lives here.

use std::sync::Arc;

use savant_core::error::SavantError;
use savant_core::traits::{KnowledgeStore, StorageAdapter};
use savant_core::types::KnowledgeEntry;
use uuid::Uuid;

use crate::next_steps::resolve_project;

/// Result cap for unscoped searches.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

#[derive(Clone)]
pub struct KnowledgeSearchPipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
}

impl KnowledgeSearchPipeline {
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>) -> Self {
        Self { storage }
    }

    /// Searches entry content and tags, most recent first.
    pub async fn execute(&self, query: &str) -> Result<Vec<KnowledgeEntry>, SavantError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SavantError::Validation(
                "search query is required, e.g. /search jwt signing".into(),
            ));
        }
        self.storage
            .search_entries(query, DEFAULT_SEARCH_LIMIT)
            .await
    }

    /// Resolves a project by name and searches only its entries.
    ///
    /// Name resolution follows the same rules as /nextsteps: exact match
    /// wins, zero matches is not-found, several is ambiguous.
    pub async fn execute_in_project(
        &self,
        project_name: &str,
        query: &str,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        let project = resolve_project(self.storage.as_ref(), project_name).await?;
        self.execute_scoped(project.id, query).await
    }

    /// Searches within one project's entries only.
    pub async fn execute_scoped(
        &self,
        project_id: Uuid,
        query: &str,
    ) -> Result<Vec<KnowledgeEntry>, SavantError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SavantError::Validation("search query is required".into()));
        }
        let needle = query.to_lowercase();
        let entries = self.storage.list_entries_for_project(project_id).await?;
        Ok(entries
            .into_iter()
            .filter(|e| {
                e.content.to_lowercase().contains(&needle)
                    || e.tags.iter().any(|t| t.contains(&needle))
            })
            .collect())
    }
}

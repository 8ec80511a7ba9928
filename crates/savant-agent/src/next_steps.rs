// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The next-steps pipeline: resolve a project by name, gather its knowledge,
//! and ask the provider for ranked suggestions.

use std::sync::Arc;

use savant_core::error::SavantError;
use savant_core::traits::{KnowledgeStore, LlmProvider, ProjectStore, StorageAdapter};
use savant_core::types::{Project, Suggestion};
use tracing::debug;

/// Resolves a project name and produces ordered suggestions for it.
///
/// Name resolution distinguishes "not found" from "ambiguous": callers show
/// different messages for the two, and neither makes a provider call.
#[derive(Clone)]
pub struct NextStepsPipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    provider: Arc<dyn LlmProvider + Send + Sync>,
}

impl NextStepsPipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn LlmProvider + Send + Sync>,
    ) -> Self {
        Self { storage, provider }
    }

    /// Resolves the project and returns it with the provider's suggestions,
    /// ordered by descending priority exactly as the provider returned them.
    pub async fn execute(
        &self,
        project_name: &str,
    ) -> Result<(Project, Vec<Suggestion>), SavantError> {
        if project_name.trim().is_empty() {
            return Err(SavantError::Validation(
                "project name is required, e.g. /nextsteps Auth System".into(),
            ));
        }
        let project = resolve_project(self.storage.as_ref(), project_name).await?;
        let entries = self.storage.list_entries_for_project(project.id).await?;
        debug!(
            project = project.name,
            entries = entries.len(),
            "requesting next-step suggestions"
        );
        let suggestions = self.provider.suggest_next_steps(&project, &entries).await?;
        Ok((project, suggestions))
    }
}

/// Resolves a free-text name against active projects.
///
/// An exact case-insensitive match wins over substring matches. Zero
/// matches is [`SavantError::NotFound`]; more than one is
/// [`SavantError::Ambiguous`] with the candidate names.
pub(crate) async fn resolve_project(
    storage: &(dyn StorageAdapter + Send + Sync),
    name: &str,
) -> Result<Project, SavantError> {
    let query = name.trim();
    if query.is_empty() {
        return Err(SavantError::Validation("project name is required".into()));
    }

    let projects = storage.list_active_projects().await?;

    let exact: Vec<&Project> = projects
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(query))
        .collect();
    match exact.len() {
        1 => return Ok(exact[0].clone()),
        n if n > 1 => return Err(ambiguous(query, &exact)),
        _ => {}
    }

    let needle = query.to_lowercase();
    let partial: Vec<&Project> = projects
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();
    match partial.len() {
        0 => Err(SavantError::not_found("project", query)),
        1 => Ok(partial[0].clone()),
        _ => Err(ambiguous(query, &partial)),
    }
}

fn ambiguous(name: &str, candidates: &[&Project]) -> SavantError {
    SavantError::Ambiguous {
        name: name.to_string(),
        candidates: candidates.iter().map(|p| p.name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubProvider;
    use savant_core::traits::{KnowledgeStore, ProjectStore};
    use savant_core::types::KnowledgeEntry;
    use savant_storage::MemoryStorage;
    use uuid::Uuid;

    async fn seeded_storage(names: &[&str]) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        for name in names {
            let project = Project::new(*name, "description").unwrap();
            storage.save_project(&project).await.unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn unknown_name_is_not_found_and_makes_no_provider_call() {
        let storage = seeded_storage(&["Auth System"]).await;
        let provider = Arc::new(StubProvider::new());
        let pipeline = NextStepsPipeline::new(storage, provider.clone());

        let err = pipeline.execute("Nonexistent Project").await.unwrap_err();
        assert!(matches!(err, SavantError::NotFound { .. }));
        assert_eq!(provider.suggest_calls(), 0);
    }

    #[tokio::test]
    async fn multiple_substring_matches_are_ambiguous() {
        let storage = seeded_storage(&["API Gateway", "API Docs"]).await;
        let provider = Arc::new(StubProvider::new());
        let pipeline = NextStepsPipeline::new(storage, provider.clone());

        let err = pipeline.execute("API").await.unwrap_err();
        match err {
            SavantError::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
        assert_eq!(provider.suggest_calls(), 0);
    }

    #[tokio::test]
    async fn exact_match_wins_over_substring_matches() {
        let storage = seeded_storage(&["API", "API Gateway"]).await;
        let provider = Arc::new(StubProvider::new().suggestions(vec![]));
        let pipeline = NextStepsPipeline::new(storage, provider);

        let (project, _) = pipeline.execute("api").await.unwrap();
        assert_eq!(project.name, "API");
    }

    #[tokio::test]
    async fn single_substring_match_resolves() {
        let storage = seeded_storage(&["Authentication System"]).await;
        let provider = Arc::new(StubProvider::new().suggestions(vec![Suggestion {
            title: "Write tests".into(),
            description: "cover the token path".into(),
            priority: 4,
            resources: vec![],
        }]));
        let pipeline = NextStepsPipeline::new(storage, provider);

        let (project, suggestions) = pipeline.execute("auth").await.unwrap();
        assert_eq!(project.name, "Authentication System");
        assert_eq!(suggestions.len(), 1);
    }

    #[tokio::test]
    async fn suggestions_pass_through_unreordered() {
        let storage = seeded_storage(&["Auth"]).await;
        let entry = KnowledgeEntry::new("Use RS256", vec![], Uuid::new_v4(), None);
        // Entry is unlinked on purpose; the pipeline only reads linked ones.
        storage.save_entry(&entry).await.unwrap();

        let expected = vec![
            Suggestion {
                title: "High".into(),
                description: String::new(),
                priority: 5,
                resources: vec![],
            },
            Suggestion {
                title: "Low".into(),
                description: String::new(),
                priority: 1,
                resources: vec![],
            },
        ];
        let provider = Arc::new(StubProvider::new().suggestions(expected.clone()));
        let pipeline = NextStepsPipeline::new(storage, provider);

        let (_, suggestions) = pipeline.execute("Auth").await.unwrap();
        assert_eq!(suggestions, expected);
    }

    #[tokio::test]
    async fn blank_name_is_a_validation_error() {
        let storage = seeded_storage(&[]).await;
        let provider = Arc::new(StubProvider::new());
        let pipeline = NextStepsPipeline::new(storage, provider);

        let err = pipeline.execute("   ").await.unwrap_err();
        assert!(matches!(err, SavantError::Validation(_)));
    }
}

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM vendor integrations (OpenAI, Gemini, etc.).

use async_trait::async_trait;

use crate::error::SavantError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Classification, KnowledgeEntry, KnowledgeItem, Project, Suggestion};

/// Adapter for LLM provider integrations.
///
/// The capability set is intentionally narrow (three operations) so vendor
/// adapters are swappable without touching pipeline logic.
#[async_trait]
pub trait LlmProvider: PluginAdapter {
    /// Classifies a message against the candidate projects.
    ///
    /// Always returns a category from the fixed enum and a confidence in
    /// [0, 1]. If the vendor call fails or returns unparseable output, this
    /// fails with [`SavantError::Provider`] -- no degraded default is
    /// silently substituted; the pipeline owns the failure policy.
    async fn classify(
        &self,
        content: &str,
        candidate_projects: &[Project],
    ) -> Result<Classification, SavantError>;

    /// Extracts structured knowledge items from a message.
    ///
    /// An empty result is valid: some messages carry nothing extractable.
    async fn extract_knowledge(
        &self,
        content: &str,
        classification: &Classification,
    ) -> Result<Vec<KnowledgeItem>, SavantError>;

    /// Suggests next steps for a project given its accumulated knowledge.
    ///
    /// Returned ordered by descending priority; ties keep the order the
    /// model produced them in (stable).
    async fn suggest_next_steps(
        &self,
        project: &Project,
        entries: &[KnowledgeEntry],
    ) -> Result<Vec<Suggestion>, SavantError>;
}

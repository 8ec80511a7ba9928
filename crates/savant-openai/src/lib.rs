// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for the Savant assistant.
//!
//! Implements [`LlmProvider`] on top of the Chat Completions API. Prompt
//! construction and response parsing are shared with other vendors through
//! `savant_core::prompt`, so this crate only owns the HTTP transport.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use savant_config::SavantConfig;
use savant_core::error::SavantError;
use savant_core::prompt;
use savant_core::traits::{LlmProvider, PluginAdapter};
use savant_core::types::{
    AdapterType, Classification, HealthStatus, KnowledgeEntry, KnowledgeItem, Project, Suggestion,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;

/// OpenAI provider implementing [`LlmProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider from the given configuration.
    pub fn new(config: &SavantConfig) -> Result<Self, SavantError> {
        let api_key = resolve_api_key(&config.openai.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            config.openai.model.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        )?;

        info!(model = config.openai.model, "OpenAI provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

fn resolve_api_key(configured: &Option<String>) -> Result<String, SavantError> {
    if let Some(key) = configured.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            SavantError::Config(
                "openai.api_key is not set and OPENAI_API_KEY is not in the environment".into(),
            )
        })
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
        // We avoid consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SavantError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn classify(
        &self,
        content: &str,
        candidate_projects: &[Project],
    ) -> Result<Classification, SavantError> {
        let raw = self
            .client
            .complete(&prompt::classify_prompt(content, candidate_projects))
            .await?;
        prompt::parse_classification(&raw)
    }

    async fn extract_knowledge(
        &self,
        content: &str,
        classification: &Classification,
    ) -> Result<Vec<KnowledgeItem>, SavantError> {
        let raw = self
            .client
            .complete(&prompt::extract_prompt(content, classification))
            .await?;
        prompt::parse_knowledge_items(&raw)
    }

    async fn suggest_next_steps(
        &self,
        project: &Project,
        entries: &[KnowledgeEntry],
    ) -> Result<Vec<Suggestion>, SavantError> {
        let raw = self
            .client
            .complete(&prompt::next_steps_prompt(project, entries))
            .await?;
        prompt::parse_suggestions(&raw)
    }
}

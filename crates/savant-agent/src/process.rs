// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message-processing pipeline.
//!
//! A linear state machine over one [`Message`]: save, classify, extract
//! knowledge, link to a project, mark processed. Each step runs exactly once
//! with no automatic retry; the failure policy per step is:
//!
//! - save fails: hard stop, nothing was durably recorded and the caller must
//!   not confirm anything to the user;
//! - classify fails: stop, the message stays unprocessed and eligible for
//!   replay, the caller sends a generic failure notice;
//! - extraction fails: degrade, proceed with zero knowledge entries;
//! - entry persistence fails: stop without marking processed, so the message
//!   stays eligible for replay;
//! - project link unresolvable: not an error, the message stays unlinked.

use std::sync::Arc;

use savant_core::error::SavantError;
use savant_core::traits::{
    KnowledgeStore, LlmProvider, MessageStore, ProjectStore, StorageAdapter,
};
use savant_core::types::{Classification, KnowledgeEntry, Message, Project};
use strum::Display;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// The step at which a pipeline run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStep {
    /// Persisting the inbound message.
    Save,
    /// Fetching candidate projects and calling the classifier.
    Classify,
    /// Persisting knowledge entries or marking the message processed.
    Persist,
}

/// A terminal pipeline failure: the step that failed and its cause.
#[derive(Debug, Error)]
#[error("pipeline failed at {step}: {source}")]
pub struct PipelineFailure {
    pub step: PipelineStep,
    pub source: SavantError,
}

/// The observable result of a successful pipeline run.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub message_id: Uuid,
    pub classification: Classification,
    /// Number of knowledge entries persisted for this message.
    pub entries_saved: usize,
    /// True when knowledge extraction failed and the run proceeded without
    /// entries.
    pub degraded: bool,
    /// The project the message was linked to, when the classifier suggested
    /// one that resolved.
    pub linked_project: Option<Project>,
}

/// Orchestrates one message through save, classify, extract, link, and
/// mark-processed. Steps run strictly sequentially within one call; separate
/// calls for different messages may run concurrently.
#[derive(Clone)]
pub struct ProcessMessagePipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    provider: Arc<dyn LlmProvider + Send + Sync>,
}

impl ProcessMessagePipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        provider: Arc<dyn LlmProvider + Send + Sync>,
    ) -> Self {
        Self { storage, provider }
    }

    /// Runs the full pipeline for one message.
    ///
    /// Empty or whitespace-only content is accepted; classification decides
    /// what to make of it.
    pub async fn execute(&self, message: Message) -> Result<ProcessOutcome, PipelineFailure> {
        self.storage
            .save_message(&message)
            .await
            .map_err(|e| fail(PipelineStep::Save, e))?;

        let candidates = self
            .storage
            .list_active_projects()
            .await
            .map_err(|e| fail(PipelineStep::Classify, e))?;
        let classification = self
            .provider
            .classify(&message.content, &candidates)
            .await
            .map_err(|e| fail(PipelineStep::Classify, e))?;
        debug!(
            message_id = %message.id,
            category = %classification.category,
            confidence = classification.confidence,
            "message classified"
        );

        let (items, degraded) = match self
            .provider
            .extract_knowledge(&message.content, &classification)
            .await
        {
            Ok(items) => (items, false),
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "knowledge extraction failed, proceeding without entries");
                (Vec::new(), true)
            }
        };

        let linked_project = self.resolve_link(&message, &classification).await;
        let project_id = linked_project.as_ref().map(|p| p.id);

        let mut entries_saved = 0;
        for item in items {
            let entry = KnowledgeEntry::new(item.content, item.tags, message.id, project_id);
            self.storage
                .save_entry(&entry)
                .await
                .map_err(|e| fail(PipelineStep::Persist, e))?;
            entries_saved += 1;
        }

        self.storage
            .mark_processed(message.id, project_id)
            .await
            .map_err(|e| fail(PipelineStep::Persist, e))?;

        Ok(ProcessOutcome {
            message_id: message.id,
            classification,
            entries_saved,
            degraded,
            linked_project,
        })
    }

    /// Resolves the classifier's suggested project, if any.
    ///
    /// An unknown id or a failed lookup leaves the message unlinked; neither
    /// aborts the run.
    async fn resolve_link(
        &self,
        message: &Message,
        classification: &Classification,
    ) -> Option<Project> {
        let id = classification.suggested_project_id?;
        match self.storage.get_project(id).await {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                debug!(message_id = %message.id, project_id = %id, "suggested project does not exist, leaving unlinked");
                None
            }
            Err(e) => {
                warn!(message_id = %message.id, project_id = %id, error = %e, "project lookup failed, leaving unlinked");
                None
            }
        }
    }
}

fn fail(step: PipelineStep, source: SavantError) -> PipelineFailure {
    PipelineFailure { step, source }
}

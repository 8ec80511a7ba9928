// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities and value objects shared across adapter traits and pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::SavantError;

/// Identifies the type of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Lifecycle state of a [`Project`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

/// Category assigned to a message by the classification step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FeatureRequest,
    BugReport,
    Question,
    Note,
    #[default]
    Other,
}

/// One inbound chat message, persisted before any LLM work happens.
///
/// `processed` flips false -> true exactly once, only after classification
/// succeeded and knowledge persistence completed. `project_id` is set at
/// most once and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub user_id: String,
    pub chat_id: String,
    pub created_at: DateTime<Utc>,
    pub processed: bool,
    pub project_id: Option<Uuid>,
}

impl Message {
    /// Creates an unprocessed message with a fresh id.
    ///
    /// Empty or whitespace-only content is accepted: the pipeline processes
    /// it like any other message and classification decides what it is.
    pub fn new(
        content: impl Into<String>,
        user_id: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            user_id: user_id.into(),
            chat_id: chat_id.into(),
            created_at: Utc::now(),
            processed: false,
            project_id: None,
        }
    }
}

/// A unit of work the user organizes messages around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates an active project, rejecting empty names or descriptions.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SavantError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(SavantError::Validation(
                "project name cannot be empty".into(),
            ));
        }
        if description.trim().is_empty() {
            return Err(SavantError::Validation(
                "project description cannot be empty".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        })
    }
}

/// One structured insight derived from a message. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: Uuid,
    pub content: String,
    pub tags: Vec<String>,
    pub source_message_id: Uuid,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// Creates an entry from extracted content, normalizing tags.
    pub fn new(
        content: impl Into<String>,
        tags: Vec<String>,
        source_message_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            tags: normalize_tags(tags),
            source_message_id,
            project_id,
            created_at: Utc::now(),
        }
    }
}

/// Lowercases, trims, and de-duplicates tags, dropping empty ones.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let clean = tag.trim().to_lowercase();
        if !clean.is_empty() && !out.contains(&clean) {
            out.push(clean);
        }
    }
    out
}

/// Structured output of classifying one message. Not persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub summary: String,
    pub tags: Vec<String>,
    pub suggested_project_id: Option<Uuid>,
}

impl Classification {
    /// Whether the confidence meets the given threshold.
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

/// Raw extraction output from the provider: content plus tags, prior to
/// becoming a persisted [`KnowledgeEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A suggested next step for a project. Higher priority = more urgent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// A recognized user command, parsed by the channel adapter.
///
/// Argument fields carry raw text; the agent validates them and answers
/// with usage hints when they are malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    CreateProject { name: String, description: String },
    ListProjects,
    NextSteps { project: String },
    SearchKnowledge { query: String, project: Option<String> },
}

/// What an inbound message carries: a command or free text.
///
/// Anything not matching a known command is free text and triggers the
/// message-processing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Command(Command),
    Text(String),
}

/// An inbound message received from a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Channel-native message id (informational only).
    pub id: String,
    pub sender_id: String,
    pub chat_id: String,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
}

/// An outbound message to be delivered via a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: String,
    pub content: String,
}

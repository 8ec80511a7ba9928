// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates and provider-output parsing.
//!
//! This module defines the wire contract between the pipelines and any LLM
//! vendor: prompts ask for JSON of a fixed shape, and the parsers here turn
//! the model's raw text back into domain values. Vendor crates share these
//! so swapping providers never changes pipeline semantics.

use std::str::FromStr;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::SavantError;
use crate::types::{
    Category, Classification, KnowledgeEntry, KnowledgeItem, Project, Suggestion, normalize_tags,
};

/// Builds the classification prompt for one message against candidate projects.
pub fn classify_prompt(content: &str, projects: &[Project]) -> String {
    let project_context = if projects.is_empty() {
        "(none)".to_string()
    } else {
        projects
            .iter()
            .map(|p| format!("- {}: {} (ID: {})", p.name, p.description, p.id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Analyze the following message and classify it based on the available projects.\n\n\
         Message: {content}\n\n\
         Available Projects:\n{project_context}\n\n\
         Provide:\n\
         1. A category: one of \"feature_request\", \"bug_report\", \"question\", \"note\", \"other\"\n\
         2. Confidence score (0.0 to 1.0)\n\
         3. Suggested project ID if applicable, otherwise null\n\
         4. Relevant tags (list of keywords)\n\
         5. Brief summary\n\n\
         Respond with a single JSON object with keys: category, confidence, \
         suggested_project_id, tags, summary"
    )
}

/// Builds the knowledge-extraction prompt for one classified message.
pub fn extract_prompt(content: &str, classification: &Classification) -> String {
    format!(
        "Extract key information, insights, and actionable items from this message.\n\n\
         Message: {content}\n\n\
         The message was classified as \"{}\" with summary: {}\n\n\
         Respond with a JSON array (possibly empty) where each item has:\n\
         - content: a concise, self-contained insight\n\
         - tags: list of keywords\n\n\
         Only include items that carry real information; return [] if there is \
         nothing worth keeping.",
        classification.category, classification.summary
    )
}

/// Builds the next-steps prompt for a project and its recent knowledge.
pub fn next_steps_prompt(project: &Project, entries: &[KnowledgeEntry]) -> String {
    // Most recent entries only; very large projects would bloat the prompt.
    let knowledge_context = if entries.is_empty() {
        "(no knowledge recorded yet)".to_string()
    } else {
        entries
            .iter()
            .take(10)
            .map(|e| format!("- {}", e.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Based on the project information and knowledge base, suggest 3-5 next steps.\n\n\
         Project: {}\nDescription: {}\n\n\
         Recent Knowledge Base Entries:\n{knowledge_context}\n\n\
         Respond with a JSON array where each item has:\n\
         - title: brief title\n\
         - description: detailed description\n\
         - priority: integer (1-5, higher is more urgent)\n\
         - resources: list of suggested resources or tools",
        project.name, project.description
    )
}

#[derive(Debug, Deserialize)]
struct ClassificationWire {
    #[serde(default)]
    category: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    suggested_project_id: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    summary: String,
}

/// Parses a classification response.
///
/// Unparseable JSON is a [`SavantError::Provider`]: callers must not assume
/// a fallback classification was substituted. An unknown category string,
/// by contrast, maps to [`Category::Other`], and confidence is clamped to
/// [0, 1] -- those are tolerable model sloppiness, not failures.
pub fn parse_classification(raw: &str) -> Result<Classification, SavantError> {
    let body = strip_code_fences(raw);
    let wire: ClassificationWire =
        serde_json::from_str(body).map_err(|e| SavantError::Provider {
            message: format!("unparseable classification response: {e}"),
            source: Some(Box::new(e)),
        })?;

    let category = Category::from_str(wire.category.trim()).unwrap_or_default();
    let suggested_project_id = wire
        .suggested_project_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s.trim()).ok());

    Ok(Classification {
        category,
        confidence: wire.confidence.clamp(0.0, 1.0),
        summary: wire.summary.trim().to_string(),
        tags: normalize_tags(wire.tags),
        suggested_project_id,
    })
}

#[derive(Debug, Deserialize)]
struct KnowledgeItemWire {
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parses a knowledge-extraction response.
///
/// A JSON array (possibly empty) is the expected shape. Models sometimes
/// answer with bare prose instead; that is wrapped as a single item rather
/// than treated as a failure, since extraction is best-effort.
pub fn parse_knowledge_items(raw: &str) -> Result<Vec<KnowledgeItem>, SavantError> {
    let body = strip_code_fences(raw);
    if let Ok(items) = serde_json::from_str::<Vec<KnowledgeItemWire>>(body) {
        return Ok(items
            .into_iter()
            .filter(|i| !i.content.trim().is_empty())
            .map(|i| KnowledgeItem {
                content: i.content.trim().to_string(),
                tags: normalize_tags(i.tags),
            })
            .collect());
    }

    let text = body.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![KnowledgeItem {
        content: text.to_string(),
        tags: Vec::new(),
    }])
}

#[derive(Debug, Deserialize)]
struct SuggestionWire {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    resources: Vec<String>,
}

/// Parses a next-steps response into suggestions ordered by descending
/// priority. The sort is stable, so ties keep model order.
pub fn parse_suggestions(raw: &str) -> Result<Vec<Suggestion>, SavantError> {
    let body = strip_code_fences(raw);
    let wire: Vec<SuggestionWire> =
        serde_json::from_str(body).map_err(|e| SavantError::Provider {
            message: format!("unparseable suggestions response: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut suggestions: Vec<Suggestion> = wire
        .into_iter()
        .filter(|s| !s.title.trim().is_empty())
        .map(|s| Suggestion {
            title: s.title.trim().to_string(),
            description: s.description.trim().to_string(),
            priority: s.priority,
            resources: s.resources,
        })
        .collect();
    suggestions.sort_by_key(|s| std::cmp::Reverse(s.priority));
    Ok(suggestions)
}

/// Strips a surrounding Markdown code fence, if present.
///
/// LLMs frequently wrap JSON in ```json ... ``` despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first, remainder)) if !first.trim().is_empty() && !first.contains('{') => {
            remainder.trim()
        }
        _ => body.trim(),
    }
}

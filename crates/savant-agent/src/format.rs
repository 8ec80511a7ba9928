// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply rendering: every user-visible string the agent sends.
//!
//! Errors reaching the user are always one of the taxonomy kinds translated
//! to a short, specific sentence; raw adapter errors never leak here.

use savant_core::error::SavantError;
use savant_core::types::{KnowledgeEntry, Project, Suggestion};

use crate::process::ProcessOutcome;

pub fn welcome() -> String {
    "Hi, I'm Savant. Send me any message and I'll classify it, keep what's \
     worth keeping, and file it against your projects.\n\n\
     Use /help to see the available commands."
        .to_string()
}

pub fn help() -> String {
    "Available commands:\n\
     /start - welcome message\n\
     /help - this list\n\
     /newproject <name> - <description> - create a project\n\
     /projects - list active projects\n\
     /nextsteps <project name> - suggest next steps for a project\n\
     /search <query> [in: <project>] - search stored knowledge\n\n\
     Anything else is treated as a message to process."
        .to_string()
}

/// Confirmation for a fully processed message: category, confidence, summary,
/// tags, and the linked project when there is one.
pub fn processed_reply(outcome: &ProcessOutcome) -> String {
    let c = &outcome.classification;
    let mut reply = format!(
        "Got it.\nCategory: {}\nConfidence: {:.2}\nSummary: {}",
        c.category, c.confidence, c.summary
    );
    if !c.tags.is_empty() {
        reply.push_str(&format!("\nTags: {}", c.tags.join(", ")));
    }
    if let Some(project) = &outcome.linked_project {
        reply.push_str(&format!("\nFiled under: {}", project.name));
    }
    if outcome.degraded {
        reply.push_str("\nNote: knowledge extraction failed for this message, so nothing new was saved to the knowledge base.");
    } else if outcome.entries_saved > 0 {
        reply.push_str(&format!(
            "\nSaved {} knowledge {}.",
            outcome.entries_saved,
            plural(outcome.entries_saved, "entry", "entries")
        ));
    }
    reply
}

pub fn suggestions_reply(project: &Project, suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return format!("No suggestions for `{}` right now.", project.name);
    }
    let mut reply = format!("Next steps for `{}`:\n", project.name);
    for (i, s) in suggestions.iter().enumerate() {
        reply.push_str(&format!(
            "\n{}. {} (priority {})\n   {}",
            i + 1,
            s.title,
            s.priority,
            s.description
        ));
        if !s.resources.is_empty() {
            reply.push_str(&format!("\n   Resources: {}", s.resources.join(", ")));
        }
    }
    reply
}

pub fn project_created_reply(project: &Project) -> String {
    format!(
        "Created project `{}` ({})\n{}",
        project.name, project.id, project.description
    )
}

pub fn project_list_reply(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No active projects yet. Create one with /newproject <name> - <description>."
            .to_string();
    }
    let mut reply = format!(
        "Active {}:\n",
        plural(projects.len(), "project", "projects")
    );
    for p in projects {
        reply.push_str(&format!("\n- {} ({})", p.name, p.description));
    }
    reply
}

pub fn search_reply(query: &str, entries: &[KnowledgeEntry]) -> String {
    if entries.is_empty() {
        return format!("Nothing in the knowledge base matches `{query}`.");
    }
    let mut reply = format!(
        "{} {} for `{query}`:\n",
        entries.len(),
        plural(entries.len(), "match", "matches")
    );
    for e in entries {
        reply.push_str(&format!("\n- {}", e.content));
        if !e.tags.is_empty() {
            reply.push_str(&format!(" [{}]", e.tags.join(", ")));
        }
    }
    reply
}

/// Generic notice for a pipeline run that failed after the message was
/// saved. The message stays unprocessed, so retrying is safe.
pub fn pipeline_failure_reply() -> String {
    "Sorry, I couldn't process that message right now. It has been kept and \
     you can try again later."
        .to_string()
}

/// Maps an error to user-facing text. Validation, not-found, and ambiguous
/// errors get specific wording; everything else gets a generic notice.
pub fn error_reply(err: &SavantError) -> String {
    match err {
        SavantError::Validation(reason) => format!("That didn't work: {reason}"),
        SavantError::NotFound { kind, reference } => {
            format!("No {kind} matches `{reference}`. Use /projects to see what exists.")
        }
        SavantError::Ambiguous { name, candidates } => format!(
            "`{name}` matches more than one project: {}. Please be more specific.",
            candidates.join(", ")
        ),
        _ => "Sorry, something went wrong on my side. Please try again later.".to_string(),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

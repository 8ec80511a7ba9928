// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing, authorization filtering, and command parsing.
//!
//! Determines whether an incoming Telegram message should be processed
//! based on authorization rules and chat type, then parses the text into
//! a channel-agnostic [`InboundMessage`] carrying either a command or
//! free text.

use savant_core::types::{Command, InboundMessage, Payload};
use teloxide::prelude::*;
use teloxide::types::ChatKind;

/// Checks whether the message sender is authorized.
///
/// Authorization passes if the sender's user ID (as string) or username
/// matches any entry in the `allowed_users` list. If `allowed_users` is
/// empty, all messages are rejected (secure default).
///
/// Messages without a sender (e.g., channel posts) always return `false`.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return false;
    }

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        // Match by user ID
        if *allowed == user_id_str {
            return true;
        }
        // Match by username (with or without @ prefix)
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Parses message text into a command or free text.
///
/// Recognized commands: `/start`, `/help`, `/newproject <name> - <description>`,
/// `/projects`, `/nextsteps <project>`, `/search <query> [in: <project>]`.
/// A `@botname` suffix on the command is stripped. Unrecognized slash
/// commands fall through to free text and enter the processing pipeline
/// like any other message. Argument validation happens downstream, not here.
pub fn parse_payload(text: &str) -> Payload {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Payload::Text(text.to_string());
    };

    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest, ""),
    };
    let command = command.split('@').next().unwrap_or(command);

    let parsed = match command.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "newproject" => {
            let (name, description) = match args.split_once(" - ") {
                Some((n, d)) => (n, d),
                None => (args, ""),
            };
            Command::CreateProject {
                name: name.trim().to_string(),
                description: description.trim().to_string(),
            }
        }
        "projects" => Command::ListProjects,
        "nextsteps" => Command::NextSteps {
            project: args.to_string(),
        },
        "search" => {
            // A trailing `in: <project>` scopes the search to one project.
            let (query, project) = match args.rsplit_once(" in: ") {
                Some((q, p)) if !p.trim().is_empty() => {
                    (q.trim().to_string(), Some(p.trim().to_string()))
                }
                _ => (args.to_string(), None),
            };
            Command::SearchKnowledge { query, project }
        }
        _ => return Payload::Text(text.to_string()),
    };

    Payload::Command(parsed)
}

/// Converts a Telegram message and its text into an [`InboundMessage`].
pub fn to_inbound_message(msg: &Message, text: &str) -> InboundMessage {
    let sender_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    InboundMessage {
        id: msg.id.0.to_string(),
        sender_id,
        chat_id: msg.chat.id.0.to_string(),
        payload: parse_payload(text),
        timestamp: msg.date,
    }
}

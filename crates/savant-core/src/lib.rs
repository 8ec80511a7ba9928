// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Savant knowledge assistant.
//!
//! This crate provides the foundational trait definitions, error types, the
//! domain model, and the provider prompt/parse contract used throughout the
//! Savant workspace. All adapter plugins implement traits defined here.

pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SavantError;
pub use types::{
    AdapterType, Category, Classification, HealthStatus, InboundMessage, KnowledgeEntry,
    KnowledgeItem, Message, OutboundMessage, Payload, Project, ProjectStatus, Suggestion,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    ChannelAdapter, KnowledgeStore, LlmProvider, MessageStore, PluginAdapter, ProjectStore,
    StorageAdapter,
};

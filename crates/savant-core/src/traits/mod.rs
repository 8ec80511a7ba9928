// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Channel, provider, and storage are the three Strategy boundaries of the
//! system: concrete implementations are selected at startup by
//! configuration, never by runtime type inspection.

pub mod adapter;
pub mod channel;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use provider::LlmProvider;
pub use storage::{KnowledgeStore, MessageStore, ProjectStore, StorageAdapter};

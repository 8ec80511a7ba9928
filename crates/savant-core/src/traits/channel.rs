// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations (Telegram, etc.).

use async_trait::async_trait;

use crate::error::SavantError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, OutboundMessage};

/// Adapter for bidirectional messaging channel integrations.
///
/// Channel adapters connect Savant to an external messaging platform,
/// handling message ingestion, command parsing, and reply delivery.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), SavantError>;

    /// Sends a message through the channel.
    ///
    /// A failure here is a delivery failure: callers log it and keep any
    /// already-committed state.
    async fn send(&self, msg: OutboundMessage) -> Result<(), SavantError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, SavantError>;
}

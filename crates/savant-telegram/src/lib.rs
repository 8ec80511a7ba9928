// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Savant assistant.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, authorization filtering, and command parsing.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use savant_config::model::TelegramConfig;
use savant_core::error::SavantError;
use savant_core::traits::{ChannelAdapter, PluginAdapter};
use savant_core::types::{AdapterType, HealthStatus, InboundMessage, OutboundMessage};
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling, filters messages by authorization
/// and chat type, and delivers plain-text replies.
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, SavantError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            SavantError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(SavantError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), SavantError> {
        debug!("Telegram channel shutting down");
        // The polling handle will be dropped when TelegramChannel is dropped,
        // which aborts the task. For graceful shutdown, the agent loop should
        // stop calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), SavantError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let allowed = allowed_users.clone();
                async move {
                    // Filter: DMs only
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    // Filter: authorized users only
                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    // Text messages only; media is out of scope.
                    match msg.text() {
                        Some(text) => {
                            let inbound = handler::to_inbound_message(&msg, text);
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring non-text message");
                        }
                    }

                    respond(())
                }
            });

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore non-message updates
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), SavantError> {
        let chat_id =
            msg.chat_id
                .parse::<i64>()
                .map(ChatId)
                .map_err(|e| SavantError::Channel {
                    message: format!("invalid chat_id `{}`: {e}", msg.chat_id),
                    source: None,
                })?;

        self.bot
            .send_message(Recipient::Id(chat_id), &msg.content)
            .await
            .map_err(|e| SavantError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, SavantError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| SavantError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

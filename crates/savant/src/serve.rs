// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `savant serve` command implementation.
//!
//! Starts the full agent: configured storage backend, the selected LLM
//! provider, the Telegram channel, and the agent loop. Supports graceful
//! shutdown via signal handlers.

use std::sync::Arc;

use savant_agent::{AgentLoop, shutdown};
use savant_config::{LlmVendor, SavantConfig, StorageBackend};
use savant_core::error::SavantError;
use savant_core::traits::{ChannelAdapter, LlmProvider, StorageAdapter};
use savant_gemini::GeminiProvider;
use savant_openai::OpenAiProvider;
use savant_storage::{MemoryStorage, SqliteStorage};
use savant_telegram::TelegramChannel;
use tracing::{error, info};

/// Runs the `savant serve` command.
pub async fn run_serve(config: SavantConfig) -> Result<(), SavantError> {
    init_tracing(&config.agent.log_level);

    info!(agent_name = config.agent.name, "starting savant serve");

    let storage = build_storage(&config).await?;

    let provider: Arc<dyn LlmProvider + Send + Sync> = match config.llm.provider {
        LlmVendor::OpenAi => {
            let p = OpenAiProvider::new(&config).map_err(|e| {
                error!(error = %e, "failed to initialize OpenAI provider");
                eprintln!(
                    "error: OpenAI API key required. Set openai.api_key in savant.toml or the OPENAI_API_KEY env var."
                );
                e
            })?;
            Arc::new(p)
        }
        LlmVendor::Gemini => {
            let p = GeminiProvider::new(&config).map_err(|e| {
                error!(error = %e, "failed to initialize Gemini provider");
                eprintln!(
                    "error: Gemini API key required. Set gemini.api_key in savant.toml or the GEMINI_API_KEY env var."
                );
                e
            })?;
            Arc::new(p)
        }
    };

    let mut telegram = TelegramChannel::new(config.telegram.clone())?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter + Send + Sync> = Arc::new(telegram);

    let cancel = shutdown::install_signal_handler();

    let mut agent = AgentLoop::new(channel, provider, storage);
    agent.run(cancel).await?;

    Ok(())
}

/// Builds and initializes the configured storage backend.
async fn build_storage(
    config: &SavantConfig,
) -> Result<Arc<dyn StorageAdapter + Send + Sync>, SavantError> {
    let storage: Arc<dyn StorageAdapter + Send + Sync> = match config.storage.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStorage::new(config.storage.clone())),
        StorageBackend::Memory => {
            info!("using volatile in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };
    storage.initialize().await?;
    Ok(storage)
}

/// Initializes the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("savant={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

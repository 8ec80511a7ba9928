// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./savant.toml` > `~/.config/savant/savant.toml` > `/etc/savant/savant.toml`
//! with environment variable overrides via `SAVANT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SavantConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/savant/savant.toml` (system-wide)
/// 3. `~/.config/savant/savant.toml` (user XDG config)
/// 4. `./savant.toml` (local directory)
/// 5. `SAVANT_*` environment variables
pub fn load_config() -> Result<SavantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SavantConfig::default()))
        .merge(Toml::file("/etc/savant/savant.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("savant/savant.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("savant.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SavantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SavantConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SavantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SavantConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `SAVANT_TELEGRAM_BOT_TOKEN` must
/// map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("SAVANT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SAVANT_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("llm_", "llm.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Savant - a Telegram knowledge assistant backed by an LLM.
//!
//! This is the binary entry point for the Savant agent.

mod serve;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Savant - a Telegram knowledge assistant backed by an LLM.
#[derive(Parser, Debug)]
#[command(name = "savant", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Savant agent server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match savant_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            savant_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("savant serve failed: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("savant: use --help for available commands");
        }
    }
}

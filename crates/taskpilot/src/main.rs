// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Taskpilot - a conversational task management backend.
//!
//! This is the binary entry point for the Taskpilot server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Taskpilot - a conversational task management backend.
#[derive(Parser, Debug)]
#[command(name = "taskpilot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Taskpilot HTTP server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match taskpilot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            taskpilot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("taskpilot serve failed: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("taskpilot: use --help for available commands");
        }
    }
}

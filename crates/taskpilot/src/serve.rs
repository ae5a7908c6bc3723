// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskpilot serve` command implementation.
//!
//! Wires SQLite storage, the task tools, the OpenAI-compatible provider,
//! and the chat orchestrator into the HTTP gateway, then serves until
//! interrupted.

use std::sync::Arc;

use tracing::{error, info, warn};

use taskpilot_agent::ChatOrchestrator;
use taskpilot_config::TaskpilotConfig;
use taskpilot_core::error::TaskpilotError;
use taskpilot_core::{AuthAdapter, PluginAdapter, StorageAdapter};
use taskpilot_gateway::{GatewayState, HmacAuth, ServerConfig, start_server};
use taskpilot_openai::OpenAiProvider;
use taskpilot_storage::SqliteStorage;
use taskpilot_tasks::TaskStore;
use taskpilot_tools::{ToolRegistry, register_builtins};

/// Runs the `taskpilot serve` command.
///
/// Initializes all adapters, builds the tool registry, and serves the
/// gateway until Ctrl-C. Storage is shut down cleanly on exit.
pub async fn run_serve(config: TaskpilotConfig) -> Result<(), TaskpilotError> {
    init_tracing(&config.agent.log_level);

    info!(agent = config.agent.name.as_str(), "starting taskpilot serve");

    // Storage first; everything else reads through it.
    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };

    let store = Arc::new(TaskStore::new(storage.clone()));
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, store);
    info!(tools = registry.len(), "tool registry initialized");

    let provider = Arc::new(OpenAiProvider::new(&config).await?);

    let orchestrator = Arc::new(ChatOrchestrator::new(
        provider,
        storage.clone(),
        registry,
        config.provider.model.clone(),
        config.provider.max_tokens,
    ));

    if config.gateway.auth_secret.is_none() {
        warn!("gateway.auth_secret is not set -- every request will be rejected");
    }
    let auth: Arc<dyn AuthAdapter> = Arc::new(HmacAuth::new(config.gateway.auth_secret.clone()));

    let state = GatewayState {
        orchestrator,
        storage: storage.clone(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    tokio::select! {
        result = start_server(&server_config, state, auth) => {
            if let Err(ref e) = result {
                error!(error = %e, "gateway stopped with error");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    storage.shutdown().await?;
    info!("taskpilot serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskpilot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completions provider adapter.
//!
//! This crate implements [`ProviderAdapter`] over the `/chat/completions`
//! endpoint with function calling. The same adapter serves OpenAI,
//! OpenRouter, and Groq; credentials resolve in that precedence order
//! with the base URL following the selected credential.

pub mod client;
pub mod types;

use async_trait::async_trait;
use taskpilot_config::TaskpilotConfig;
use taskpilot_config::model::ProviderConfig;
use taskpilot_core::error::TaskpilotError;
use taskpilot_core::traits::{PluginAdapter, ProviderAdapter};
use taskpilot_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage, ToolCallData,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ApiChatMessage, ApiToolCall, ChatRequest};

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider implementing [`ProviderAdapter`].
///
/// Credential resolution order: OpenRouter key, then Groq key, then
/// OpenAI key; each config value falls back to its environment variable.
pub struct OpenAiProvider {
    client: OpenAiClient,
    system_prompt: String,
}

impl OpenAiProvider {
    /// Creates a new provider from the given configuration.
    ///
    /// # Credential Resolution
    /// 1. `provider.openrouter_api_key` / `OPENROUTER_API_KEY`
    /// 2. `provider.groq_api_key` / `GROQ_API_KEY`
    /// 3. `provider.openai_api_key` / `OPENAI_API_KEY`
    /// 4. Returns error if none is available
    ///
    /// The base URL matches the resolved credential unless
    /// `provider.base_url` overrides it.
    ///
    /// # System Prompt Resolution
    /// 1. `agent.system_prompt_file` if set and file exists (read from disk)
    /// 2. `agent.system_prompt` if set
    /// 3. Default: "You are {name}, a concise task management assistant."
    pub async fn new(config: &TaskpilotConfig) -> Result<Self, TaskpilotError> {
        let credentials = resolve_credentials(&config.provider)?;
        let system_prompt = load_system_prompt(
            &config.agent.name,
            &config.agent.system_prompt,
            &config.agent.system_prompt_file,
        )
        .await;

        let client = OpenAiClient::new(credentials.api_key, credentials.base_url.clone())?;

        info!(
            service = credentials.service,
            base_url = credentials.base_url,
            model = config.provider.model,
            "chat completions provider initialized"
        );

        Ok(Self {
            client,
            system_prompt,
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: OpenAiClient, system_prompt: String) -> Self {
        Self {
            client,
            system_prompt,
        }
    }

    /// Converts a [`ProviderRequest`] to a wire [`ChatRequest`].
    ///
    /// The system prompt becomes the leading system-role message;
    /// assistant tool calls have their argument values serialized back
    /// into the JSON-string form the wire expects.
    fn to_chat_request(&self, request: &ProviderRequest) -> ChatRequest {
        let system = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| self.system_prompt.clone());

        let mut messages = vec![ApiChatMessage::text("system", system)];
        messages.extend(request.messages.iter().map(|m| ApiChatMessage {
            role: m.role.clone(),
            content: m.content.clone(),
            tool_calls: if m.tool_calls.is_empty() {
                None
            } else {
                Some(
                    m.tool_calls
                        .iter()
                        .map(|call| ApiToolCall {
                            id: call.id.clone(),
                            type_: "function".to_string(),
                            function: crate::types::ApiFunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                        .collect(),
                )
            },
            tool_call_id: m.tool_call_id.clone(),
        }));

        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: Some(request.max_tokens),
            tools: request.tools.clone().filter(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskpilotError> {
        // A full check would make a lightweight API call, but we avoid
        // consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TaskpilotError> {
        debug!("chat completions provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TaskpilotError> {
        let api_request = self.to_chat_request(&request);
        let response = self.client.chat_completion(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TaskpilotError::Provider {
                message: "API response contained no choices".to_string(),
                source: None,
            })?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallData {
                id: call.id,
                name: call.function.name,
                arguments: parse_arguments(&call.function.arguments),
            })
            .collect();

        let usage = response.usage.unwrap_or_default();
        Ok(ProviderResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            tool_calls,
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Parses a tool call's argument string. Malformed JSON is preserved for
/// diagnosis instead of aborting the turn.
fn parse_arguments(raw: &str) -> serde_json::Value {
    if raw.is_empty() {
        return serde_json::Value::Object(serde_json::Map::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, raw, "failed to parse tool call arguments");
        serde_json::json!({"_parse_error": e.to_string(), "_raw": raw})
    })
}

/// A resolved credential and its matching base URL.
struct Credentials {
    api_key: String,
    base_url: String,
    service: &'static str,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .finish()
    }
}

/// Resolves credentials in OpenRouter -> Groq -> OpenAI precedence order.
fn resolve_credentials(config: &ProviderConfig) -> Result<Credentials, TaskpilotError> {
    let candidates: [(&Option<String>, &str, &str, &'static str); 3] = [
        (
            &config.openrouter_api_key,
            "OPENROUTER_API_KEY",
            OPENROUTER_BASE_URL,
            "openrouter",
        ),
        (&config.groq_api_key, "GROQ_API_KEY", GROQ_BASE_URL, "groq"),
        (
            &config.openai_api_key,
            "OPENAI_API_KEY",
            OPENAI_BASE_URL,
            "openai",
        ),
    ];

    for (config_key, env_var, default_url, service) in candidates {
        let key = config_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(env_var).ok().filter(|k| !k.is_empty()));
        if let Some(api_key) = key {
            let base_url = config
                .base_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| default_url.to_string());
            return Ok(Credentials {
                api_key,
                base_url,
                service,
            });
        }
    }

    Err(TaskpilotError::Config(
        "no provider API key found. Set provider.openrouter_api_key, provider.groq_api_key, \
         or provider.openai_api_key in config, or the OPENROUTER_API_KEY / GROQ_API_KEY / \
         OPENAI_API_KEY environment variable."
            .into(),
    ))
}

/// Loads the system prompt following priority: file > inline > default.
async fn load_system_prompt(
    agent_name: &str,
    inline_prompt: &Option<String>,
    prompt_file: &Option<String>,
) -> String {
    // Priority 1: file path
    if let Some(file_path) = prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if !trimmed.is_empty() {
                    info!(path = file_path, "loaded system prompt from file");
                    return trimmed;
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = file_path,
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    // Priority 2: inline string
    if let Some(prompt) = inline_prompt
        && !prompt.is_empty()
    {
        return prompt.clone();
    }

    // Priority 3: default
    format!("You are {agent_name}, a concise task management assistant.")
}

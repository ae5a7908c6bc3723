// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured responses,
//! enabling fast, CI-runnable orchestrator tests without external API calls.
//! Every request the orchestrator sends is captured for later assertions.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskpilot_core::TaskpilotError;
use taskpilot_core::traits::adapter::PluginAdapter;
use taskpilot_core::traits::provider::ProviderAdapter;
use taskpilot_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage, ToolCallData,
};

/// A mock LLM provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Incoming requests are
/// recorded so tests can inspect the exact messages and tools sent.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<ProviderResponse>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, response: ProviderResponse) {
        self.responses.lock().await.push_back(response);
    }

    /// Make every subsequent `complete` call fail with a provider error.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().await = Some(message.into());
    }

    /// Returns all requests received so far.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Builds a plain text response.
    pub fn text_response(content: impl Into<String>) -> ProviderResponse {
        ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: content.into(),
            model: "mock-model".to_string(),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        }
    }

    /// Builds a response that requests the given tool calls and has no
    /// text content, the way a function-calling turn comes back.
    pub fn tool_call_response(calls: Vec<(&str, &str, serde_json::Value)>) -> ProviderResponse {
        ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: String::new(),
            model: "mock-model".to_string(),
            tool_calls: calls
                .into_iter()
                .map(|(id, name, arguments)| ToolCallData {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments,
                })
                .collect(),
            finish_reason: Some("tool_calls".to_string()),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        }
    }

    async fn next_response(&self) -> ProviderResponse {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Self::text_response("mock response"))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskpilotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TaskpilotError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, TaskpilotError> {
        self.requests.lock().await.push(request.clone());

        if let Some(message) = self.fail_with.lock().await.clone() {
            return Err(TaskpilotError::Provider {
                message,
                source: None,
            });
        }

        let mut response = self.next_response().await;
        response.model = request.model;
        Ok(response)
    }
}

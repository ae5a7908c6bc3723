// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Taskpilot backend.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin architecture.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
}

// --- Task domain types ---

/// A stored task row. Positions are never part of the stored record;
/// they are derived from scan order at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modified timestamp.
    pub updated_at: String,
}

/// A task tagged with its current 1-indexed position in the owner's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    /// 1-indexed rank in the owner's full scan. Ephemeral.
    pub position: u32,
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskItem {
    /// Tags a task with the position it held in the scan.
    pub fn from_task(position: u32, task: &Task) -> Self {
        Self {
            position,
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: task.created_at.clone(),
            updated_at: task.updated_at.clone(),
        }
    }
}

/// Aggregate counts attached to a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: u32,
    pub pending: u32,
    pub completed: u32,
}

/// A positioned task listing: pending tasks first, then completed,
/// each keeping the position it held in the scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListing {
    pub tasks: Vec<TaskItem>,
    pub summary: TaskSummary,
}

// --- Conversation domain types ---

/// A conversation thread owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted chat message within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// Audit record for a single tool execution within a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub tool_name: String,
    /// JSON-encoded arguments as dispatched (post user_id injection).
    pub arguments: String,
    /// JSON-encoded tool result.
    pub result: String,
    pub created_at: String,
}

// --- Provider types ---

/// A single message in a provider conversation, including tool-call
/// plumbing for the assistant/tool roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// "system", "user", "assistant", or "tool".
    pub role: String,
    pub content: Option<String>,
    /// Tool calls requested by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallData>,
    /// For tool-role messages: the id of the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ProviderMessage {
    /// A plain text message with the given role.
    pub fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A tool-role message carrying the result for one tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallData {
    /// Provider-assigned call id; keys the result cache.
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    /// Tool definitions in the provider's wire format.
    pub tools: Option<Vec<serde_json::Value>>,
}

/// A response from an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    /// Concatenated text content; empty when the model only called tools.
    pub content: String,
    pub model: String,
    pub tool_calls: Vec<ToolCallData>,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

/// Token accounting for a provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// --- Auth types ---

/// An authentication token to be verified.
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// A verified identity from an auth adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: String,
}

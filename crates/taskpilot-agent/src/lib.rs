// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-calling chat orchestrator for the Taskpilot backend.
//!
//! The [`ChatOrchestrator`] drives one chat turn end to end:
//! - Resolves or creates the conversation and persists the user message
//! - Reconstructs history and makes the first model call with tool schemas
//! - Executes requested tool calls with the authenticated user id injected
//! - Feeds each cached tool result back to the model exactly once
//! - Persists and returns the assistant reply
//!
//! Multi-delete turns run in strictly descending position order so earlier
//! deletions cannot shift the positions later calls refer to.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use taskpilot_core::error::TaskpilotError;
use taskpilot_core::types::{
    ChatMessage, Conversation, ProviderMessage, ProviderRequest, ToolCallData, ToolInvocation,
};
use taskpilot_core::{ProviderAdapter, StorageAdapter};
use taskpilot_tools::{ToolOutput, ToolRegistry};

/// The result of one completed chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub conversation_id: String,
    pub reply: String,
    /// Tool calls executed this turn, in execution order, with the
    /// authenticated user id already injected into the arguments.
    pub tool_calls: Vec<ToolCallData>,
    pub created_at: String,
}

/// Orchestrates chat turns between storage, the LLM provider, and the
/// task tools.
pub struct ChatOrchestrator {
    provider: Arc<dyn ProviderAdapter>,
    storage: Arc<dyn StorageAdapter>,
    registry: ToolRegistry,
    model: String,
    max_tokens: u32,
}

impl ChatOrchestrator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        storage: Arc<dyn StorageAdapter>,
        registry: ToolRegistry,
        model: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            storage,
            registry,
            model,
            max_tokens,
        }
    }

    /// Runs one chat turn for the authenticated user.
    ///
    /// A supplied conversation id must exist and belong to the user;
    /// otherwise a fresh conversation is created. Validation and
    /// not-found failures inside tools are fed back to the model as
    /// structured results; provider failures abort the turn.
    pub async fn handle_chat(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
        content: &str,
    ) -> Result<ChatTurn, TaskpilotError> {
        let conversation = self
            .resolve_or_create_conversation(user_id, conversation_id)
            .await?;
        let conversation_id = conversation.id.clone();

        self.persist_message(&conversation_id, user_id, "user", content)
            .await?;

        // History already includes the message persisted above.
        let history: Vec<ProviderMessage> = self
            .storage
            .list_messages(&conversation_id)
            .await?
            .into_iter()
            .map(|m| ProviderMessage::text(m.role, m.content))
            .collect();

        let tools = self.registry.tool_definitions();
        let first_response = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                system_prompt: None,
                messages: history.clone(),
                max_tokens: self.max_tokens,
                tools: Some(tools.clone()),
            })
            .await?;

        if first_response.tool_calls.is_empty() {
            let reply = if first_response.content.is_empty() {
                "I processed your request.".to_string()
            } else {
                first_response.content
            };
            let created_at = self
                .persist_message(&conversation_id, user_id, "assistant", &reply)
                .await?;
            self.storage.touch_conversation(&conversation_id).await?;
            info!(
                conversation_id = conversation_id.as_str(),
                user_id, "chat turn complete without tool calls"
            );
            return Ok(ChatTurn {
                conversation_id,
                reply,
                tool_calls: Vec::new(),
                created_at,
            });
        }

        // Execute tool calls. Deletions are reordered to run highest
        // position first; everything else keeps the model's order.
        let execution_order = order_tool_calls(&first_response.tool_calls);
        let mut results: HashMap<String, ToolOutput> = HashMap::new();
        let mut executed: Vec<ToolCallData> = Vec::new();

        for call in &execution_order {
            let arguments = inject_user_id(&call.arguments, user_id);
            debug!(
                conversation_id = conversation_id.as_str(),
                tool = call.name.as_str(),
                "executing tool call"
            );

            let output = match self.registry.get(&call.name) {
                Some(tool) => tool.invoke(arguments.clone()).await?,
                None => {
                    warn!(tool = call.name.as_str(), "model requested unknown tool");
                    ToolOutput::error(format!("Unknown tool: {}", call.name))
                }
            };

            self.record_invocation(&conversation_id, user_id, &call.name, &arguments, &output)
                .await?;

            results.insert(call.id.clone(), output);
            executed.push(ToolCallData {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments,
            });
        }

        // Follow-up request: assistant tool-call message plus one
        // tool-role message per call, each cached result used once.
        let mut followup = history;
        followup.push(ProviderMessage {
            role: "assistant".to_string(),
            content: if first_response.content.is_empty() {
                None
            } else {
                Some(first_response.content.clone())
            },
            tool_calls: first_response.tool_calls.clone(),
            tool_call_id: None,
        });
        for call in &first_response.tool_calls {
            match results.remove(&call.id) {
                Some(output) => {
                    followup.push(ProviderMessage::tool_result(call.id.clone(), output.content));
                }
                None => {
                    warn!(
                        call_id = call.id.as_str(),
                        "duplicate tool call id, result already attached"
                    );
                }
            }
        }

        let final_response = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                system_prompt: None,
                messages: followup,
                max_tokens: self.max_tokens,
                tools: Some(tools),
            })
            .await?;

        let reply = if final_response.content.is_empty() {
            let count = executed.len();
            format!(
                "I've completed {count} task{} for you!",
                if count == 1 { "" } else { "s" }
            )
        } else {
            final_response.content
        };

        let created_at = self
            .persist_message(&conversation_id, user_id, "assistant", &reply)
            .await?;
        self.storage.touch_conversation(&conversation_id).await?;

        info!(
            conversation_id = conversation_id.as_str(),
            user_id,
            tool_calls = executed.len(),
            "chat turn complete"
        );

        Ok(ChatTurn {
            conversation_id,
            reply,
            tool_calls: executed,
            created_at,
        })
    }

    /// Resolves an existing conversation or creates a new one.
    ///
    /// A conversation id belonging to another user behaves exactly like
    /// a missing one.
    async fn resolve_or_create_conversation(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
    ) -> Result<Conversation, TaskpilotError> {
        if let Some(id) = conversation_id {
            return self
                .storage
                .find_conversation(id, user_id)
                .await?
                .ok_or_else(|| {
                    TaskpilotError::NotFound(format!("conversation {id} not found"))
                });
        }

        let now = now_rfc3339();
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.create_conversation(&conversation).await?;
        info!(
            conversation_id = conversation.id.as_str(),
            user_id, "created new conversation"
        );
        Ok(conversation)
    }

    async fn persist_message(
        &self,
        conversation_id: &str,
        user_id: &str,
        role: &str,
        content: &str,
    ) -> Result<String, TaskpilotError> {
        let created_at = now_rfc3339();
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            created_at: created_at.clone(),
        };
        self.storage.insert_message(&message).await?;
        Ok(created_at)
    }

    async fn record_invocation(
        &self,
        conversation_id: &str,
        user_id: &str,
        tool_name: &str,
        arguments: &serde_json::Value,
        output: &ToolOutput,
    ) -> Result<(), TaskpilotError> {
        let invocation = ToolInvocation {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            tool_name: tool_name.to_string(),
            arguments: arguments.to_string(),
            result: output.content.clone(),
            created_at: now_rfc3339(),
        };
        self.storage.record_invocation(&invocation).await
    }
}

/// Returns the execution order for a batch of tool calls.
///
/// `delete_task` calls are reordered among themselves to run in strictly
/// descending position order; all other calls keep the slot the model
/// gave them. Deleting position 2 before position 5 would make the model's
/// "position 5" mean a different task, so highest goes first.
fn order_tool_calls(calls: &[ToolCallData]) -> Vec<ToolCallData> {
    let mut deletes: Vec<ToolCallData> = calls
        .iter()
        .filter(|c| c.name == "delete_task")
        .cloned()
        .collect();
    if deletes.len() < 2 {
        return calls.to_vec();
    }
    deletes.sort_by_key(|c| std::cmp::Reverse(delete_position(c)));

    let mut deletes = deletes.into_iter();
    calls
        .iter()
        .map(|call| {
            if call.name == "delete_task" {
                deletes.next().unwrap_or_else(|| call.clone())
            } else {
                call.clone()
            }
        })
        .collect()
}

fn delete_position(call: &ToolCallData) -> u64 {
    call.arguments
        .get("task_position")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0)
}

/// Overwrites `user_id` in the call arguments with the authenticated
/// identity. A model-supplied value is never trusted.
fn inject_user_id(arguments: &serde_json::Value, user_id: &str) -> serde_json::Value {
    let mut map = match arguments {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    map.insert(
        "user_id".to_string(),
        serde_json::Value::String(user_id.to_string()),
    );
    serde_json::Value::Object(map)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

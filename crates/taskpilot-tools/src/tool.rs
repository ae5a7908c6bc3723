// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry for the task tools.
//!
//! The [`Tool`] trait defines the unified interface the orchestrator calls
//! tools through. The [`ToolRegistry`] manages tool lookup by name and
//! generates OpenAI-format function definitions for the provider request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskpilot_core::TaskpilotError;

/// Output from a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// JSON-encoded result (or structured error) returned by the tool.
    pub content: String,
    /// Whether the tool invocation resulted in an error.
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful output carrying a JSON value.
    pub fn ok(value: &serde_json::Value) -> Self {
        Self {
            content: value.to_string(),
            is_error: false,
        }
    }

    /// A structured error output of the form `{"error": "..."}`.
    pub fn error(message: impl AsRef<str>) -> Self {
        Self {
            content: serde_json::json!({ "error": message.as_ref() }).to_string(),
            is_error: true,
        }
    }
}

/// Unified trait for all task tools.
///
/// Every tool provides a name, description, JSON Schema for its parameters,
/// and an async `invoke` method. The orchestrator calls `invoke` with the
/// model's parsed arguments after injecting the authenticated user id.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's unique name (used for lookup and API serialization).
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invokes the tool with the given JSON input and returns the output.
    ///
    /// Validation and not-found failures come back as `Ok` outputs with
    /// `is_error` set, so the model can see them and recover. An `Err`
    /// return is reserved for infrastructure failures and aborts the turn.
    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError>;
}

/// Converts a store error into a tool result where the error taxonomy
/// allows it, and propagates everything else.
pub(crate) fn reportable(err: TaskpilotError) -> Result<ToolOutput, TaskpilotError> {
    if err.is_tool_reportable() {
        Ok(ToolOutput::error(err.to_string()))
    } else {
        Err(err)
    }
}

/// Registry of available tools, indexed by name.
///
/// The registry provides tool lookup for the orchestrator and generates
/// OpenAI-format function definition arrays for the provider request.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool. The tool is indexed by its `name()`.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Returns (name, description) pairs for all registered tools.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|t| (t.name(), t.description()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Returns OpenAI-format tool definitions for all registered tools.
    ///
    /// Each definition has the shape:
    /// ```json
    /// {
    ///   "type": "function",
    ///   "function": {
    ///     "name": "tool_name",
    ///     "description": "What the tool does",
    ///     "parameters": { ... JSON Schema ... }
    ///   }
    /// }
    /// ```
    pub fn tool_definitions(&self) -> Vec<serde_json::Value> {
        let mut defs: Vec<serde_json::Value> = self
            .tools
            .values()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect();
        defs.sort_by(|a, b| {
            a["function"]["name"]
                .as_str()
                .unwrap_or("")
                .cmp(b["function"]["name"].as_str().unwrap_or(""))
        });
        defs
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the input back"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string", "description": "Message to echo" }
                },
                "required": ["message"]
            })
        }

        async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
            let message = input["message"]
                .as_str()
                .unwrap_or("no message")
                .to_string();
            Ok(ToolOutput {
                content: message,
                is_error: false,
            })
        }
    }

    struct NoopTool;

    #[async_trait]
    impl Tool for NoopTool {
        fn name(&self) -> &str {
            "noop"
        }

        fn description(&self) -> &str {
            "Does nothing"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({ "type": "object", "properties": {}, "required": [] })
        }

        async fn invoke(&self, _input: serde_json::Value) -> Result<ToolOutput, TaskpilotError> {
            Ok(ToolOutput {
                content: "{}".to_string(),
                is_error: false,
            })
        }
    }

    #[test]
    fn registry_registers_and_retrieves_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let tool = registry.get("echo");
        assert!(tool.is_some());
        assert_eq!(tool.unwrap().name(), "echo");
    }

    #[test]
    fn registry_returns_none_for_unknown_tools() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_list_is_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NoopTool));
        registry.register(Arc::new(EchoTool));

        let list = registry.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].0, "echo");
        assert_eq!(list[1].0, "noop");
    }

    #[test]
    fn tool_definitions_use_openai_function_shape() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let defs = registry.tool_definitions();
        assert_eq!(defs.len(), 1);

        let def = &defs[0];
        assert_eq!(def["type"], "function");
        assert_eq!(def["function"]["name"], "echo");
        assert_eq!(def["function"]["description"], "Echoes the input back");
        assert_eq!(def["function"]["parameters"]["type"], "object");
        assert!(def["function"]["parameters"]["properties"]["message"].is_object());
    }

    #[test]
    fn tool_definitions_multiple_tools_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NoopTool));
        registry.register(Arc::new(EchoTool));

        let defs = registry.tool_definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0]["function"]["name"], "echo");
        assert_eq!(defs[1]["function"]["name"], "noop");
    }

    #[test]
    fn tool_output_error_is_structured_json() {
        let output = ToolOutput::error("no task at position 7");
        assert!(output.is_error);
        let value: serde_json::Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(value["error"], "no task at position 7");
    }

    #[tokio::test]
    async fn tool_invoke_returns_correct_output() {
        let tool = EchoTool;
        let input = serde_json::json!({"message": "hello world"});
        let output = tool.invoke(input).await.unwrap();
        assert_eq!(output.content, "hello world");
        assert!(!output.is_error);
    }
}

// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/users/{user_id}/chat, the conversation listing and
//! history endpoints, and GET /health.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use taskpilot_core::TaskpilotError;
use taskpilot_core::types::{AuthIdentity, ChatMessage, Conversation};

use crate::server::GatewayState;

/// Request body for POST /v1/users/{user_id}/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
    /// Optional conversation id to continue an existing thread.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response body for POST /v1/users/{user_id}/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    /// Assistant reply text.
    pub reply: String,
    /// RFC 3339 timestamp of the reply.
    pub created_at: String,
}

/// Response body for GET /v1/users/{user_id}/conversations.
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    /// The user's conversations, newest first.
    pub conversations: Vec<Conversation>,
}

/// Response body for the conversation history endpoint.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub conversation_id: String,
    /// Transcript ordered by creation time.
    pub messages: Vec<ChatMessage>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps a domain error to an HTTP response.
///
/// Provider and internal failures return opaque messages; details stay
/// in the logs.
fn error_response(err: TaskpilotError) -> Response {
    let (status, message) = match err {
        TaskpilotError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        TaskpilotError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        TaskpilotError::Authorization(_) => {
            (StatusCode::FORBIDDEN, "forbidden".to_string())
        }
        TaskpilotError::Provider { message, .. } => {
            tracing::error!(error = message.as_str(), "provider failure");
            (
                StatusCode::BAD_GATEWAY,
                "the assistant is unavailable, please try again".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message })).into_response()
}

/// Rejects callers addressing another user's path segment.
fn enforce_path_identity(identity: &AuthIdentity, user_id: &str) -> Result<(), TaskpilotError> {
    if identity.user_id == user_id {
        Ok(())
    } else {
        Err(TaskpilotError::Authorization(format!(
            "token user {} does not match path user {user_id}",
            identity.user_id
        )))
    }
}

/// POST /v1/users/{user_id}/chat
///
/// Runs one chat turn for the authenticated user and returns the
/// assistant reply with the (possibly newly created) conversation id.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if let Err(err) = enforce_path_identity(&identity, &user_id) {
        return error_response(err);
    }

    let result = state
        .orchestrator
        .handle_chat(&user_id, body.conversation_id.as_deref(), &body.message)
        .await;

    match result {
        Ok(turn) => (
            StatusCode::OK,
            Json(ChatResponse {
                conversation_id: turn.conversation_id,
                reply: turn.reply,
                created_at: turn.created_at,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /v1/users/{user_id}/conversations
pub async fn get_conversations(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
    Extension(identity): Extension<AuthIdentity>,
) -> Response {
    if let Err(err) = enforce_path_identity(&identity, &user_id) {
        return error_response(err);
    }

    match state.storage.list_conversations(&user_id).await {
        Ok(conversations) => (
            StatusCode::OK,
            Json(ConversationListResponse { conversations }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /v1/users/{user_id}/conversations/{conversation_id}/messages
///
/// A conversation that does not exist or belongs to another user is a
/// plain 404 either way.
pub async fn get_messages(
    State(state): State<GatewayState>,
    Path((user_id, conversation_id)): Path<(String, String)>,
    Extension(identity): Extension<AuthIdentity>,
) -> Response {
    if let Err(err) = enforce_path_identity(&identity, &user_id) {
        return error_response(err);
    }

    let found = match state
        .storage
        .find_conversation(&conversation_id, &user_id)
        .await
    {
        Ok(found) => found,
        Err(err) => return error_response(err),
    };
    if found.is_none() {
        return error_response(TaskpilotError::NotFound(format!(
            "conversation {conversation_id} not found"
        )));
    }

    match state.storage.list_messages(&conversation_id).await {
        Ok(messages) => (
            StatusCode::OK,
            Json(MessageListResponse {
                conversation_id,
                messages,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

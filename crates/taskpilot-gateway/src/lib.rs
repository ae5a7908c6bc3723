// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Taskpilot backend.
//!
//! Exposes the chat endpoint and conversation listing/history over axum,
//! behind fail-closed HMAC bearer authentication. Each authenticated
//! request is scoped to the user id in its path; addressing another
//! user's path is rejected before any task logic runs.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::HmacAuth;
pub use server::{GatewayState, ServerConfig, router, start_server};

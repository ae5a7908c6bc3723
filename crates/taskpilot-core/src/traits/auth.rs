// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for identity verification.

use async_trait::async_trait;

use crate::error::TaskpilotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AuthIdentity, AuthToken};

/// Adapter for authenticating and verifying user identity.
///
/// Auth adapters validate tokens and resolve them to verified identities.
/// Verification failures are reported as [`TaskpilotError::Authorization`].
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Authenticates the given token and returns the verified identity.
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, TaskpilotError>;
}

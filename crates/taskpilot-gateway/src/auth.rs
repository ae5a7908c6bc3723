// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC bearer token authentication for the gateway.
//!
//! Tokens have the form `<user_id>.<signature>` where the signature is
//! the lowercase hex HMAC-SHA256 of the user id under the shared gateway
//! secret. When no secret is configured, every request is rejected
//! (fail-closed).

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use taskpilot_core::types::{AdapterType, AuthIdentity, AuthToken, HealthStatus};
use taskpilot_core::{AuthAdapter, PluginAdapter, TaskpilotError};

type HmacSha256 = Hmac<Sha256>;

/// Auth adapter verifying HMAC-signed bearer tokens.
#[derive(Clone)]
pub struct HmacAuth {
    secret: Option<String>,
}

impl HmacAuth {
    /// Create an auth adapter. `secret: None` means fail-closed: every
    /// authentication attempt is rejected.
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Signs a user id into a complete bearer token.
    pub fn issue_token(secret: &str, user_id: &str) -> Result<String, TaskpilotError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TaskpilotError::Internal(format!("invalid hmac key: {e}")))?;
        mac.update(user_id.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{user_id}.{signature}"))
    }
}

impl std::fmt::Debug for HmacAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacAuth")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[async_trait]
impl PluginAdapter for HmacAuth {
    fn name(&self) -> &str {
        "hmac-auth"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskpilotError> {
        if self.secret.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(
                "no auth secret configured, rejecting all requests".to_string(),
            ))
        }
    }

    async fn shutdown(&self) -> Result<(), TaskpilotError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for HmacAuth {
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, TaskpilotError> {
        let Some(ref secret) = self.secret else {
            tracing::error!("gateway has no auth secret configured -- rejecting request");
            return Err(TaskpilotError::Authorization(
                "authentication is not configured".to_string(),
            ));
        };

        let Some((user_id, signature_hex)) = token.0.split_once('.') else {
            return Err(TaskpilotError::Authorization(
                "malformed bearer token".to_string(),
            ));
        };
        if user_id.is_empty() {
            return Err(TaskpilotError::Authorization(
                "malformed bearer token".to_string(),
            ));
        }

        let signature = hex::decode(signature_hex).map_err(|_| {
            TaskpilotError::Authorization("malformed token signature".to_string())
        })?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TaskpilotError::Internal(format!("invalid hmac key: {e}")))?;
        mac.update(user_id.as_bytes());
        mac.verify_slice(&signature).map_err(|_| {
            TaskpilotError::Authorization("invalid token signature".to_string())
        })?;

        Ok(AuthIdentity {
            user_id: user_id.to_string(),
        })
    }
}

/// Middleware that resolves the bearer token to a verified identity and
/// stores it in the request extensions for handlers to read.
pub async fn auth_middleware(
    State(auth): State<Arc<dyn AuthAdapter>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match auth.authenticate(AuthToken(token.to_string())).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(err) => {
            tracing::debug!(error = %err, "bearer auth rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates() {
        let auth = HmacAuth::new(Some("test-secret".to_string()));
        let token = HmacAuth::issue_token("test-secret", "alice").unwrap();

        let identity = auth.authenticate(AuthToken(token)).await.unwrap();
        assert_eq!(identity.user_id, "alice");
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let auth = HmacAuth::new(Some("test-secret".to_string()));
        let token = HmacAuth::issue_token("other-secret", "alice").unwrap();

        let err = auth.authenticate(AuthToken(token)).await.unwrap_err();
        assert!(matches!(err, TaskpilotError::Authorization(_)));
    }

    #[tokio::test]
    async fn user_id_swap_invalidates_the_token() {
        let auth = HmacAuth::new(Some("test-secret".to_string()));
        let token = HmacAuth::issue_token("test-secret", "alice").unwrap();
        let signature = token.split_once('.').unwrap().1.to_string();

        let err = auth
            .authenticate(AuthToken(format!("bob.{signature}")))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskpilotError::Authorization(_)));
    }

    #[tokio::test]
    async fn missing_secret_fails_closed() {
        let auth = HmacAuth::new(None);
        let token = HmacAuth::issue_token("any-secret", "alice").unwrap();

        let err = auth.authenticate(AuthToken(token)).await.unwrap_err();
        assert!(matches!(err, TaskpilotError::Authorization(_)));
    }

    #[tokio::test]
    async fn malformed_tokens_are_rejected() {
        let auth = HmacAuth::new(Some("test-secret".to_string()));
        for bad in ["no-dot-here", ".abcdef", "alice.not-hex"] {
            let err = auth
                .authenticate(AuthToken(bad.to_string()))
                .await
                .unwrap_err();
            assert!(matches!(err, TaskpilotError::Authorization(_)), "{bad}");
        }
    }

    #[tokio::test]
    async fn health_check_reports_missing_secret() {
        let auth = HmacAuth::new(None);
        let status = auth.health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Degraded(_)));

        let auth = HmacAuth::new(Some("s".to_string()));
        assert_eq!(auth.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[test]
    fn debug_redacts_the_secret() {
        let auth = HmacAuth::new(Some("super-secret".to_string()));
        let debug_output = format!("{auth:?}");
        assert!(!debug_output.contains("super-secret"));
        assert!(debug_output.contains("[redacted]"));
    }
}

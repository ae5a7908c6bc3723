// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Taskpilot conversational task backend.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Taskpilot workspace. All adapter plugins
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TaskpilotError;
pub use types::{AdapterType, HealthStatus};

// Re-export all adapter traits at crate root.
pub use traits::{AuthAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taskpilot_error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _config = TaskpilotError::Config("test".into());
        let _validation = TaskpilotError::Validation("test".into());
        let _not_found = TaskpilotError::NotFound("test".into());
        let _authorization = TaskpilotError::Authorization("test".into());
        let _storage = TaskpilotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = TaskpilotError::Provider {
            message: "test".into(),
            source: None,
        };
        let _internal = TaskpilotError::Internal("test".into());
    }

    #[test]
    fn adapter_type_serialization() {
        let storage = AdapterType::Storage;
        let json = serde_json::to_string(&storage).expect("should serialize");
        let parsed: AdapterType = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(storage, parsed);
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the adapter traits compile and are accessible through
        // the public API. A missing module makes this test fail to compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_auth_adapter<T: AuthAdapter>() {}
    }
}

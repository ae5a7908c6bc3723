// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Taskpilot integration tests.
//!
//! Provides a scriptable mock provider for fast, deterministic,
//! CI-runnable orchestrator tests without external services.

pub mod mock_provider;

pub use mock_provider::MockProvider;

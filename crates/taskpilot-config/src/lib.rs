// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Taskpilot backend.
//!
//! TOML files are layered (system, XDG, local) with `TASKPILOT_*`
//! environment overrides on top. Models reject unknown keys, and
//! failures render as miette diagnostics with source spans and
//! "did you mean" typo suggestions, so a misspelled `provider.modle`
//! points at the exact line instead of silently falling back to the
//! default model.
//!
//! # Usage
//!
//! ```no_run
//! use taskpilot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("serving on {}:{}", config.gateway.host, config.gateway.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TaskpilotConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Deserialization failures are converted to miette diagnostics (with
/// the TOML sources re-read so spans can point into them); a config
/// that deserializes still has to pass post-deserialization
/// validation. Errors come back as a list so the caller can render
/// every problem in one pass.
pub fn load_and_validate() -> Result<TaskpilotConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<TaskpilotConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Re-reads whichever config files exist so diagnostics can carry
/// source spans. Keyed by the same paths figment reports in its error
/// metadata, which is why the local file is keyed by absolute path.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string("taskpilot.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("taskpilot.toml").display().to_string())
            .unwrap_or_else(|_| "taskpilot.toml".to_string());
        sources.push((path, content));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("taskpilot/taskpilot.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = std::path::Path::new("/etc/taskpilot/taskpilot.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! All errors are collected; validation does not fail fast.

use spsetup_core::SetupError;
use spsetup_plugin::FlatSpec;

use crate::diagnostic::ConfigError;
use crate::model::SetupConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &SetupConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let flat = match FlatSpec::parse(&config.steampipe_plugins) {
        Ok(flat) => Some(flat),
        Err(e) => {
            errors.push(ConfigError::Input(e));
            None
        }
    };
    if let Some(flat) = &flat
        && !flat.is_empty()
        && !config.plugin_connections.trim().is_empty()
    {
        errors.push(ConfigError::Input(SetupError::MutuallyExclusiveInputs));
    }

    if config.steampipe_version.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "steampipe_version must not be empty".to_string(),
        });
    }

    if !(1..=100).contains(&config.release.per_page) {
        errors.push(ConfigError::Validation {
            message: format!(
                "release.per_page must be between 1 and 100, got {}",
                config.release.per_page
            ),
        });
    }

    if config.release.pages < 1 {
        errors.push(ConfigError::Validation {
            message: "release.pages must be at least 1".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level `{}` is not one of {}",
                config.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.runner.home().is_none() {
        errors.push(ConfigError::Validation {
            message: "runner.home is not set and HOME is not defined".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

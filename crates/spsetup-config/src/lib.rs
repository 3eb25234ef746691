// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for a setup run.
//!
//! Layers compiled defaults, an optional `spsetup.toml`, action inputs, and
//! the runner environment, then validates the result. Errors render as
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! let config = spsetup_config::load_and_validate(None).expect("config errors");
//! println!("constraint: {}", config.steampipe_version);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str, LOCAL_CONFIG_FILE};
pub use model::{ReleaseConfig, RunnerConfig, SetupConfig};

/// Load from `path` (or `./spsetup.toml`) plus the environment, then validate.
pub fn load_and_validate(path: Option<&Path>) -> Result<SetupConfig, Vec<ConfigError>> {
    if let Some(path) = path
        && !path.is_file()
    {
        return Err(vec![ConfigError::Other(format!(
            "config file `{}` does not exist",
            path.display()
        ))]);
    }

    match loader::build_figment(path).extract::<SetupConfig>() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = read_source(path.unwrap_or(Path::new(LOCAL_CONFIG_FILE)));
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load from a TOML string only and validate. Useful for testing.
pub fn load_and_validate_str(toml_content: &str) -> Result<SetupConfig, Vec<ConfigError>> {
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

/// The CLI config directory, `<home>/.steampipe/config`.
pub fn config_dir(config: &SetupConfig) -> Option<PathBuf> {
    config.runner.home().map(spsetup_plugin::config_dir_for_home)
}

/// Source file content keyed by the absolute path figment reports.
fn read_source(path: &Path) -> Vec<(String, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    vec![(absolute.display().to_string(), content)]
}

// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for a setup run.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key in
//! `spsetup.toml` fails the run instead of being ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    /// Version constraint for the CLI: `latest` or a semver range.
    #[serde(default = "default_steampipe_version")]
    pub steampipe_version: String,

    /// Complete connection document (JSON or HCL), written verbatim.
    #[serde(default)]
    pub plugin_connections: String,

    /// JSON text of the flat plugin form.
    #[serde(default)]
    pub steampipe_plugins: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// Paths and flags provided by the CI runner.
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            steampipe_version: default_steampipe_version(),
            plugin_connections: String::new(),
            steampipe_plugins: String::new(),
            log_level: default_log_level(),
            release: ReleaseConfig::default(),
            runner: RunnerConfig::default(),
        }
    }
}

fn default_steampipe_version() -> String {
    "latest".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where releases are listed and downloaded from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_download_url")]
    pub download_url: String,

    /// Releases per listing page. GitHub caps this at 100.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Number of listing pages fetched.
    #[serde(default = "default_pages")]
    pub pages: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            download_url: default_download_url(),
            per_page: default_per_page(),
            pages: default_pages(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com/repos/turbot/steampipe/releases".to_string()
}

fn default_download_url() -> String {
    "https://github.com/turbot/steampipe/releases/download".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_pages() -> u32 {
    3
}

fn default_user_agent() -> String {
    "setup-steampipe".to_string()
}

/// Runner-provided locations. Unset fields fall back to paths under `home`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Root of the versioned tool cache.
    #[serde(default)]
    pub tool_cache: Option<PathBuf>,

    /// Scratch directory for downloads.
    #[serde(default)]
    pub temp: Option<PathBuf>,

    /// File receiving `name=value` step outputs.
    #[serde(default)]
    pub github_output: Option<PathBuf>,

    /// File receiving directories to prepend to `PATH`.
    #[serde(default)]
    pub github_path: Option<PathBuf>,

    /// Set when the runner has step debug logging enabled.
    #[serde(default)]
    pub debug: bool,
}

impl RunnerConfig {
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// `tool_cache`, else `<home>/actions/cache`.
    pub fn tool_cache_dir(&self) -> Option<PathBuf> {
        self.tool_cache
            .clone()
            .or_else(|| self.home().map(|h| h.join("actions").join("cache")))
    }

    /// `temp`, else `<home>/actions/temp`.
    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.temp
            .clone()
            .or_else(|| self.home().map(|h| h.join("actions").join("temp")))
    }
}

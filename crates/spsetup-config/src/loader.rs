// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `./spsetup.toml`, or the file passed with `--config`
//! 3. Action inputs (`INPUT_STEAMPIPE-VERSION`, `INPUT_PLUGIN-CONNECTIONS`,
//!    `INPUT_STEAMPIPE-PLUGINS`)
//! 4. Runner environment (`HOME`, `RUNNER_TOOL_CACHE`, `RUNNER_TEMP`,
//!    `GITHUB_OUTPUT`, `GITHUB_PATH`, `RUNNER_DEBUG`)
//! 5. `SPSETUP_*` environment variables (`SPSETUP_STEAMPIPE_VERSION`,
//!    `SPSETUP_PLUGIN_CONNECTIONS` and `SPSETUP_STEAMPIPE_PLUGINS` stay strings)

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Serialize;

use crate::model::SetupConfig;

/// Config file looked up in the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "spsetup.toml";

/// Action input variable -> config key. Input names keep their hyphens.
const INPUTS: &[(&str, &str)] = &[
    ("INPUT_STEAMPIPE-VERSION", "steampipe_version"),
    ("INPUT_PLUGIN-CONNECTIONS", "plugin_connections"),
    ("INPUT_STEAMPIPE-PLUGINS", "steampipe_plugins"),
];

/// `SPSETUP_*` overrides of the same string keys, kept away from `Env`.
const STRING_OVERRIDES: &[(&str, &str)] = &[
    ("SPSETUP_STEAMPIPE_VERSION", "steampipe_version"),
    ("SPSETUP_PLUGIN_CONNECTIONS", "plugin_connections"),
    ("SPSETUP_STEAMPIPE_PLUGINS", "steampipe_plugins"),
];

/// String inputs that were actually supplied.
///
/// Carried through `Serialized` rather than `Env` so values stay plain
/// strings: a JSON object or `0.20` must not be reinterpreted.
#[derive(Debug, Default, Serialize)]
struct ActionInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    steampipe_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin_connections: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steampipe_plugins: Option<String>,
}

impl ActionInputs {
    fn from_lookup(vars: &[(&str, &str)], lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut inputs = Self::default();
        for (var, key) in vars {
            // Unset inputs arrive as empty strings.
            let Some(value) = lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
            else {
                continue;
            };
            match *key {
                "steampipe_version" => inputs.steampipe_version = Some(value),
                "plugin_connections" => inputs.plugin_connections = Some(value),
                _ => inputs.steampipe_plugins = Some(value),
            }
        }
        inputs
    }
}

#[derive(Debug, Default, Serialize)]
struct RunnerEnv {
    #[serde(skip_serializing_if = "Option::is_none")]
    home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_cache: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    github_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    github_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
}

impl RunnerEnv {
    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            home: get("HOME"),
            tool_cache: get("RUNNER_TOOL_CACHE"),
            temp: get("RUNNER_TEMP"),
            github_output: get("GITHUB_OUTPUT"),
            github_path: get("GITHUB_PATH"),
            debug: get("RUNNER_DEBUG").map(|v| v == "1"),
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Load configuration from the working directory and the process environment.
pub fn load_config() -> Result<SetupConfig, figment::Error> {
    build_figment(None).extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SetupConfig, figment::Error> {
    build_figment(Some(path)).extract()
}

/// Load configuration from a TOML string only (no env lookup).
pub fn load_config_from_str(toml_content: &str) -> Result<SetupConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SetupConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Build the Figment used for loading, before extraction.
pub fn build_figment(path: Option<&Path>) -> Figment {
    build_figment_with(path, &process_env)
}

/// Like [`build_figment`], with input and runner variables read through `lookup`.
///
/// `SPSETUP_STEAMPIPE_VERSION`, `SPSETUP_PLUGIN_CONNECTIONS` and
/// `SPSETUP_STEAMPIPE_PLUGINS` are read through `lookup` as well. Other
/// `SPSETUP_*` overrides always come from the process environment.
pub fn build_figment_with(path: Option<&Path>, lookup: &dyn Fn(&str) -> Option<String>) -> Figment {
    let file = match path {
        Some(path) => Toml::file(path),
        None => Toml::file(LOCAL_CONFIG_FILE),
    };

    Figment::new()
        .merge(Serialized::defaults(SetupConfig::default()))
        .merge(file)
        .merge(Serialized::defaults(ActionInputs::from_lookup(INPUTS, lookup)))
        .merge(Serialized::default("runner", RunnerEnv::from_lookup(lookup)))
        .merge(env_provider())
        .merge(Serialized::defaults(ActionInputs::from_lookup(
            STRING_OVERRIDES,
            lookup,
        )))
}

/// `SPSETUP_RELEASE_API_URL` -> `release.api_url`, `SPSETUP_RUNNER_HOME` -> `runner.home`.
///
/// Uses `Env::map()` rather than `Env::split("_")` since keys contain underscores.
/// The top-level string keys are ignored here; `Env` would parse `0.20` as a float.
fn env_provider() -> Env {
    Env::prefixed("SPSETUP_")
        .ignore(&["steampipe_version", "plugin_connections", "steampipe_plugins"])
        .map(|key| {
            key.as_str()
                .replacen("release_", "release.", 1)
                .replacen("runner_", "runner.", 1)
                .into()
        })
}

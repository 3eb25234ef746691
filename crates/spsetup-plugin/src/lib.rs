// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Steampipe plugin connection configuration.
//!
//! Two mutually exclusive input shapes produce the CLI's on-disk connection
//! config and the set of plugins to install:
//!
//! - the flat form ([`FlatSpec`]), one generated `<plugin>.json` per plugin;
//! - a connection document (JSON or HCL), written verbatim.

pub mod connection;
pub mod flat;
pub mod format;
pub mod writer;

pub use connection::{build_from_connection_document, ConnectionBuild};
pub use flat::{build_from_flat_spec, connection_config, short_name, FlatBuild, FlatSpec, PluginSettings};
pub use format::detect;
pub use writer::{
    config_dir_for_home, remove_if_exists, ConfigWriter, DEFAULT_OPTIONS, DEFAULT_OPTIONS_FILE,
};

use std::path::Path;

use spsetup_core::{ConfigFile, SetupError};

/// The plugin input chosen for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginInput {
    None,
    Flat(FlatSpec),
    Connections(String),
}

/// Everything derived from a [`PluginInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum PluginPlan {
    None,
    Flat(FlatBuild),
    Connections(ConnectionBuild),
}

impl PluginInput {
    /// Pick the input shape; supplying both is an error.
    pub fn select(flat: FlatSpec, connections: &str) -> Result<Self, SetupError> {
        match (flat.is_empty(), connections.trim().is_empty()) {
            (false, false) => Err(SetupError::MutuallyExclusiveInputs),
            (false, true) => Ok(PluginInput::Flat(flat)),
            (true, false) => Ok(PluginInput::Connections(connections.to_string())),
            (true, true) => Ok(PluginInput::None),
        }
    }

    pub fn plan(&self, config_dir: &Path) -> Result<PluginPlan, SetupError> {
        match self {
            PluginInput::None => Ok(PluginPlan::None),
            PluginInput::Flat(spec) => build_from_flat_spec(spec, config_dir).map(PluginPlan::Flat),
            PluginInput::Connections(doc) => {
                build_from_connection_document(doc, config_dir).map(PluginPlan::Connections)
            }
        }
    }
}

impl PluginPlan {
    pub fn plugin_ids(&self) -> &[String] {
        match self {
            PluginPlan::None => &[],
            PluginPlan::Flat(build) => &build.plugin_ids,
            PluginPlan::Connections(build) => &build.plugin_ids,
        }
    }

    pub fn files(&self) -> Vec<&ConfigFile> {
        match self {
            PluginPlan::None => Vec::new(),
            PluginPlan::Flat(build) => build.files.iter().collect(),
            PluginPlan::Connections(build) => vec![&build.file],
        }
    }

    /// Persist the plan with `writer`.
    pub async fn apply(&self, writer: &ConfigWriter) -> Result<(), SetupError> {
        match self {
            PluginPlan::None => Ok(()),
            PluginPlan::Flat(build) => writer.write_flat(build).await,
            PluginPlan::Connections(build) => writer.replace_with_connections(build).await,
        }
    }
}

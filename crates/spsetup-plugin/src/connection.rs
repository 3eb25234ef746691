// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection documents: a complete CLI connection config supplied verbatim.
//!
//! JSON form:
//!
//! ```json
//! { "connection": { "net": { "plugin": "net" }, "net_2": { "plugin": "net" } } }
//! ```
//!
//! HCL form:
//!
//! ```hcl
//! connection "net" {
//!   plugin  = "net"
//!   timeout = 3000
//! }
//! ```
//!
//! The document is written unchanged; only the plugin set and the file
//! extension are derived from it.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use spsetup_core::{ConfigFile, ConfigFormat, SetupError};
use tracing::{debug, warn};

use crate::format::detect;

/// Top-level key (JSON) or block identifier (HCL) holding connections.
pub const CONNECTION_KEY: &str = "connection";

/// File stem the document is written under.
pub const CONNECTIONS_FILE_STEM: &str = "connections";

/// Output of [`build_from_connection_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionBuild {
    /// De-duplicated plugin identifiers, in first-seen order.
    pub plugin_ids: Vec<String>,
    pub format: ConfigFormat,
    /// The original document under `connections.json` or `connections.spc`.
    pub file: ConfigFile,
}

/// One `connection "<name>" { ... }` block, reduced to what we read from it.
#[derive(Debug, Clone, PartialEq)]
struct ConnectionBlock {
    name: String,
    plugin: Option<String>,
}

/// Derive the plugin set and config file from a connection document.
pub fn build_from_connection_document(
    document: &str,
    config_dir: &Path,
) -> Result<ConnectionBuild, SetupError> {
    let format = detect(document);
    let plugins = match format {
        ConfigFormat::Json => json_plugins(document).inspect_err(|_| {
            warn!("Failed to get plugins to install from JSON config");
        })?,
        ConfigFormat::Hcl => hcl_plugins(document).inspect_err(|_| {
            warn!("Failed to get plugins to install from HCL config");
        })?,
        ConfigFormat::Unknown => return Err(SetupError::UnknownFormat),
    };

    let plugin_ids = dedup(plugins);
    if plugin_ids.is_empty() {
        return Err(SetupError::NoPlugins {
            input: "plugin-connections".to_string(),
        });
    }

    let extension = format.extension().ok_or(SetupError::UnknownFormat)?;
    let path = config_dir.join(format!("{CONNECTIONS_FILE_STEM}{extension}"));
    debug!(?plugin_ids, %format, "parsed connection document");

    Ok(ConnectionBuild {
        plugin_ids,
        format,
        file: ConfigFile::new(path, document),
    })
}

fn missing_connection_key() -> SetupError {
    SetupError::MissingKey {
        key: CONNECTION_KEY.to_string(),
    }
}

fn json_plugins(document: &str) -> Result<Vec<String>, SetupError> {
    let parsed: Value = serde_json::from_str(document)
        .map_err(|e| SetupError::Config(format!("invalid JSON connection config: {e}")))?;
    let connections = parsed.get(CONNECTION_KEY).ok_or_else(missing_connection_key)?;

    let entries: Box<dyn Iterator<Item = (String, &Value)> + '_> = match connections {
        Value::Object(map) => Box::new(map.iter().map(|(name, v)| (name.clone(), v))),
        Value::Array(list) => Box::new(list.iter().enumerate().map(|(i, v)| (i.to_string(), v))),
        other => {
            return Err(SetupError::Config(format!(
                "'{CONNECTION_KEY}' must be an object of named connections, found {other}"
            )));
        }
    };

    let mut plugins = Vec::new();
    for (name, entry) in entries {
        match entry.get("plugin").and_then(Value::as_str) {
            Some(plugin) => plugins.push(plugin.to_string()),
            None => warn!(connection = %name, "connection has no plugin field, skipping"),
        }
    }
    Ok(plugins)
}

fn hcl_plugins(document: &str) -> Result<Vec<String>, SetupError> {
    let body = hcl::parse(document)
        .map_err(|e| SetupError::Config(format!("invalid HCL connection config: {e}")))?;

    let blocks: Vec<ConnectionBlock> = body
        .blocks()
        .filter(|block| block.identifier() == CONNECTION_KEY)
        .map(|block| ConnectionBlock {
            name: block
                .labels()
                .first()
                .map(|label| label.as_str().to_string())
                .unwrap_or_default(),
            plugin: block
                .body()
                .attributes()
                .find(|attr| attr.key() == "plugin")
                .and_then(|attr| match attr.expr() {
                    hcl::Expression::String(plugin) => Some(plugin.clone()),
                    _ => None,
                }),
        })
        .collect();

    if blocks.is_empty() {
        return Err(missing_connection_key());
    }

    let mut plugins = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block.plugin {
            Some(plugin) => plugins.push(plugin),
            None => warn!(connection = %block.name, "connection has no plugin attribute, skipping"),
        }
    }
    Ok(plugins)
}

/// Keep the first occurrence of each identifier.
fn dedup(plugins: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    plugins
        .into_iter()
        .filter(|plugin| seen.insert(plugin.clone()))
        .collect()
}

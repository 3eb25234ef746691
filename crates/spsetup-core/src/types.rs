// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the builder, writer, and orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One unit of persisted CLI configuration: a target path and its full content.
///
/// Each run overwrites; there are no update semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Detected serialization of a connection document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Hcl,
    Unknown,
}

impl ConfigFormat {
    /// File extension (with the leading dot) the CLI expects for this format.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ConfigFormat::Json => Some(".json"),
            ConfigFormat::Hcl => Some(".spc"),
            ConfigFormat::Unknown => None,
        }
    }
}

/// Outcome of an idempotent delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

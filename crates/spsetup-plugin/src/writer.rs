// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persists built configuration into the CLI config directory.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use spsetup_core::{ConfigFile, Removal, SetupError};
use tracing::{debug, info};

use crate::connection::ConnectionBuild;
use crate::flat::FlatBuild;

/// Name of the general options file written before the first CLI call.
pub const DEFAULT_OPTIONS_FILE: &str = "default.spc";

/// Disables the CLI's update check, which is noise on CI runners.
pub const DEFAULT_OPTIONS: &str = "options \"general\" {\n  update_check = false\n}\n";

/// `<home>/.steampipe/config`
pub fn config_dir_for_home(home: &Path) -> PathBuf {
    home.join(".steampipe").join("config")
}

/// Delete `path`, treating "does not exist" as a normal outcome.
pub async fn remove_if_exists(path: &Path) -> Result<Removal, SetupError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Removal::NotFound),
        Err(e) => Err(SetupError::io(path, e)),
    }
}

/// Writes config files under one directory.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    config_dir: PathBuf,
}

impl ConfigWriter {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    async fn ensure_dir(&self) -> Result<(), SetupError> {
        tokio::fs::create_dir_all(&self.config_dir)
            .await
            .map_err(|e| SetupError::io(&self.config_dir, e))
    }

    async fn write_file(file: &ConfigFile) -> Result<(), SetupError> {
        debug!(path = %file.path.display(), bytes = file.content.len(), "writing config file");
        tokio::fs::write(&file.path, &file.content)
            .await
            .map_err(|e| SetupError::io(&file.path, e))
    }

    /// Write `default.spc` with the general options block.
    pub async fn write_default_options(&self) -> Result<PathBuf, SetupError> {
        self.ensure_dir().await?;
        let file = ConfigFile::new(self.config_dir.join(DEFAULT_OPTIONS_FILE), DEFAULT_OPTIONS);
        Self::write_file(&file).await?;
        Ok(file.path)
    }

    /// Write per-plugin JSON files concurrently, then drop stale `.spc` siblings.
    pub async fn write_flat(&self, build: &FlatBuild) -> Result<(), SetupError> {
        self.ensure_dir().await?;
        try_join_all(build.files.iter().map(|file| Self::write_file(file))).await?;

        for stale in &build.stale {
            if remove_if_exists(stale).await? == Removal::Removed {
                debug!(path = %stale.display(), "removed stale config file");
            }
        }
        Ok(())
    }

    /// Remove every entry in the config directory. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, SetupError> {
        info!("Deleting all files in {}", self.config_dir.display());

        let mut entries = match tokio::fs::read_dir(&self.config_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(SetupError::io(&self.config_dir, e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SetupError::io(&self.config_dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| SetupError::io(&path, e))?;
            let result = if file_type.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };
            result.map_err(|e| SetupError::io(&path, e))?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Replace the whole directory content with one connection document.
    pub async fn replace_with_connections(&self, build: &ConnectionBuild) -> Result<(), SetupError> {
        self.clear().await?;
        self.ensure_dir().await?;
        info!("Writing connections into {}", build.file.path.display());
        Self::write_file(&build.file).await
    }
}

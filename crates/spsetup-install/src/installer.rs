// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetches a CLI release archive, extracts it, and stores it in the tool cache.

use std::path::{Path, PathBuf};

use spsetup_core::{SetupError, SupportedPlatform};
use tracing::{debug, info};

use crate::cache::ToolCache;
use crate::target::{archive_kind, download_url, ArchiveKind};

/// Installs a given CLI version into the tool cache.
#[derive(Debug, Clone)]
pub struct Installer {
    client: reqwest::Client,
    download_base: String,
    cache: ToolCache,
    temp_root: PathBuf,
    platform: SupportedPlatform,
}

impl Installer {
    pub fn new(
        download_base: impl Into<String>,
        cache: ToolCache,
        temp_root: impl Into<PathBuf>,
        platform: SupportedPlatform,
        user_agent: &str,
    ) -> Result<Self, SetupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| SetupError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            download_base: download_base.into(),
            cache,
            temp_root: temp_root.into(),
            platform,
        })
    }

    /// Returns the directory containing the `steampipe` binary for `version`.
    pub async fn install(&self, version: &str) -> Result<PathBuf, SetupError> {
        if let Some(path) = self.cache.find(version, self.platform.arch) {
            info!("Found in cache @ {}", path.display());
            return Ok(path);
        }

        let url = download_url(&self.download_base, version, self.platform);
        info!("Steampipe download URL: {url}");

        tokio::fs::create_dir_all(&self.temp_root)
            .await
            .map_err(|e| SetupError::io(&self.temp_root, e))?;
        let work = tempfile::Builder::new()
            .prefix("spsetup-")
            .tempdir_in(&self.temp_root)
            .map_err(|e| SetupError::io(&self.temp_root, e))?;

        let archive = work.path().join("archive");
        self.download(&url, &archive).await?;

        let extracted = work.path().join("extracted");
        extract(&archive, &extracted, archive_kind(self.platform)).await?;

        self.cache.store(&extracted, version, self.platform.arch).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), SetupError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SetupError::Http {
                message: format!("download of {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::Http {
                message: format!("unexpected HTTP response {status} from {url}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| SetupError::Http {
            message: format!("failed to read archive body from {url}: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(bytes = bytes.len(), "archive downloaded");

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| SetupError::io(dest, e))
    }
}

/// Unpack `archive` into `dest`.
pub async fn extract(archive: &Path, dest: &Path, kind: ArchiveKind) -> Result<(), SetupError> {
    tokio::fs::create_dir_all(dest)
        .await
        .map_err(|e| SetupError::io(dest, e))?;

    match kind {
        ArchiveKind::TarGz => {
            let archive = archive.to_path_buf();
            let dest = dest.to_path_buf();
            tokio::task::spawn_blocking(move || -> Result<(), SetupError> {
                let file = std::fs::File::open(&archive).map_err(|e| SetupError::io(&archive, e))?;
                let decoder = flate2::read::GzDecoder::new(file);
                tar::Archive::new(decoder)
                    .unpack(&dest)
                    .map_err(|e| SetupError::io(&archive, e))
            })
            .await
            .map_err(|e| SetupError::Internal(format!("extraction task failed: {e}")))?
        }
        ArchiveKind::Zip => {
            let archive = archive.to_path_buf();
            let dest = dest.to_path_buf();
            tokio::task::spawn_blocking(move || -> Result<(), SetupError> {
                let file = std::fs::File::open(&archive).map_err(|e| SetupError::io(&archive, e))?;
                zip::ZipArchive::new(file)
                    .and_then(|mut zip| zip.extract(&dest))
                    .map_err(|e| SetupError::io(&archive, std::io::Error::other(e)))
            })
            .await
            .map_err(|e| SetupError::Internal(format!("extraction task failed: {e}")))?
        }
    }
}

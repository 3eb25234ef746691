// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner tool cache.
//!
//! Layout matches the hosted runner convention so cached CLIs survive
//! between jobs on self-hosted runners:
//!
//! ```text
//! <root>/steampipe/<version>/<arch>/           extracted files
//! <root>/steampipe/<version>/<arch>.complete   marker written last
//! ```

use std::path::{Path, PathBuf};

use spsetup_core::{Arch, SetupError};
use tracing::debug;

/// Tool name under the cache root.
pub const TOOL_NAME: &str = "steampipe";

#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

/// `v0.20.8` -> `0.20.8`; tags that are not semver are kept as-is.
fn clean_version(version: &str) -> String {
    spsetup_release::parse_tag(version)
        .map(|v| v.to_string())
        .unwrap_or_else(|| version.to_string())
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(TOOL_NAME).join(clean_version(version))
    }

    pub fn tool_dir(&self, version: &str, arch: Arch) -> PathBuf {
        self.version_dir(version).join(arch.to_string())
    }

    fn marker(&self, version: &str, arch: Arch) -> PathBuf {
        self.version_dir(version).join(format!("{arch}.complete"))
    }

    /// The cached install for `version`, if a complete one exists.
    pub fn find(&self, version: &str, arch: Arch) -> Option<PathBuf> {
        let dir = self.tool_dir(version, arch);
        if dir.is_dir() && self.marker(version, arch).is_file() {
            Some(dir)
        } else {
            None
        }
    }

    /// Copy `source` into the cache for `version` and mark it complete.
    pub async fn store(&self, source: &Path, version: &str, arch: Arch) -> Result<PathBuf, SetupError> {
        let dest = self.tool_dir(version, arch);
        let marker = self.marker(version, arch);
        let source = source.to_path_buf();
        let target = dest.clone();

        tokio::task::spawn_blocking(move || -> Result<(), SetupError> {
            if marker.exists() {
                std::fs::remove_file(&marker).map_err(|e| SetupError::io(&marker, e))?;
            }
            if target.exists() {
                std::fs::remove_dir_all(&target).map_err(|e| SetupError::io(&target, e))?;
            }
            copy_dir_all(&source, &target)?;
            std::fs::write(&marker, "").map_err(|e| SetupError::io(&marker, e))
        })
        .await
        .map_err(|e| SetupError::Internal(format!("tool cache task failed: {e}")))??;

        debug!(path = %dest.display(), "stored in tool cache");
        Ok(dest)
    }
}

fn copy_dir_all(source: &Path, dest: &Path) -> Result<(), SetupError> {
    std::fs::create_dir_all(dest).map_err(|e| SetupError::io(dest, e))?;
    for entry in std::fs::read_dir(source).map_err(|e| SetupError::io(source, e))? {
        let entry = entry.map_err(|e| SetupError::io(source, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| SetupError::io(&from, e))?;
        if file_type.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| SetupError::io(&from, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_strips_v_prefix() {
        let cache = ToolCache::new("/opt/hostedtoolcache");
        assert_eq!(
            cache.tool_dir("v0.20.8", Arch::X64),
            PathBuf::from("/opt/hostedtoolcache/steampipe/0.20.8/x64")
        );
    }

    #[test]
    fn find_requires_completion_marker() {
        let root = tempfile::tempdir().unwrap();
        let cache = ToolCache::new(root.path());
        let dir = cache.tool_dir("v1.0.0", Arch::Arm64);
        std::fs::create_dir_all(&dir).unwrap();
        assert!(cache.find("v1.0.0", Arch::Arm64).is_none());

        std::fs::write(root.path().join("steampipe/1.0.0/arm64.complete"), "").unwrap();
        assert_eq!(cache.find("v1.0.0", Arch::Arm64), Some(dir));
    }

    #[tokio::test]
    async fn store_copies_tree_and_marks_complete() {
        let root = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("lib")).unwrap();
        std::fs::write(source.path().join("steampipe"), "bin").unwrap();
        std::fs::write(source.path().join("lib/extra"), "x").unwrap();

        let cache = ToolCache::new(root.path());
        let dest = cache.store(source.path(), "v0.21.0", Arch::X64).await.unwrap();

        assert_eq!(std::fs::read_to_string(dest.join("steampipe")).unwrap(), "bin");
        assert!(dest.join("lib/extra").is_file());
        assert_eq!(cache.find("v0.21.0", Arch::X64), Some(dest));
    }
}

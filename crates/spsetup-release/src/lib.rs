// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Steampipe CLI release discovery.
//!
//! [`GithubReleases`] lists release tags; [`resolve`] picks the one tag a
//! user's version constraint asks for.

pub mod listing;
pub mod resolver;

pub use listing::{GithubReleases, ReleaseSource, StaticReleases};
pub use resolver::{parse_tag, resolve, satisfies, VersionConstraint, PROGRESS_FLAG_MIN_VERSION};

use spsetup_core::SetupError;

/// List releases from `source` and resolve `constraint` against them.
///
/// Turns an absent match into [`SetupError::VersionNotFound`].
pub async fn find_version(
    source: &dyn ReleaseSource,
    constraint: &str,
) -> Result<String, SetupError> {
    let tags = source.list_tags().await?;
    resolve(constraint, &tags).ok_or_else(|| SetupError::VersionNotFound {
        constraint: constraint.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticReleases {
        StaticReleases(
            ["v0.11.0", "v0.11.1", "v0.11.2", "v0.12.0"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[tokio::test]
    async fn find_version_returns_match() {
        let version = find_version(&source(), "^v0.11").await.unwrap();
        assert_eq!(version, "v0.11.2");
    }

    #[tokio::test]
    async fn find_version_reports_original_constraint() {
        let err = find_version(&source(), "^v0.13").await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to find Steampipe version '^v0.13'.");
    }
}

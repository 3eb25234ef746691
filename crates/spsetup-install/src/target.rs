// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release archive naming per platform.

use spsetup_core::{Arch, Os, SupportedPlatform};

/// Base URL release assets are downloaded from.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com/turbot/steampipe/releases/download";

/// How a release archive is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

/// Asset suffix for `platform`, e.g. `linux_amd64.tar.gz`.
pub fn archive_target(platform: SupportedPlatform) -> &'static str {
    match (platform.os, platform.arch) {
        (Os::Linux, Arch::X64) => "linux_amd64.tar.gz",
        (Os::Linux, Arch::Arm64) => "linux_arm64.tar.gz",
        (Os::Darwin, Arch::X64) => "darwin_amd64.zip",
        (Os::Darwin, Arch::Arm64) => "darwin_arm64.zip",
    }
}

pub fn archive_kind(platform: SupportedPlatform) -> ArchiveKind {
    match platform.os {
        Os::Linux => ArchiveKind::TarGz,
        Os::Darwin => ArchiveKind::Zip,
    }
}

/// `<base>/<version>/steampipe_<target>`
pub fn download_url(base: &str, version: &str, platform: SupportedPlatform) -> String {
    format!(
        "{}/{version}/steampipe_{}",
        base.trim_end_matches('/'),
        archive_target(platform)
    )
}

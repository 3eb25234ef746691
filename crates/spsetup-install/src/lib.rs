// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download, cache, and invoke the Steampipe CLI.

pub mod cache;
pub mod cli;
pub mod installer;
pub mod target;

pub use cache::{ToolCache, TOOL_NAME};
pub use cli::SteampipeCli;
pub use installer::{extract, Installer};
pub use target::{archive_kind, archive_target, download_url, ArchiveKind, DEFAULT_DOWNLOAD_URL};

// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Steampipe setup tool.
//!
//! Holds the shared error enum, the configuration-file value types passed
//! between the builder and the writer, and the platform guard every run
//! starts with.

pub mod error;
pub mod platform;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SetupError;
pub use platform::{check_platform, Arch, Os, Platform, SupportedPlatform};
pub use types::{ConfigFile, ConfigFormat, Removal};

// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Steampipe setup tool.

use thiserror::Error;

/// The error type shared by every spsetup crate.
///
/// Each variant's `Display` output is the single terminal message shown to
/// the user when a run fails.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The host OS or CPU architecture is not on the allow-list.
    #[error(
        "turbot/steampipe-action-setup only supports linux and darwin on x64 and arm64 at this time"
    )]
    UnsupportedPlatform { os: String, arch: String },

    /// Both plugin specification inputs were supplied in the same run.
    #[error("Cannot use steampipe-plugins and plugin-connections inputs together")]
    MutuallyExclusiveInputs,

    /// No release satisfied the requested version constraint.
    #[error("Unable to find Steampipe version '{constraint}'.")]
    VersionNotFound { constraint: String },

    /// A connection document is missing a required top-level key.
    #[error("Missing '{key}' key in plugin-connections input")]
    MissingKey { key: String },

    /// A connection document is neither JSON nor HCL.
    #[error("Unknown connection config format")]
    UnknownFormat,

    /// Parsing produced zero plugin identifiers.
    #[error("No plugins specified in {input} input")]
    NoPlugins { input: String },

    /// A release listing page answered with an error-range status code.
    #[error("Got {status} from {url}. Exiting with error")]
    ReleaseListing { status: u16, url: String },

    /// Transport-level HTTP failure (connect, TLS, body decode).
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem failure while reading or writing configuration or archives.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A child process could not be spawned or exited unsuccessfully.
    #[error("{command} failed: {message}")]
    Process { command: String, message: String },

    /// Invalid input values or malformed documents.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SetupError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        SetupError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

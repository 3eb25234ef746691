// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invocations of the installed `steampipe` binary.

use std::path::{Path, PathBuf};

use spsetup_core::SetupError;
use spsetup_release::{satisfies, PROGRESS_FLAG_MIN_VERSION};
use tracing::{debug, info};

/// Query run once after install so the embedded database is set up.
pub const INIT_QUERY: &str = "select true as initialized";

/// Handle to a `steampipe` executable.
#[derive(Debug, Clone)]
pub struct SteampipeCli {
    program: PathBuf,
}

impl SteampipeCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The binary inside an install directory.
    pub fn in_dir(install_dir: &Path) -> Self {
        Self::new(install_dir.join("steampipe"))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for `steampipe plugin install`.
    ///
    /// `--progress=false` is only understood by CLI versions from 0.20.0 on.
    pub fn plugin_install_args(
        plugins: &[String],
        cli_version: &str,
    ) -> Result<Vec<String>, SetupError> {
        if plugins.is_empty() {
            return Err(SetupError::Config("No plugins identified".to_string()));
        }

        let mut args = vec!["plugin".to_string(), "install".to_string()];
        args.extend(plugins.iter().cloned());
        if satisfies(cli_version, PROGRESS_FLAG_MIN_VERSION) {
            args.push("--progress=false".to_string());
        }
        Ok(args)
    }

    pub async fn install_plugins(
        &self,
        plugins: &[String],
        cli_version: &str,
    ) -> Result<(), SetupError> {
        let args = Self::plugin_install_args(plugins, cli_version)?;
        info!("Installing plugins: {}", plugins.join(", "));
        self.run(&args).await
    }

    pub async fn initialize(&self) -> Result<(), SetupError> {
        info!("Running Steampipe query to initialize the database");
        self.run(&["query".to_string(), INIT_QUERY.to_string()])
            .await
    }

    async fn run(&self, args: &[String]) -> Result<(), SetupError> {
        let command = format!("{} {}", self.program.display(), args.join(" "));
        debug!(%command, "spawning");

        let status = tokio::process::Command::new(&self.program)
            .args(args)
            .status()
            .await
            .map_err(|e| SetupError::Process {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SetupError::Process {
                command,
                message: format!("exited with {status}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn progress_flag_added_from_0_20_0() {
        let args = SteampipeCli::plugin_install_args(&ids(&["net", "aws"]), "v0.20.0").unwrap();
        assert_eq!(args, vec!["plugin", "install", "net", "aws", "--progress=false"]);
    }

    #[test]
    fn progress_flag_omitted_before_0_20_0() {
        let args = SteampipeCli::plugin_install_args(&ids(&["net"]), "v0.19.5").unwrap();
        assert_eq!(args, vec!["plugin", "install", "net"]);
    }

    #[test]
    fn empty_plugin_list_is_rejected() {
        let err = SteampipeCli::plugin_install_args(&[], "v0.20.0").unwrap_err();
        assert!(err.to_string().contains("No plugins identified"));
    }

    #[test]
    fn binary_lives_in_install_dir() {
        let cli = SteampipeCli::in_dir(Path::new("/opt/steampipe/0.20.8/x64"));
        assert_eq!(cli.program(), Path::new("/opt/steampipe/0.20.8/x64/steampipe"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_exit_is_ok() {
        let cli = SteampipeCli::new("/bin/true");
        cli.initialize().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_exit_is_a_process_error() {
        let cli = SteampipeCli::new("/bin/false");
        let err = cli.install_plugins(&ids(&["net"]), "v0.20.0").await.unwrap_err();
        assert!(matches!(err, SetupError::Process { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_a_process_error() {
        let cli = SteampipeCli::new("/nonexistent/steampipe");
        let err = cli.initialize().await.unwrap_err();
        assert!(matches!(err, SetupError::Process { .. }));
    }
}

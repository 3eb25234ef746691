// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Step outputs and `PATH` additions for the CI runner.

use std::path::{Path, PathBuf};

use spsetup_config::RunnerConfig;
use spsetup_core::SetupError;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Files the runner reads after the step. Unset files fall back to stdout.
#[derive(Debug, Clone, Default)]
pub struct StepOutputs {
    github_output: Option<PathBuf>,
    github_path: Option<PathBuf>,
}

impl StepOutputs {
    pub fn from_runner(runner: &RunnerConfig) -> Self {
        Self {
            github_output: runner.github_output.clone(),
            github_path: runner.github_path.clone(),
        }
    }

    /// Record `name=value` as a step output.
    pub async fn set_output(&self, name: &str, value: &str) -> Result<(), SetupError> {
        let line = format!("{name}={value}");
        match &self.github_output {
            Some(file) => append_line(file, &line).await,
            None => {
                println!("{line}");
                Ok(())
            }
        }
    }

    /// Prepend `dir` to `PATH` for later steps.
    pub async fn add_path(&self, dir: &Path) -> Result<(), SetupError> {
        match &self.github_path {
            Some(file) => append_line(file, &dir.display().to_string()).await,
            None => {
                info!("Add {} to PATH to use the installed CLI", dir.display());
                Ok(())
            }
        }
    }
}

async fn append_line(file: &Path, line: &str) -> Result<(), SetupError> {
    let mut handle = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .await
        .map_err(|e| SetupError::io(file, e))?;
    handle
        .write_all(format!("{line}\n").as_bytes())
        .await
        .map_err(|e| SetupError::io(file, e))?;
    handle.flush().await.map_err(|e| SetupError::io(file, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outputs_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let path = dir.path().join("path");
        std::fs::write(&output, "previous=1\n").unwrap();

        let outputs = StepOutputs::from_runner(&RunnerConfig {
            github_output: Some(output.clone()),
            github_path: Some(path.clone()),
            ..Default::default()
        });
        outputs.set_output("steampipe-version", "v0.20.8").await.unwrap();
        outputs.add_path(Path::new("/opt/steampipe/0.20.8/x64")).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "previous=1\nsteampipe-version=v0.20.8\n"
        );
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "/opt/steampipe/0.20.8/x64\n"
        );
    }

    #[tokio::test]
    async fn unset_files_are_not_an_error() {
        let outputs = StepOutputs::default();
        outputs.set_output("steampipe-version", "v0.20.8").await.unwrap();
        outputs.add_path(Path::new("/tmp")).await.unwrap();
    }
}

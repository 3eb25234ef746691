// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The setup run: resolve, install, initialize, configure plugins.

use std::fmt::Write as _;
use std::path::PathBuf;

use spsetup_config::SetupConfig;
use spsetup_core::{SetupError, SupportedPlatform};
use spsetup_install::{Installer, SteampipeCli, ToolCache};
use spsetup_plugin::{
    ConfigWriter, FlatSpec, PluginInput, PluginPlan, DEFAULT_OPTIONS, DEFAULT_OPTIONS_FILE,
};
use spsetup_release::{find_version, GithubReleases};
use tracing::info;

use crate::output::StepOutputs;

fn config_dir(config: &SetupConfig) -> Result<PathBuf, SetupError> {
    spsetup_config::config_dir(config)
        .ok_or_else(|| SetupError::Config("runner home directory is not known".to_string()))
}

fn missing_runner_dir(what: &str) -> SetupError {
    SetupError::Config(format!("cannot derive the {what} directory without a home directory"))
}

/// Which plugin input the configuration supplies.
pub fn plugin_input(config: &SetupConfig) -> Result<PluginInput, SetupError> {
    let flat = FlatSpec::parse(&config.steampipe_plugins)?;
    PluginInput::select(flat, &config.plugin_connections)
}

fn release_source(config: &SetupConfig) -> Result<GithubReleases, SetupError> {
    Ok(
        GithubReleases::new(&config.release.api_url, &config.release.user_agent)?
            .with_pagination(config.release.per_page, config.release.pages),
    )
}

/// Resolve a constraint against the live release listing.
pub async fn resolve(config: &SetupConfig, constraint: &str) -> Result<String, SetupError> {
    let source = release_source(config)?;
    find_version(&source, constraint).await
}

/// Run every setup step and return the installed version tag.
pub async fn run(config: &SetupConfig, platform: SupportedPlatform) -> Result<String, SetupError> {
    let input = plugin_input(config)?;
    let config_dir = config_dir(config)?;

    let version = resolve(config, &config.steampipe_version).await?;
    info!(version = %version, "Steampipe version resolved");

    let cache_root = config
        .runner
        .tool_cache_dir()
        .ok_or_else(|| missing_runner_dir("tool cache"))?;
    let temp_root = config
        .runner
        .temp_dir()
        .ok_or_else(|| missing_runner_dir("temp"))?;
    let installer = Installer::new(
        &config.release.download_url,
        ToolCache::new(cache_root),
        temp_root,
        platform,
        &config.release.user_agent,
    )?;
    let install_dir = installer.install(&version).await?;

    let outputs = StepOutputs::from_runner(&config.runner);
    outputs.add_path(&install_dir).await?;

    let cli = SteampipeCli::in_dir(&install_dir);
    let writer = ConfigWriter::new(&config_dir);
    writer.write_default_options().await?;
    cli.initialize().await?;

    let plan = input.plan(&config_dir)?;
    if !plan.plugin_ids().is_empty() {
        cli.install_plugins(plan.plugin_ids(), &version).await?;
    }
    plan.apply(&writer).await?;
    if matches!(plan, PluginPlan::Connections(_)) {
        // Clearing the directory also removed the general options.
        writer.write_default_options().await?;
    }

    outputs.set_output("steampipe-version", &version).await?;
    Ok(version)
}

/// The files a run would write for the current plugin inputs, as text.
pub fn render(config: &SetupConfig) -> Result<String, SetupError> {
    let config_dir = config_dir(config)?;
    let plan = plugin_input(config)?.plan(&config_dir)?;

    let mut out = String::new();
    let _ = writeln!(out, "# plugins: {}", plan.plugin_ids().join(", "));
    let _ = write!(
        out,
        "==> {}\n{DEFAULT_OPTIONS}",
        config_dir.join(DEFAULT_OPTIONS_FILE).display()
    );
    for file in plan.files() {
        let _ = writeln!(out, "==> {}\n{}", file.path.display(), file.content);
    }
    Ok(out)
}

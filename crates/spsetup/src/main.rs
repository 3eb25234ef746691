// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! spsetup - install the Steampipe CLI and configure plugin connections on CI.
//!
//! This is the binary entry point.

mod logging;
mod output;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use spsetup_core::{check_platform, Platform, SetupError};

/// Install the Steampipe CLI and configure plugin connections.
#[derive(Parser, Debug)]
#[command(name = "spsetup", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of `./spsetup.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve, install, initialize, and configure plugins (default).
    Run,
    /// Print the release tag a version constraint resolves to.
    Resolve {
        /// `latest` or a semver range such as `^0.20`.
        constraint: String,
    },
    /// Print the configuration files the current inputs produce.
    Render,
}

/// Report a failure the way the runner surfaces it, then exit non-zero.
fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    println!("::error::{message}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let platform = match &command {
        Commands::Run => match check_platform(&Platform::current()) {
            Ok(platform) => Some(platform),
            Err(e) => fail(&e.to_string()),
        },
        _ => None,
    };

    let config = match spsetup_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            spsetup_config::render_errors(&errors);
            let summary = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            fail(&summary);
        }
    };

    logging::init_tracing(logging::log_level(&config));

    let result = match command {
        Commands::Run => match platform {
            Some(platform) => run::run(&config, platform).await.map(|_| ()),
            None => Err(SetupError::Internal("platform was not checked".to_string())),
        },
        Commands::Resolve { constraint } => run::resolve(&config, &constraint)
            .await
            .map(|tag| println!("{tag}")),
        Commands::Render => run::render(&config).map(|text| print!("{text}")),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "setup failed");
        fail(&e.to_string());
    }
}

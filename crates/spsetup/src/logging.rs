// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use spsetup_config::SetupConfig;

/// Effective level: `debug` when the runner asks for step debug logs.
pub fn log_level(config: &SetupConfig) -> &str {
    if config.runner.debug {
        "debug"
    } else {
        &config.log_level
    }
}

pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spsetup={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

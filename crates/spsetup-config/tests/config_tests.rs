// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use std::path::{Path, PathBuf};

use figment::Jail;
use spsetup_config::diagnostic::{suggest_key, ConfigError};
use spsetup_config::model::SetupConfig;
use spsetup_config::{config_dir, load_and_validate, load_and_validate_str, load_config_from_str};
use spsetup_core::SetupError;

/// Every known key deserializes.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
steampipe_version = "^0.19"
steampipe_plugins = '{"github": {"token": "t"}}'
log_level = "debug"

[release]
api_url = "http://127.0.0.1:9000/releases"
download_url = "http://127.0.0.1:9000/download"
per_page = 50
pages = 2
user_agent = "ci"

[runner]
home = "/home/runner"
tool_cache = "/opt/hostedtoolcache"
temp = "/tmp/runner"
github_output = "/tmp/output"
github_path = "/tmp/path"
debug = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.steampipe_version, "^0.19");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.release.per_page, 50);
    assert_eq!(config.release.pages, 2);
    assert_eq!(config.release.user_agent, "ci");
    assert_eq!(config.runner.home, Some(PathBuf::from("/home/runner")));
    assert!(config.runner.debug);
}

/// Unknown top-level key is rejected with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
steampipe_verison = "latest"

[runner]
home = "/home/runner"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "steampipe_verison"
                && suggestion.as_deref() == Some("steampipe_version")
                && valid_keys.contains("plugin_connections")
        })
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Unknown key in a section lists that section's keys.
#[test]
fn unknown_key_in_release_lists_section_keys() {
    let errors = load_and_validate_str("[release]\npre_page = 10\n").expect_err("should fail");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { suggestion, valid_keys, .. } if {
            suggestion.as_deref() == Some("per_page") && valid_keys.contains("download_url")
        })
    });
    assert!(found, "got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let errors = load_and_validate_str("[release]\npages = \"three\"\n").expect_err("should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("pages"))));
}

#[test]
fn mutually_exclusive_inputs_fail_with_exact_message() {
    let toml = r#"
steampipe_plugins = '{"github": {}}'
plugin_connections = '{"connection": {"net": {"plugin": "net"}}}'

[runner]
home = "/home/runner"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    let input = errors
        .iter()
        .find(|e| matches!(e, ConfigError::Input(SetupError::MutuallyExclusiveInputs)))
        .expect("mutual exclusion error");
    assert_eq!(
        input.to_string(),
        "Cannot use steampipe-plugins and plugin-connections inputs together"
    );
}

#[test]
fn config_dir_is_under_home() {
    let config = load_and_validate_str("[runner]\nhome = \"/home/runner\"\n").unwrap();
    assert_eq!(
        config_dir(&config),
        Some(PathBuf::from("/home/runner/.steampipe/config"))
    );
}

#[test]
fn suggest_key_matches_input_names() {
    let valid = &["steampipe_version", "plugin_connections", "steampipe_plugins", "log_level"];
    assert_eq!(suggest_key("log_levl", valid), Some("log_level".to_string()));
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "steampipe_verison".to_string(),
        suggestion: Some("steampipe_version".to_string()),
        valid_keys: "steampipe_version, log_level".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    assert!(error
        .help()
        .map(|h| h.to_string())
        .unwrap_or_default()
        .contains("did you mean `steampipe_version`"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("steampipe_verison"));
}

/// Action inputs override the local file; runner env fills the runner section.
#[test]
fn inputs_override_local_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "spsetup.toml",
            r#"
steampipe_version = "0.18.0"
log_level = "warn"
"#,
        )?;
        jail.set_env("INPUT_STEAMPIPE-VERSION", "^0.20");
        jail.set_env("INPUT_PLUGIN-CONNECTIONS", "connection \"net\" {\n  plugin = \"net\"\n}\n");
        jail.set_env("HOME", "/home/runner");
        jail.set_env("RUNNER_TOOL_CACHE", "/opt/hostedtoolcache");

        let config: SetupConfig = load_and_validate(None).expect("config should load");
        assert_eq!(config.steampipe_version, "^0.20");
        assert_eq!(config.log_level, "warn");
        assert!(config.plugin_connections.starts_with("connection \"net\""));
        assert_eq!(config.runner.home, Some(PathBuf::from("/home/runner")));
        assert_eq!(
            config.runner.tool_cache_dir(),
            Some(PathBuf::from("/opt/hostedtoolcache"))
        );
        Ok(())
    });
}

/// `SPSETUP_*` overrides reach nested sections.
#[test]
fn prefixed_env_overrides_release_section() {
    Jail::expect_with(|jail| {
        jail.set_env("HOME", "/home/runner");
        jail.set_env("SPSETUP_RELEASE_API_URL", "http://127.0.0.1:8080/releases");
        jail.set_env("SPSETUP_RELEASE_PER_PAGE", "20");

        let config = load_and_validate(None).expect("config should load");
        assert_eq!(config.release.api_url, "http://127.0.0.1:8080/releases");
        assert_eq!(config.release.per_page, 20);
        assert_eq!(config.release.pages, 3);
        Ok(())
    });
}

/// Top-level string overrides are not reinterpreted as numbers or maps.
#[test]
fn prefixed_env_version_stays_a_string() {
    Jail::expect_with(|jail| {
        jail.set_env("HOME", "/home/runner");
        jail.set_env("SPSETUP_STEAMPIPE_VERSION", "0.20");
        jail.set_env("SPSETUP_STEAMPIPE_PLUGINS", r#"{"github": {"token": "t"}}"#);

        let config = load_and_validate(None).expect("config should load");
        assert_eq!(config.steampipe_version, "0.20");
        assert_eq!(config.steampipe_plugins, r#"{"github": {"token": "t"}}"#);
        Ok(())
    });
}

#[test]
fn explicit_config_path_must_exist() {
    let errors = load_and_validate(Some(Path::new("/nonexistent/spsetup.toml"))).unwrap_err();
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("does not exist")));
}

#[test]
fn explicit_config_path_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file("ci.toml", "steampipe_version = \"0.19.4\"\n")?;
        jail.set_env("HOME", "/home/runner");
        let config = load_and_validate(Some(Path::new("ci.toml"))).expect("config should load");
        assert_eq!(config.steampipe_version, "0.19.4");
        Ok(())
    });
}

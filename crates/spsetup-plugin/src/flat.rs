// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat plugin specification: plugin identifier -> connection settings.
//!
//! ```json
//! {
//!   "github": { "token": "..." },
//!   "francois2metz/scalingo": [{ "token": "a" }, { "token": "b" }]
//! }
//! ```
//!
//! Each plugin gets its own `<short name>.json` file under the CLI config
//! directory, holding one connection per settings object.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use spsetup_core::{ConfigFile, SetupError};
use tracing::debug;

/// Connection settings for one plugin identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginSettings {
    /// One connection named after the plugin.
    Single(Map<String, Value>),
    /// One connection per entry, named `<short name>1`, `<short name>2`, ...
    Multiple(Vec<Map<String, Value>>),
}

/// The flat form, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSpec {
    entries: Vec<(String, PluginSettings)>,
}

/// Output of [`build_from_flat_spec`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBuild {
    /// Plugin identifiers to install, one per key.
    pub plugin_ids: Vec<String>,
    /// One JSON config file per plugin.
    pub files: Vec<ConfigFile>,
    /// Stale `.spc` siblings to remove if present.
    pub stale: Vec<PathBuf>,
}

impl FlatSpec {
    /// Parse the flat form from its JSON text. Blank input is an empty spec.
    pub fn parse(json: &str) -> Result<Self, SetupError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(json)
            .map_err(|e| SetupError::Config(format!("steampipe-plugins is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, SetupError> {
        let Value::Object(map) = value else {
            return Err(SetupError::Config(
                "steampipe-plugins must be a JSON object keyed by plugin name".to_string(),
            ));
        };

        let entries = map
            .into_iter()
            .map(|(plugin, settings)| {
                let settings = PluginSettings::from_value(&plugin, settings)?;
                Ok((plugin, settings))
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn plugin_ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginSettings)> {
        self.entries.iter().map(|(id, s)| (id.as_str(), s))
    }
}

impl FromIterator<(String, PluginSettings)> for FlatSpec {
    fn from_iter<I: IntoIterator<Item = (String, PluginSettings)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl PluginSettings {
    fn from_value(plugin: &str, value: Value) -> Result<Self, SetupError> {
        match value {
            Value::Null => Ok(PluginSettings::Single(Map::new())),
            Value::Object(settings) => Ok(PluginSettings::Single(settings)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(settings) => Ok(settings),
                    other => Err(SetupError::Config(format!(
                        "connection settings for plugin `{plugin}` must be objects, found {other}"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PluginSettings::Multiple),
            other => Err(SetupError::Config(format!(
                "settings for plugin `{plugin}` must be an object or a list of objects, found {other}"
            ))),
        }
    }
}

/// Connection name stem for a plugin identifier.
///
/// `hashicorp/github` -> `github`, `github:0.1` -> `github`.
pub fn short_name(plugin: &str) -> &str {
    let last = plugin.rsplit('/').next().unwrap_or(plugin);
    last.split(':').next().unwrap_or(last)
}

/// The `{ "connection": { ... } }` document for one plugin.
///
/// Every connection carries `plugin` set to the untouched identifier,
/// version suffix included.
pub fn connection_config(plugin: &str, settings: &PluginSettings) -> Value {
    let short = short_name(plugin);
    let with_plugin = |settings: &Map<String, Value>| {
        let mut entry = settings.clone();
        entry.insert("plugin".to_string(), Value::String(plugin.to_string()));
        Value::Object(entry)
    };

    let mut connections = Map::new();
    match settings {
        PluginSettings::Single(settings) => {
            connections.insert(short.to_string(), with_plugin(settings));
        }
        PluginSettings::Multiple(list) => {
            for (index, settings) in list.iter().enumerate() {
                connections.insert(format!("{short}{}", index + 1), with_plugin(settings));
            }
        }
    }

    let mut root = Map::new();
    root.insert("connection".to_string(), Value::Object(connections));
    Value::Object(root)
}

/// Build per-plugin config files for the flat form.
///
/// Fails if two identifiers share a short name, since both would write the
/// same `<short name>.json`.
pub fn build_from_flat_spec(spec: &FlatSpec, config_dir: &Path) -> Result<FlatBuild, SetupError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut files = Vec::with_capacity(spec.len());
    let mut stale = Vec::with_capacity(spec.len());

    for (plugin, settings) in spec.iter() {
        let short = short_name(plugin);
        if let Some(previous) = owners.insert(short, plugin) {
            return Err(SetupError::Config(format!(
                "plugins `{previous}` and `{plugin}` both map to connection file `{short}.json`"
            )));
        }

        let content = serde_json::to_string(&connection_config(plugin, settings))
            .map_err(|e| SetupError::Internal(format!("failed to serialize {plugin} config: {e}")))?;
        debug!(plugin, file = %format!("{short}.json"), "built flat plugin config");

        files.push(ConfigFile::new(config_dir.join(format!("{short}.json")), content));
        stale.push(config_dir.join(format!("{short}.spc")));
    }

    Ok(FlatBuild {
        plugin_ids: spec.plugin_ids(),
        files,
        stale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> PluginSettings {
        PluginSettings::from_value("test", value).unwrap()
    }

    #[test]
    fn short_name_strips_org_and_version() {
        assert_eq!(short_name("github"), "github");
        assert_eq!(short_name("hashicorp/github"), "github");
        assert_eq!(short_name("github:0.1"), "github");
        assert_eq!(short_name("francois2metz/scalingo:latest"), "scalingo");
    }

    #[test]
    fn single_connection() {
        let config = connection_config("github", &settings(json!({"token": "test"})));
        assert_eq!(
            config,
            json!({"connection": {"github": {"plugin": "github", "token": "test"}}})
        );
    }

    #[test]
    fn multiple_connections_are_numbered_from_one() {
        let config = connection_config(
            "github",
            &settings(json!([{"token": "test"}, {"token": "test2"}])),
        );
        assert_eq!(
            config,
            json!({"connection": {
                "github1": {"plugin": "github", "token": "test"},
                "github2": {"plugin": "github", "token": "test2"},
            }})
        );
    }

    #[test]
    fn third_party_plugin_keeps_full_identifier() {
        let config = connection_config("francois2metz/scalingo", &settings(json!({"token": "test"})));
        assert_eq!(
            config,
            json!({"connection": {"scalingo": {"plugin": "francois2metz/scalingo", "token": "test"}}})
        );
    }

    #[test]
    fn versioned_plugin_keeps_version_suffix() {
        let config = connection_config("github:0.1", &settings(json!({"token": "test"})));
        assert_eq!(
            config,
            json!({"connection": {"github": {"plugin": "github:0.1", "token": "test"}}})
        );
    }

    #[test]
    fn explicit_plugin_setting_is_overridden() {
        let config = connection_config("github", &settings(json!({"plugin": "other", "token": "t"})));
        assert_eq!(config["connection"]["github"]["plugin"], "github");
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"connection":{"github":{"plugin":"github","token":"t"}}}"#);
    }

    #[test]
    fn build_writes_json_and_marks_spc_stale() {
        let spec = FlatSpec::parse(r#"{"github": {"token": "t"}}"#).unwrap();
        let build = build_from_flat_spec(&spec, Path::new("/home/runner/.steampipe/config")).unwrap();

        assert_eq!(build.plugin_ids, vec!["github"]);
        assert_eq!(build.files.len(), 1);
        assert_eq!(
            build.files[0].path,
            PathBuf::from("/home/runner/.steampipe/config/github.json")
        );
        assert_eq!(
            build.files[0].content,
            r#"{"connection":{"github":{"token":"t","plugin":"github"}}}"#
        );
        assert_eq!(
            build.stale,
            vec![PathBuf::from("/home/runner/.steampipe/config/github.spc")]
        );
    }

    #[test]
    fn one_install_per_key_regardless_of_connection_count() {
        let spec = FlatSpec::parse(r#"{"aws": [{"regions": ["us-east-1"]}, {}, {}]}"#).unwrap();
        let build = build_from_flat_spec(&spec, Path::new("/cfg")).unwrap();
        assert_eq!(build.plugin_ids, vec!["aws"]);
        assert_eq!(build.files.len(), 1);
        assert!(build.files[0].content.contains("\"aws3\""));
    }

    #[test]
    fn build_is_idempotent() {
        let spec = FlatSpec::parse(
            r#"{"github": [{"token": "a"}, {"token": "b"}], "turbot/net:1.0": null}"#,
        )
        .unwrap();
        let first = build_from_flat_spec(&spec, Path::new("/cfg")).unwrap();
        let second = build_from_flat_spec(&spec, Path::new("/cfg")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn colliding_short_names_are_rejected() {
        let spec = FlatSpec::parse(r#"{"github": {}, "someone/github": {}}"#).unwrap();
        let err = build_from_flat_spec(&spec, Path::new("/cfg")).unwrap_err();
        assert!(err.to_string().contains("github.json"));
    }

    #[test]
    fn parse_rejects_non_object_shapes() {
        assert!(FlatSpec::parse("[1, 2]").is_err());
        assert!(FlatSpec::parse(r#"{"github": "token"}"#).is_err());
        assert!(FlatSpec::parse(r#"{"github": [1]}"#).is_err());
        assert!(FlatSpec::parse("{not json").is_err());
    }

    #[test]
    fn blank_input_is_empty_spec() {
        assert!(FlatSpec::parse("").unwrap().is_empty());
        assert!(FlatSpec::parse("{}").unwrap().is_empty());
    }
}

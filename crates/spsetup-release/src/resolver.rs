// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version constraint parsing and release selection.
//!
//! Release tags and constraints are accepted in the loose form action users
//! write them (`v0.11.2`, `^v0.11`, `>= 0.19 <0.21`, `0.10 || 0.12`) and
//! normalized into [`semver::VersionReq`] alternatives.

use semver::{Version, VersionReq};
use spsetup_core::SetupError;
use tracing::{debug, info, warn};

/// Minimum CLI version that understands `--progress=false`.
pub const PROGRESS_FLAG_MIN_VERSION: &str = ">=0.20.0";

/// A parsed version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Latest stable release (exactly `"latest"`, or empty input).
    Latest,
    /// A range; a version matches when any alternative matches.
    Range(Vec<VersionReq>),
}

impl VersionConstraint {
    /// Parse user input into a constraint.
    pub fn parse(input: &str) -> Result<Self, SetupError> {
        let input = input.trim();
        if input.is_empty() || input == "latest" {
            return Ok(VersionConstraint::Latest);
        }

        let alternatives = input
            .split("||")
            .map(|alt| {
                let normalized = normalize_comparator_set(alt);
                VersionReq::parse(&normalized).map_err(|e| {
                    SetupError::Config(format!("invalid version constraint `{input}`: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionConstraint::Range(alternatives))
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionConstraint::Latest => version.pre.is_empty(),
            VersionConstraint::Range(alternatives) => {
                alternatives.iter().any(|req| req.matches(version))
            }
        }
    }
}

/// Parse a release tag, tolerating a leading `v`.
pub fn parse_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(bare).ok()
}

/// Select exactly one release tag for `constraint`, or `None`.
///
/// Never fails: an unparseable constraint matches nothing, and tags that are
/// not semantic versions are skipped.
pub fn resolve(constraint: &str, releases: &[String]) -> Option<String> {
    let parsed = match VersionConstraint::parse(constraint) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(constraint, error = %e, "constraint does not parse, nothing can match");
            return None;
        }
    };

    let sorted = sort_releases(releases);

    let found = match parsed {
        VersionConstraint::Latest => {
            info!("Getting latest Steampipe CLI version");
            sorted
                .iter()
                .rev()
                .find(|(version, _)| version.pre.is_empty())
        }
        ref range => sorted.iter().rev().find(|(version, _)| range.matches(version)),
    };

    match found {
        Some((_, tag)) => {
            debug!(version = %tag, "Matched Steampipe CLI version");
            Some((*tag).to_string())
        }
        None => {
            debug!(constraint, "No matching Steampipe CLI version found");
            None
        }
    }
}

/// Whether `tag` satisfies the range `requirement` (e.g. [`PROGRESS_FLAG_MIN_VERSION`]).
pub fn satisfies(tag: &str, requirement: &str) -> bool {
    let Some(version) = parse_tag(tag) else {
        return false;
    };
    match VersionConstraint::parse(requirement) {
        Ok(constraint) => constraint.matches(&version),
        Err(_) => false,
    }
}

/// Sort tags ascending by semver precedence, dropping those that do not parse.
///
/// Stable, so equal versions keep their listing order.
fn sort_releases(releases: &[String]) -> Vec<(Version, &str)> {
    let mut parsed: Vec<(Version, &str)> = releases
        .iter()
        .filter_map(|tag| match parse_tag(tag) {
            Some(version) => Some((version, tag.as_str())),
            None => {
                debug!(tag = %tag, "skipping release tag that is not a semantic version");
                None
            }
        })
        .collect();
    parsed.sort_by(|a, b| a.0.cmp(&b.0));
    parsed
}

/// Rewrite one npm-style comparator set into `VersionReq` syntax.
///
/// Whitespace separates ANDed comparators, a bare version means an exact
/// match, `a - b` is an inclusive range, and `v` prefixes are dropped.
fn normalize_comparator_set(set: &str) -> String {
    let tokens: Vec<&str> = set.split_whitespace().collect();

    if let [low, "-", high] = tokens.as_slice() {
        return format!(">={}, <={}", strip_v(low), strip_v(high));
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in tokens {
        if is_operator(token) {
            pending_op = Some(token);
            continue;
        }
        let token = match pending_op.take() {
            Some(op) => format!("{op}{token}"),
            None => token.to_string(),
        };
        comparators.push(normalize_comparator(&token));
    }

    if comparators.is_empty() {
        "*".to_string()
    } else {
        comparators.join(", ")
    }
}

fn normalize_comparator(comparator: &str) -> String {
    let comparator = comparator.trim_end_matches(',');
    let split = comparator
        .find(|c: char| !matches!(c, '^' | '~' | '=' | '<' | '>'))
        .unwrap_or(comparator.len());
    let (op, version) = comparator.split_at(split);
    let version = truncate_wildcards(strip_v(version));

    if version.is_empty() {
        return "*".to_string();
    }
    match op {
        // npm treats a bare version as exact, `VersionReq` as caret
        "" => format!("={version}"),
        "~>" => format!("~{version}"),
        _ => format!("{op}{version}"),
    }
}

fn is_operator(token: &str) -> bool {
    matches!(token, "^" | "~" | "~>" | "=" | "<" | "<=" | ">" | ">=")
}

/// `1.2.x` -> `1.2`; a partial version already means "any" for the missing parts.
fn truncate_wildcards(version: &str) -> String {
    version
        .split('.')
        .take_while(|part| !matches!(*part, "" | "*" | "x" | "X"))
        .collect::<Vec<_>>()
        .join(".")
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

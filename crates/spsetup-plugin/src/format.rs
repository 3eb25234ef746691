// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection document format detection.

use spsetup_core::ConfigFormat;

/// Classify a connection document as JSON, HCL, or neither.
///
/// JSON is tried first: HCL parsers are lenient enough that some JSON
/// documents would otherwise be classified as HCL.
pub fn detect(document: &str) -> ConfigFormat {
    if serde_json::from_str::<serde_json::Value>(document).is_ok() {
        return ConfigFormat::Json;
    }
    if hcl::parse(document).is_ok() {
        return ConfigFormat::Hcl;
    }
    ConfigFormat::Unknown
}

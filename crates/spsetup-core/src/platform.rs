// SPDX-FileCopyrightText: 2026 spsetup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host platform detection and the supported-platform guard.
//!
//! Names follow the runner convention (`linux`/`darwin`, `x64`/`arm64`),
//! not `std::env::consts`. Tool-cache paths use the same names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SetupError;

/// Operating systems the CLI publishes builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
}

/// CPU architectures the CLI publishes builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

/// A raw, unchecked platform description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

/// A platform that passed [`check_platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportedPlatform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on, in runner naming.
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let arch = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            other => other,
        };
        Self::new(os, arch)
    }
}

/// Fail unless `platform` is one of linux/darwin on x64/arm64.
pub fn check_platform(platform: &Platform) -> Result<SupportedPlatform, SetupError> {
    let unsupported = || SetupError::UnsupportedPlatform {
        os: platform.os.clone(),
        arch: platform.arch.clone(),
    };
    let os = Os::from_str(&platform.os).map_err(|_| unsupported())?;
    let arch = Arch::from_str(&platform.arch).map_err(|_| unsupported())?;
    Ok(SupportedPlatform { os, arch })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str =
        "turbot/steampipe-action-setup only supports linux and darwin on x64 and arm64 at this time";

    #[test]
    fn supported_combinations_pass() {
        for os in ["linux", "darwin"] {
            for arch in ["x64", "arm64"] {
                let checked = check_platform(&Platform::new(os, arch))
                    .unwrap_or_else(|e| panic!("{os}/{arch} should be supported: {e}"));
                assert_eq!(checked.os.to_string(), os);
                assert_eq!(checked.arch.to_string(), arch);
            }
        }
    }

    #[test]
    fn unsupported_arch_is_rejected() {
        for os in ["linux", "darwin"] {
            for arch in ["arm", "ia32", "mips", "mipsel", "ppc", "ppc64", "s390", "s390x"] {
                let err = check_platform(&Platform::new(os, arch)).unwrap_err();
                assert_eq!(err.to_string(), MESSAGE);
            }
        }
    }

    #[test]
    fn unsupported_os_is_rejected() {
        for os in ["aix", "freebsd", "openbsd", "sunos", "win32"] {
            for arch in ["x64", "arm64"] {
                let err = check_platform(&Platform::new(os, arch)).unwrap_err();
                assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
                assert_eq!(err.to_string(), MESSAGE);
            }
        }
    }

    #[test]
    fn current_platform_uses_runner_names() {
        let current = Platform::current();
        assert_ne!(current.os, "macos");
        assert_ne!(current.arch, "x86_64");
        assert_ne!(current.arch, "aarch64");
    }
}
